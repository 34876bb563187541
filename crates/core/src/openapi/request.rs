//! Request argument types.

use tracing::debug;

use super::operation::{Operation, Parameter};
use super::schema::SchemaMapper;
use super::spec::ParameterLocation;
use crate::error::Result;
use crate::options::GenerationOptions;
use crate::ts::{Property, TypeNode};

/// Mapped request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    /// Body type; `FormData` for multipart bodies.
    pub ty: TypeNode,
    /// Whether callers must send it.
    pub required: bool,
    /// `multipart/form-data` body.
    pub multipart: bool,
    /// Spread into the flat request instead of nested under `body`.
    pub spread: bool,
}

/// The request argument type of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestShape {
    /// Type of the `req` argument.
    pub ty: TypeNode,
    /// Whether anything inside must be supplied.
    pub required: bool,
    /// Body details, when the operation takes one.
    pub body: Option<RequestBody>,
}

const GROUPS: [(ParameterLocation, &str); 3] = [
    (ParameterLocation::Path, "path"),
    (ParameterLocation::Query, "query"),
    (ParameterLocation::Header, "headers"),
];

fn parameter_property(
    param: &Parameter<'_>,
    mapper: &mut SchemaMapper<'_>,
    options: &GenerationOptions,
) -> Result<Property> {
    let ty = match param.schema {
        Some(schema) => mapper.map(schema)?,
        None => TypeNode::UNKNOWN,
    };
    let forced_optional = param.location == ParameterLocation::Header
        && options.optional_headers.contains(param.name);
    Ok(Property {
        name: param.name.to_string(),
        ty,
        optional: forced_optional || !param.required,
    })
}

fn map_body(
    operation: &Operation<'_>,
    mapper: &mut SchemaMapper<'_>,
    options: &GenerationOptions,
) -> Result<Option<RequestBody>> {
    let Some(body) = operation.request_body else {
        return Ok(None);
    };
    let Some((media_type, content)) = body.content.first() else {
        return Ok(None);
    };

    if media_type.starts_with("multipart/form-data") {
        return Ok(Some(RequestBody {
            ty: TypeNode::reference("FormData"),
            required: body.required,
            multipart: true,
            spread: false,
        }));
    }

    let ty = match &content.schema {
        Some(schema) => mapper.map(schema)?,
        None => TypeNode::UNKNOWN,
    };
    let spread = !options.full_request && mapper.is_object_like(&ty);
    Ok(Some(RequestBody {
        ty,
        required: body.required,
        multipart: false,
        spread,
    }))
}

/// Build the request argument type of `operation`.
///
/// With `full_request` parameters are grouped under `path`, `query`,
/// `headers` and `body`; otherwise they are flattened and an object body is
/// intersected with them.
pub fn synthesize_request(
    operation: &Operation<'_>,
    mapper: &mut SchemaMapper<'_>,
    options: &GenerationOptions,
) -> Result<RequestShape> {
    let body = map_body(operation, mapper, options)?;

    if options.full_request {
        let mut groups = Vec::new();
        for (location, key) in GROUPS {
            let props = operation
                .parameters_in(location)
                .map(|p| parameter_property(p, mapper, options))
                .collect::<Result<Vec<_>>>()?;
            if props.is_empty() {
                continue;
            }
            let optional = props.iter().all(|p| p.optional);
            groups.push(Property {
                name: key.to_string(),
                ty: TypeNode::Object(props),
                optional,
            });
        }
        if let Some(body) = &body {
            groups.push(Property {
                name: "body".to_string(),
                ty: body.ty.clone(),
                optional: !body.required,
            });
        }
        let required = groups.iter().any(|g| !g.optional);
        return Ok(RequestShape {
            ty: TypeNode::Object(groups),
            required,
            body,
        });
    }

    let mut props: Vec<Property> = Vec::new();
    for (location, _) in GROUPS {
        for param in operation.parameters_in(location) {
            if props.iter().any(|p| p.name == param.name) {
                debug!(
                    name = param.name,
                    location = ?location,
                    path = operation.path,
                    "Skipping parameter shadowed by an earlier one in flat request."
                );
                continue;
            }
            props.push(parameter_property(param, mapper, options)?);
        }
    }

    let mut required = props.iter().any(|p| !p.optional);
    let ty = match &body {
        Some(body) if body.spread => {
            required |= body.required;
            if props.is_empty() {
                body.ty.clone()
            } else {
                TypeNode::Intersection(vec![TypeNode::Object(props), body.ty.clone()])
            }
        }
        Some(body) => {
            required |= body.required;
            props.push(Property {
                name: "body".to_string(),
                ty: body.ty.clone(),
                optional: !body.required,
            });
            TypeNode::Object(props)
        }
        None => TypeNode::Object(props),
    };

    Ok(RequestShape { ty, required, body })
}

//! Flattening path items into uniquely named operations.

use std::collections::HashSet;

use tracing::debug;

use super::spec::{
    HttpMethod, OpenApiDocument, ParameterLocation, ParameterObject, RefOr, RequestBodyObject,
    ResponseObject, SchemaObject,
};
use crate::error::Result;
use crate::naming::{capitalize, to_identifier};

/// Hands out operation ids that are unique within one run.
#[derive(Debug, Default)]
pub struct OperationIds {
    seen: HashSet<String>,
}

impl OperationIds {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver that never hands out any of `reserved`.
    pub fn with_reserved<'r>(reserved: impl IntoIterator<Item = &'r str>) -> Self {
        Self {
            seen: reserved.into_iter().map(str::to_string).collect(),
        }
    }

    /// Assign an id to `method path`.
    ///
    /// An explicit id is normalized and used unless taken. Otherwise the id is
    /// synthesized from the method and path, and a numeric suffix starting at
    /// `2` is appended while it still collides.
    pub fn resolve(&mut self, path: &str, method: HttpMethod, explicit: Option<&str>) -> String {
        if let Some(explicit) = explicit {
            let id = to_identifier(explicit);
            if self.seen.insert(id.clone()) {
                return id;
            }
            debug!(id, path, "Operation id already taken, synthesizing.");
        }

        let base = synthesize(path, method);
        let mut candidate = base.clone();
        let mut counter = 2;
        while self.seen.contains(&candidate) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        self.seen.insert(candidate.clone());
        candidate
    }
}

fn is_template(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

fn word(segment: &str) -> String {
    let ident = to_identifier(segment.trim_start_matches('{').trim_end_matches('}'));
    capitalize(ident.trim_start_matches('_'))
}

/// `get /movies/{id}` becomes `getMoviesById`.
fn synthesize(path: &str, method: HttpMethod) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return format!("{}Root", method.as_str());
    }

    let trailing = segments.iter().rev().take_while(|s| is_template(s)).count();
    let (inner, params) = segments.split_at(segments.len() - trailing);

    let mut id = method.as_str().to_string();
    for segment in inner {
        id.push_str(&word(segment));
    }
    if !params.is_empty() {
        id.push_str("By");
        let names: Vec<String> = params.iter().map(|p| word(p)).collect();
        id.push_str(&names.join("And"));
    }
    id
}

/// A parameter after reference resolution and path-level merging.
#[derive(Debug, Clone, Copy)]
pub struct Parameter<'a> {
    /// Name as written in the document.
    pub name: &'a str,
    /// Where it travels.
    pub location: ParameterLocation,
    /// Path parameters are always required.
    pub required: bool,
    /// Value schema; `None` maps to `unknown`.
    pub schema: Option<&'a SchemaObject>,
}

impl<'a> From<&'a ParameterObject> for Parameter<'a> {
    fn from(param: &'a ParameterObject) -> Self {
        Self {
            name: &param.name,
            location: param.location,
            required: param.required || param.location == ParameterLocation::Path,
            schema: param.schema.as_ref(),
        }
    }
}

/// One path + method pair with everything referenced inline.
#[derive(Debug, Clone)]
pub struct Operation<'a> {
    /// Path template.
    pub path: &'a str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Unique id within the run.
    pub operation_id: String,
    /// Merged parameters, operation-level first.
    pub parameters: Vec<Parameter<'a>>,
    /// Request body.
    pub request_body: Option<&'a RequestBodyObject>,
    /// Responses in document order.
    pub responses: Vec<(&'a str, &'a ResponseObject)>,
}

impl<'a> Operation<'a> {
    /// Capitalized id, the prefix of every per-operation type name.
    pub fn type_prefix(&self) -> String {
        capitalize(&self.operation_id)
    }

    /// Parameters in `location`, in merged order.
    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter<'a>> {
        self.parameters.iter().filter(move |p| p.location == location)
    }
}

fn resolve_parameters<'a>(
    document: &'a OpenApiDocument,
    params: &'a [RefOr<ParameterObject>],
) -> Result<Vec<Parameter<'a>>> {
    params
        .iter()
        .map(|p| {
            p.resolve(&document.components.parameters, "parameters")
                .map(Parameter::from)
        })
        .collect()
}

/// Flatten every path item of `document` into operations, in document order.
pub fn collect_operations(document: &OpenApiDocument) -> Result<Vec<Operation<'_>>> {
    collect_operations_reserving(document, &[])
}

/// Like [`collect_operations`], but no operation id equals one of `reserved`.
pub fn collect_operations_reserving<'a>(
    document: &'a OpenApiDocument,
    reserved: &[&str],
) -> Result<Vec<Operation<'a>>> {
    let mut ids = OperationIds::with_reserved(reserved.iter().copied());
    let mut operations = Vec::new();

    for (path, item) in &document.paths {
        let shared = resolve_parameters(document, &item.parameters)?;

        for (method, raw) in &item.operations {
            let mut parameters = resolve_parameters(document, &raw.parameters)?;
            for param in &shared {
                let overridden = parameters
                    .iter()
                    .any(|p| p.name == param.name && p.location == param.location);
                if !overridden {
                    parameters.push(*param);
                }
            }

            let request_body = raw
                .request_body
                .as_ref()
                .map(|body| body.resolve(&document.components.request_bodies, "requestBodies"))
                .transpose()?;

            let responses = raw
                .responses
                .iter()
                .map(|(status, response)| {
                    response
                        .resolve(&document.components.responses, "responses")
                        .map(|r| (status.as_str(), r))
                })
                .collect::<Result<Vec<_>>>()?;

            let operation_id = ids.resolve(path, *method, raw.operation_id.as_deref());
            debug!(operation_id, path, method = method.as_str(), "Resolved operation.");

            operations.push(Operation {
                path,
                method: *method,
                operation_id,
                parameters,
                request_body,
                responses,
            });
        }
    }

    Ok(operations)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::spec::SchemaType;
    use serde_json::json;

    fn document(value: serde_json::Value) -> OpenApiDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_synthesized_ids() {
        let mut ids = OperationIds::new();
        assert_eq!(ids.resolve("/movies", HttpMethod::Get, None), "getMovies");
        assert_eq!(ids.resolve("/movies/{id}", HttpMethod::Get, None), "getMoviesById");
        assert_eq!(
            ids.resolve("/movies/{movieId}/actors/{actor-id}/{role}", HttpMethod::Delete, None),
            "deleteMoviesMovieIdActorsByActorIdAndRole"
        );
        assert_eq!(ids.resolve("/", HttpMethod::Post, None), "postRoot");
        assert_eq!(ids.resolve("/user-profiles", HttpMethod::Put, None), "putUserProfiles");
    }

    #[test]
    fn test_explicit_ids_are_normalized() {
        let mut ids = OperationIds::new();
        assert_eq!(ids.resolve("/movies", HttpMethod::Get, Some("list-movies")), "listMovies");
        assert_eq!(ids.resolve("/x", HttpMethod::Get, Some("delete")), "_delete");
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let mut ids = OperationIds::new();
        let first = ids.resolve("/movies", HttpMethod::Get, Some("getMovies"));
        let second = ids.resolve("/movies", HttpMethod::Get, Some("getMovies"));
        let third = ids.resolve("/movies/", HttpMethod::Get, None);
        assert_eq!(first, "getMovies");
        assert_eq!(second, "getMovies2");
        assert_eq!(third, "getMovies3");
    }

    #[test]
    fn test_reserved_names_are_never_handed_out() {
        let mut ids = OperationIds::with_reserved(["build", "getHealth"]);
        assert_eq!(ids.resolve("/build", HttpMethod::Post, Some("build")), "postBuild");
        assert_eq!(ids.resolve("/health", HttpMethod::Get, None), "getHealth2");
    }

    #[test]
    fn test_explicit_collision_falls_back_to_path() {
        let mut ids = OperationIds::new();
        ids.resolve("/a", HttpMethod::Get, Some("fetch"));
        assert_eq!(ids.resolve("/b/{id}", HttpMethod::Get, Some("fetch")), "getBById");
    }

    #[test]
    fn test_path_parameters_are_merged() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "paths": {
                "/movies/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "schema": { "type": "string" } },
                        { "name": "x-tenant", "in": "header" }
                    ],
                    "get": {
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
                        ]
                    },
                    "delete": {}
                }
            }
        }));

        let ops = collect_operations(&doc).unwrap();
        assert_eq!(ops.len(), 2);

        let get = &ops[0];
        assert_eq!(get.operation_id, "getMoviesById");
        assert_eq!(get.parameters.len(), 2);
        let id = get.parameters_in(ParameterLocation::Path).next().unwrap();
        assert!(id.required);
        assert!(matches!(
            &id.schema.unwrap().schema_type,
            Some(SchemaType::Single(t)) if t == "integer"
        ));

        let delete = &ops[1];
        assert_eq!(delete.operation_id, "deleteMoviesById");
        assert_eq!(delete.parameters.len(), 2);
        // path parameters are required even when the document says otherwise
        assert!(delete.parameters[0].required);
    }

    #[test]
    fn test_unresolved_parameter_reference_fails() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "paths": {
                "/movies": {
                    "get": { "parameters": [{ "$ref": "#/components/parameters/Missing" }] }
                }
            }
        }));
        assert!(collect_operations(&doc).is_err());
    }
}

//! Introspection types to TypeScript type expressions.

use std::collections::HashSet;

use super::introspection::{IntrospectionSchema, TypeKind, TypeRef};
use crate::error::{GenerateError, Result};
use crate::naming::capitalize;
use crate::ts::{Property, TypeDef, TypeNode};

/// Object types that never get an interface of their own.
const SKIPPED_OBJECTS: [&str; 5] = ["Query", "Mutation", "Subscription", "Boolean", "String"];

fn map_scalar(name: &str) -> Result<TypeNode> {
    match name {
        "String" | "ID" | "Date" | "DateTime" => Ok(TypeNode::STRING),
        "Int" | "Float" => Ok(TypeNode::NUMBER),
        "Boolean" => Ok(TypeNode::BOOLEAN),
        other => Err(GenerateError::unknown("GraphQL scalar", other)),
    }
}

/// Map a type reference.
///
/// `NON_NULL` is unwrapped without changing optionality: a selection may
/// leave any field out.
pub fn map_graphql_type(type_ref: &TypeRef) -> Result<TypeNode> {
    match type_ref.kind {
        TypeKind::Scalar => map_scalar(type_ref.name()),
        TypeKind::Object => Ok(TypeNode::reference(capitalize(type_ref.name()))),
        TypeKind::List | TypeKind::NonNull => {
            let inner = type_ref.of_type.as_deref().ok_or_else(|| {
                GenerateError::malformed(format!("{} without ofType", type_ref.kind.as_str()))
            })?;
            let mapped = map_graphql_type(inner)?;
            if type_ref.kind == TypeKind::List {
                Ok(TypeNode::Array(Box::new(mapped)))
            } else {
                Ok(mapped)
            }
        }
        kind @ (TypeKind::Interface | TypeKind::Union | TypeKind::Enum | TypeKind::InputObject) => {
            Err(GenerateError::unknown("GraphQL kind", kind.as_str()))
        }
    }
}

/// One interface per object type, in introspection order.
pub fn object_interfaces(schema: &IntrospectionSchema) -> Result<Vec<TypeDef>> {
    let mut emitted = HashSet::new();
    let mut defs = Vec::new();

    for ty in schema.user_types() {
        if ty.kind != TypeKind::Object || SKIPPED_OBJECTS.contains(&ty.name.as_str()) {
            continue;
        }
        let name = capitalize(&ty.name);
        if !emitted.insert(name.clone()) {
            continue;
        }

        let mut seen_fields = HashSet::new();
        let mut props = Vec::new();
        for field in ty.fields.iter().flatten() {
            if !seen_fields.insert(field.name.as_str()) {
                continue;
            }
            props.push(Property::optional(
                field.name.clone(),
                map_graphql_type(&field.field_type)?,
            ));
        }
        defs.push(TypeDef::interface(name, props));
    }

    Ok(defs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ts::{Emit, TypeDefKind};
    use crate::writer::QuoteStyle;
    use serde_json::json;

    fn type_ref(value: serde_json::Value) -> TypeRef {
        serde_json::from_value(value).unwrap()
    }

    fn emit(value: serde_json::Value) -> String {
        map_graphql_type(&type_ref(value))
            .unwrap()
            .emit(QuoteStyle::Single)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(emit(json!({ "kind": "SCALAR", "name": "Int" })), "number");
        assert_eq!(emit(json!({ "kind": "SCALAR", "name": "Float" })), "number");
        assert_eq!(emit(json!({ "kind": "SCALAR", "name": "ID" })), "string");
        assert_eq!(emit(json!({ "kind": "SCALAR", "name": "DateTime" })), "string");
        assert_eq!(emit(json!({ "kind": "SCALAR", "name": "Boolean" })), "boolean");
    }

    #[test]
    fn test_unknown_scalar_names_it() {
        let err = map_graphql_type(&type_ref(json!({ "kind": "SCALAR", "name": "JSON" }))).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownType { ref name, .. } if name == "JSON"));
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(
            emit(json!({
                "kind": "NON_NULL",
                "ofType": {
                    "kind": "LIST",
                    "ofType": { "kind": "NON_NULL", "ofType": { "kind": "OBJECT", "name": "movie" } }
                }
            })),
            "Array<Movie>"
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let err = map_graphql_type(&type_ref(json!({ "kind": "ENUM", "name": "Color" }))).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownType { ref name, .. } if name == "ENUM"));
    }

    #[test]
    fn test_object_interfaces_dedupe() {
        let schema: IntrospectionSchema = serde_json::from_value(json!({
            "queryType": { "name": "Query" },
            "types": [
                { "kind": "OBJECT", "name": "Query", "fields": [
                    { "name": "movies", "type": { "kind": "LIST", "ofType": { "kind": "OBJECT", "name": "Movie" } } }
                ] },
                { "kind": "OBJECT", "name": "Movie", "fields": [
                    { "name": "id", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "ID" } } },
                    { "name": "id", "type": { "kind": "SCALAR", "name": "ID" } },
                    { "name": "year", "type": { "kind": "SCALAR", "name": "Int" } }
                ] },
                { "kind": "OBJECT", "name": "movie", "fields": [] },
                { "kind": "OBJECT", "name": "__Type", "fields": [] },
                { "kind": "SCALAR", "name": "String" }
            ]
        }))
        .unwrap();

        let defs = object_interfaces(&schema).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "Movie");
        let TypeDefKind::Interface(props) = &defs[0].kind else {
            unreachable!("object types become interfaces");
        };
        assert_eq!(props.len(), 2);
        assert!(props.iter().all(|p| p.optional));
        assert_eq!(props[1].ty, TypeNode::NUMBER);
    }
}

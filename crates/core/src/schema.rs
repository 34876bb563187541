//! The generator's input: an OpenAPI document or a GraphQL introspection
//! result.

use serde_json::Value;
use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::graphql::introspection::IntrospectionSchema;
use crate::graphql::parse::introspect_sdl;
use crate::openapi::spec::OpenApiDocument;

/// A parsed API schema.
#[derive(Debug, Clone)]
pub enum Schema {
    /// OpenAPI 3.x or Swagger 2 document.
    OpenApi(Box<OpenApiDocument>),
    /// GraphQL introspection result.
    GraphQl(Box<IntrospectionSchema>),
}

impl Schema {
    /// Classify and deserialize an already-decoded document.
    ///
    /// `__schema` (top level or under `data`) means GraphQL; `openapi`,
    /// `swagger` or `paths` means OpenAPI. Anything else is malformed.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(GenerateError::malformed("expected a JSON object"));
        };

        let introspection = match map.remove("__schema") {
            Some(schema) => Some(schema),
            None => match map.get_mut("data") {
                Some(Value::Object(data)) => data.remove("__schema"),
                _ => None,
            },
        };
        if let Some(schema) = introspection {
            debug!("Detected GraphQL introspection result.");
            let schema = serde_json::from_value(schema).map_err(|e| {
                GenerateError::malformed(format!("invalid GraphQL introspection result: {e}"))
            })?;
            return Ok(Schema::GraphQl(Box::new(schema)));
        }

        if ["openapi", "swagger", "paths"].iter().any(|k| map.contains_key(*k)) {
            debug!("Detected OpenAPI document.");
            let document = serde_json::from_value(Value::Object(map))
                .map_err(|e| GenerateError::malformed(format!("invalid OpenAPI document: {e}")))?;
            return Ok(Schema::OpenApi(Box::new(document)));
        }

        Err(GenerateError::malformed(
            "neither an OpenAPI document nor a GraphQL introspection result",
        ))
    }

    /// Build a GraphQL schema from SDL source.
    pub fn from_sdl(text: &str) -> Result<Self> {
        let schema = introspect_sdl(text)?;
        Ok(Schema::GraphQl(Box::new(schema)))
    }

    /// `openapi` or `graphql`.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::OpenApi(_) => "openapi",
            Schema::GraphQl(_) => "graphql",
        }
    }
}

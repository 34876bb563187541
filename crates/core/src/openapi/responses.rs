//! Grouping responses by status class and shaping the operation result type.

use std::collections::BTreeMap;

use super::operation::Operation;
use super::schema::SchemaMapper;
use crate::error::Result;
use crate::ts::TypeNode;

/// HTTP status code family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusClass {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl StatusClass {
    /// Every class, in ascending order.
    pub const ALL: [StatusClass; 5] = [
        StatusClass::Informational,
        StatusClass::Success,
        StatusClass::Redirection,
        StatusClass::ClientError,
        StatusClass::ServerError,
    ];

    /// Classify a response key: `200`, `4XX` and `5xx` are classified, while
    /// `default` and anything unparseable are not.
    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let digit = chars.next()?;
        let rest = chars.as_str();
        let is_code = rest.len() == 2 && rest.chars().all(|c| c.is_ascii_digit());
        let is_range = rest.eq_ignore_ascii_case("xx");
        if !is_code && !is_range {
            return None;
        }
        Some(match digit {
            '1' => StatusClass::Informational,
            '2' => StatusClass::Success,
            '3' => StatusClass::Redirection,
            '4' => StatusClass::ClientError,
            '5' => StatusClass::ServerError,
            _ => return None,
        })
    }

    /// Leading digit of the class.
    pub fn digit(self) -> u8 {
        match self {
            StatusClass::Informational => 1,
            StatusClass::Success => 2,
            StatusClass::Redirection => 3,
            StatusClass::ClientError => 4,
            StatusClass::ServerError => 5,
        }
    }

    /// `2xx`
    pub fn label(self) -> String {
        format!("{}xx", self.digit())
    }

    /// Name of the status code union type, `StatusCode2xx`.
    pub fn status_code_type(self) -> String {
        format!("StatusCode{}", self.label())
    }

    /// Registered status codes of the class.
    pub fn codes(self) -> &'static [u16] {
        match self {
            StatusClass::Informational => &[100, 101, 102, 103],
            StatusClass::Success => &[200, 201, 202, 203, 204, 205, 206, 207, 208, 226],
            StatusClass::Redirection => &[300, 301, 302, 303, 304, 305, 307, 308],
            StatusClass::ClientError => &[
                400, 401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415,
                416, 417, 418, 421, 422, 423, 424, 425, 426, 428, 429, 431, 451,
            ],
            StatusClass::ServerError => &[500, 501, 502, 503, 504, 505, 506, 507, 508, 510, 511],
        }
    }
}

/// The response type of one status class.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseAlternative {
    /// Status class.
    pub class: StatusClass,
    /// Bare body, or `FullResponse<Body, StatusCodeNxx>`.
    pub ty: TypeNode,
}

/// All response alternatives of an operation, in ascending class order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseShape {
    /// One entry per class with at least one response.
    pub alternatives: Vec<ResponseAlternative>,
}

/// `FullResponse<body, StatusCodeNxx>`
pub fn full_response(body: TypeNode, class: StatusClass) -> TypeNode {
    TypeNode::Generic {
        name: "FullResponse".to_string(),
        args: vec![body, TypeNode::reference(class.status_code_type())],
    }
}

/// Build the response alternatives of `operation`.
pub fn synthesize_responses(
    operation: &Operation<'_>,
    mapper: &mut SchemaMapper<'_>,
    wrap_full_response: bool,
) -> Result<ResponseShape> {
    let mut classes: BTreeMap<StatusClass, Vec<TypeNode>> = BTreeMap::new();

    for (key, response) in &operation.responses {
        let Some(class) = StatusClass::from_key(key) else {
            continue;
        };
        let body = match response.first_schema() {
            Some(schema) => mapper.map(schema)?,
            None => TypeNode::UNKNOWN,
        };
        classes.entry(class).or_default().push(body);
    }

    let alternatives = classes
        .into_iter()
        .map(|(class, bodies)| {
            let body = TypeNode::union_of(bodies);
            let ty = if wrap_full_response {
                full_response(body, class)
            } else {
                body
            };
            ResponseAlternative { class, ty }
        })
        .collect();

    Ok(ResponseShape { alternatives })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::operation::collect_operations;
    use crate::openapi::spec::OpenApiDocument;
    use crate::ts::Emit;
    use crate::writer::QuoteStyle;
    use serde_json::json;

    #[test]
    fn test_status_class_from_key() {
        assert_eq!(StatusClass::from_key("200"), Some(StatusClass::Success));
        assert_eq!(StatusClass::from_key("404"), Some(StatusClass::ClientError));
        assert_eq!(StatusClass::from_key("5XX"), Some(StatusClass::ServerError));
        assert_eq!(StatusClass::from_key("3xx"), Some(StatusClass::Redirection));
        assert_eq!(StatusClass::from_key("default"), None);
        assert_eq!(StatusClass::from_key("600"), None);
        assert_eq!(StatusClass::from_key("20"), None);
    }

    fn document() -> OpenApiDocument {
        serde_json::from_value(json!({
            "openapi": "3.0.0",
            "paths": {
                "/movies": {
                    "get": {
                        "responses": {
                            "404": { "description": "missing" },
                            "200": {
                                "description": "ok",
                                "content": { "application/json": { "schema": { "type": "array", "items": { "type": "string" } } } }
                            },
                            "201": {
                                "description": "created",
                                "content": { "application/json": { "schema": { "type": "string" } } }
                            },
                            "default": {
                                "description": "error",
                                "content": { "application/json": { "schema": { "type": "object" } } }
                            }
                        }
                    }
                },
                "/empty": { "get": { "responses": {} } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_full_response_wraps_each_class() {
        let doc = document();
        let ops = collect_operations(&doc).unwrap();
        let mut mapper = SchemaMapper::new(&doc, true);
        let shape = synthesize_responses(&ops[0], &mut mapper, true).unwrap();

        assert_eq!(shape.alternatives.len(), 2);
        let rendered: Vec<_> = shape
            .alternatives
            .iter()
            .map(|a| a.ty.emit(QuoteStyle::Single))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "FullResponse<Array<string> | string, StatusCode2xx>",
                "FullResponse<unknown, StatusCode4xx>",
            ]
        );
    }

    #[test]
    fn test_bare_bodies_without_full_response() {
        let doc = document();
        let ops = collect_operations(&doc).unwrap();
        let mut mapper = SchemaMapper::new(&doc, true);
        let shape = synthesize_responses(&ops[0], &mut mapper, false).unwrap();
        let rendered: Vec<_> = shape
            .alternatives
            .iter()
            .map(|a| a.ty.emit(QuoteStyle::Single))
            .collect();
        assert_eq!(rendered, vec!["Array<string> | string", "unknown"]);
    }

    #[test]
    fn test_swagger2_response_schema() {
        let doc: OpenApiDocument = serde_json::from_value(json!({
            "swagger": "2.0",
            "paths": {
                "/movies": {
                    "get": {
                        "responses": {
                            "200": { "description": "ok", "schema": { "$ref": "#/definitions/Movie" } }
                        }
                    }
                }
            },
            "definitions": {
                "Movie": { "type": "object", "properties": { "title": { "type": "string" } } }
            }
        }))
        .unwrap();
        let ops = collect_operations(&doc).unwrap();
        let mut mapper = SchemaMapper::new(&doc, true);
        let shape = synthesize_responses(&ops[0], &mut mapper, false).unwrap();
        assert_eq!(shape.alternatives.len(), 1);
        assert_eq!(shape.alternatives[0].ty, TypeNode::reference("Movie"));
    }

    #[test]
    fn test_no_classes_falls_back_to_unknown() {
        let doc = document();
        let ops = collect_operations(&doc).unwrap();
        let mut mapper = SchemaMapper::new(&doc, true);
        let shape = synthesize_responses(&ops[1], &mut mapper, true).unwrap();
        assert!(shape.alternatives.is_empty());
    }
}

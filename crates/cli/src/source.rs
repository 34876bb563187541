//! Decoding schema text that may be JSON or YAML.

use std::fmt;

use serde_json::Value;

/// A successfully decoded document and the syntax it was written in.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Parsed as JSON.
    Json(Value),
    /// JSON failed, parsed as YAML.
    Yaml(Value),
}

impl Decoded {
    /// Syntax name for log messages.
    pub fn syntax(&self) -> &'static str {
        match self {
            Decoded::Json(_) => "JSON",
            Decoded::Yaml(_) => "YAML",
        }
    }

    /// The document itself.
    pub fn into_value(self) -> Value {
        match self {
            Decoded::Json(value) | Decoded::Yaml(value) => value,
        }
    }
}

/// Neither parser accepted the text. Both diagnostics are kept.
#[derive(Debug)]
pub struct ParseFailure {
    /// Why JSON parsing failed.
    pub json: serde_json::Error,
    /// Why YAML parsing failed.
    pub yaml: serde_yaml::Error,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot parse schema. Please make sure it is a JSON or a YAML file (JSON: {}; YAML: {})",
            self.json, self.yaml
        )
    }
}

impl std::error::Error for ParseFailure {}

/// Try JSON first, then YAML.
pub fn decode(text: &str) -> Result<Decoded, ParseFailure> {
    let json = match serde_json::from_str(text) {
        Ok(value) => return Ok(Decoded::Json(value)),
        Err(err) => err,
    };
    match serde_yaml::from_str(text) {
        Ok(value) => Ok(Decoded::Yaml(value)),
        Err(yaml) => Err(ParseFailure { json, yaml }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_wins_when_valid() {
        let decoded = decode(r#"{ "openapi": "3.0.0" }"#).unwrap();
        assert_eq!(decoded.syntax(), "JSON");
        assert_eq!(decoded.into_value(), json!({ "openapi": "3.0.0" }));
    }

    #[test]
    fn test_yaml_fallback() {
        let text = "openapi: 3.0.0\npaths:\n  /movies:\n    get:\n      responses: {}\n";
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.syntax(), "YAML");
        assert_eq!(
            decoded.into_value(),
            json!({ "openapi": "3.0.0", "paths": { "/movies": { "get": { "responses": {} } } } })
        );
    }

    #[test]
    fn test_both_failures_are_reported() {
        let err = decode("{ \"a\": [1, 2\n  - : :").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("JSON:"));
        assert!(message.contains("YAML:"));
    }
}

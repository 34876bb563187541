//! Errors raised while turning a schema into client code.

use thiserror::Error;

/// Everything that can stop a generation run.
///
/// Failures are all-or-nothing: when one of these is returned no part of the
/// artifact has been produced.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A schema node has no mapping rule.
    #[error("Unknown {category} `{name}`")]
    UnknownType {
        /// What kind of node was being mapped (e.g. "GraphQL scalar").
        category: &'static str,
        /// The offending scalar, kind or type name.
        name: String,
    },
    /// The input is neither an OpenAPI document nor a GraphQL introspection
    /// result, or it references something it does not define.
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),
    /// A configuration value is outside its allowed set.
    #[error("{0}")]
    InvalidConfiguration(String),
}

impl GenerateError {
    pub(crate) fn unknown(category: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownType {
            category,
            name: name.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSchema(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

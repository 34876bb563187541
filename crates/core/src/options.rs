//! Per-run generation settings and the generated output.

use std::collections::BTreeSet;

use crate::format::{ModuleFormat, TypeExtension};

/// Output language of the frontend implementation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Plain JavaScript (`.mjs`).
    #[default]
    Js,
    /// TypeScript (`.mts`).
    Ts,
}

impl Language {
    /// Extension of the frontend implementation file.
    pub fn implementation_extension(self) -> &'static str {
        match self {
            Language::Js => "mjs",
            Language::Ts => "mts",
        }
    }
}

/// Settings resolved once per run. Generation never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Client name; drives file stems, the client interface and factory names.
    pub name: String,
    /// Group request parameters by location (`path`, `query`, `headers`,
    /// `body`) instead of flattening them.
    pub full_request: bool,
    /// Wrap responses as `{ statusCode, headers, body }`.
    pub full_response: bool,
    /// Header parameters that are always optional in request types.
    pub optional_headers: BTreeSet<String>,
    /// Ask the runtime to validate responses against the schema.
    pub validate_response: bool,
    /// Treat every object property as optional, ignoring `required`.
    pub props_optional: bool,
    /// Import/export convention of the implementation file.
    pub module_format: ModuleFormat,
    /// Generate a browser `fetch` client instead of a runtime-backed one.
    pub is_frontend: bool,
    /// Language of the frontend implementation.
    pub language: Language,
    /// Send cookies with frontend requests.
    pub with_credentials: bool,
    /// Comment written at the top of the types file.
    pub types_comment: Option<String>,
    /// Extension the types file will be written with.
    pub type_extension: TypeExtension,
    /// Endpoint of the GraphQL service the schema came from.
    pub graphql_url: Option<String>,
}

impl GenerationOptions {
    /// Defaults matching the command line: full request/response on,
    /// optional properties on, ESM output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_request: true,
            full_response: true,
            optional_headers: BTreeSet::new(),
            validate_response: false,
            props_optional: true,
            module_format: ModuleFormat::Esm,
            is_frontend: false,
            language: Language::Js,
            with_credentials: false,
            types_comment: None,
            type_extension: TypeExtension::Dts,
            graphql_url: None,
        }
    }
}

/// The two strings a run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Type declaration file contents.
    pub types: String,
    /// Runtime implementation contents.
    pub implementation: String,
}

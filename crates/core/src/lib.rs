//! Schema-driven client generator.
//!
//! Turns an OpenAPI document or a GraphQL introspection result into two
//! strings: a TypeScript declaration file and a JavaScript implementation
//! that together form a typed client for the API. Generation is a pure
//! function of a [`Schema`] and [`GenerationOptions`]; nothing here touches
//! the filesystem or the network.
//!
//! ```
//! use clientgen_core::{GenerationOptions, Schema, generate};
//!
//! let schema = Schema::from_value(serde_json::json!({
//!     "openapi": "3.0.0",
//!     "paths": { "/health": { "get": { "responses": { "204": { "description": "ok" } } } } }
//! }))?;
//! let artifact = generate(&schema, &GenerationOptions::new("status"))?;
//! assert!(artifact.types.contains("getHealth(req?: GetHealthRequest)"));
//! # Ok::<(), clientgen_core::GenerateError>(())
//! ```

pub mod error;
pub mod format;
pub mod graphql;
pub mod naming;
pub mod openapi;
pub mod options;
pub mod runtime;
pub mod schema;
pub mod ts;
pub mod writer;

use tracing::debug;

pub use error::{GenerateError, Result};
pub use format::{ManifestLookup, ModuleFormat, TypeExtension, resolve_format, resolve_type_extension};
pub use graphql::sdl::print_sdl;
pub use options::{GeneratedArtifact, GenerationOptions, Language};
pub use schema::Schema;

/// Generate the type declarations and implementation for `schema`.
///
/// OpenAPI documents produce a runtime-backed client, or a `fetch` client
/// when `options.is_frontend` is set. GraphQL schemas always produce a
/// runtime-backed client.
pub fn generate(schema: &Schema, options: &GenerationOptions) -> Result<GeneratedArtifact> {
    debug!(
        kind = schema.kind(),
        name = %options.name,
        frontend = options.is_frontend,
        format = %options.module_format,
        "Generating client."
    );
    match schema {
        Schema::OpenApi(document) if options.is_frontend => openapi::frontend::generate(document, options),
        Schema::OpenApi(document) => openapi::backend::generate(document, options),
        Schema::GraphQl(introspection) => graphql::generate(introspection, options),
    }
}

//! GraphQL input: introspection model, type mapping, SDL printing and the
//! runtime-backed client.

pub mod introspection;
pub mod mapper;
pub mod parse;
pub mod sdl;

use tracing::debug;
use url::Url;

use crate::error::{GenerateError, Result};
use crate::options::{GeneratedArtifact, GenerationOptions};
use crate::runtime::{
    ClientNames, RUNTIME_PACKAGE, begin_factory, sibling_path, write_factory_declaration,
    write_factory_exports, write_factory_imports, write_types_comment,
};
use crate::writer::CodeWriter;

use self::introspection::IntrospectionSchema;
use self::mapper::object_interfaces;

/// Endpoint assumed when the schema did not come from a live service.
pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:3042/graphql";

/// Generate the types and implementation of a GraphQL client.
pub fn generate(schema: &IntrospectionSchema, options: &GenerationOptions) -> Result<GeneratedArtifact> {
    let names = ClientNames::new(&options.name);
    let raw_url = options.graphql_url.as_deref().unwrap_or(DEFAULT_GRAPHQL_URL);
    let url = Url::parse(raw_url).map_err(|e| {
        GenerateError::InvalidConfiguration(format!("Invalid GraphQL url {raw_url}: {e}"))
    })?;

    let types = types(schema, &names, options)?;
    debug!(pathname = url.path(), "Generated GraphQL types.");
    Ok(GeneratedArtifact {
        types,
        implementation: implementation(&names, options, url.path()),
    })
}

fn types(
    schema: &IntrospectionSchema,
    names: &ClientNames,
    options: &GenerationOptions,
) -> Result<String> {
    let interfaces = object_interfaces(schema)?;

    let mut w = CodeWriter::default();
    write_types_comment(&mut w, options.types_comment.as_deref());
    let runtime = w.quote(RUNTIME_PACKAGE);
    w.line(format!("import {{ type ClientOptions }} from {runtime}"));

    w.blank_line();
    w.begin_block("interface GraphQLQueryOptions");
    w.line("query: string;");
    w.line("headers: Record<string, string>;");
    w.line("variables: Record<string, unknown>;");
    w.end_block();

    w.blank_line();
    w.begin_block("interface GraphQLClient");
    w.line("graphql<T>(options: GraphQLQueryOptions): PromiseLike<T>;");
    w.end_block();

    for def in &interfaces {
        w.blank_line();
        def.write(&mut w);
    }

    write_factory_declaration(&mut w, &names.factory, "GraphQLClient");
    Ok(w.render())
}

fn implementation(names: &ClientNames, options: &GenerationOptions, pathname: &str) -> String {
    let format = options.module_format;
    let mut w = CodeWriter::default();
    write_factory_imports(&mut w, format, "buildGraphQLClient");

    let kind = w.quote("graphql");
    let name = w.quote(&names.ident);
    let pathname = w.quote(pathname);
    let path = sibling_path(&w, format, &format!("{}.schema.graphql", names.file_stem));

    begin_factory(&mut w, format, &names.factory);
    w.line("const url = new URL(opts.url)");
    w.line(format!("url.pathname = {pathname}"));
    w.begin_block("return buildGraphQLClient(");
    w.line(format!("type: {kind},"));
    w.line(format!("name: {name},"));
    w.line(format!("path: {path},"));
    w.line("serviceId: opts.serviceId,");
    w.line("url: url.toString()");
    w.end_block_with(")");
    w.end_block();

    write_factory_exports(&mut w, format, &names.factory);
    w.render()
}

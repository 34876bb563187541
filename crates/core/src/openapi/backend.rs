//! Runtime-backed OpenAPI client: a declaration file plus a factory that
//! hands the bundled document to the runtime builder.

use crate::error::Result;
use crate::options::{GeneratedArtifact, GenerationOptions};
use crate::runtime::{
    ClientNames, RUNTIME_PACKAGE, begin_factory, sibling_path, write_factory_declaration,
    write_factory_exports, write_factory_imports, write_types_comment,
};
use crate::writer::CodeWriter;

use super::responses::StatusClass;
use super::spec::OpenApiDocument;
use super::{ClientModel, write_full_response_interface};

/// Generate the types and implementation of a runtime-backed client.
pub fn generate(document: &OpenApiDocument, options: &GenerationOptions) -> Result<GeneratedArtifact> {
    let names = ClientNames::new(&options.name);
    let model = ClientModel::build(document, options, &[])?;
    Ok(GeneratedArtifact {
        types: types(&model, &names, options),
        implementation: implementation(&names, options),
    })
}

fn types(model: &ClientModel<'_>, names: &ClientNames, options: &GenerationOptions) -> String {
    let mut w = CodeWriter::default();
    write_types_comment(&mut w, options.types_comment.as_deref());

    let mut imports = vec!["type ClientOptions".to_string()];
    imports.extend(
        StatusClass::ALL
            .iter()
            .map(|class| format!("type {}", class.status_code_type())),
    );
    let runtime = w.quote(RUNTIME_PACKAGE);
    w.line(format!("import {{ {} }} from {runtime}", imports.join(", ")));
    if model.uses_form_data() {
        let undici = w.quote("undici");
        w.line(format!("import {{ type FormData }} from {undici}"));
    }

    write_full_response_interface(&mut w);
    model.write_declarations(&mut w);
    model.write_client_interface(&mut w, &names.interface, &[]);
    write_factory_declaration(&mut w, &names.factory, &names.interface);
    w.render()
}

fn implementation(names: &ClientNames, options: &GenerationOptions) -> String {
    let format = options.module_format;
    let mut w = CodeWriter::default();
    write_factory_imports(&mut w, format, "buildOpenAPIClient");

    let kind = w.quote("openapi");
    let name = w.quote(&names.ident);
    let path = sibling_path(&w, format, &format!("{}.openapi.json", names.file_stem));

    begin_factory(&mut w, format, &names.factory);
    w.begin_block("return buildOpenAPIClient(");
    w.line(format!("type: {kind},"));
    w.line(format!("name: {name},"));
    w.line(format!("path: {path},"));
    w.line("url: opts.url,");
    w.line("serviceId: opts.serviceId,");
    w.line("throwOnError: opts.throwOnError,");
    w.line(format!("fullResponse: {},", options.full_response));
    w.line(format!("fullRequest: {},", options.full_request));
    w.line(format!("validateResponse: {},", options.validate_response));
    w.line("getHeaders: opts.getHeaders");
    w.end_block_with(")");
    w.end_block();

    write_factory_exports(&mut w, format, &names.factory);
    w.render()
}

//! Pieces shared by clients backed by the runtime package: naming, imports
//! and the factory module layout in both module formats.

use crate::format::ModuleFormat;
use crate::naming::{capitalize, to_identifier};
use crate::writer::CodeWriter;

/// Package the generated clients import their builders and types from.
pub const RUNTIME_PACKAGE: &str = "@clientgen/runtime";

/// Names derived from the client name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientNames {
    /// File stem, as given.
    pub file_stem: String,
    /// camelCase identifier, passed to the runtime as `name`.
    pub ident: String,
    /// Client interface name.
    pub interface: String,
    /// `generate<Name>Client`
    pub factory: String,
}

impl ClientNames {
    /// Derive every name from the raw client name.
    pub fn new(name: &str) -> Self {
        let ident = to_identifier(name);
        let interface = capitalize(ident.trim_start_matches('_'));
        Self {
            file_stem: name.to_string(),
            factory: format!("generate{interface}Client"),
            ident,
            interface,
        }
    }
}

/// Write the leading comment line of a types file.
pub(crate) fn write_types_comment(w: &mut CodeWriter, comment: Option<&str>) {
    if let Some(comment) = comment {
        for line in comment.lines() {
            w.line(format!("// {line}"));
        }
    }
}

/// Import `builder` from the runtime package and `join` from `node:path`.
pub(crate) fn write_factory_imports(w: &mut CodeWriter, format: ModuleFormat, builder: &str) {
    let runtime = w.quote(RUNTIME_PACKAGE);
    let path = w.quote("node:path");
    match format {
        ModuleFormat::Esm => {
            w.line(format!("import {{ {builder} }} from {runtime}"));
            w.line(format!("import {{ join }} from {path}"));
        }
        ModuleFormat::Cjs => {
            w.line(format!("const {{ {builder} }} = require({runtime})"));
            w.line(format!("const {{ join }} = require({path})"));
        }
    }
    w.blank_line();
}

/// `join(<dir>, '<file>')`, with the module directory expression matching
/// the format.
pub(crate) fn sibling_path(w: &CodeWriter, format: ModuleFormat, file: &str) -> String {
    let dir = match format {
        ModuleFormat::Esm => "import.meta.dirname",
        ModuleFormat::Cjs => "__dirname",
    };
    format!("join({dir}, {})", w.quote(file))
}

/// Open the factory function.
pub(crate) fn begin_factory(w: &mut CodeWriter, format: ModuleFormat, factory: &str) {
    match format {
        ModuleFormat::Esm => w.begin_block(format!("export async function {factory} (opts)")),
        ModuleFormat::Cjs => w.begin_block(format!("async function {factory} (opts)")),
    };
}

/// Default and named exports of the factory.
pub(crate) fn write_factory_exports(w: &mut CodeWriter, format: ModuleFormat, factory: &str) {
    w.blank_line();
    match format {
        ModuleFormat::Esm => {
            w.line(format!("export default {factory}"));
        }
        ModuleFormat::Cjs => {
            w.line(format!("module.exports = {factory}"));
            w.line(format!("module.exports.default = {factory}"));
            w.line(format!("module.exports.{factory} = {factory}"));
        }
    }
}

/// Declaration of the factory and its default export in a types file.
pub(crate) fn write_factory_declaration(w: &mut CodeWriter, factory: &str, returns: &str) {
    w.blank_line();
    w.line(format!(
        "export function {factory}(opts: ClientOptions): Promise<{returns}>;"
    ));
    w.line(format!("export default {factory};"));
}

//! Browser client built on `fetch`, with no runtime dependency.
//!
//! The types file carries the same request and response declarations as the
//! runtime-backed client. The implementation is plain JavaScript, or
//! TypeScript annotated against the types file.

use crate::error::Result;
use crate::naming::{is_identifier, to_identifier};
use crate::options::{GeneratedArtifact, GenerationOptions, Language};
use crate::runtime::{ClientNames, write_types_comment};
use crate::writer::CodeWriter;

use super::responses::StatusClass;
use super::spec::{OpenApiDocument, ParameterLocation};
use super::{ClientModel, OperationModel, write_full_response_interface};

/// Module-level names of the implementation, plus the globals it calls.
const RESERVED_NAMES: &[&str] = &[
    "baseUrl",
    "build",
    "defaultHeaders",
    "fetch",
    "globalThis",
    "readBody",
    "sanitizeUrl",
    "setBaseUrl",
    "setDefaultHeaders",
    "Types",
];

/// Generate the types and implementation of a browser client.
pub fn generate(document: &OpenApiDocument, options: &GenerationOptions) -> Result<GeneratedArtifact> {
    let names = ClientNames::new(&options.name);
    let model = ClientModel::build(document, options, RESERVED_NAMES)?;
    let implementation = FetchClient {
        model: &model,
        names: &names,
        options,
    }
    .render();
    Ok(GeneratedArtifact {
        types: types(&model, &names, options),
        implementation,
    })
}

fn types(model: &ClientModel<'_>, names: &ClientNames, options: &GenerationOptions) -> String {
    let mut w = CodeWriter::default();
    write_types_comment(&mut w, options.types_comment.as_deref());

    if options.full_response {
        for class in StatusClass::ALL {
            let codes: Vec<String> = class.codes().iter().map(u16::to_string).collect();
            w.line(format!(
                "export type {} = {};",
                class.status_code_type(),
                codes.join(" | ")
            ));
        }
        write_full_response_interface(&mut w);
    }

    model.write_declarations(&mut w);
    model.write_client_interface(
        &mut w,
        &names.interface,
        &[
            "setBaseUrl(baseUrl: string): void;",
            "setDefaultHeaders(headers: Record<string, string>): void;",
        ],
    );

    w.blank_line();
    w.begin_block("type BuildOptions =");
    w.line("headers?: Record<string, string>;");
    w.end_block();
    w.line(format!(
        "export default function build(url: string, options?: BuildOptions): {};",
        names.interface
    ));
    w.render()
}

/// Optional-chained member access.
fn access(w: &CodeWriter, object: &str, prop: &str) -> String {
    if is_identifier(prop) {
        format!("{object}?.{prop}")
    } else {
        format!("{object}?.[{}]", w.quote(prop))
    }
}

fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace('$', "\\$")
}

#[derive(Debug)]
struct FetchClient<'m> {
    model: &'m ClientModel<'m>,
    names: &'m ClientNames,
    options: &'m GenerationOptions,
}

impl FetchClient<'_> {
    fn ts(&self) -> bool {
        self.options.language == Language::Ts
    }

    /// `: ty` in TypeScript, nothing in JavaScript.
    fn ann(&self, ty: &str) -> String {
        if self.ts() {
            format!(": {ty}")
        } else {
            String::new()
        }
    }

    fn render(&self) -> String {
        let mut w = CodeWriter::default();

        if self.ts() {
            let types = w.quote(&format!(
                "./{}-types.{}",
                self.names.file_stem,
                self.options.type_extension.import_extension()
            ));
            w.line(format!("import type * as Types from {types}"));
            w.blank_line();
        }

        let empty = w.quote("");
        w.line(format!("let baseUrl = {empty}"));
        w.line(format!(
            "let defaultHeaders{} = {{}}",
            self.ann("Record<string, string>")
        ));

        self.write_helpers(&mut w);
        for op in &self.model.operations {
            self.write_operation(&mut w, op);
        }
        for op in &self.model.operations {
            self.write_wrapper(&mut w, op);
        }
        self.write_build(&mut w);
        w.render()
    }

    fn write_helpers(&self, w: &mut CodeWriter) {
        let slash = w.quote("/");
        let content_type = w.quote("content-type");
        let json = w.quote("application/json");
        let empty = w.quote("");

        w.blank_line();
        w.begin_block(format!(
            "function sanitizeUrl (url{}){}",
            self.ann("string"),
            self.ann("string")
        ));
        w.line(format!("return url.endsWith({slash}) ? url.slice(0, -1) : url"));
        w.end_block();

        w.blank_line();
        w.begin_block(format!(
            "export const setBaseUrl = (newUrl{}){} =>",
            self.ann("string"),
            self.ann("void")
        ));
        w.line("baseUrl = sanitizeUrl(newUrl)");
        w.end_block();

        w.blank_line();
        w.begin_block(format!(
            "export const setDefaultHeaders = (headers{}){} =>",
            self.ann("Record<string, string>"),
            self.ann("void")
        ));
        w.line("defaultHeaders = headers");
        w.end_block();

        w.blank_line();
        w.begin_block(format!(
            "async function readBody (response{}){}",
            self.ann("Response"),
            self.ann("Promise<unknown>")
        ));
        w.line(format!(
            "const contentType = response.headers.get({content_type}) ?? {empty}"
        ));
        w.begin_block(format!("if (contentType.includes({json}))"));
        w.line("return await response.json()");
        w.end_block();
        w.line("return await response.text()");
        w.end_block();
    }

    /// Expression reading parameter `name` from the `request` argument.
    fn param_access(&self, w: &CodeWriter, location: ParameterLocation, name: &str) -> String {
        if self.options.full_request {
            let group = match location {
                ParameterLocation::Path => "path",
                ParameterLocation::Query => "query",
                ParameterLocation::Header | ParameterLocation::Cookie => "headers",
            };
            access(w, &access(w, "request", group), name)
        } else {
            access(w, "request", name)
        }
    }

    /// Template literal for the request url, path parameters interpolated.
    fn url_template(&self, w: &CodeWriter, op: &OperationModel<'_>, with_query: bool) -> String {
        let mut template = String::from("`${url}");
        let mut rest = op.operation.path;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            template.push_str(&escape_template(&rest[..start]));
            let name = &rest[start + 1..start + len];
            let value = self.param_access(w, ParameterLocation::Path, name);
            template.push_str(&format!("${{encodeURIComponent(String({value}))}}"));
            rest = &rest[start + len + 1..];
        }
        template.push_str(&escape_template(rest));
        if with_query {
            let empty = w.quote("");
            template.push_str(&format!("${{query ? `?${{query}}` : {empty}}}"));
        }
        template.push('`');
        template
    }

    fn write_operation(&self, w: &mut CodeWriter, op: &OperationModel<'_>) {
        let id = op.id();
        let signature = if self.ts() {
            let opt = if op.request.required { "" } else { "?" };
            format!(
                "async function _{id} (url: string, request{opt}: Types.{}): Promise<Types.{}>",
                op.request_type(),
                op.responses_type()
            )
        } else {
            format!("async function _{id} (url, request)")
        };

        w.blank_line();
        w.begin_block(signature);
        w.begin_block(format!("const headers{} =", self.ann("Record<string, string>")));
        w.line("...defaultHeaders");
        w.end_block();

        for param in op.operation.parameters_in(ParameterLocation::Header) {
            let value = self.param_access(w, ParameterLocation::Header, param.name);
            let key = w.quote(param.name);
            w.begin_block(format!("if ({value} !== undefined)"));
            w.line(format!("headers[{key}] = String({value})"));
            w.end_block();
        }

        let query: Vec<_> = op.operation.parameters_in(ParameterLocation::Query).collect();
        if !query.is_empty() {
            w.line("const searchParams = new URLSearchParams()");
            for param in &query {
                let value = self.param_access(w, ParameterLocation::Query, param.name);
                let key = w.quote(param.name);
                w.begin_block(format!("if ({value} !== undefined)"));
                w.begin_block(format!("for (const value of [{value}].flat())"));
                w.line(format!("searchParams.append({key}, String(value))"));
                w.end_block();
                w.end_block();
            }
            w.line("const query = searchParams.toString()");
        }

        let mut fields = vec![
            format!("method: {}", w.quote(op.operation.method.as_upper())),
            "headers".to_string(),
        ];
        if let Some(body) = &op.request.body {
            if body.spread {
                self.write_body_destructuring(w, op);
            } else {
                w.line(format!("const body = {}", access(w, "request", "body")));
            }
            if body.multipart {
                fields.push("body".to_string());
            } else {
                let key = w.quote("Content-Type");
                let json = w.quote("application/json");
                w.begin_block("if (body !== undefined)");
                w.line(format!("headers[{key}] = {json}"));
                w.end_block();
                fields.push("body: JSON.stringify(body)".to_string());
            }
        }
        if self.options.with_credentials {
            fields.push(format!("credentials: {}", w.quote("include")));
        }

        let url = self.url_template(w, op, !query.is_empty());
        w.begin_block(format!("const response = await globalThis.fetch({url}, "));
        let last = fields.len().saturating_sub(1);
        for (i, field) in fields.iter().enumerate() {
            let comma = if i == last { "" } else { "," };
            w.line(format!("{field}{comma}"));
        }
        w.end_block_with(")");
        w.line("const responseBody = await readBody(response)");

        let cast = if self.ts() {
            format!(" as Types.{}", op.responses_type())
        } else {
            String::new()
        };
        if self.options.full_response {
            w.begin_block("return");
            w.line("statusCode: response.status,");
            w.line("headers: Object.fromEntries(response.headers.entries()),");
            w.line("body: responseBody");
            w.end_block_with(&cast);
        } else {
            w.begin_block("if (!response.ok)");
            w.line("throw new Error(`${response.status} ${response.statusText}`)");
            w.end_block();
            w.line(format!("return responseBody{cast}"));
        }
        w.end_block();
    }

    /// Flat requests carry an object body next to the parameters; everything
    /// that is not a parameter is the body.
    fn write_body_destructuring(&self, w: &mut CodeWriter, op: &OperationModel<'_>) {
        let mut parts = Vec::new();
        for param in &op.operation.parameters {
            if param.location == ParameterLocation::Cookie {
                continue;
            }
            let alias = format!("_{}", to_identifier(param.name));
            let entry = format!("{}: {alias}", w.quote(param.name));
            if !parts.contains(&entry) {
                parts.push(entry);
            }
        }
        parts.push("...body".to_string());

        let source = if self.ts() {
            format!("(request ?? {{}}) as Types.{}", op.request_type())
        } else {
            "request ?? {}".to_string()
        };
        w.line(format!("const {{ {} }} = {source}", parts.join(", ")));
    }

    fn write_wrapper(&self, w: &mut CodeWriter, op: &OperationModel<'_>) {
        let id = op.id();
        let header = if self.ts() {
            format!(
                "export const {id}: Types.{}[{}] = async (request) =>",
                self.names.interface,
                w.quote(id)
            )
        } else {
            format!("export const {id} = async (request) =>")
        };
        w.blank_line();
        w.begin_block(header);
        w.line(format!("return await _{id}(baseUrl, request)"));
        w.end_block();
    }

    fn write_build(&self, w: &mut CodeWriter) {
        let signature = if self.ts() {
            format!(
                "export default function build (url: string, options?: {{ headers?: Record<string, string> }}): Types.{}",
                self.names.interface
            )
        } else {
            "export default function build (url, options)".to_string()
        };

        w.blank_line();
        w.begin_block(signature);
        w.line("url = sanitizeUrl(url)");
        w.begin_block("if (options?.headers)");
        w.line("defaultHeaders = options.headers");
        w.end_block();

        let mut members = vec!["setBaseUrl".to_string(), "setDefaultHeaders".to_string()];
        members.extend(
            self.model
                .operations
                .iter()
                .map(|op| format!("{id}: _{id}.bind(null, url)", id = op.id())),
        );
        w.begin_block("return");
        let last = members.len() - 1;
        for (i, member) in members.iter().enumerate() {
            let comma = if i == last { "" } else { "," };
            w.line(format!("{member}{comma}"));
        }
        w.end_block();
        w.end_block();
    }
}

//! OpenAPI input: document model, operation resolution, type mapping and the
//! two client flavours built on top of them.

pub mod backend;
pub mod frontend;
pub mod operation;
pub mod request;
pub mod responses;
pub mod schema;
pub mod spec;

use tracing::debug;

use crate::error::Result;
use crate::options::GenerationOptions;
use crate::ts::{Emit, TypeDef, TypeNode};
use crate::writer::CodeWriter;

use self::operation::{Operation, collect_operations_reserving};
use self::request::{RequestShape, synthesize_request};
use self::responses::{ResponseShape, StatusClass, synthesize_responses};
use self::schema::SchemaMapper;
use self::spec::OpenApiDocument;

/// One operation with its request and response types.
#[derive(Debug)]
pub(crate) struct OperationModel<'a> {
    pub(crate) operation: Operation<'a>,
    pub(crate) request: RequestShape,
    pub(crate) responses: ResponseShape,
}

impl OperationModel<'_> {
    pub(crate) fn id(&self) -> &str {
        &self.operation.operation_id
    }

    pub(crate) fn request_type(&self) -> String {
        format!("{}Request", self.operation.type_prefix())
    }

    pub(crate) fn response_type(&self, class: StatusClass) -> String {
        format!("{}Response{}", self.operation.type_prefix(), class.label())
    }

    pub(crate) fn responses_type(&self) -> String {
        format!("{}Responses", self.operation.type_prefix())
    }

    /// `getMovies(req?: GetMoviesRequest): Promise<GetMoviesResponses>;`
    pub(crate) fn method_signature(&self) -> String {
        let opt = if self.request.required { "" } else { "?" };
        format!(
            "{}(req{opt}: {}): Promise<{}>;",
            self.id(),
            self.request_type(),
            self.responses_type()
        )
    }
}

/// Everything both client flavours declare.
#[derive(Debug)]
pub(crate) struct ClientModel<'a> {
    pub(crate) operations: Vec<OperationModel<'a>>,
    pub(crate) definitions: Vec<TypeDef>,
}

impl<'a> ClientModel<'a> {
    /// `reserved` names are never used as operation ids.
    pub(crate) fn build(
        document: &'a OpenApiDocument,
        options: &GenerationOptions,
        reserved: &[&str],
    ) -> Result<Self> {
        let mut mapper = SchemaMapper::new(document, options.props_optional);
        let mut operations = Vec::new();
        for operation in collect_operations_reserving(document, reserved)? {
            let request = synthesize_request(&operation, &mut mapper, options)?;
            let responses = synthesize_responses(&operation, &mut mapper, options.full_response)?;
            operations.push(OperationModel {
                operation,
                request,
                responses,
            });
        }
        let definitions = mapper.into_definitions();
        debug!(
            operations = operations.len(),
            definitions = definitions.len(),
            "Built OpenAPI client model."
        );
        Ok(Self {
            operations,
            definitions,
        })
    }

    /// Whether any request body is `multipart/form-data`.
    pub(crate) fn uses_form_data(&self) -> bool {
        self.operations
            .iter()
            .any(|op| op.request.body.as_ref().is_some_and(|b| b.multipart))
    }

    /// Component declarations followed by the request and response types of
    /// every operation.
    pub(crate) fn write_declarations(&self, w: &mut CodeWriter) {
        for def in &self.definitions {
            w.blank_line();
            def.write(w);
        }

        let quotes = w.quote_style();
        for op in &self.operations {
            w.blank_line();
            TypeDef::alias(op.request_type(), op.request.ty.clone()).write(w);

            for alternative in &op.responses.alternatives {
                w.line(format!(
                    "export type {} = {};",
                    op.response_type(alternative.class),
                    alternative.ty.emit(quotes)
                ));
            }

            let responses = TypeNode::union_of(
                op.responses
                    .alternatives
                    .iter()
                    .map(|a| TypeNode::reference(op.response_type(a.class)))
                    .collect(),
            );
            w.line(format!(
                "export type {} = {};",
                op.responses_type(),
                responses.emit(quotes)
            ));
        }
    }

    /// `export interface <name> { ... }` with `extra` members first.
    pub(crate) fn write_client_interface(&self, w: &mut CodeWriter, name: &str, extra: &[&str]) {
        w.blank_line();
        w.begin_block(format!("export interface {name}"));
        for line in extra {
            w.line(*line);
        }
        for op in &self.operations {
            w.line(op.method_signature());
        }
        w.end_block();
    }
}

/// `export interface FullResponse<T, U extends number> { ... }`
pub(crate) fn write_full_response_interface(w: &mut CodeWriter) {
    let status = w.quote("statusCode");
    let headers = w.quote("headers");
    let body = w.quote("body");
    w.blank_line();
    w.begin_block("export interface FullResponse<T, U extends number>");
    w.line(format!("{status}: U;"));
    w.line(format!("{headers}: Record<string, string>;"));
    w.line(format!("{body}: T;"));
    w.end_block();
}

//! OpenAPI document structs for serde deserialization.
//!
//! Only the subset needed to produce client types is modelled. Maps are
//! [`IndexMap`]s so iteration follows document order, which keeps operation
//! ids and emitted declarations stable between runs.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{GenerateError, Result};

/// Root OpenAPI (or Swagger) document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenApiDocument {
    /// `openapi` version string, when present.
    #[serde(default)]
    pub openapi: Option<String>,
    /// `swagger` version string, when present.
    #[serde(default)]
    pub swagger: Option<String>,
    /// Path templates to their path items.
    #[serde(default)]
    pub paths: IndexMap<String, PathItemObject>,
    /// Reusable components.
    #[serde(default)]
    pub components: Components,
    /// Swagger 2 schema definitions.
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaObject>,
}

/// Reusable objects referenced through `$ref`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// `#/components/schemas/*`
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaObject>,
    /// `#/components/parameters/*`
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterObject>,
    /// `#/components/requestBodies/*`
    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBodyObject>,
    /// `#/components/responses/*`
    #[serde(default)]
    pub responses: IndexMap<String, ResponseObject>,
}

/// Either an inline object or a `$ref` to a component.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ "$ref": "#/components/..." }`
    Ref {
        /// The reference string.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// The object itself.
    Item(T),
}

impl<T> RefOr<T> {
    /// Follow a reference into `table`, which holds the components of
    /// `section` (e.g. `parameters`).
    pub fn resolve<'a>(&'a self, table: &'a IndexMap<String, T>, section: &str) -> Result<&'a T> {
        match self {
            RefOr::Item(item) => Ok(item),
            RefOr::Ref { reference } => {
                let prefix = format!("#/components/{section}/");
                reference
                    .strip_prefix(&prefix)
                    .and_then(|name| table.get(&unescape_pointer(name)))
                    .ok_or_else(|| {
                        GenerateError::malformed(format!("unresolved reference `{reference}`"))
                    })
            }
        }
    }
}

/// HTTP methods that can appear in a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Parse a lowercase path item key.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "get" => HttpMethod::Get,
            "put" => HttpMethod::Put,
            "post" => HttpMethod::Post,
            "delete" => HttpMethod::Delete,
            "options" => HttpMethod::Options,
            "head" => HttpMethod::Head,
            "patch" => HttpMethod::Patch,
            "trace" => HttpMethod::Trace,
            _ => return None,
        })
    }

    /// Lowercase name, as used in operation ids.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Uppercase name, as sent on the wire.
    pub fn as_upper(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// A path item: shared parameters plus one operation per method, in
/// document order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawPathItem")]
pub struct PathItemObject {
    /// Parameters shared by every operation of the path.
    pub parameters: Vec<RefOr<ParameterObject>>,
    /// Operations keyed by method.
    pub operations: Vec<(HttpMethod, OperationObject)>,
}

#[derive(Deserialize)]
struct RawPathItem {
    #[serde(default)]
    parameters: Vec<RefOr<ParameterObject>>,
    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

impl TryFrom<RawPathItem> for PathItemObject {
    type Error = serde_json::Error;

    fn try_from(raw: RawPathItem) -> std::result::Result<Self, Self::Error> {
        let mut operations = Vec::new();
        for (key, value) in raw.rest {
            // summary, servers, x-* extensions
            let Some(method) = HttpMethod::from_key(&key) else {
                continue;
            };
            operations.push((method, serde_json::from_value(value)?));
        }
        Ok(Self {
            parameters: raw.parameters,
            operations,
        })
    }
}

/// An API operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationObject {
    /// Explicit operation id.
    pub operation_id: Option<String>,
    /// Short description.
    pub summary: Option<String>,
    /// Operation-level parameters.
    #[serde(default)]
    pub parameters: Vec<RefOr<ParameterObject>>,
    /// Request body.
    pub request_body: Option<RefOr<RequestBodyObject>>,
    /// Responses keyed by status code, range (`4XX`) or `default`.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ResponseObject>>,
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Templated into the path.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie; carried but never rendered.
    Cookie,
}

/// A parameter definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterObject {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether callers must supply it.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Option<SchemaObject>,
}

/// A request body definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBodyObject {
    /// Whether callers must supply it.
    #[serde(default)]
    pub required: bool,
    /// Media types to their content.
    #[serde(default)]
    pub content: IndexMap<String, MediaTypeObject>,
}

/// A response definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseObject {
    /// Human-readable description.
    pub description: Option<String>,
    /// Media types to their content.
    #[serde(default)]
    pub content: IndexMap<String, MediaTypeObject>,
    /// Swagger 2 body schema, declared on the response itself.
    pub schema: Option<SchemaObject>,
}

impl ResponseObject {
    /// The first content entry that carries a schema, else the Swagger 2
    /// `schema`.
    pub fn first_schema(&self) -> Option<&SchemaObject> {
        self.content
            .values()
            .find_map(|media| media.schema.as_ref())
            .or(self.schema.as_ref())
    }
}

/// Media type content (e.g. `application/json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaTypeObject {
    /// Content schema.
    pub schema: Option<SchemaObject>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    /// `type`: a single name or, in 3.1, a list.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types.
    pub properties: Option<IndexMap<String, SchemaObject>>,

    /// Required property names for object types.
    #[serde(default)]
    pub required: Vec<String>,

    /// Item schema for array types.
    pub items: Option<Box<SchemaObject>>,

    /// Allowed values.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,

    /// Union (any of these schemas).
    pub any_of: Option<Vec<SchemaObject>>,

    /// Union (exactly one of these schemas).
    pub one_of: Option<Vec<SchemaObject>>,

    /// Intersection.
    pub all_of: Option<Vec<SchemaObject>>,

    /// Map values for dictionary-like objects.
    pub additional_properties: Option<AdditionalProperties>,

    /// Format hint (`date-time`, `binary`, ...). Never changes the mapped type.
    pub format: Option<String>,

    /// Single allowed value.
    #[serde(rename = "const")]
    pub const_value: Option<Value>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,
}

/// Schema type can be a single type or an array of types.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "string"`
    Single(String),
    /// `"type": ["string", "null"]`
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows any value, `false` none.
    Bool(bool),
    /// Values must match the schema.
    Schema(Box<SchemaObject>),
}

impl OpenApiDocument {
    /// Find the schema a `$ref` points at.
    pub fn resolve_schema_ref(&self, reference: &str) -> Result<&SchemaObject> {
        let found = if let Some(name) = reference.strip_prefix("#/components/schemas/") {
            self.components.schemas.get(&unescape_pointer(name))
        } else if let Some(name) = reference.strip_prefix("#/definitions/") {
            self.definitions.get(&unescape_pointer(name))
        } else {
            None
        };
        found.ok_or_else(|| GenerateError::malformed(format!("unresolved reference `{reference}`")))
    }
}

/// Last segment of a reference, with JSON pointer escapes undone.
pub fn ref_name(reference: &str) -> String {
    unescape_pointer(reference.rsplit('/').next().unwrap_or(reference))
}

fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

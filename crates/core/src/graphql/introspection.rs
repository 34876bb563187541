//! GraphQL introspection result structs for serde deserialization.

use serde::Deserialize;

/// The `__schema` object of an introspection query result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    /// Root query type.
    pub query_type: Option<NamedType>,
    /// Root mutation type.
    pub mutation_type: Option<NamedType>,
    /// Root subscription type.
    pub subscription_type: Option<NamedType>,
    /// Every type, in introspection order.
    #[serde(default)]
    pub types: Vec<FullType>,
}

/// A `{ name }` reference to a root type.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedType {
    /// Type name.
    pub name: String,
}

/// Introspection `__TypeKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    /// Leaf value.
    Scalar,
    /// Object with fields.
    Object,
    /// Abstract type with fields.
    Interface,
    /// Abstract type over objects.
    Union,
    /// Enumeration.
    Enum,
    /// Input object.
    InputObject,
    /// List wrapper.
    List,
    /// Non-null wrapper.
    NonNull,
}

impl TypeKind {
    /// Introspection spelling, e.g. `INPUT_OBJECT`.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
        }
    }
}

/// A named type with all its members.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    /// Type kind.
    pub kind: TypeKind,
    /// Type name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Fields of objects and interfaces.
    pub fields: Option<Vec<Field>>,
    /// Fields of input objects.
    pub input_fields: Option<Vec<InputValue>>,
    /// Interfaces an object or interface implements.
    pub interfaces: Option<Vec<TypeRef>>,
    /// Values of enums.
    pub enum_values: Option<Vec<EnumValue>>,
    /// Members of unions.
    pub possible_types: Option<Vec<TypeRef>>,
}

/// An output field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Arguments.
    #[serde(default)]
    pub args: Vec<InputValue>,
    /// Field type.
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    /// Deprecation flag.
    #[serde(default)]
    pub is_deprecated: bool,
    /// Deprecation reason.
    pub deprecation_reason: Option<String>,
}

/// An argument or input object field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    /// Name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Value type.
    #[serde(rename = "type")]
    pub value_type: TypeRef,
    /// Default value, already printed as GraphQL source.
    pub default_value: Option<String>,
}

/// One enum value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Deprecation flag.
    #[serde(default)]
    pub is_deprecated: bool,
    /// Deprecation reason.
    pub deprecation_reason: Option<String>,
}

/// A possibly wrapped type reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    /// Kind of this layer.
    pub kind: TypeKind,
    /// Name, absent on `LIST` and `NON_NULL` wrappers.
    pub name: Option<String>,
    /// Wrapped type.
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Name of the layer, or an empty string for wrappers.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

impl IntrospectionSchema {
    /// Named types that are not introspection types (`__Schema`, ...).
    pub fn user_types(&self) -> impl Iterator<Item = &FullType> {
        self.types.iter().filter(|t| !t.name.starts_with("__"))
    }
}

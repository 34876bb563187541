//! TypeScript type expressions and declarations.
//!
//! Mappers build [`TypeNode`] trees; the [`Emit`] trait renders them to text.
//! Declarations ([`TypeDef`]) are written through a [`CodeWriter`] so nested
//! object types are laid out on their own lines.

use crate::naming::quote;
use crate::writer::{CodeWriter, QuoteStyle};

/// Scalar kinds the mappers produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
    /// `unknown`
    Unknown,
}

/// Literal types: `'active'`, `42`, `true`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String literal.
    String(String),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Number(f64),
    /// Boolean literal.
    Bool(bool),
    /// `null`
    Null,
}

/// One property of an object type or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Name as written in the schema; always emitted quoted.
    pub name: String,
    /// Property type.
    pub ty: TypeNode,
    /// Whether the property is marked `?`.
    pub optional: bool,
}

impl Property {
    /// A property that must be present.
    pub fn required(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// A property marked `?`.
    pub fn optional(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// Primitive type.
    Scalar(ScalarKind),
    /// `Array<T>`
    Array(Box<TypeNode>),
    /// Inline object type: `{ 'id': number; 'name'?: string }`
    Object(Vec<Property>),
    /// Reference to a named declaration.
    Reference(String),
    /// `A | B`
    Union(Vec<TypeNode>),
    /// `A & B`
    Intersection(Vec<TypeNode>),
    /// Literal type.
    Literal(Literal),
    /// `Record<string, V>`
    Record(Box<TypeNode>),
    /// Instantiated generic: `FullResponse<Movie, StatusCode2xx>`
    Generic {
        /// Generic type name.
        name: String,
        /// Type arguments.
        args: Vec<TypeNode>,
    },
}

impl TypeNode {
    /// `string`
    pub const STRING: TypeNode = TypeNode::Scalar(ScalarKind::String);
    /// `number`
    pub const NUMBER: TypeNode = TypeNode::Scalar(ScalarKind::Number);
    /// `boolean`
    pub const BOOLEAN: TypeNode = TypeNode::Scalar(ScalarKind::Boolean);
    /// `unknown`
    pub const UNKNOWN: TypeNode = TypeNode::Scalar(ScalarKind::Unknown);

    /// Named reference.
    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference(name.into())
    }

    /// Build a union, collapsing duplicates and single-member unions.
    pub fn union_of(members: Vec<TypeNode>) -> Self {
        let mut unique: Vec<TypeNode> = Vec::with_capacity(members.len());
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        match unique.len() {
            0 => TypeNode::UNKNOWN,
            1 => unique.remove(0),
            _ => TypeNode::Union(unique),
        }
    }
}

/// Render a node to TypeScript source.
pub trait Emit {
    /// Convert the node to its TypeScript representation.
    fn emit(&self, quotes: QuoteStyle) -> String;
}

impl Emit for ScalarKind {
    fn emit(&self, _quotes: QuoteStyle) -> String {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Null => "null",
            ScalarKind::Unknown => "unknown",
        }
        .to_string()
    }
}

impl Emit for Literal {
    fn emit(&self, quotes: QuoteStyle) -> String {
        match self {
            Literal::String(s) => quote(s, quotes),
            Literal::Int(i) => i.to_string(),
            Literal::Number(n) => n.to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Null => "null".to_string(),
        }
    }
}

impl Emit for Property {
    fn emit(&self, quotes: QuoteStyle) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{opt}: {}", quote(&self.name, quotes), self.ty.emit(quotes))
    }
}

impl Emit for TypeNode {
    fn emit(&self, quotes: QuoteStyle) -> String {
        match self {
            TypeNode::Scalar(kind) => kind.emit(quotes),
            TypeNode::Array(inner) => format!("Array<{}>", inner.emit(quotes)),
            TypeNode::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(|p| p.emit(quotes)).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TypeNode::Reference(name) => name.clone(),
            TypeNode::Union(members) => members
                .iter()
                .map(|m| m.emit(quotes))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeNode::Intersection(members) => members
                .iter()
                .map(|m| {
                    let s = m.emit(quotes);
                    if matches!(m, TypeNode::Union(_)) {
                        format!("({s})")
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TypeNode::Literal(lit) => lit.emit(quotes),
            TypeNode::Record(value) => format!("Record<string, {}>", value.emit(quotes)),
            TypeNode::Generic { name, args } => {
                let args: Vec<_> = args.iter().map(|a| a.emit(quotes)).collect();
                format!("{name}<{}>", args.join(", "))
            }
        }
    }
}

/// Body of a named declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// `export interface Name { ... }`
    Interface(Vec<Property>),
    /// `export type Name = ...`
    Alias(TypeNode),
}

/// A named, exported type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    /// Declared name.
    pub name: String,
    /// Declaration body.
    pub kind: TypeDefKind,
}

impl TypeDef {
    /// `export interface name { ... }`
    pub fn interface(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            name: name.into(),
            kind: TypeDefKind::Interface(properties),
        }
    }

    /// `export type name = ty`
    pub fn alias(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            kind: TypeDefKind::Alias(ty),
        }
    }

    /// Write the declaration, one property per line.
    pub fn write(&self, w: &mut CodeWriter) {
        let quotes = w.quote_style();
        match &self.kind {
            TypeDefKind::Interface(props) => {
                w.begin_block(format!("export interface {}", self.name));
                write_properties(w, props);
                w.end_block();
            }
            TypeDefKind::Alias(TypeNode::Object(props)) if !props.is_empty() => {
                w.begin_block(format!("export type {} =", self.name));
                write_properties(w, props);
                w.end_block();
            }
            TypeDefKind::Alias(ty) => {
                w.line(format!("export type {} = {};", self.name, ty.emit(quotes)));
            }
        }
    }
}

/// Write object properties one per line, expanding nested object types into
/// indented blocks.
pub fn write_properties(w: &mut CodeWriter, props: &[Property]) {
    let quotes = w.quote_style();
    for prop in props {
        let opt = if prop.optional { "?" } else { "" };
        let key = quote(&prop.name, quotes);
        match &prop.ty {
            TypeNode::Object(inner) if !inner.is_empty() => {
                w.begin_block(format!("{key}{opt}:"));
                write_properties(w, inner);
                w.end_block_with(";");
            }
            ty => {
                w.line(format!("{key}{opt}: {};", ty.emit(quotes)));
            }
        }
    }
}

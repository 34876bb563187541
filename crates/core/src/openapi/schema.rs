//! OpenAPI schema objects to TypeScript type expressions.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::spec::{AdditionalProperties, OpenApiDocument, SchemaObject, SchemaType, ref_name};
use crate::error::{GenerateError, Result};
use crate::naming::type_name;
use crate::ts::{Literal, Property, ScalarKind, TypeDef, TypeDefKind, TypeNode};

#[derive(Debug)]
struct Definition {
    name: String,
    def: Option<TypeDef>,
}

/// Maps schema objects, collecting every referenced component as a named
/// declaration along the way.
///
/// References are registered before their target is mapped, so recursive
/// schemas terminate and each component is declared once.
#[derive(Debug)]
pub struct SchemaMapper<'a> {
    document: &'a OpenApiDocument,
    props_optional: bool,
    definitions: IndexMap<String, Definition>,
}

impl<'a> SchemaMapper<'a> {
    /// Create a mapper for `document`.
    pub fn new(document: &'a OpenApiDocument, props_optional: bool) -> Self {
        Self {
            document,
            props_optional,
            definitions: IndexMap::new(),
        }
    }

    /// Map one schema node.
    pub fn map(&mut self, schema: &SchemaObject) -> Result<TypeNode> {
        if let Some(reference) = &schema.ref_path {
            return self.map_reference(reference);
        }

        let base = if let Some(value) = &schema.const_value {
            literal(value)
        } else if let Some(all_of) = &schema.all_of {
            let mut members = self.map_all(all_of)?;
            members.extend(self.map_sibling_object(schema)?);
            if members.len() == 1 {
                members.remove(0)
            } else {
                TypeNode::Intersection(members)
            }
        } else if let Some(variants) = schema.any_of.as_ref().or(schema.one_of.as_ref()) {
            let union = TypeNode::union_of(self.map_all(variants)?);
            match self.map_sibling_object(schema)? {
                Some(object) => TypeNode::Intersection(vec![union, object]),
                None => union,
            }
        } else if let Some(values) = &schema.enum_values {
            TypeNode::union_of(values.iter().map(literal).collect())
        } else {
            match &schema.schema_type {
                Some(SchemaType::Single(ty)) => self.map_type(ty, schema)?,
                Some(SchemaType::Multiple(types)) => {
                    let members = types
                        .iter()
                        .map(|ty| self.map_type(ty, schema))
                        .collect::<Result<Vec<_>>>()?;
                    TypeNode::union_of(members)
                }
                None if schema.properties.is_some() || schema.additional_properties.is_some() => {
                    self.map_object(schema)?
                }
                None if schema.items.is_some() => self.map_type("array", schema)?,
                None => TypeNode::UNKNOWN,
            }
        };

        if schema.nullable == Some(true) {
            return Ok(TypeNode::union_of(vec![base, TypeNode::Scalar(ScalarKind::Null)]));
        }
        Ok(base)
    }

    /// Object members declared next to a composition keyword.
    fn map_sibling_object(&mut self, schema: &SchemaObject) -> Result<Option<TypeNode>> {
        let has_values = matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Bool(true) | AdditionalProperties::Schema(_))
        );
        if schema.properties.is_none() && !has_values {
            return Ok(None);
        }
        self.map_object(schema).map(Some)
    }

    fn map_all(&mut self, schemas: &[SchemaObject]) -> Result<Vec<TypeNode>> {
        schemas.iter().map(|s| self.map(s)).collect()
    }

    fn map_type(&mut self, ty: &str, schema: &SchemaObject) -> Result<TypeNode> {
        Ok(match ty {
            "string" => TypeNode::STRING,
            "integer" | "number" => TypeNode::NUMBER,
            "boolean" => TypeNode::BOOLEAN,
            "null" => TypeNode::Scalar(ScalarKind::Null),
            "array" => {
                let item = match &schema.items {
                    Some(items) => self.map(items)?,
                    None => TypeNode::UNKNOWN,
                };
                TypeNode::Array(Box::new(item))
            }
            "object" => self.map_object(schema)?,
            other => return Err(GenerateError::unknown("OpenAPI type", other)),
        })
    }

    fn map_object(&mut self, schema: &SchemaObject) -> Result<TypeNode> {
        let mut props = Vec::new();
        for (name, prop) in schema.properties.iter().flatten() {
            let required = !self.props_optional && schema.required.iter().any(|r| r == name);
            props.push(Property {
                name: name.clone(),
                ty: self.map(prop)?,
                optional: !required,
            });
        }

        let record = match &schema.additional_properties {
            Some(AdditionalProperties::Bool(true)) => Some(TypeNode::UNKNOWN),
            Some(AdditionalProperties::Schema(values)) => Some(self.map(values)?),
            Some(AdditionalProperties::Bool(false)) | None => None,
        };

        Ok(match (props.is_empty(), record) {
            (false, Some(values)) => TypeNode::Intersection(vec![
                TypeNode::Object(props),
                TypeNode::Record(Box::new(values)),
            ]),
            (false, None) => TypeNode::Object(props),
            (true, Some(values)) => TypeNode::Record(Box::new(values)),
            (true, None) => TypeNode::Record(Box::new(TypeNode::UNKNOWN)),
        })
    }

    fn map_reference(&mut self, reference: &str) -> Result<TypeNode> {
        if let Some(existing) = self.definitions.get(reference) {
            return Ok(TypeNode::reference(existing.name.clone()));
        }

        let target = self.document.resolve_schema_ref(reference)?;
        let name = type_name(&ref_name(reference));
        debug!(reference, name, "Registering component.");
        self.definitions.insert(
            reference.to_string(),
            Definition {
                name: name.clone(),
                def: None,
            },
        );

        let def = match self.map(target)? {
            TypeNode::Object(props) if !props.is_empty() => TypeDef::interface(name.clone(), props),
            other => TypeDef::alias(name.clone(), other),
        };
        if let Some(entry) = self.definitions.get_mut(reference) {
            entry.def = Some(def);
        }
        Ok(TypeNode::reference(name))
    }

    /// Whether `ty` is an object type once references are followed, so it can
    /// be intersected with other properties.
    pub fn is_object_like(&self, ty: &TypeNode) -> bool {
        self.object_like(ty, &mut HashSet::new())
    }

    fn object_like<'t>(&'t self, ty: &'t TypeNode, visited: &mut HashSet<&'t str>) -> bool {
        match ty {
            TypeNode::Reference(name) => {
                if !visited.insert(name) {
                    return false;
                }
                match self.find(name).map(|def| &def.kind) {
                    Some(TypeDefKind::Interface(_)) => true,
                    Some(TypeDefKind::Alias(inner)) => self.object_like(inner, visited),
                    None => false,
                }
            }
            TypeNode::Intersection(members) => members.iter().all(|m| self.object_like(m, visited)),
            TypeNode::Object(_) | TypeNode::Record(_) => true,
            _ => false,
        }
    }

    fn find(&self, name: &str) -> Option<&TypeDef> {
        self.definitions
            .values()
            .filter(|d| d.name == name)
            .find_map(|d| d.def.as_ref())
    }

    /// Named declarations in discovery order.
    pub fn into_definitions(self) -> Vec<TypeDef> {
        self.definitions.into_values().filter_map(|d| d.def).collect()
    }
}

fn literal(value: &Value) -> TypeNode {
    match value {
        Value::String(s) => TypeNode::Literal(Literal::String(s.clone())),
        Value::Bool(b) => TypeNode::Literal(Literal::Bool(*b)),
        Value::Null => TypeNode::Literal(Literal::Null),
        Value::Number(n) => match n.as_i64() {
            Some(i) => TypeNode::Literal(Literal::Int(i)),
            None => n
                .as_f64()
                .map_or(TypeNode::NUMBER, |f| TypeNode::Literal(Literal::Number(f))),
        },
        Value::Array(_) | Value::Object(_) => TypeNode::UNKNOWN,
    }
}

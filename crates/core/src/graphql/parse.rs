//! Building an introspection result from schema definition language.

use std::collections::HashMap;

use graphql_parser::schema::{
    self as ast, Definition, Directive, Document, Type, TypeDefinition, TypeExtension,
};
use tracing::debug;

use super::introspection::{
    EnumValue, Field, FullType, InputValue, IntrospectionSchema, NamedType, TypeKind, TypeRef,
};
use super::sdl::{BUILTIN_SCALARS, DEFAULT_DEPRECATION};
use crate::error::{GenerateError, Result};

/// Parse SDL source into the same shape a live introspection query returns.
///
/// Root types come from the `schema` block, or default to the types named
/// `Query`, `Mutation` and `Subscription`. Built-in scalars are appended
/// after the declared types.
pub fn introspect_sdl(text: &str) -> Result<IntrospectionSchema> {
    let document: Document<'_, String> = ast::parse_schema(text)
        .map_err(|e| GenerateError::malformed(format!("invalid GraphQL SDL: {e}")))?;

    let mut kinds: HashMap<&str, TypeKind> = BUILTIN_SCALARS
        .iter()
        .map(|name| (*name, TypeKind::Scalar))
        .collect();
    for definition in &document.definitions {
        if let Definition::TypeDefinition(ty) = definition {
            let (name, kind) = name_and_kind(ty);
            kinds.insert(name, kind);
        }
    }
    let resolver = Resolver { kinds };

    let mut roots = RootNames::default();
    let mut types: Vec<FullType> = Vec::new();
    for definition in &document.definitions {
        match definition {
            Definition::SchemaDefinition(schema) => {
                roots.query.clone_from(&schema.query);
                roots.mutation.clone_from(&schema.mutation);
                roots.subscription.clone_from(&schema.subscription);
            }
            Definition::TypeDefinition(ty) => types.push(resolver.full_type(ty)?),
            Definition::TypeExtension(TypeExtension::Object(ext)) => {
                let target = types
                    .iter_mut()
                    .find(|t| t.name == ext.name)
                    .ok_or_else(|| {
                        GenerateError::malformed(format!("extension of undefined type {}", ext.name))
                    })?;
                let fields = resolver.fields(&ext.fields)?;
                target.fields.get_or_insert_with(Vec::new).extend(fields);
                let interfaces = resolver.named(&ext.implements_interfaces)?;
                target.interfaces.get_or_insert_with(Vec::new).extend(interfaces);
            }
            Definition::TypeExtension(_) => {
                debug!("Skipping non-object type extension in SDL.");
            }
            Definition::DirectiveDefinition(directive) => {
                debug!(name = %directive.name, "Skipping directive definition in SDL.");
            }
        }
    }

    let mut referenced: Vec<&str> = BUILTIN_SCALARS
        .iter()
        .copied()
        .filter(|name| !types.iter().any(|t| t.name == *name))
        .collect();
    referenced.retain(|name| matches!(*name, "String" | "Boolean") || mentions(&types, name));
    for name in referenced {
        types.push(FullType {
            kind: TypeKind::Scalar,
            name: name.to_string(),
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: None,
        });
    }

    let root = |explicit: Option<String>, default: &str| {
        explicit
            .or_else(|| types.iter().any(|t| t.name == default).then(|| default.to_string()))
            .map(|name| NamedType { name })
    };
    let query_type = root(roots.query, "Query");
    let mutation_type = root(roots.mutation, "Mutation");
    let subscription_type = root(roots.subscription, "Subscription");
    let schema = IntrospectionSchema {
        query_type,
        mutation_type,
        subscription_type,
        types,
    };
    debug!(types = schema.types.len(), "Built introspection result from SDL.");
    Ok(schema)
}

#[derive(Default)]
struct RootNames {
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

fn name_and_kind<'d>(ty: &'d TypeDefinition<'_, String>) -> (&'d str, TypeKind) {
    match ty {
        TypeDefinition::Scalar(t) => (t.name.as_str(), TypeKind::Scalar),
        TypeDefinition::Object(t) => (t.name.as_str(), TypeKind::Object),
        TypeDefinition::Interface(t) => (t.name.as_str(), TypeKind::Interface),
        TypeDefinition::Union(t) => (t.name.as_str(), TypeKind::Union),
        TypeDefinition::Enum(t) => (t.name.as_str(), TypeKind::Enum),
        TypeDefinition::InputObject(t) => (t.name.as_str(), TypeKind::InputObject),
    }
}

/// Whether any field, argument or input field of `types` names `scalar`.
fn mentions(types: &[FullType], scalar: &str) -> bool {
    fn named(ty: &TypeRef, scalar: &str) -> bool {
        match ty.of_type.as_deref() {
            Some(inner) => named(inner, scalar),
            None => ty.name() == scalar,
        }
    }
    types.iter().any(|t| {
        let fields = t.fields.iter().flatten().any(|f| {
            named(&f.field_type, scalar) || f.args.iter().any(|a| named(&a.value_type, scalar))
        });
        let inputs = t
            .input_fields
            .iter()
            .flatten()
            .any(|f| named(&f.value_type, scalar));
        fields || inputs
    })
}

/// `@deprecated` with its reason, defaulting like introspection does.
fn deprecation(directives: &[Directive<'_, String>]) -> (bool, Option<String>) {
    let Some(directive) = directives.iter().find(|d| d.name == "deprecated") else {
        return (false, None);
    };
    let reason = directive
        .arguments
        .iter()
        .find_map(|(name, value)| match value {
            ast::Value::String(reason) if name == "reason" => Some(reason.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_DEPRECATION.to_string());
    (true, Some(reason))
}

struct Resolver<'a> {
    kinds: HashMap<&'a str, TypeKind>,
}

impl Resolver<'_> {
    fn type_ref(&self, ty: &Type<'_, String>) -> Result<TypeRef> {
        Ok(match ty {
            Type::NamedType(name) => self.named_ref(name)?,
            Type::ListType(inner) => TypeRef {
                kind: TypeKind::List,
                name: None,
                of_type: Some(Box::new(self.type_ref(inner)?)),
            },
            Type::NonNullType(inner) => TypeRef {
                kind: TypeKind::NonNull,
                name: None,
                of_type: Some(Box::new(self.type_ref(inner)?)),
            },
        })
    }

    fn named_ref(&self, name: &str) -> Result<TypeRef> {
        let kind = self
            .kinds
            .get(name)
            .copied()
            .ok_or_else(|| GenerateError::malformed(format!("undefined GraphQL type {name}")))?;
        Ok(TypeRef {
            kind,
            name: Some(name.to_string()),
            of_type: None,
        })
    }

    fn named(&self, names: &[String]) -> Result<Vec<TypeRef>> {
        names.iter().map(|name| self.named_ref(name)).collect()
    }

    fn input_values(&self, values: &[ast::InputValue<'_, String>]) -> Result<Vec<InputValue>> {
        values
            .iter()
            .map(|value| {
                Ok(InputValue {
                    name: value.name.clone(),
                    description: value.description.clone(),
                    value_type: self.type_ref(&value.value_type)?,
                    default_value: value.default_value.as_ref().map(ToString::to_string),
                })
            })
            .collect()
    }

    fn fields(&self, fields: &[ast::Field<'_, String>]) -> Result<Vec<Field>> {
        fields
            .iter()
            .map(|field| {
                let (is_deprecated, deprecation_reason) = deprecation(&field.directives);
                Ok(Field {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    args: self.input_values(&field.arguments)?,
                    field_type: self.type_ref(&field.field_type)?,
                    is_deprecated,
                    deprecation_reason,
                })
            })
            .collect()
    }

    fn full_type(&self, ty: &TypeDefinition<'_, String>) -> Result<FullType> {
        let (name, kind) = name_and_kind(ty);
        let mut full = FullType {
            kind,
            name: name.to_string(),
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: None,
        };
        match ty {
            TypeDefinition::Scalar(t) => full.description.clone_from(&t.description),
            TypeDefinition::Object(t) => {
                full.description.clone_from(&t.description);
                full.fields = Some(self.fields(&t.fields)?);
                full.interfaces = Some(self.named(&t.implements_interfaces)?);
            }
            TypeDefinition::Interface(t) => {
                full.description.clone_from(&t.description);
                full.fields = Some(self.fields(&t.fields)?);
                full.interfaces = Some(self.named(&t.implements_interfaces)?);
            }
            TypeDefinition::Union(t) => {
                full.description.clone_from(&t.description);
                full.possible_types = Some(self.named(&t.types)?);
            }
            TypeDefinition::Enum(t) => {
                full.description.clone_from(&t.description);
                full.enum_values = Some(
                    t.values
                        .iter()
                        .map(|value| {
                            let (is_deprecated, deprecation_reason) =
                                deprecation(&value.directives);
                            EnumValue {
                                name: value.name.clone(),
                                description: value.description.clone(),
                                is_deprecated,
                                deprecation_reason,
                            }
                        })
                        .collect(),
                );
            }
            TypeDefinition::InputObject(t) => {
                full.description.clone_from(&t.description);
                full.input_fields = Some(self.input_values(&t.fields)?);
            }
        }
        Ok(full)
    }
}

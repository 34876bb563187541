//! Printing an introspection result back to schema definition language.

use super::introspection::{
    EnumValue, Field, FullType, InputValue, IntrospectionSchema, TypeKind, TypeRef,
};
use crate::writer::CodeWriter;

pub(crate) const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];
pub(crate) const DEFAULT_DEPRECATION: &str = "No longer supported";

/// Render `schema` as SDL: every user type in introspection order, preceded
/// by a `schema` block when the root types are not named `Query`,
/// `Mutation` and `Subscription`.
pub fn print_sdl(schema: &IntrospectionSchema) -> String {
    let mut w = CodeWriter::default();

    let roots = [
        ("query", schema.query_type.as_ref(), "Query"),
        ("mutation", schema.mutation_type.as_ref(), "Mutation"),
        ("subscription", schema.subscription_type.as_ref(), "Subscription"),
    ];
    let custom_roots = roots
        .iter()
        .any(|(_, root, default)| root.is_some_and(|r| r.name != *default));
    if custom_roots {
        w.begin_block("schema");
        for (operation, root, _) in roots {
            if let Some(root) = root {
                w.line(format!("{operation}: {}", root.name));
            }
        }
        w.end_block();
    }

    for ty in schema.user_types() {
        if ty.kind == TypeKind::Scalar && BUILTIN_SCALARS.contains(&ty.name.as_str()) {
            continue;
        }
        w.blank_line();
        write_type(&mut w, ty);
    }

    w.render()
}

fn type_ref(ty: &TypeRef) -> String {
    match (ty.kind, ty.of_type.as_deref()) {
        (TypeKind::NonNull, Some(inner)) => format!("{}!", type_ref(inner)),
        (TypeKind::List, Some(inner)) => format!("[{}]", type_ref(inner)),
        _ => ty.name().to_string(),
    }
}

fn string_literal(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

fn write_description(w: &mut CodeWriter, description: Option<&str>) {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return;
    };
    if description.contains('\n') {
        w.line("\"\"\"");
        w.line(description.replace("\"\"\"", "\\\"\"\""));
        w.line("\"\"\"");
    } else {
        w.line(string_literal(description));
    }
}

fn deprecation(is_deprecated: bool, reason: Option<&str>) -> String {
    if !is_deprecated {
        return String::new();
    }
    match reason {
        Some(reason) if reason != DEFAULT_DEPRECATION => {
            format!(" @deprecated(reason: {})", string_literal(reason))
        }
        _ => " @deprecated".to_string(),
    }
}

fn input_value(value: &InputValue) -> String {
    let mut out = format!("{}: {}", value.name, type_ref(&value.value_type));
    if let Some(default) = &value.default_value {
        out.push_str(" = ");
        out.push_str(default);
    }
    out
}

fn write_field(w: &mut CodeWriter, field: &Field) {
    write_description(w, field.description.as_deref());
    let args = if field.args.is_empty() {
        String::new()
    } else {
        let args: Vec<String> = field.args.iter().map(input_value).collect();
        format!("({})", args.join(", "))
    };
    w.line(format!(
        "{}{args}: {}{}",
        field.name,
        type_ref(&field.field_type),
        deprecation(field.is_deprecated, field.deprecation_reason.as_deref())
    ));
}

fn write_enum_value(w: &mut CodeWriter, value: &EnumValue) {
    write_description(w, value.description.as_deref());
    w.line(format!(
        "{}{}",
        value.name,
        deprecation(value.is_deprecated, value.deprecation_reason.as_deref())
    ));
}

fn implements(ty: &FullType) -> String {
    let names: Vec<&str> = ty.interfaces.iter().flatten().map(TypeRef::name).collect();
    if names.is_empty() {
        String::new()
    } else {
        format!(" implements {}", names.join(" & "))
    }
}

fn write_type(w: &mut CodeWriter, ty: &FullType) {
    write_description(w, ty.description.as_deref());
    match ty.kind {
        TypeKind::Scalar => {
            w.line(format!("scalar {}", ty.name));
        }
        TypeKind::Object | TypeKind::Interface => {
            let keyword = if ty.kind == TypeKind::Object {
                "type"
            } else {
                "interface"
            };
            w.begin_block(format!("{keyword} {}{}", ty.name, implements(ty)));
            for field in ty.fields.iter().flatten() {
                write_field(w, field);
            }
            w.end_block();
        }
        TypeKind::Union => {
            let members: Vec<&str> = ty.possible_types.iter().flatten().map(TypeRef::name).collect();
            w.line(format!("union {} = {}", ty.name, members.join(" | ")));
        }
        TypeKind::Enum => {
            w.begin_block(format!("enum {}", ty.name));
            for value in ty.enum_values.iter().flatten() {
                write_enum_value(w, value);
            }
            w.end_block();
        }
        TypeKind::InputObject => {
            w.begin_block(format!("input {}", ty.name));
            for field in ty.input_fields.iter().flatten() {
                write_description(w, field.description.as_deref());
                w.line(input_value(field));
            }
            w.end_block();
        }
        // wrappers never appear as named types
        TypeKind::List | TypeKind::NonNull => {}
    }
}

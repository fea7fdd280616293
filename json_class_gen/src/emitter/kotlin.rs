//! Nominal immutable-record emitter (`data class` style).
//!
//! Required fields are non-optional constructor parameters; optional fields
//! default to `null`. Constraints render as `require(...)` assertions in an
//! `init` block, with messages embedding the field name and the violated
//! bound. Nested object schemas render as nested data classes.

use heck::ToLowerCamelCase;
use std::fmt::{self, Write};

use super::{
    HEADER, big_decimal_literal, escape_kotlin_string, jvm_class_imports, write_doc_block,
    write_field_doc,
};
use crate::model::{ClassDef, ClassId, Field, PrimitiveKind, TargetType, TypeGraph};
use crate::settings::GeneratorSettings;

pub(super) fn render_file(
    out: &mut String,
    graph: &TypeGraph,
    id: ClassId,
    _settings: &GeneratorSettings,
) -> fmt::Result {
    let class: &ClassDef = graph.class(id);
    writeln!(out, "{HEADER}")?;
    writeln!(out)?;
    if !class.package.is_empty() {
        writeln!(out, "package {}", class.package)?;
        writeln!(out)?;
    }
    let imports = jvm_class_imports(graph, id, &class.package);
    if !imports.is_empty() {
        for import in &imports {
            writeln!(out, "import {import}")?;
        }
        writeln!(out)?;
    }
    write_class(out, graph, class, "")
}

fn write_class(out: &mut String, graph: &TypeGraph, class: &ClassDef, indent: &str) -> fmt::Result {
    if let Some(documentation) = &class.documentation {
        write_doc_block(out, indent, documentation)?;
    }
    if class.fields.is_empty() {
        writeln!(out, "{indent}class {}", class.name)?;
        return Ok(());
    }

    writeln!(out, "{indent}data class {}(", class.name)?;
    let member_indent: String = format!("{indent}    ");
    for (position, field) in class.fields.iter().enumerate() {
        if let Some(documentation) = &field.documentation {
            write_field_doc(out, &member_indent, documentation)?;
        }
        let (optional, inner) = field.target.split_optional();
        let suffix: &str = if optional { "? = null" } else { "" };
        let comma: &str = if position + 1 < class.fields.len() { "," } else { "" };
        writeln!(
            out,
            "{member_indent}val {}: {}{suffix}{comma}",
            field.name.to_lower_camel_case(),
            type_name(graph, inner)
        )?;
    }

    let checks: Vec<String> = class.fields.iter().flat_map(field_checks).collect();
    if checks.is_empty() && class.nested.is_empty() {
        writeln!(out, "{indent})")?;
        return Ok(());
    }

    writeln!(out, "{indent}) {{")?;
    if !checks.is_empty() {
        writeln!(out)?;
        writeln!(out, "{member_indent}init {{")?;
        for check in &checks {
            writeln!(out, "{member_indent}    {check}")?;
        }
        writeln!(out, "{member_indent}}}")?;
    }
    for &nested in &class.nested {
        writeln!(out)?;
        write_class(out, graph, graph.class(nested), &member_indent)?;
    }
    writeln!(out)?;
    writeln!(out, "{indent}}}")
}

fn type_name(graph: &TypeGraph, target: &TargetType) -> String {
    match target {
        TargetType::Primitive(kind) => primitive_name(*kind).to_string(),
        TargetType::ClassRef(id) => graph.class(*id).name.clone(),
        TargetType::CollectionOf(element) => format!("List<{}>", type_name(graph, element)),
        TargetType::Optional(inner) => format!("{}?", type_name(graph, inner)),
        TargetType::CustomOverride(class) => class.name.clone(),
    }
}

fn primitive_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Str => "String",
        PrimitiveKind::Int => "Int",
        PrimitiveKind::Long => "Long",
        PrimitiveKind::Decimal => "BigDecimal",
        PrimitiveKind::Bool => "Boolean",
        PrimitiveKind::DateTime => "OffsetDateTime",
        PrimitiveKind::Date => "LocalDate",
        PrimitiveKind::Time => "LocalTime",
        PrimitiveKind::Uuid => "UUID",
        PrimitiveKind::Any => "Any",
    }
}

/// `require(...)` lines for one field, in keyword order. Fields whose type
/// is not a checked scalar produce nothing; custom overrides carry no value
/// constraints in the first place.
fn field_checks(field: &Field) -> Vec<String> {
    let mut checks: Vec<String> = Vec::new();
    let (optional, inner) = field.target.split_optional();
    let TargetType::Primitive(kind) = inner else {
        return checks;
    };
    let name: String = field.name.to_lower_camel_case();
    let guard: String = if optional {
        format!("{name} == null || ")
    } else {
        String::new()
    };
    let constraints = &field.constraints;
    match kind {
        PrimitiveKind::Decimal | PrimitiveKind::Int | PrimitiveKind::Long => {
            if let Some(bound) = &constraints.minimum {
                let literal: String = numeric_literal(*kind, &bound.value);
                let (op, label, violated) = if bound.exclusive {
                    (">", "exclusiveMinimum", "<=")
                } else {
                    (">=", "minimum", "<")
                };
                checks.push(format!(
                    "require({guard}{name} {op} {literal}) {{ \"{name} {violated} {label} {value} - ${name}\" }}",
                    value = bound.value
                ));
            }
            if let Some(bound) = &constraints.maximum {
                let literal: String = numeric_literal(*kind, &bound.value);
                let (op, label, violated) = if bound.exclusive {
                    ("<", "exclusiveMaximum", ">=")
                } else {
                    ("<=", "maximum", ">")
                };
                checks.push(format!(
                    "require({guard}{name} {op} {literal}) {{ \"{name} {violated} {label} {value} - ${name}\" }}",
                    value = bound.value
                ));
            }
        }
        PrimitiveKind::Str => {
            if let Some(length) = constraints.min_length {
                checks.push(format!(
                    "require({guard}{name}.length >= {length}) {{ \"{name} length < minLength {length} - ${name}\" }}"
                ));
            }
            if let Some(length) = constraints.max_length {
                checks.push(format!(
                    "require({guard}{name}.length <= {length}) {{ \"{name} length > maxLength {length} - ${name}\" }}"
                ));
            }
            if let Some(pattern) = &constraints.pattern {
                let escaped: String = escape_kotlin_string(pattern);
                checks.push(format!(
                    "require({guard}Regex(\"{escaped}\").containsMatchIn({name})) {{ \"{name} does not match pattern {escaped} - ${name}\" }}"
                ));
            }
            if !constraints.enum_values.is_empty() {
                let values: Vec<String> = constraints
                    .enum_values
                    .iter()
                    .map(|value| format!("\"{}\"", escape_kotlin_string(value)))
                    .collect();
                checks.push(format!(
                    "require({guard}{name} in setOf({})) {{ \"{name} not in enumerated values - ${name}\" }}",
                    values.join(", ")
                ));
            }
        }
        PrimitiveKind::Bool
        | PrimitiveKind::DateTime
        | PrimitiveKind::Date
        | PrimitiveKind::Time
        | PrimitiveKind::Uuid
        | PrimitiveKind::Any => {}
    }
    checks
}

fn numeric_literal(kind: PrimitiveKind, value: &serde_json::Number) -> String {
    if kind == PrimitiveKind::Decimal {
        big_decimal_literal(value, "BigDecimal")
    } else {
        value.to_string()
    }
}

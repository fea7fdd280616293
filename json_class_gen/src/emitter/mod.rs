//! Language emitters: one per target, all consuming the same Type Graph.
//!
//! `TargetType` is a closed sum, and every emitter matches it exhaustively,
//! so a new variant fails to compile until every backend handles it.

mod java;
mod kotlin;
mod typescript;

use serde_json::Number;
use std::collections::BTreeSet;
use std::fmt::{self, Write};

use crate::error::ClassGenError;
use crate::model::{ClassDef, ClassId, Field, Placement, PrimitiveKind, TargetType, TypeGraph};
use crate::output::TargetFileLocator;
use crate::settings::GeneratorSettings;

/// First line of every generated file.
pub(crate) const HEADER: &str = "// Generated by json-class-gen. Do not edit manually.";

/// The fixed set of supported target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLanguage {
    /// Nominal immutable-record style (`data class`).
    Kotlin,
    /// Nominal class-with-accessors style (bean).
    Java,
    /// Structural typing style (interface).
    TypeScript,
}

impl TargetLanguage {
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Kotlin => "kt",
            Self::Java => "java",
            Self::TypeScript => "ts",
        }
    }
}

/// One rendered output file, not yet persisted.
#[derive(Debug)]
pub struct GeneratedFile {
    pub locator: TargetFileLocator,
    pub text: String,
}

/// Renders the Type Graph with the emitter the settings select: one file
/// per top-level class, in class introduction order.
///
/// # Errors
///
/// Returns `ClassGenError` if rendering fails.
pub fn emit(
    graph: &TypeGraph,
    settings: &GeneratorSettings,
) -> Result<Vec<GeneratedFile>, ClassGenError> {
    type RenderFn = fn(&mut String, &TypeGraph, ClassId, &GeneratorSettings) -> fmt::Result;
    let render: RenderFn = match settings.target {
        TargetLanguage::Kotlin => kotlin::render_file,
        TargetLanguage::Java => java::render_file,
        TargetLanguage::TypeScript => typescript::render_file,
    };
    let mut files: Vec<GeneratedFile> = Vec::new();
    for (id, class) in graph.top_level() {
        let mut text = String::new();
        render(&mut text, graph, id, settings)
            .map_err(|_| ClassGenError::GenericError(format!("failed to render {}", class.name)))?;
        files.push(GeneratedFile {
            locator: locator_for(class, settings.target.file_extension()),
            text,
        });
    }
    Ok(files)
}

/// File locator for a top-level class: base name from the class name,
/// directory path from the effective package.
pub(crate) fn locator_for(class: &ClassDef, extension: &str) -> TargetFileLocator {
    let directory: Vec<String> = if class.package.is_empty() {
        Vec::new()
    } else {
        class.package.split('.').map(String::from).collect()
    };
    TargetFileLocator {
        base_name: class.name.clone(),
        extension: extension.to_string(),
        directory,
    }
}

/// Calls `visit` for every target type reachable from a class, nested
/// classes included, wrapper types unwrapped along the way.
pub(crate) fn visit_types<'g>(
    graph: &'g TypeGraph,
    id: ClassId,
    visit: &mut dyn FnMut(&'g TargetType),
) {
    fn visit_target<'g>(target: &'g TargetType, visit: &mut dyn FnMut(&'g TargetType)) {
        visit(target);
        match target {
            TargetType::CollectionOf(inner) | TargetType::Optional(inner) => {
                visit_target(inner, visit);
            }
            TargetType::Primitive(_) | TargetType::ClassRef(_) | TargetType::CustomOverride(_) => {}
        }
    }
    let class: &ClassDef = graph.class(id);
    for field in &class.fields {
        visit_target(&field.target, visit);
    }
    for &nested in &class.nested {
        visit_types(graph, nested, visit);
    }
}

/// Calls `visit` for every field of a class and its nested classes.
pub(crate) fn visit_fields<'g>(
    graph: &'g TypeGraph,
    id: ClassId,
    visit: &mut dyn FnMut(&'g Field),
) {
    let class: &ClassDef = graph.class(id);
    for field in &class.fields {
        visit(field);
    }
    for &nested in &class.nested {
        visit_fields(graph, nested, visit);
    }
}

/// Import required by a scalar kind on the JVM targets, if any.
pub(crate) fn jvm_primitive_import(kind: PrimitiveKind) -> Option<&'static str> {
    match kind {
        PrimitiveKind::Decimal => Some("java.math.BigDecimal"),
        PrimitiveKind::DateTime => Some("java.time.OffsetDateTime"),
        PrimitiveKind::Date => Some("java.time.LocalDate"),
        PrimitiveKind::Time => Some("java.time.LocalTime"),
        PrimitiveKind::Uuid => Some("java.util.UUID"),
        PrimitiveKind::Str
        | PrimitiveKind::Int
        | PrimitiveKind::Long
        | PrimitiveKind::Bool
        | PrimitiveKind::Any => None,
    }
}

/// Imports shared by both JVM targets: scalar types, custom overrides, and
/// cross-package class references. Sorted and de-duplicated by the set.
/// Imports whose package equals the file's own package are skipped.
pub(crate) fn jvm_class_imports(
    graph: &TypeGraph,
    id: ClassId,
    file_package: &str,
) -> BTreeSet<String> {
    let mut imports: BTreeSet<String> = BTreeSet::new();
    visit_types(graph, id, &mut |target| match target {
        TargetType::Primitive(kind) => {
            if let Some(import) = jvm_primitive_import(*kind) {
                imports.insert(import.to_string());
            }
        }
        TargetType::CustomOverride(class) => {
            if !class.package.is_empty() && class.package != file_package {
                imports.insert(class.qualified());
            }
        }
        TargetType::ClassRef(target_id) => {
            let target_class: &ClassDef = graph.class(*target_id);
            if target_class.placement == Placement::TopLevel
                && !target_class.package.is_empty()
                && target_class.package != file_package
            {
                imports.insert(format!("{}.{}", target_class.package, target_class.name));
            }
        }
        TargetType::CollectionOf(_) | TargetType::Optional(_) => {}
    });
    imports
}

/// Writes a `/** ... */` block comment, one ` * ` line per text line.
pub(crate) fn write_doc_block(out: &mut String, indent: &str, text: &str) -> fmt::Result {
    writeln!(out, "{indent}/**")?;
    for line in text.trim().lines() {
        let line: &str = line.trim_end();
        if line.is_empty() {
            writeln!(out, "{indent} *")?;
        } else {
            writeln!(out, "{indent} * {line}")?;
        }
    }
    writeln!(out, "{indent} */")
}

/// Field documentation: single-line `/** ... */` for one-liners, a block
/// otherwise.
pub(crate) fn write_field_doc(out: &mut String, indent: &str, text: &str) -> fmt::Result {
    let trimmed: &str = text.trim();
    if trimmed.contains('\n') {
        write_doc_block(out, indent, trimmed)
    } else {
        writeln!(out, "{indent}/** {trimmed} */")
    }
}

/// Escapes a string for a Java double-quoted literal.
pub(crate) fn escape_java_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escapes a string for a Kotlin double-quoted literal, where `$` starts a
/// template expression.
pub(crate) fn escape_kotlin_string(text: &str) -> String {
    escape_java_string(text).replace('$', "\\$")
}

/// `BigDecimal` bound literal: the named constants for 0, 1 and 10, the
/// string constructor otherwise.
pub(crate) fn big_decimal_literal(value: &Number, constructor: &str) -> String {
    match value.as_i64() {
        Some(0) => "BigDecimal.ZERO".to_string(),
        Some(1) => "BigDecimal.ONE".to_string(),
        Some(10) => "BigDecimal.TEN".to_string(),
        _ => format!("{constructor}(\"{value}\")"),
    }
}

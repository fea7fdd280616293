//! Structural typing emitter (interface style).
//!
//! No executable validation; optionality is a field-level presence marker
//! (`name?:`) rather than a nullable type; nested object schemas render as
//! sibling named shapes referenced by name, in the same file as the class
//! that introduced them.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

use super::{HEADER, visit_types, write_doc_block, write_field_doc};
use crate::model::{ClassDef, ClassId, Placement, PrimitiveKind, TargetType, TypeGraph};
use crate::settings::GeneratorSettings;

pub(super) fn render_file(
    out: &mut String,
    graph: &TypeGraph,
    id: ClassId,
    _settings: &GeneratorSettings,
) -> fmt::Result {
    writeln!(out, "{HEADER}")?;
    writeln!(out)?;

    let imports: BTreeSet<String> = file_imports(graph, id);
    if !imports.is_empty() {
        for name in &imports {
            writeln!(out, "import {{ {name} }} from \"./{name}\";")?;
        }
        writeln!(out)?;
    }

    let mut shapes: Vec<ClassId> = Vec::new();
    collect_shapes(graph, id, &mut shapes);
    for (position, &shape) in shapes.iter().enumerate() {
        if position > 0 {
            writeln!(out)?;
        }
        write_interface(out, graph, graph.class(shape), position == 0)?;
    }
    Ok(())
}

/// The root class and, depth-first, every shape it introduced.
fn collect_shapes(graph: &TypeGraph, id: ClassId, shapes: &mut Vec<ClassId>) {
    shapes.push(id);
    for &nested in &graph.class(id).nested {
        collect_shapes(graph, nested, shapes);
    }
}

/// Imports for custom overrides and for top-level classes living in other
/// files. Sorted and de-duplicated by the set.
fn file_imports(graph: &TypeGraph, id: ClassId) -> BTreeSet<String> {
    let mut imports: BTreeSet<String> = BTreeSet::new();
    visit_types(graph, id, &mut |target| match target {
        TargetType::CustomOverride(class) => {
            imports.insert(class.name.clone());
        }
        TargetType::ClassRef(target_id) => {
            let target_class: &ClassDef = graph.class(*target_id);
            if *target_id != id && target_class.placement == Placement::TopLevel {
                imports.insert(target_class.name.clone());
            }
        }
        TargetType::Primitive(_) | TargetType::CollectionOf(_) | TargetType::Optional(_) => {}
    });
    imports
}

fn write_interface(
    out: &mut String,
    graph: &TypeGraph,
    class: &ClassDef,
    export: bool,
) -> fmt::Result {
    if let Some(documentation) = &class.documentation {
        write_doc_block(out, "", documentation)?;
    }
    let keyword: &str = if export { "export interface" } else { "interface" };
    writeln!(out, "{keyword} {} {{", class.name)?;
    for field in &class.fields {
        if let Some(documentation) = &field.documentation {
            write_field_doc(out, "    ", documentation)?;
        }
        let (optional, inner) = field.target.split_optional();
        let marker: &str = if optional { "?" } else { "" };
        writeln!(
            out,
            "    {}{marker}: {};",
            field_key(&field.name),
            type_name(graph, inner)
        )?;
    }
    writeln!(out, "}}")
}

/// Property names keep their schema spelling; names that are not valid
/// identifiers are quoted.
fn field_key(name: &str) -> String {
    let valid: bool = !name.is_empty()
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

fn type_name(graph: &TypeGraph, target: &TargetType) -> String {
    match target {
        TargetType::Primitive(kind) => primitive_name(*kind).to_string(),
        TargetType::ClassRef(id) => graph.class(*id).name.clone(),
        TargetType::CollectionOf(element) => format!("{}[]", type_name(graph, element)),
        TargetType::Optional(inner) => type_name(graph, inner),
        TargetType::CustomOverride(class) => class.name.clone(),
    }
}

fn primitive_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Str
        | PrimitiveKind::DateTime
        | PrimitiveKind::Date
        | PrimitiveKind::Time
        | PrimitiveKind::Uuid => "string",
        PrimitiveKind::Int | PrimitiveKind::Long | PrimitiveKind::Decimal => "number",
        PrimitiveKind::Bool => "boolean",
        PrimitiveKind::Any => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use crate::builder;
    use crate::emitter::{self, GeneratedFile, TargetLanguage};
    use crate::model::ClassName;
    use crate::registry::CustomClassRegistry;
    use crate::schema::{DocumentSet, SchemaDocument};
    use crate::settings::GeneratorSettings;

    fn generate(documents: &[(&str, &str)], registry: &CustomClassRegistry) -> Vec<GeneratedFile> {
        let mut set = DocumentSet::new();
        for (uri, text) in documents {
            set.add(SchemaDocument::parse_json(uri, &[], text).expect("valid document"))
                .expect("add succeeds");
        }
        let settings = GeneratorSettings {
            target: TargetLanguage::TypeScript,
            base_package: "com.example".to_string(),
            java_builders: false,
        };
        let model = builder::build(&set, registry, &settings).expect("build succeeds");
        emitter::emit(&model.graph, &settings).expect("emit succeeds")
    }

    #[test]
    fn optional_and_nested_shapes() {
        let schema: &str = r#"{
            "title": "Test",
            "type": "object",
            "required": ["id", "name", "price"],
            "properties": {
                "id": { "type": "number", "description": "Product identifier" },
                "name": { "type": "string", "description": "Name of the product" },
                "price": { "type": "number", "minimum": 0 },
                "tags": { "type": "array", "items": { "type": "string" } },
                "stock": {
                    "type": "object",
                    "properties": {
                        "warehouse": { "type": "number" },
                        "retail": { "type": "number" }
                    }
                }
            }
        }"#;
        let files: Vec<GeneratedFile> =
            generate(&[("test.schema.json", schema)], &CustomClassRegistry::new());
        assert_eq!(files.len(), 1, "nested shape shares the introducing class's file");
        assert_eq!(files[0].locator.slash_path(), "com/example/Test.ts");

        let expected: &str = r#"// Generated by json-class-gen. Do not edit manually.

export interface Test {
    /** Product identifier */
    id: number;
    /** Name of the product */
    name: string;
    price: number;
    tags?: string[];
    stock?: Stock;
}

interface Stock {
    warehouse?: number;
    retail?: number;
}
"#;
        assert_eq!(expected, files[0].text, "expected output to match exactly");
    }

    #[test]
    fn custom_override_imports_once() {
        let schema: &str = r#"{
            "description": "Test custom class.",
            "type": "object",
            "required": ["aaa"],
            "properties": {
                "aaa": { "type": "string", "x-test": "money" },
                "bbb": { "type": "string", "x-test": "money" }
            }
        }"#;
        let mut registry = CustomClassRegistry::new();
        registry
            .add_by_extension("x-test", "money", ClassName::parse("com.example.util.Money"))
            .expect("registration succeeds");
        let files: Vec<GeneratedFile> = generate(&[("test-custom.schema.json", schema)], &registry);

        let expected: &str = r#"// Generated by json-class-gen. Do not edit manually.

import { Money } from "./Money";

/**
 * Test custom class.
 */
export interface TestCustom {
    aaa: Money;
    bbb?: Money;
}
"#;
        assert_eq!(expected, files[0].text, "expected output to match exactly");
    }

    #[test]
    fn cross_file_reference_is_imported() {
        let schema: &str = r##"{
            "title": "Order",
            "type": "object",
            "properties": {
                "billing": { "$ref": "#/$defs/address" },
                "shipping": { "$ref": "#/$defs/address" }
            },
            "$defs": {
                "address": {
                    "type": "object",
                    "properties": { "street": { "type": "string" } }
                }
            }
        }"##;
        let files: Vec<GeneratedFile> =
            generate(&[("order.schema.json", schema)], &CustomClassRegistry::new());
        assert_eq!(files.len(), 2, "the $defs entry gets its own file");

        let expected_order: &str = r#"// Generated by json-class-gen. Do not edit manually.

import { Address } from "./Address";

export interface Order {
    billing?: Address;
    shipping?: Address;
}
"#;
        let expected_address: &str = r#"// Generated by json-class-gen. Do not edit manually.

export interface Address {
    street?: string;
}
"#;
        assert_eq!(expected_order, files[0].text, "expected output to match exactly");
        assert_eq!(expected_address, files[1].text, "expected output to match exactly");
    }

    #[test]
    fn non_identifier_property_names_are_quoted() {
        let schema: &str = r#"{
            "title": "Quoted",
            "type": "object",
            "properties": {
                "foo-bar": { "type": "string" },
                "plain": { "type": "string" }
            }
        }"#;
        let files: Vec<GeneratedFile> =
            generate(&[("quoted.schema.json", schema)], &CustomClassRegistry::new());

        let expected: &str = r#"// Generated by json-class-gen. Do not edit manually.

export interface Quoted {
    "foo-bar"?: string;
    plain?: string;
}
"#;
        assert_eq!(expected, files[0].text, "expected output to match exactly");
    }
}

//! Nominal class-with-accessors emitter (bean style).
//!
//! Private final fields, a constructor that null-checks every required
//! field before assignment and enforces value constraints with messages
//! naming the field and the violated bound, accessor methods, structural
//! `equals`/`hashCode` over all fields in declaration order, an optional
//! fluent `Builder`, and nested static classes for nested object schemas.

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use std::fmt::{self, Write};

use super::{
    HEADER, big_decimal_literal, escape_java_string, jvm_class_imports, visit_fields, visit_types,
    write_doc_block,
};
use crate::model::{ClassDef, ClassId, Field, PrimitiveKind, TargetType, TypeGraph};
use crate::settings::GeneratorSettings;

pub(super) fn render_file(
    out: &mut String,
    graph: &TypeGraph,
    id: ClassId,
    settings: &GeneratorSettings,
) -> fmt::Result {
    let class: &ClassDef = graph.class(id);
    writeln!(out, "{HEADER}")?;
    writeln!(out)?;
    if !class.package.is_empty() {
        writeln!(out, "package {};", class.package)?;
        writeln!(out)?;
    }
    let mut imports = jvm_class_imports(graph, id, &class.package);
    let mut has_collection: bool = false;
    visit_types(graph, id, &mut |target| {
        if matches!(target, TargetType::CollectionOf(_)) {
            has_collection = true;
        }
    });
    if has_collection {
        imports.insert("java.util.List".to_string());
    }
    let mut has_pattern_check: bool = false;
    visit_fields(graph, id, &mut |field| {
        has_pattern_check |= pattern_check_applies(field);
    });
    if has_pattern_check {
        imports.insert("java.util.regex.Pattern".to_string());
    }
    if !imports.is_empty() {
        for import in &imports {
            writeln!(out, "import {import};")?;
        }
        writeln!(out)?;
    }
    write_class(out, graph, class, "", true, settings)
}

fn pattern_check_applies(field: &Field) -> bool {
    matches!(
        field.target.split_optional().1,
        TargetType::Primitive(PrimitiveKind::Str)
    ) && field.constraints.pattern.is_some()
}

fn write_class(
    out: &mut String,
    graph: &TypeGraph,
    class: &ClassDef,
    indent: &str,
    top_level: bool,
    settings: &GeneratorSettings,
) -> fmt::Result {
    let member: String = format!("{indent}    ");
    let body: String = format!("{indent}        ");
    let continuation: String = format!("{indent}            ");

    if let Some(documentation) = &class.documentation {
        write_doc_block(out, indent, documentation)?;
    }
    if top_level {
        writeln!(out, "{indent}public class {} {{", class.name)?;
    } else {
        writeln!(out, "{indent}public static class {} {{", class.name)?;
    }

    if !class.fields.is_empty() {
        writeln!(out)?;
        for field in &class.fields {
            writeln!(
                out,
                "{member}private final {} {};",
                type_name(graph, field.target.split_optional().1),
                field.name.to_lower_camel_case()
            )?;
        }

        writeln!(out)?;
        writeln!(out, "{member}public {}(", class.name)?;
        for (position, field) in class.fields.iter().enumerate() {
            let comma: &str = if position + 1 < class.fields.len() { "," } else { "" };
            writeln!(
                out,
                "{continuation}{} {}{comma}",
                type_name(graph, field.target.split_optional().1),
                field.name.to_lower_camel_case()
            )?;
        }
        writeln!(out, "{member}) {{")?;
        for field in &class.fields {
            let name: String = field.name.to_lower_camel_case();
            if field.required {
                writeln!(out, "{body}if ({name} == null)")?;
                writeln!(
                    out,
                    "{continuation}throw new IllegalArgumentException(\"Must not be null - {name}\");"
                )?;
            }
            for (condition, message) in field_checks(field) {
                writeln!(out, "{body}if ({condition})")?;
                writeln!(out, "{continuation}throw new IllegalArgumentException({message});")?;
            }
            writeln!(out, "{body}this.{name} = {name};")?;
        }
        writeln!(out, "{member}}}")?;

        for field in &class.fields {
            writeln!(out)?;
            if let Some(documentation) = &field.documentation {
                write_doc_block(out, &member, documentation)?;
            }
            let name: String = field.name.to_lower_camel_case();
            writeln!(
                out,
                "{member}public {} get{}() {{",
                type_name(graph, field.target.split_optional().1),
                name.to_upper_camel_case()
            )?;
            writeln!(out, "{body}return {name};")?;
            writeln!(out, "{member}}}")?;
        }

        write_equals(out, class, &member, &body, &continuation)?;
        write_hash_code(out, class, &member, &body)?;
    }

    if settings.java_builders && top_level && !class.fields.is_empty() {
        write_builder(out, graph, class, &member, &body)?;
    }

    for &nested in &class.nested {
        writeln!(out)?;
        write_class(out, graph, graph.class(nested), &member, false, settings)?;
    }

    writeln!(out)?;
    writeln!(out, "{indent}}}")
}

fn write_equals(
    out: &mut String,
    class: &ClassDef,
    member: &str,
    body: &str,
    continuation: &str,
) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{member}@Override")?;
    writeln!(out, "{member}public boolean equals(Object other) {{")?;
    writeln!(out, "{body}if (this == other)")?;
    writeln!(out, "{continuation}return true;")?;
    writeln!(out, "{body}if (!(other instanceof {}))", class.name)?;
    writeln!(out, "{continuation}return false;")?;
    writeln!(out, "{body}{0} typedOther = ({0})other;", class.name)?;
    let last: usize = class.fields.len() - 1;
    for (position, field) in class.fields.iter().enumerate() {
        let name: String = field.name.to_lower_camel_case();
        if position < last {
            if field.required {
                writeln!(out, "{body}if (!{name}.equals(typedOther.{name}))")?;
            } else {
                writeln!(
                    out,
                    "{body}if ({name} == null ? typedOther.{name} != null : !{name}.equals(typedOther.{name}))"
                )?;
            }
            writeln!(out, "{continuation}return false;")?;
        } else if field.required {
            writeln!(out, "{body}return {name}.equals(typedOther.{name});")?;
        } else {
            writeln!(
                out,
                "{body}return {name} == null ? typedOther.{name} == null : {name}.equals(typedOther.{name});"
            )?;
        }
    }
    writeln!(out, "{member}}}")
}

fn write_hash_code(out: &mut String, class: &ClassDef, member: &str, body: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{member}@Override")?;
    writeln!(out, "{member}public int hashCode() {{")?;
    let expressions: Vec<String> = class
        .fields
        .iter()
        .map(|field| {
            let name: String = field.name.to_lower_camel_case();
            if field.required {
                format!("{name}.hashCode()")
            } else {
                format!("({name} != null ? {name}.hashCode() : 0)")
            }
        })
        .collect();
    match expressions.as_slice() {
        [] => writeln!(out, "{body}return 0;")?,
        [only] => writeln!(out, "{body}return {only};")?,
        [first, middle @ .., last] => {
            writeln!(out, "{body}int hash = {first};")?;
            for expression in middle {
                writeln!(out, "{body}hash ^= {expression};")?;
            }
            writeln!(out, "{body}return hash ^ {last};")?;
        }
    }
    writeln!(out, "{member}}}")
}

fn write_builder(
    out: &mut String,
    graph: &TypeGraph,
    class: &ClassDef,
    member: &str,
    body: &str,
) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{member}public static class Builder {{")?;
    writeln!(out)?;
    for field in &class.fields {
        writeln!(
            out,
            "{body}private {} {};",
            type_name(graph, field.target.split_optional().1),
            field.name.to_lower_camel_case()
        )?;
    }
    for field in &class.fields {
        let name: String = field.name.to_lower_camel_case();
        writeln!(out)?;
        writeln!(
            out,
            "{body}public Builder with{}({} {name}) {{",
            name.to_upper_camel_case(),
            type_name(graph, field.target.split_optional().1)
        )?;
        writeln!(out, "{body}    this.{name} = {name};")?;
        writeln!(out, "{body}    return this;")?;
        writeln!(out, "{body}}}")?;
    }
    writeln!(out)?;
    writeln!(out, "{body}public {} build() {{", class.name)?;
    writeln!(out, "{body}    return new {}(", class.name)?;
    for (position, field) in class.fields.iter().enumerate() {
        let comma: &str = if position + 1 < class.fields.len() { "," } else { "" };
        writeln!(out, "{body}            {}{comma}", field.name.to_lower_camel_case())?;
    }
    writeln!(out, "{body}    );")?;
    writeln!(out, "{body}}}")?;
    writeln!(out)?;
    writeln!(out, "{member}}}")
}

fn type_name(graph: &TypeGraph, target: &TargetType) -> String {
    match target {
        TargetType::Primitive(kind) => primitive_name(*kind).to_string(),
        TargetType::ClassRef(id) => graph.class(*id).name.clone(),
        TargetType::CollectionOf(element) => format!("List<{}>", type_name(graph, element)),
        TargetType::Optional(inner) => type_name(graph, inner),
        TargetType::CustomOverride(class) => class.name.clone(),
    }
}

fn primitive_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Str => "String",
        PrimitiveKind::Int => "Integer",
        PrimitiveKind::Long => "Long",
        PrimitiveKind::Decimal => "BigDecimal",
        PrimitiveKind::Bool => "Boolean",
        PrimitiveKind::DateTime => "OffsetDateTime",
        PrimitiveKind::Date => "LocalDate",
        PrimitiveKind::Time => "LocalTime",
        PrimitiveKind::Uuid => "UUID",
        PrimitiveKind::Any => "Object",
    }
}

/// (violation condition, exception message expression) pairs for one field,
/// in keyword order. Optional fields get a null guard in the condition.
fn field_checks(field: &Field) -> Vec<(String, String)> {
    let mut checks: Vec<(String, String)> = Vec::new();
    let (optional, inner) = field.target.split_optional();
    let TargetType::Primitive(kind) = inner else {
        return checks;
    };
    let name: String = field.name.to_lower_camel_case();
    let guard: String = if optional {
        format!("{name} != null && ")
    } else {
        String::new()
    };
    let constraints = &field.constraints;
    match kind {
        PrimitiveKind::Decimal => {
            if let Some(bound) = &constraints.minimum {
                let literal: String = big_decimal_literal(&bound.value, "new BigDecimal");
                let (op, label, violated) = if bound.exclusive {
                    ("<= 0", "exclusiveMinimum", "<=")
                } else {
                    ("< 0", "minimum", "<")
                };
                checks.push((
                    format!("{guard}{name}.compareTo({literal}) {op}"),
                    format!("\"{name} {violated} {label} {} - \" + {name}", bound.value),
                ));
            }
            if let Some(bound) = &constraints.maximum {
                let literal: String = big_decimal_literal(&bound.value, "new BigDecimal");
                let (op, label, violated) = if bound.exclusive {
                    (">= 0", "exclusiveMaximum", ">=")
                } else {
                    ("> 0", "maximum", ">")
                };
                checks.push((
                    format!("{guard}{name}.compareTo({literal}) {op}"),
                    format!("\"{name} {violated} {label} {} - \" + {name}", bound.value),
                ));
            }
        }
        PrimitiveKind::Int | PrimitiveKind::Long => {
            if let Some(bound) = &constraints.minimum {
                let (op, label, violated) = if bound.exclusive {
                    ("<=", "exclusiveMinimum", "<=")
                } else {
                    ("<", "minimum", "<")
                };
                checks.push((
                    format!("{guard}{name} {op} {}", bound.value),
                    format!("\"{name} {violated} {label} {} - \" + {name}", bound.value),
                ));
            }
            if let Some(bound) = &constraints.maximum {
                let (op, label, violated) = if bound.exclusive {
                    (">=", "exclusiveMaximum", ">=")
                } else {
                    (">", "maximum", ">")
                };
                checks.push((
                    format!("{guard}{name} {op} {}", bound.value),
                    format!("\"{name} {violated} {label} {} - \" + {name}", bound.value),
                ));
            }
        }
        PrimitiveKind::Str => {
            if let Some(length) = constraints.min_length {
                checks.push((
                    format!("{guard}{name}.length() < {length}"),
                    format!("\"{name} length < minLength {length} - \" + {name}"),
                ));
            }
            if let Some(length) = constraints.max_length {
                checks.push((
                    format!("{guard}{name}.length() > {length}"),
                    format!("\"{name} length > maxLength {length} - \" + {name}"),
                ));
            }
            if let Some(pattern) = &constraints.pattern {
                let escaped: String = escape_java_string(pattern);
                checks.push((
                    format!("{guard}!Pattern.compile(\"{escaped}\").matcher({name}).find()"),
                    format!("\"{name} does not match pattern {escaped} - \" + {name}"),
                ));
            }
            if !constraints.enum_values.is_empty() {
                let comparisons: Vec<String> = constraints
                    .enum_values
                    .iter()
                    .map(|value| format!("{name}.equals(\"{}\")", escape_java_string(value)))
                    .collect();
                checks.push((
                    format!("{guard}!({})", comparisons.join(" || ")),
                    format!("\"{name} not in enumerated values - \" + {name}"),
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

#[cfg(test)]
mod tests {
    use crate::builder;
    use crate::emitter::{self, GeneratedFile, TargetLanguage};
    use crate::model::ClassName;
    use crate::registry::CustomClassRegistry;
    use crate::schema::{DocumentSet, SchemaDocument};
    use crate::settings::GeneratorSettings;

    fn generate(
        documents: &[(&str, &str)],
        registry: &CustomClassRegistry,
        java_builders: bool,
    ) -> Vec<GeneratedFile> {
        let mut set = DocumentSet::new();
        for (uri, text) in documents {
            set.add(SchemaDocument::parse_json(uri, &[], text).expect("valid document"))
                .expect("add succeeds");
        }
        let settings = GeneratorSettings {
            target: TargetLanguage::Java,
            base_package: "com.example".to_string(),
            java_builders,
        };
        let model = builder::build(&set, registry, &settings).expect("build succeeds");
        emitter::emit(&model.graph, &settings).expect("emit succeeds")
    }

    const PRODUCT_SCHEMA: &str = r#"{
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

    #[test]
    fn product_example_bean_with_builder() {
        let files: Vec<GeneratedFile> = generate(
            &[("test.schema.json", PRODUCT_SCHEMA)],
            &CustomClassRegistry::new(),
            true,
        );
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].locator.slash_path(), "com/example/Test.java");

        let expected: &str = r#"// Generated by json-class-gen. Do not edit manually.

package com.example;

import java.math.BigDecimal;
import java.util.List;

public class Test {

    private final BigDecimal id;
    private final String name;
    private final BigDecimal price;
    private final List<String> tags;
    private final Stock stock;

    public Test(
            BigDecimal id,
            String name,
            BigDecimal price,
            List<String> tags,
            Stock stock
    ) {
        if (id == null)
            throw new IllegalArgumentException("Must not be null - id");
        this.id = id;
        if (name == null)
            throw new IllegalArgumentException("Must not be null - name");
        this.name = name;
        if (price == null)
            throw new IllegalArgumentException("Must not be null - price");
        if (price.compareTo(BigDecimal.ZERO) < 0)
            throw new IllegalArgumentException("price < minimum 0 - " + price);
        this.price = price;
        this.tags = tags;
        this.stock = stock;
    }

    /**
     * Product identifier
     */
    public BigDecimal getId() {
        return id;
    }

    /**
     * Name of the product
     */
    public String getName() {
        return name;
    }

    public BigDecimal getPrice() {
        return price;
    }

    public List<String> getTags() {
        return tags;
    }

    public Stock getStock() {
        return stock;
    }

    @Override
    public boolean equals(Object other) {
        if (this == other)
            return true;
        if (!(other instanceof Test))
            return false;
        Test typedOther = (Test)other;
        if (!id.equals(typedOther.id))
            return false;
        if (!name.equals(typedOther.name))
            return false;
        if (!price.equals(typedOther.price))
            return false;
        if (tags == null ? typedOther.tags != null : !tags.equals(typedOther.tags))
            return false;
        return stock == null ? typedOther.stock == null : stock.equals(typedOther.stock);
    }

    @Override
    public int hashCode() {
        int hash = id.hashCode();
        hash ^= name.hashCode();
        hash ^= price.hashCode();
        hash ^= (tags != null ? tags.hashCode() : 0);
        return hash ^ (stock != null ? stock.hashCode() : 0);
    }

    public static class Builder {

        private BigDecimal id;
        private String name;
        private BigDecimal price;
        private List<String> tags;
        private Stock stock;

        public Builder withId(BigDecimal id) {
            this.id = id;
            return this;
        }

        public Builder withName(String name) {
            this.name = name;
            return this;
        }

        public Builder withPrice(BigDecimal price) {
            this.price = price;
            return this;
        }

        public Builder withTags(List<String> tags) {
            this.tags = tags;
            return this;
        }

        public Builder withStock(Stock stock) {
            this.stock = stock;
            return this;
        }

        public Test build() {
            return new Test(
                    id,
                    name,
                    price,
                    tags,
                    stock
            );
        }

    }

    public static class Stock {

        private final BigDecimal warehouse;
        private final BigDecimal retail;

        public Stock(
                BigDecimal warehouse,
                BigDecimal retail
        ) {
            this.warehouse = warehouse;
            this.retail = retail;
        }

        public BigDecimal getWarehouse() {
            return warehouse;
        }

        public BigDecimal getRetail() {
            return retail;
        }

        @Override
        public boolean equals(Object other) {
            if (this == other)
                return true;
            if (!(other instanceof Stock))
                return false;
            Stock typedOther = (Stock)other;
            if (warehouse == null ? typedOther.warehouse != null : !warehouse.equals(typedOther.warehouse))
                return false;
            return retail == null ? typedOther.retail == null : retail.equals(typedOther.retail);
        }

        @Override
        public int hashCode() {
            int hash = (warehouse != null ? warehouse.hashCode() : 0);
            return hash ^ (retail != null ? retail.hashCode() : 0);
        }

    }

}
"#;
        assert_eq!(expected, files[0].text, "expected output to match exactly");
    }

    #[test]
    fn custom_class_by_extension_in_java() {
        let schema: &str = r#"{
            "description": "Test custom class.",
            "type": "object",
            "required": ["aaa"],
            "properties": {
                "aaa": { "type": "string", "x-test": "money", "minLength": 1 },
                "bbb": { "type": "string", "x-test": "money" }
            }
        }"#;
        let mut registry = CustomClassRegistry::new();
        registry
            .add_by_extension("x-test", "money", ClassName::parse("com.example.util.Money"))
            .expect("registration succeeds");
        let files: Vec<GeneratedFile> =
            generate(&[("test-custom.schema.json", schema)], &registry, false);

        let expected: &str = r#"// Generated by json-class-gen. Do not edit manually.

package com.example;

import com.example.util.Money;

/**
 * Test custom class.
 */
public class TestCustom {

    private final Money aaa;
    private final Money bbb;

    public TestCustom(
            Money aaa,
            Money bbb
    ) {
        if (aaa == null)
            throw new IllegalArgumentException("Must not be null - aaa");
        this.aaa = aaa;
        this.bbb = bbb;
    }

    public Money getAaa() {
        return aaa;
    }

    public Money getBbb() {
        return bbb;
    }

    @Override
    public boolean equals(Object other) {
        if (this == other)
            return true;
        if (!(other instanceof TestCustom))
            return false;
        TestCustom typedOther = (TestCustom)other;
        if (!aaa.equals(typedOther.aaa))
            return false;
        return bbb == null ? typedOther.bbb == null : bbb.equals(typedOther.bbb);
    }

    @Override
    public int hashCode() {
        int hash = aaa.hashCode();
        return hash ^ (bbb != null ? bbb.hashCode() : 0);
    }

}
"#;
        assert_eq!(expected, files[0].text, "expected output to match exactly");
    }

    #[test]
    fn string_and_integer_checks_with_pattern_import() {
        let schema: &str = r#"{
            "title": "Code",
            "type": "object",
            "required": ["code"],
            "properties": {
                "code": { "type": "string", "minLength": 2, "pattern": "^[A-Z]+$" },
                "count": { "type": "integer", "minimum": 0 }
            }
        }"#;
        let files: Vec<GeneratedFile> =
            generate(&[("code.schema.json", schema)], &CustomClassRegistry::new(), false);

        let expected: &str = r#"// Generated by json-class-gen. Do not edit manually.

package com.example;

import java.util.regex.Pattern;

public class Code {

    private final String code;
    private final Integer count;

    public Code(
            String code,
            Integer count
    ) {
        if (code == null)
            throw new IllegalArgumentException("Must not be null - code");
        if (code.length() < 2)
            throw new IllegalArgumentException("code length < minLength 2 - " + code);
        if (!Pattern.compile("^[A-Z]+$").matcher(code).find())
            throw new IllegalArgumentException("code does not match pattern ^[A-Z]+$ - " + code);
        this.code = code;
        if (count != null && count < 0)
            throw new IllegalArgumentException("count < minimum 0 - " + count);
        this.count = count;
    }

    public String getCode() {
        return code;
    }

    public Integer getCount() {
        return count;
    }

    @Override
    public boolean equals(Object other) {
        if (this == other)
            return true;
        if (!(other instanceof Code))
            return false;
        Code typedOther = (Code)other;
        if (!code.equals(typedOther.code))
            return false;
        return count == null ? typedOther.count == null : count.equals(typedOther.count);
    }

    @Override
    public int hashCode() {
        int hash = code.hashCode();
        return hash ^ (count != null ? count.hashCode() : 0);
    }

}
"#;
        assert_eq!(expected, files[0].text, "expected output to match exactly");
    }
}

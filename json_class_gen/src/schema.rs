//! Parsed JSON Schema model.
//!
//! Each node carries its identity (document URI + RFC 6901 pointer) so that
//! `$ref` resolution and type de-duplication work off canonical locations.
//! Property declaration order is preserved (serde_json `preserve_order`),
//! because generated field order must equal schema property order.
//!
//! Keyword access is capability-style: the builder asks for `format()`,
//! `extension(keyword)` and so on, never for raw JSON by string key.

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::error::ClassGenError;
use crate::json_pointer;

/// Composition keywords the builder degrades to an unconstrained type.
const UNSUPPORTED_KEYWORDS: &[&str] = &["oneOf", "anyOf", "allOf", "not", "if", "then", "else"];

/// Declared `type` keyword of a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Object,
    Array,
    Str,
    Number,
    Integer,
    Boolean,
    Null,
    /// A tag outside the JSON Schema vocabulary, surfaced verbatim.
    Other(String),
}

impl TypeTag {
    fn parse(tag: &str) -> Self {
        match tag {
            "object" => Self::Object,
            "array" => Self::Array,
            "string" => Self::Str,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            other => Self::Other(other.to_string()),
        }
    }
}

/// The `type` keyword: absent, a single tag, or a union array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeDecl {
    #[default]
    None,
    Single(TypeTag),
    Union(Vec<String>),
}

/// Raw keyword bag, deserialized straight off the document.
/// Only the keywords the generator consumes are named; everything else
/// lands in `rest` (extension keywords, composition keywords, noise).
#[derive(Debug, Deserialize, Default)]
struct RawSchema {
    #[serde(rename = "$ref", default)]
    reference: Option<String>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(rename = "type", default)]
    type_decl: Option<Value>,

    #[serde(default)]
    properties: Option<Map<String, Value>>,

    #[serde(default)]
    required: Option<Vec<String>>,

    #[serde(default)]
    items: Option<Value>,

    #[serde(rename = "$defs", default)]
    defs: Option<Map<String, Value>>,

    #[serde(default)]
    definitions: Option<Map<String, Value>>,

    #[serde(default)]
    format: Option<String>,

    #[serde(default)]
    minimum: Option<Number>,

    #[serde(default)]
    maximum: Option<Number>,

    #[serde(rename = "exclusiveMinimum", default)]
    exclusive_minimum: Option<Value>,

    #[serde(rename = "exclusiveMaximum", default)]
    exclusive_maximum: Option<Value>,

    #[serde(rename = "minLength", default)]
    min_length: Option<u64>,

    #[serde(rename = "maxLength", default)]
    max_length: Option<u64>,

    #[serde(rename = "enum", default)]
    enum_values: Option<Vec<Value>>,

    #[serde(default)]
    pattern: Option<String>,

    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// One parsed schema node, identified by document URI plus JSON Pointer.
#[derive(Debug)]
pub struct SchemaNode {
    uri: String,
    pointer: String,
    title: Option<String>,
    description: Option<String>,
    type_decl: TypeDecl,
    reference: Option<String>,
    properties: Vec<(String, SchemaNode)>,
    required: Vec<String>,
    items: Option<Box<SchemaNode>>,
    defs: Vec<(String, SchemaNode)>,
    format: Option<String>,
    minimum: Option<Number>,
    maximum: Option<Number>,
    exclusive_minimum: Option<Value>,
    exclusive_maximum: Option<Value>,
    min_length: Option<u64>,
    max_length: Option<u64>,
    pattern: Option<String>,
    enum_values: Option<Vec<Value>>,
    extensions: Vec<(String, Value)>,
    unsupported: Vec<String>,
}

impl SchemaNode {
    /// Parses a schema node (and all children) from a JSON value.
    ///
    /// Boolean schemas (`true`/`false`) parse as empty, unconstrained nodes.
    ///
    /// # Errors
    ///
    /// Returns `ClassGenError` if the value is neither an object nor a
    /// boolean, or a known keyword carries a malformed value.
    pub fn from_value(value: &Value, uri: &str, pointer: String) -> Result<Self, ClassGenError> {
        let raw: RawSchema = match value {
            Value::Object(_) => serde_json::from_value(value.clone())?,
            Value::Bool(_) => RawSchema::default(),
            _ => {
                return Err(ClassGenError::GenericError(format!(
                    "schema at {uri}#{pointer} is neither an object nor a boolean"
                )));
            }
        };

        let type_decl: TypeDecl = match &raw.type_decl {
            None => TypeDecl::None,
            Some(Value::String(tag)) => TypeDecl::Single(TypeTag::parse(tag)),
            Some(Value::Array(tags)) => TypeDecl::Union(
                tags.iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect(),
            ),
            Some(_) => TypeDecl::None,
        };

        let mut properties: Vec<(String, SchemaNode)> = Vec::new();
        if let Some(raw_properties) = &raw.properties {
            let base: String = json_pointer::format(&pointer, "properties");
            for (name, child) in raw_properties {
                let child_pointer: String = json_pointer::format(&base, name);
                properties.push((name.clone(), Self::from_value(child, uri, child_pointer)?));
            }
        }

        let mut defs: Vec<(String, SchemaNode)> = Vec::new();
        for (keyword, raw_defs) in [("$defs", &raw.defs), ("definitions", &raw.definitions)] {
            if let Some(raw_defs) = raw_defs {
                let base: String = json_pointer::format(&pointer, keyword);
                for (name, child) in raw_defs {
                    let child_pointer: String = json_pointer::format(&base, name);
                    defs.push((name.clone(), Self::from_value(child, uri, child_pointer)?));
                }
            }
        }

        let mut unsupported: Vec<String> = Vec::new();
        let items: Option<Box<SchemaNode>> = match &raw.items {
            None => None,
            Some(Value::Array(_)) => {
                // Tuple-form items; degrades to an unconstrained element type.
                unsupported.push("items".to_string());
                None
            }
            Some(child) => {
                let child_pointer: String = json_pointer::format(&pointer, "items");
                Some(Box::new(Self::from_value(child, uri, child_pointer)?))
            }
        };

        let mut extensions: Vec<(String, Value)> = Vec::new();
        for (key, value) in &raw.rest {
            if key.starts_with("x-") {
                extensions.push((key.clone(), value.clone()));
            } else if UNSUPPORTED_KEYWORDS.contains(&key.as_str()) {
                unsupported.push(key.clone());
            }
        }
        if matches!(type_decl, TypeDecl::Union(_)) {
            unsupported.push("type".to_string());
        }

        Ok(Self {
            uri: uri.to_string(),
            pointer,
            title: raw.title,
            description: raw.description,
            type_decl,
            reference: raw.reference,
            properties,
            required: raw.required.unwrap_or_default(),
            items,
            defs,
            format: raw.format,
            minimum: raw.minimum,
            maximum: raw.maximum,
            exclusive_minimum: raw.exclusive_minimum,
            exclusive_maximum: raw.exclusive_maximum,
            min_length: raw.min_length,
            max_length: raw.max_length,
            pattern: raw.pattern,
            enum_values: raw.enum_values,
            extensions,
            unsupported,
        })
    }

    /// Walks pointer segments to a descendant schema node.
    ///
    /// Only schema locations are addressable: `properties/<name>`,
    /// `$defs/<name>`, `definitions/<name>`, and `items`.
    #[must_use]
    pub fn navigate(&self, segments: &[String]) -> Option<&Self> {
        let mut node: &Self = self;
        let mut index: usize = 0;
        while index < segments.len() {
            match segments[index].as_str() {
                "properties" => {
                    let name: &String = segments.get(index + 1)?;
                    node = node
                        .properties
                        .iter()
                        .find(|(property, _)| property == name)
                        .map(|(_, child)| child)?;
                    index += 2;
                }
                "$defs" | "definitions" => {
                    let name: &String = segments.get(index + 1)?;
                    node = node
                        .defs
                        .iter()
                        .find(|(def, _)| def == name)
                        .map(|(_, child)| child)?;
                    index += 2;
                }
                "items" => {
                    node = node.items.as_deref()?;
                    index += 1;
                }
                _ => return None,
            }
        }
        Some(node)
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Schema location as `URI#pointer`, for warnings and errors.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}#{}", self.uri, self.pointer)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn type_decl(&self) -> &TypeDecl {
        &self.type_decl
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> &[(String, SchemaNode)] {
        &self.properties
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    #[must_use]
    pub fn items(&self) -> Option<&SchemaNode> {
        self.items.as_deref()
    }

    #[must_use]
    pub fn defs(&self) -> &[(String, SchemaNode)] {
        &self.defs
    }

    /// Effective `format` keyword, including non-standard formats surfaced
    /// verbatim by the document.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Value of an `x-*` extension keyword, if present.
    #[must_use]
    pub fn extension(&self, keyword: &str) -> Option<&Value> {
        self.extensions
            .iter()
            .find(|(key, _)| key == keyword)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn minimum(&self) -> Option<&Number> {
        self.minimum.as_ref()
    }

    #[must_use]
    pub fn maximum(&self) -> Option<&Number> {
        self.maximum.as_ref()
    }

    /// Raw `exclusiveMinimum`: a number (draft 2020-12) or a boolean
    /// modifier on `minimum` (draft 4).
    #[must_use]
    pub fn exclusive_minimum(&self) -> Option<&Value> {
        self.exclusive_minimum.as_ref()
    }

    #[must_use]
    pub fn exclusive_maximum(&self) -> Option<&Value> {
        self.exclusive_maximum.as_ref()
    }

    #[must_use]
    pub fn min_length(&self) -> Option<u64> {
        self.min_length
    }

    #[must_use]
    pub fn max_length(&self) -> Option<u64> {
        self.max_length
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    #[must_use]
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref()
    }

    /// Keywords present on this node that the builder cannot model.
    #[must_use]
    pub fn unsupported_keywords(&self) -> &[String] {
        &self.unsupported
    }
}

/// One parsed schema document plus the hints the generator derives from
/// where the document came from.
#[derive(Debug)]
pub struct SchemaDocument {
    uri: String,
    alias: Option<String>,
    package_hint: Vec<String>,
    name_hint: String,
    root: SchemaNode,
}

impl SchemaDocument {
    /// Parses a schema document from JSON text.
    ///
    /// The document registers under its `$id` when it declares one (the
    /// supplied URI is kept as an alias); `package_hint` contributes path
    /// segments under the configured base package.
    ///
    /// # Errors
    ///
    /// Returns `ClassGenError` if the text is not valid JSON or the root is
    /// not a schema object.
    pub fn parse_json(
        uri: &str,
        package_hint: &[String],
        text: &str,
    ) -> Result<Self, ClassGenError> {
        let value: Value = serde_json::from_str(text)?;
        let declared_id: Option<String> = value
            .as_object()
            .and_then(|object| object.get("$id"))
            .and_then(Value::as_str)
            .map(String::from);
        let (canonical, alias): (String, Option<String>) = match declared_id {
            Some(id) if id != uri => (id, Some(uri.to_string())),
            _ => (uri.to_string(), None),
        };
        let root: SchemaNode = SchemaNode::from_value(&value, &canonical, String::new())?;
        Ok(Self {
            name_hint: name_hint_from_uri(&canonical, alias.as_deref()),
            uri: canonical,
            alias,
            package_hint: package_hint.to_vec(),
            root,
        })
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn package_hint(&self) -> &[String] {
        &self.package_hint
    }

    /// Class name fallback when the root schema has no `title`.
    #[must_use]
    pub fn name_hint(&self) -> &str {
        &self.name_hint
    }

    #[must_use]
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }
}

/// Derives a name hint from the last path segment of a document URI,
/// preferring the alias (file path) over a bare `$id`.
fn name_hint_from_uri(uri: &str, alias: Option<&str>) -> String {
    let source: &str = alias.unwrap_or(uri);
    let stem: &str = source.rsplit('/').next().unwrap_or(source);
    let stem: &str = stem.strip_suffix(".json").unwrap_or(stem);
    let stem: &str = stem.strip_suffix(".schema").unwrap_or(stem);
    stem.to_string()
}

/// All documents participating in one generation run, indexed by canonical
/// URI (and file-path alias) for cross-document `$ref` resolution.
#[derive(Debug, Default)]
pub struct DocumentSet {
    documents: Vec<SchemaDocument>,
    by_uri: HashMap<String, usize>,
}

impl DocumentSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document. Documents generate in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ClassGenError` if another document already claims the same
    /// URI.
    pub fn add(&mut self, document: SchemaDocument) -> Result<(), ClassGenError> {
        let index: usize = self.documents.len();
        for key in std::iter::once(document.uri.as_str()).chain(document.alias.as_deref()) {
            if self.by_uri.contains_key(key) {
                return Err(ClassGenError::GenericError(format!(
                    "duplicate document URI {key}"
                )));
            }
        }
        self.by_uri.insert(document.uri.clone(), index);
        if let Some(alias) = &document.alias {
            self.by_uri.insert(alias.clone(), index);
        }
        self.documents.push(document);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaDocument> {
        self.documents.iter()
    }

    #[must_use]
    pub fn lookup(&self, uri: &str) -> Option<&SchemaDocument> {
        self.by_uri.get(uri).map(|&index| &self.documents[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SchemaNode {
        let value: Value = serde_json::from_str(text).expect("valid JSON");
        SchemaNode::from_value(&value, "https://example.com/schema/test", String::new())
            .expect("valid schema")
    }

    #[test]
    fn property_declaration_order_is_preserved() {
        let node: SchemaNode = parse(
            r#"{
                "type": "object",
                "properties": {
                    "zebra": { "type": "string" },
                    "apple": { "type": "string" },
                    "mango": { "type": "string" }
                }
            }"#,
        );
        let names: Vec<&str> = node.properties().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["zebra", "apple", "mango"],
            "property order must match the document, not alphabetical order"
        );
    }

    #[test]
    fn child_nodes_carry_pointer_identity() {
        let node: SchemaNode = parse(
            r#"{
                "type": "object",
                "properties": {
                    "stock": {
                        "type": "object",
                        "properties": { "retail": { "type": "number" } }
                    }
                }
            }"#,
        );
        let stock: &SchemaNode = &node.properties()[0].1;
        assert_eq!(stock.pointer(), "/properties/stock");
        let retail: &SchemaNode = &stock.properties()[0].1;
        assert_eq!(retail.pointer(), "/properties/stock/properties/retail");
        assert_eq!(retail.uri(), "https://example.com/schema/test");
    }

    #[test]
    fn extension_keywords_surface_verbatim() {
        let node: SchemaNode = parse(r#"{ "type": "string", "x-test": "money" }"#);
        assert_eq!(node.extension("x-test"), Some(&Value::String("money".to_string())));
        assert_eq!(node.extension("x-other"), None);
    }

    #[test]
    fn nonstandard_format_surfaces_verbatim() {
        let node: SchemaNode = parse(r#"{ "type": "string", "format": "money" }"#);
        assert_eq!(node.format(), Some("money"));
    }

    #[test]
    fn composition_keywords_are_collected_not_fatal() {
        let node: SchemaNode = parse(r#"{ "oneOf": [ { "type": "string" } ] }"#);
        assert_eq!(node.unsupported_keywords(), &["oneOf".to_string()]);
    }

    #[test]
    fn union_type_is_collected_as_unsupported() {
        let node: SchemaNode = parse(r#"{ "type": ["string", "null"] }"#);
        assert!(matches!(node.type_decl(), TypeDecl::Union(_)));
        assert_eq!(node.unsupported_keywords(), &["type".to_string()]);
    }

    #[test]
    fn boolean_schema_parses_as_unconstrained() {
        let value: Value = serde_json::from_str("true").expect("valid JSON");
        let node: SchemaNode =
            SchemaNode::from_value(&value, "https://example.com/schema/test", String::new())
                .expect("boolean schema is a valid schema");
        assert_eq!(*node.type_decl(), TypeDecl::None);
        assert!(node.properties().is_empty());
    }

    #[test]
    fn navigate_through_defs_and_properties() {
        let node: SchemaNode = parse(
            r#"{
                "type": "object",
                "$defs": {
                    "stock": {
                        "type": "object",
                        "properties": { "retail": { "type": "number" } }
                    }
                }
            }"#,
        );
        let segments: Vec<String> = crate::json_pointer::parse("/$defs/stock/properties/retail")
            .expect("valid pointer");
        let retail: &SchemaNode = node.navigate(&segments).expect("target exists");
        assert_eq!(retail.pointer(), "/$defs/stock/properties/retail");
        assert!(node.navigate(&["nope".to_string()]).is_none());
    }

    #[test]
    fn navigate_items() {
        let node: SchemaNode = parse(
            r#"{ "type": "array", "items": { "type": "string" } }"#,
        );
        let segments: Vec<String> = crate::json_pointer::parse("/items").expect("valid pointer");
        let items: &SchemaNode = node.navigate(&segments).expect("target exists");
        assert_eq!(items.pointer(), "/items");
    }

    #[test]
    fn document_prefers_declared_id_and_keeps_alias() {
        let mut documents = DocumentSet::new();
        let document: SchemaDocument = SchemaDocument::parse_json(
            "schemas/person.schema.json",
            &[],
            r#"{ "$id": "https://example.com/schema/person", "type": "object",
                 "properties": { "name": { "type": "string" } } }"#,
        )
        .expect("valid document");
        assert_eq!(document.uri(), "https://example.com/schema/person");
        assert_eq!(document.name_hint(), "person");
        documents.add(document).expect("first add succeeds");
        assert!(documents.lookup("https://example.com/schema/person").is_some());
        assert!(documents.lookup("schemas/person.schema.json").is_some());
    }

    #[test]
    fn duplicate_document_uri_is_rejected() {
        let mut documents = DocumentSet::new();
        let text: &str = r#"{ "$id": "https://example.com/schema/person", "type": "object" }"#;
        documents
            .add(SchemaDocument::parse_json("a.json", &[], text).expect("valid"))
            .expect("first add succeeds");
        let error = documents
            .add(SchemaDocument::parse_json("b.json", &[], text).expect("valid"))
            .expect_err("second add must fail");
        assert!(error.to_string().contains("duplicate document URI"));
    }
}

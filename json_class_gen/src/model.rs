//! The language-neutral class model produced by the builder and consumed by
//! every emitter.
//!
//! The Type Graph is an arena of class definitions indexed by `TypeKey` (the
//! canonical schema location that introduced the type). Inter-class
//! references are `ClassRef` index lookups rather than owned values, so
//! recursive schemas produce cyclic reference structure without cyclic
//! ownership.

use serde_json::Number;
use std::collections::HashMap;

/// Canonical schema-node identity that first required a generated class.
/// The de-duplication unit of the Type Graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub uri: String,
    pub pointer: String,
}

impl TypeKey {
    #[must_use]
    pub fn new(uri: &str, pointer: &str) -> Self {
        Self {
            uri: uri.to_string(),
            pointer: pointer.to_string(),
        }
    }
}

/// Index of a class definition within the Type Graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

/// An externally-defined type substituted for a generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    pub name: String,
    pub package: String,
}

impl ClassName {
    /// Splits a fully-qualified dotted name into package and simple name.
    /// A name without dots has an empty package.
    #[must_use]
    pub fn parse(fully_qualified: &str) -> Self {
        match fully_qualified.rsplit_once('.') {
            Some((package, name)) => Self {
                name: name.to_string(),
                package: package.to_string(),
            },
            None => Self {
                name: fully_qualified.to_string(),
                package: String::new(),
            },
        }
    }

    #[must_use]
    pub fn from_parts(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
        }
    }

    /// `package.Name`, or just `Name` when the package is empty.
    #[must_use]
    pub fn qualified(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

/// Scalar kinds, keyed by declared schema type plus `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Str,
    /// `integer`.
    Int,
    /// `integer` with `format: int64`.
    Long,
    /// `number`.
    Decimal,
    Bool,
    /// `string` with `format: date-time`.
    DateTime,
    /// `string` with `format: date`.
    Date,
    /// `string` with `format: time`.
    Time,
    /// `string` with `format: uuid`.
    Uuid,
    /// Degraded or unknown; unconstrained in every target language.
    Any,
}

/// The type of a generated field. A closed sum: every emitter matches
/// exhaustively, so a new variant forces every backend to be updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    Primitive(PrimitiveKind),
    /// Non-owning reference into the Type Graph.
    ClassRef(ClassId),
    CollectionOf(Box<TargetType>),
    /// Present-or-absent wrapper; each emitter renders it in its own idiom.
    Optional(Box<TargetType>),
    CustomOverride(ClassName),
}

impl TargetType {
    /// Strips one `Optional` layer, returning (was optional, inner type).
    #[must_use]
    pub fn split_optional(&self) -> (bool, &TargetType) {
        match self {
            Self::Optional(inner) => (true, inner),
            other => (false, other),
        }
    }
}

/// One inclusive-or-exclusive numeric bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberBound {
    pub value: Number,
    pub exclusive: bool,
}

/// Language-agnostic validation constraints attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    /// Derived from the enclosing object's `required` list, never from the
    /// field's own schema.
    pub non_null: bool,
    pub minimum: Option<NumberBound>,
    pub maximum: Option<NumberBound>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    /// All-string enumerated values; empty when absent or degraded.
    pub enum_values: Vec<String>,
}

impl ConstraintSet {
    /// True when no value-range check would be emitted (non-null aside).
    #[must_use]
    pub fn has_value_checks(&self) -> bool {
        self.minimum.is_some()
            || self.maximum.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some()
            || self.pattern.is_some()
            || !self.enum_values.is_empty()
    }
}

/// One generated field, in schema property declaration order.
#[derive(Debug)]
pub struct Field {
    /// Schema property name, exactly as declared.
    pub name: String,
    pub target: TargetType,
    pub constraints: ConstraintSet,
    pub documentation: Option<String>,
    pub required: bool,
}

/// Where a class definition sits in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Document root or `$defs` entry: gets its own output file.
    TopLevel,
    /// Inline object schema: owned by exactly one enclosing class.
    Nested { owner: ClassId },
}

/// One generated class/interface definition.
#[derive(Debug)]
pub struct ClassDef {
    pub key: TypeKey,
    /// Language-neutral PascalCase name, unique within the graph.
    pub name: String,
    /// Full package, base package plus document directory hint.
    pub package: String,
    pub documentation: Option<String>,
    pub fields: Vec<Field>,
    pub placement: Placement,
    /// Nested classes in introduction order.
    pub nested: Vec<ClassId>,
}

/// Arena of class definitions for one generation run.
#[derive(Debug, Default)]
pub struct TypeGraph {
    classes: Vec<ClassDef>,
    index: HashMap<TypeKey, ClassId>,
}

impl TypeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing class for a schema location, in-progress classes included.
    #[must_use]
    pub fn lookup(&self, key: &TypeKey) -> Option<ClassId> {
        self.index.get(key).copied()
    }

    /// Allocates a class before its fields are built, so that revisiting a
    /// node on the walk stack resolves to a `ClassRef` instead of recursing
    /// forever.
    pub fn allocate(&mut self, class: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len());
        self.index.insert(class.key.clone(), id);
        self.classes.push(class);
        id
    }

    pub fn set_fields(&mut self, id: ClassId, fields: Vec<Field>) {
        self.classes[id.0].fields = fields;
    }

    pub fn add_nested(&mut self, owner: ClassId, nested: ClassId) {
        self.classes[owner.0].nested.push(nested);
    }

    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.0]
    }

    /// All classes in introduction order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(index, class)| (ClassId(index), class))
    }

    /// Top-level classes in introduction order; one output file each.
    pub fn top_level(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> {
        self.iter()
            .filter(|(_, class)| class.placement == Placement::TopLevel)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// True if any class name is already taken (used for collision suffixes).
    #[must_use]
    pub fn name_taken(&self, name: &str) -> bool {
        self.classes.iter().any(|class| class.name == name)
    }
}

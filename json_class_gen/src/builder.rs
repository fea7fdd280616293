//! The schema-to-model compiler: a depth-first walk of the schema graph
//! producing the Type Graph every emitter consumes.
//!
//! De-duplication and cycle safety hang on one rule: a class is allocated
//! in the graph (and indexed by its `TypeKey`) before its fields are built,
//! so any revisit — a second `$ref` to the same location, or a recursive
//! schema revisiting a node still on the walk stack — resolves to a
//! `ClassRef` of the existing id instead of descending again.

use heck::ToUpperCamelCase;
use std::collections::HashSet;
use tracing::warn;

use crate::constraints;
use crate::error::{ClassGenError, GenerationWarning, WarningKind};
use crate::model::{
    ClassDef, ClassId, ConstraintSet, Field, Placement, PrimitiveKind, TargetType, TypeGraph,
    TypeKey,
};
use crate::registry::CustomClassRegistry;
use crate::resolver::Resolver;
use crate::schema::{DocumentSet, SchemaNode, TypeDecl, TypeTag};
use crate::settings::GeneratorSettings;

/// The result of one build: the Type Graph plus everything that degraded
/// along the way.
#[derive(Debug)]
pub struct ClassModel {
    pub graph: TypeGraph,
    pub warnings: Vec<GenerationWarning>,
}

/// Builds the Type Graph for every document in the set.
///
/// Document roots with an object shape become top-level classes, as do
/// their object-shaped `$defs`; everything else participates through
/// `$ref` targets.
///
/// # Errors
///
/// Returns `UnresolvedReference` for a dangling `$ref`, or a generic error
/// when a `$ref` chain is circular or no document yields any class.
pub fn build(
    documents: &DocumentSet,
    registry: &CustomClassRegistry,
    settings: &GeneratorSettings,
) -> Result<ClassModel, ClassGenError> {
    let mut builder = ModelBuilder {
        documents,
        registry,
        settings,
        resolver: Resolver::new(documents),
        graph: TypeGraph::new(),
        warnings: Vec::new(),
    };
    builder.run()?;
    if builder.graph.is_empty() {
        return Err(ClassGenError::GenericError(
            "no classes to generate (no document has an object root or object $defs)".to_string(),
        ));
    }
    Ok(ClassModel {
        graph: builder.graph,
        warnings: builder.warnings,
    })
}

struct ModelBuilder<'a> {
    documents: &'a DocumentSet,
    registry: &'a CustomClassRegistry,
    settings: &'a GeneratorSettings,
    resolver: Resolver<'a>,
    graph: TypeGraph,
    warnings: Vec<GenerationWarning>,
}

impl<'a> ModelBuilder<'a> {
    fn run(&mut self) -> Result<(), ClassGenError> {
        let documents: &'a DocumentSet = self.documents;
        for document in documents.iter() {
            let root: &'a SchemaNode = document.root();
            if self.registry.lookup(root).is_none() && is_object_shaped(root) {
                self.class_for_node(root, document.name_hint(), None)?;
            }
            for (name, def) in root.defs() {
                if self.registry.lookup(def).is_none() && is_object_shaped(def) {
                    self.class_for_node(def, name, None)?;
                }
            }
        }
        Ok(())
    }

    /// Resolves one schema node to a Target Type. `$ref`s are followed
    /// first; the decision procedure then applies to the resolved node, so
    /// a `$ref` never introduces a Type Key distinct from its target.
    fn resolve_type(
        &mut self,
        node: &'a SchemaNode,
        hint: &str,
        owner: Option<ClassId>,
    ) -> Result<TargetType, ClassGenError> {
        let mut node: &'a SchemaNode = node;
        let mut reference_hint: Option<String> = None;
        if node.reference().is_some() {
            let mut visited: HashSet<(String, String)> = HashSet::new();
            while let Some(reference) = node.reference() {
                if !visited.insert((node.uri().to_string(), node.pointer().to_string())) {
                    return Err(ClassGenError::GenericError(format!(
                        "circular $ref chain at {}",
                        node.location()
                    )));
                }
                node = self.resolver.resolve(reference, node.uri())?;
            }
            reference_hint = Some(self.hint_for_target(node));
        }
        let hint: &str = reference_hint.as_deref().unwrap_or(hint);

        if let Some(class) = self.registry.lookup(node) {
            return Ok(TargetType::CustomOverride(class.clone()));
        }

        if !node.unsupported_keywords().is_empty() {
            for keyword in node.unsupported_keywords() {
                let warning = GenerationWarning {
                    path: node.location(),
                    kind: WarningKind::UnsupportedConstruct(keyword.clone()),
                };
                warn!("{warning}");
                self.warnings.push(warning);
            }
            return Ok(TargetType::Primitive(PrimitiveKind::Any));
        }

        match effective_tag(node) {
            Some(TypeTag::Object) => {
                let id: ClassId = self.class_for_node(node, hint, owner)?;
                Ok(TargetType::ClassRef(id))
            }
            Some(TypeTag::Array) => {
                let element: TargetType = match node.items() {
                    Some(items) => self.resolve_type(items, hint, owner)?,
                    None => TargetType::Primitive(PrimitiveKind::Any),
                };
                Ok(TargetType::CollectionOf(Box::new(element)))
            }
            Some(TypeTag::Str) => Ok(TargetType::Primitive(string_kind(node.format()))),
            Some(TypeTag::Integer) => Ok(TargetType::Primitive(integer_kind(node.format()))),
            Some(TypeTag::Number) => Ok(TargetType::Primitive(PrimitiveKind::Decimal)),
            Some(TypeTag::Boolean) => Ok(TargetType::Primitive(PrimitiveKind::Bool)),
            Some(TypeTag::Null) | None => Ok(TargetType::Primitive(PrimitiveKind::Any)),
            Some(TypeTag::Other(tag)) => {
                self.push_warning(node, WarningKind::UnknownType(tag));
                Ok(TargetType::Primitive(PrimitiveKind::Any))
            }
        }
    }

    /// Builds (or finds) the class for an object-shaped node.
    fn class_for_node(
        &mut self,
        node: &'a SchemaNode,
        hint: &str,
        owner: Option<ClassId>,
    ) -> Result<ClassId, ClassGenError> {
        let key = TypeKey::new(node.uri(), node.pointer());
        if let Some(id) = self.graph.lookup(&key) {
            return Ok(id);
        }

        let placement: Placement = match owner {
            Some(owner_id) if !is_top_level_location(node.pointer()) => {
                Placement::Nested { owner: owner_id }
            }
            _ => Placement::TopLevel,
        };
        let name: String = self.unique_class_name(node.title().unwrap_or(hint));
        let id: ClassId = self.graph.allocate(ClassDef {
            key,
            name,
            package: self.package_for(node.uri()),
            documentation: node.description().map(String::from),
            fields: Vec::new(),
            placement,
            nested: Vec::new(),
        });
        if let Placement::Nested { owner } = placement {
            self.graph.add_nested(owner, id);
        }

        let mut fields: Vec<Field> = Vec::new();
        for (property, property_schema) in node.properties() {
            let required: bool = node.required().iter().any(|name| name == property);
            let target: TargetType = self.resolve_type(property_schema, property, Some(id))?;
            let overridden: bool = matches!(target, TargetType::CustomOverride(_));
            let constraints: ConstraintSet =
                constraints::translate(property_schema, required, overridden, &mut self.warnings);
            let target: TargetType = if required {
                target
            } else {
                TargetType::Optional(Box::new(target))
            };
            fields.push(Field {
                name: property.clone(),
                target,
                constraints,
                documentation: property_schema.description().map(String::from),
                required,
            });
        }
        // Names in `required` with no property schema are deliberate in some
        // schemas; they become implicit unconstrained non-null fields.
        for name in node.required() {
            if !node.properties().iter().any(|(property, _)| property == name) {
                self.push_warning(node, WarningKind::RequiredPropertyNotDeclared(name.clone()));
                fields.push(Field {
                    name: name.clone(),
                    target: TargetType::Primitive(PrimitiveKind::Any),
                    constraints: ConstraintSet {
                        non_null: true,
                        ..ConstraintSet::default()
                    },
                    documentation: None,
                    required: true,
                });
            }
        }
        self.graph.set_fields(id, fields);
        Ok(id)
    }

    /// Name hint for a `$ref` target: its title, its `$defs` key, or the
    /// owning document's name when the target is a document root.
    fn hint_for_target(&self, node: &SchemaNode) -> String {
        if let Some(title) = node.title() {
            return title.to_string();
        }
        if node.pointer().is_empty() {
            if let Some(document) = self.documents.lookup(node.uri()) {
                return document.name_hint().to_string();
            }
        }
        match node.pointer().rsplit('/').next() {
            Some(segment) if !segment.is_empty() => segment.to_string(),
            _ => "Ref".to_string(),
        }
    }

    fn unique_class_name(&self, raw: &str) -> String {
        let base: String = raw.to_upper_camel_case();
        let base: String = if base.is_empty() { "Class".to_string() } else { base };
        if !self.graph.name_taken(&base) {
            return base;
        }
        let mut counter: usize = 1;
        loop {
            let candidate: String = format!("{base}{counter}");
            if !self.graph.name_taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn package_for(&self, uri: &str) -> String {
        let mut package: String = self.settings.base_package.clone();
        if let Some(document) = self.documents.lookup(uri) {
            for segment in document.package_hint() {
                if !package.is_empty() {
                    package.push('.');
                }
                package.push_str(segment);
            }
        }
        package
    }

    fn push_warning(&mut self, node: &SchemaNode, kind: WarningKind) {
        let warning = GenerationWarning {
            path: node.location(),
            kind,
        };
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Top-level schema locations: a document root, or a direct `$defs` /
/// `definitions` entry. Everything else nests inside its enclosing class.
fn is_top_level_location(pointer: &str) -> bool {
    if pointer.is_empty() {
        return true;
    }
    ["/$defs/", "/definitions/"].iter().any(|prefix| {
        pointer
            .strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
    })
}

/// Effective type of a node, inferring `object` and `array` for untyped
/// nodes that carry the corresponding child keywords.
fn effective_tag(node: &SchemaNode) -> Option<TypeTag> {
    match node.type_decl() {
        TypeDecl::Single(tag) => Some(tag.clone()),
        TypeDecl::Union(_) => None,
        TypeDecl::None => {
            if !node.properties().is_empty() || !node.required().is_empty() {
                Some(TypeTag::Object)
            } else if node.items().is_some() {
                Some(TypeTag::Array)
            } else if node.enum_values().is_some() {
                Some(TypeTag::Str)
            } else {
                None
            }
        }
    }
}

fn is_object_shaped(node: &SchemaNode) -> bool {
    node.unsupported_keywords().is_empty() && effective_tag(node) == Some(TypeTag::Object)
}

/// Scalar kind for `string`, keyed by format.
fn string_kind(format: Option<&str>) -> PrimitiveKind {
    match format {
        Some("date-time") => PrimitiveKind::DateTime,
        Some("date") => PrimitiveKind::Date,
        Some("time") => PrimitiveKind::Time,
        Some("uuid") => PrimitiveKind::Uuid,
        _ => PrimitiveKind::Str,
    }
}

/// Scalar kind for `integer`, keyed by format.
fn integer_kind(format: Option<&str>) -> PrimitiveKind {
    match format {
        Some("int64") => PrimitiveKind::Long,
        _ => PrimitiveKind::Int,
    }
}

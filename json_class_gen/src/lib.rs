//! Generate Kotlin, Java, and TypeScript classes from JSON Schema.
//!
//! The pipeline: parsed schema documents are compiled into a Type Graph
//! (reference resolution, type de-duplication, custom class overrides,
//! constraint translation), then the selected language emitter renders one
//! file per top-level class and hands each to an [`OutputResolver`].
//!
//! A run either produces a complete, consistent set of files or fails
//! before the first file reaches the resolver; rendering happens entirely
//! up front.

mod builder;
mod constraints;
mod emitter;
mod error;
mod json_pointer;
mod model;
mod output;
mod registry;
mod resolver;
mod schema;
mod settings;
mod uri;

pub use emitter::{GeneratedFile, TargetLanguage};
pub use error::{ClassGenError, GenerationWarning, WarningKind};
pub use model::ClassName;
pub use output::{DirectoryOutput, MemoryOutput, OutputResolver, TargetFileLocator};
pub use registry::CustomClassRegistry;
pub use schema::{DocumentSet, SchemaDocument};
pub use settings::GeneratorSettings;

/// What one successful run did, beyond the files handed to the resolver.
#[derive(Debug)]
pub struct GenerationSummary {
    /// Number of files accepted by the output resolver.
    pub files: usize,
    /// Non-fatal degradations encountered while building the model.
    pub warnings: Vec<GenerationWarning>,
}

/// The schema-to-classes generator: settings plus custom class overrides.
///
/// Configure overrides before calling [`Generator::generate`]; generation
/// itself takes `&self`, so concurrent runs over independent document sets
/// can share one configured generator.
#[derive(Debug, Default)]
pub struct Generator {
    settings: GeneratorSettings,
    registry: CustomClassRegistry,
}

impl Generator {
    #[must_use]
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            registry: CustomClassRegistry::new(),
        }
    }

    /// Registers a custom class for a schema location, fully-qualified form.
    /// The location is `document#pointer`, or a bare `#/a/b` to match the
    /// pointer in any document.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` for a conflicting registration.
    pub fn add_custom_class_by_uri(
        &mut self,
        target: &str,
        fully_qualified: &str,
    ) -> Result<(), ClassGenError> {
        self.registry.add_by_uri(target, ClassName::parse(fully_qualified))
    }

    /// Registers a custom class for a schema location, split name+package
    /// form.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` for a conflicting registration.
    pub fn add_custom_class_by_uri_parts(
        &mut self,
        target: &str,
        name: &str,
        package: &str,
    ) -> Result<(), ClassGenError> {
        self.registry.add_by_uri(target, ClassName::from_parts(name, package))
    }

    /// Registers a custom class for nodes carrying `keyword: value`,
    /// fully-qualified form.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` for a conflicting registration.
    pub fn add_custom_class_by_extension(
        &mut self,
        keyword: &str,
        value: &str,
        fully_qualified: &str,
    ) -> Result<(), ClassGenError> {
        self.registry
            .add_by_extension(keyword, value, ClassName::parse(fully_qualified))
    }

    /// Registers a custom class for nodes carrying `keyword: value`, split
    /// name+package form.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` for a conflicting registration.
    pub fn add_custom_class_by_extension_parts(
        &mut self,
        keyword: &str,
        value: &str,
        name: &str,
        package: &str,
    ) -> Result<(), ClassGenError> {
        self.registry
            .add_by_extension(keyword, value, ClassName::from_parts(name, package))
    }

    /// Registers a custom class for an effective `format` value,
    /// fully-qualified form.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` for a conflicting registration.
    pub fn add_custom_class_by_format(
        &mut self,
        format: &str,
        fully_qualified: &str,
    ) -> Result<(), ClassGenError> {
        self.registry.add_by_format(format, ClassName::parse(fully_qualified))
    }

    /// Registers a custom class for an effective `format` value, split
    /// name+package form.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` for a conflicting registration.
    pub fn add_custom_class_by_format_parts(
        &mut self,
        format: &str,
        name: &str,
        package: &str,
    ) -> Result<(), ClassGenError> {
        self.registry.add_by_format(format, ClassName::from_parts(name, package))
    }

    /// Compiles every document in the set and emits the generated files to
    /// the output resolver.
    ///
    /// All rendering happens before the first file is handed over, so a
    /// failed run emits nothing.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` for a dangling `$ref`, a generic error
    /// for structurally unusable inputs, or `IoError` when the resolver
    /// rejects a file (which aborts remaining emission).
    pub fn generate(
        &self,
        documents: &DocumentSet,
        output: &mut dyn OutputResolver,
    ) -> Result<GenerationSummary, ClassGenError> {
        let model = builder::build(documents, &self.registry, &self.settings)?;
        let files: Vec<GeneratedFile> = emitter::emit(&model.graph, &self.settings)?;
        for file in &files {
            output.accept(&file.locator, &file.text)?;
        }
        Ok(GenerationSummary {
            files: files.len(),
            warnings: model.warnings,
        })
    }
}

//! Settings for class generation.

use crate::emitter::TargetLanguage;

/// Settings that control code generation behavior.
///
/// Registrations and settings must be complete before `generate` runs; the
/// generator treats them as read-only for the duration of a run.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Which language emitter runs.
    pub target: TargetLanguage,

    /// Package/namespace prefix applied to every top-level generated type,
    /// also used to compute each generated file's directory path. A
    /// document's directory hint is appended to this.
    ///
    /// **Default: empty** — types land in the default package and files in
    /// the output root.
    pub base_package: String,

    /// When true, the class-with-accessors emitter adds a fluent `Builder`
    /// to every top-level class.
    ///
    /// **Default: false (disabled).**
    pub java_builders: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            target: TargetLanguage::Kotlin,
            base_package: String::new(),
            java_builders: false,
        }
    }
}

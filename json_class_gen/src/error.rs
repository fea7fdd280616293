use std::error;
use std::fmt;

/// Error type for class generation operations.
#[derive(Debug)]
pub enum ClassGenError {
    /// Generic error with a message.
    GenericError(String),

    /// A `$ref` did not resolve to any schema node. Fatal for the whole run.
    UnresolvedReference {
        /// Document URI the reference was resolved against.
        uri: String,
        /// JSON Pointer fragment of the reference target.
        pointer: String,
    },

    /// Two custom class registrations of the same precedence tier match the
    /// same schema location. Rejected at registration time.
    DuplicateCustomClass(String),

    /// I/O error (e.g. reading a schema file, emitting a generated file).
    IoError(std::io::Error),

    /// JSON parsing error.
    JsonError(serde_json::Error),
}

impl error::Error for ClassGenError {}

impl fmt::Display for ClassGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericError(message) => write!(f, "{message}"),
            Self::UnresolvedReference { uri, pointer } => {
                write!(f, "unresolved $ref target {uri}#{pointer}")
            }
            Self::DuplicateCustomClass(message) => {
                write!(f, "duplicate custom class registration: {message}")
            }
            Self::IoError(io_error) => fmt::Display::fmt(io_error, f),
            Self::JsonError(json_error) => fmt::Display::fmt(json_error, f),
        }
    }
}

impl From<&str> for ClassGenError {
    fn from(message: &str) -> Self {
        Self::GenericError(message.to_string())
    }
}

impl From<String> for ClassGenError {
    fn from(message: String) -> Self {
        Self::GenericError(message)
    }
}

impl From<std::io::Error> for ClassGenError {
    fn from(io_error: std::io::Error) -> Self {
        Self::IoError(io_error)
    }
}

impl From<serde_json::Error> for ClassGenError {
    fn from(json_error: serde_json::Error) -> Self {
        Self::JsonError(json_error)
    }
}

/// A non-fatal condition encountered while building the class model.
///
/// Warnings never abort a run; the affected node degrades to an
/// unconstrained type and the warning is collected into the
/// `GenerationSummary` for caller visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationWarning {
    /// Schema location as `URI#pointer`.
    pub path: String,
    pub kind: WarningKind,
}

/// What degraded, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A composition keyword (`oneOf`, `anyOf`, `allOf`, ...) or a union
    /// `type` array the builder cannot model precisely.
    UnsupportedConstruct(String),

    /// A `type` tag outside the JSON Schema vocabulary.
    UnknownType(String),

    /// A `pattern` keyword that is not a valid ECMA-262 regular expression.
    InvalidPattern(String),

    /// An `enum` whose values are not all strings.
    MixedEnumValues,

    /// A name in `required` with no corresponding property schema.
    RequiredPropertyNotDeclared(String),
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::UnsupportedConstruct(keyword) => {
                write!(f, "{}: unsupported construct `{keyword}`", self.path)
            }
            WarningKind::UnknownType(tag) => {
                write!(f, "{}: unknown type `{tag}`", self.path)
            }
            WarningKind::InvalidPattern(pattern) => {
                write!(f, "{}: invalid pattern `{pattern}`", self.path)
            }
            WarningKind::MixedEnumValues => {
                write!(f, "{}: enum values are not all strings", self.path)
            }
            WarningKind::RequiredPropertyNotDeclared(name) => {
                write!(f, "{}: required property `{name}` is not declared", self.path)
            }
        }
    }
}

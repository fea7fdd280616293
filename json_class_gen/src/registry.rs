//! User-registered substitutions of externally-defined types for generated
//! classes.
//!
//! Three matcher variants, with fixed precedence: location beats extension,
//! extension beats format, format beats the auto-derived type. Within one
//! tier the first-registered entry wins, so registration order is
//! significant and preserved. Registrations that would make two same-tier
//! entries match the same schema location are rejected up front.

use serde_json::Value;

use crate::error::ClassGenError;
use crate::model::ClassName;
use crate::schema::SchemaNode;
use crate::uri;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    /// Pointer-only form matches any document; the full form matches only
    /// when the node's document URI agrees.
    Location {
        uri: Option<String>,
        pointer: String,
    },
    Extension {
        keyword: String,
        value: String,
    },
    Format {
        format: String,
    },
}

#[derive(Debug)]
struct RegistryEntry {
    matcher: Matcher,
    class: ClassName,
}

/// Append-only registry of custom class overrides. Lookups are pure.
#[derive(Debug, Default)]
pub struct CustomClassRegistry {
    entries: Vec<RegistryEntry>,
}

impl CustomClassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location-based override. The URI is `document#pointer`;
    /// a bare `#/a/b` form matches the pointer in any document.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` when an existing location entry could
    /// match the same schema location.
    pub fn add_by_uri(&mut self, target: &str, class: ClassName) -> Result<(), ClassGenError> {
        let (document, fragment) = uri::split_ref(target);
        let matcher = Matcher::Location {
            uri: (!document.is_empty()).then(|| document.to_string()),
            pointer: fragment.to_string(),
        };
        self.register(matcher, class, target)
    }

    /// Registers an extension-keyword override: matches nodes carrying
    /// `keyword: value` verbatim.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` when the (keyword, value) pair is
    /// already registered.
    pub fn add_by_extension(
        &mut self,
        keyword: &str,
        value: &str,
        class: ClassName,
    ) -> Result<(), ClassGenError> {
        let matcher = Matcher::Extension {
            keyword: keyword.to_string(),
            value: value.to_string(),
        };
        self.register(matcher, class, &format!("{keyword}={value}"))
    }

    /// Registers a format override: matches nodes whose effective `format`
    /// keyword equals the registered string.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCustomClass` when the format is already registered.
    pub fn add_by_format(&mut self, format: &str, class: ClassName) -> Result<(), ClassGenError> {
        let matcher = Matcher::Format {
            format: format.to_string(),
        };
        self.register(matcher, class, format)
    }

    fn register(
        &mut self,
        matcher: Matcher,
        class: ClassName,
        description: &str,
    ) -> Result<(), ClassGenError> {
        if self.entries.iter().any(|entry| conflicts(&entry.matcher, &matcher)) {
            return Err(ClassGenError::DuplicateCustomClass(description.to_string()));
        }
        self.entries.push(RegistryEntry { matcher, class });
        Ok(())
    }

    /// Resolves the override for a schema node, if any. Pure: depends only
    /// on the node's identity, extension keywords, and effective format.
    #[must_use]
    pub fn lookup(&self, node: &SchemaNode) -> Option<&ClassName> {
        self.lookup_location(node)
            .or_else(|| self.lookup_extension(node))
            .or_else(|| self.lookup_format(node))
    }

    fn lookup_location(&self, node: &SchemaNode) -> Option<&ClassName> {
        self.entries.iter().find_map(|entry| match &entry.matcher {
            Matcher::Location { uri, pointer }
                if pointer == node.pointer()
                    && uri.as_deref().is_none_or(|u| u == node.uri()) =>
            {
                Some(&entry.class)
            }
            _ => None,
        })
    }

    fn lookup_extension(&self, node: &SchemaNode) -> Option<&ClassName> {
        self.entries.iter().find_map(|entry| match &entry.matcher {
            Matcher::Extension { keyword, value }
                if node.extension(keyword) == Some(&Value::String(value.clone())) =>
            {
                Some(&entry.class)
            }
            _ => None,
        })
    }

    fn lookup_format(&self, node: &SchemaNode) -> Option<&ClassName> {
        self.entries.iter().find_map(|entry| match &entry.matcher {
            Matcher::Format { format } if node.format() == Some(format.as_str()) => {
                Some(&entry.class)
            }
            _ => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Two same-tier matchers conflict when some schema location could satisfy
/// both. Pointer-only and full location forms overlap whenever the pointer
/// agrees.
fn conflicts(existing: &Matcher, candidate: &Matcher) -> bool {
    match (existing, candidate) {
        (
            Matcher::Location { uri: a_uri, pointer: a_pointer },
            Matcher::Location { uri: b_uri, pointer: b_pointer },
        ) => {
            a_pointer == b_pointer
                && match (a_uri, b_uri) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                }
        }
        (
            Matcher::Extension { keyword: a_keyword, value: a_value },
            Matcher::Extension { keyword: b_keyword, value: b_value },
        ) => a_keyword == b_keyword && a_value == b_value,
        (Matcher::Format { format: a }, Matcher::Format { format: b }) => a == b,
        _ => false,
    }
}

//! Minimal URI reference handling for `$ref` resolution.
//!
//! A `$ref` is `document#fragment` where either half may be absent. The
//! document half is an absolute URI, a relative path resolved against the
//! base document, or empty (same document). Only the subset of RFC 3986
//! needed for schema references is implemented: splitting at `#`, relative
//! path merging, and `.`/`..` segment normalization.

/// Splits a reference at the first `#` into (document, fragment).
///
/// The fragment never includes the `#` itself. A reference without `#`
/// has an empty fragment; a bare `#/a/b` has an empty document half.
#[must_use]
pub fn split_ref(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((document, fragment)) => (document, fragment),
        None => (reference, ""),
    }
}

/// Returns true if the document half carries its own scheme.
#[must_use]
pub fn is_absolute(document: &str) -> bool {
    document.contains("://")
}

/// Resolves a document reference against a base document URI.
///
/// Empty reference -> the base itself. Absolute reference -> the reference.
/// Otherwise the reference replaces the last path segment of the base, and
/// `.`/`..` segments are normalized away.
#[must_use]
pub fn join(base: &str, reference: &str) -> String {
    if reference.is_empty() {
        return base.to_string();
    }
    if is_absolute(reference) {
        return reference.to_string();
    }
    let (scheme, base_path): (&str, &str) = match base.find("://") {
        Some(at) => {
            let after: usize = at + 3;
            (&base[..after], &base[after..])
        }
        None => ("", base),
    };
    let directory: &str = match base_path.rfind('/') {
        Some(at) => &base_path[..=at],
        None => "",
    };
    let mut segments: Vec<&str> = Vec::new();
    for segment in directory.split('/').chain(reference.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut result: String = scheme.to_string();
    if base_path.starts_with('/') && scheme.is_empty() {
        result.push('/');
    }
    result.push_str(&segments.join("/"));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_document_and_fragment() {
        assert_eq!(
            split_ref("https://example.com/schema/utility#/$defs/personId"),
            ("https://example.com/schema/utility", "/$defs/personId")
        );
    }

    #[test]
    fn split_fragment_only() {
        assert_eq!(split_ref("#/properties/name"), ("", "/properties/name"));
    }

    #[test]
    fn split_document_only() {
        assert_eq!(split_ref("other.json"), ("other.json", ""));
    }

    #[test]
    fn absolute_detection() {
        assert!(is_absolute("https://example.com/schema/person"));
        assert!(!is_absolute("person.schema.json"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn join_empty_reference_is_base() {
        assert_eq!(join("schemas/person.json", ""), "schemas/person.json");
    }

    #[test]
    fn join_absolute_reference_wins() {
        assert_eq!(
            join("schemas/person.json", "https://example.com/schema/utility"),
            "https://example.com/schema/utility"
        );
    }

    #[test]
    fn join_sibling_file() {
        assert_eq!(join("schemas/person.json", "utility.json"), "schemas/utility.json");
    }

    #[test]
    fn join_without_directory() {
        assert_eq!(join("person.json", "utility.json"), "utility.json");
    }

    #[test]
    fn join_parent_segment() {
        assert_eq!(
            join("schemas/person/person.json", "../common/id.json"),
            "schemas/common/id.json"
        );
    }

    #[test]
    fn join_against_http_base() {
        assert_eq!(
            join("https://example.com/schema/person", "utility"),
            "https://example.com/schema/utility"
        );
    }

    #[test]
    fn join_keeps_leading_slash() {
        assert_eq!(join("/schemas/person.json", "utility.json"), "/schemas/utility.json");
    }
}

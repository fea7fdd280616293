//! JSON Pointer implementation (RFC 6901).
//!
//! Used for identifying a single schema node within a document.
//! Segments are `/`-separated, with `~` escaped as `~0` and `/` escaped as `~1`.

/// Appends a segment to a JSON Pointer path, applying RFC 6901 escaping.
///
/// Escaping rules: `~` -> `~0`, `/` -> `~1`
pub fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

/// Returns a new JSON Pointer path by appending a segment to the given path.
///
/// Convenience for building paths without mutating. Applies RFC 6901 escaping.
#[must_use]
pub fn format(path: &str, segment: &str) -> String {
    let mut result: String = path.to_string();
    push_segment(&mut result, segment);
    result
}

/// Splits a JSON Pointer into decoded segments.
///
/// The empty pointer identifies the whole document and yields no segments.
/// A non-empty pointer must start with `/`; anything else (e.g. a plain-name
/// fragment) is not a JSON Pointer and returns `None`.
#[must_use]
pub fn parse(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest: &str = pointer.strip_prefix('/')?;
    Some(rest.split('/').map(decode_segment).collect())
}

/// Decodes a single escaped segment: `~1` -> `/`, `~0` -> `~`.
///
/// Decoding order matters: `~01` must become `~1`, not `/`.
fn decode_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

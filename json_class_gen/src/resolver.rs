//! `$ref` resolution over a pre-loaded document set.
//!
//! Resolution is memoized by (base URI, reference) so repeated `$ref`s to
//! one location hand back the identical node, and therefore the identical
//! `TypeKey` — the Type Graph's de-duplication invariant depends on this.

use std::collections::HashMap;

use crate::error::ClassGenError;
use crate::json_pointer;
use crate::schema::{DocumentSet, SchemaNode};
use crate::uri;

pub struct Resolver<'a> {
    documents: &'a DocumentSet,
    memo: HashMap<(String, String), &'a SchemaNode>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(documents: &'a DocumentSet) -> Self {
        Self {
            documents,
            memo: HashMap::new(),
        }
    }

    /// Resolves a `$ref` string against the document it appears in.
    ///
    /// Handles absolute URIs, same-document fragments (`#/a/b`), relative
    /// document paths, and combined forms.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` naming the offending document URI and
    /// pointer when the target does not exist.
    pub fn resolve(
        &mut self,
        reference: &str,
        base_uri: &str,
    ) -> Result<&'a SchemaNode, ClassGenError> {
        let memo_key: (String, String) = (base_uri.to_string(), reference.to_string());
        if let Some(&node) = self.memo.get(&memo_key) {
            return Ok(node);
        }

        let (document_ref, fragment) = uri::split_ref(reference);
        let document_uri: String = uri::join(base_uri, document_ref);
        let documents: &'a DocumentSet = self.documents;
        let unresolved = || ClassGenError::UnresolvedReference {
            uri: document_uri.clone(),
            pointer: fragment.to_string(),
        };

        let document = documents.lookup(&document_uri).ok_or_else(unresolved)?;
        let segments: Vec<String> = json_pointer::parse(fragment).ok_or_else(unresolved)?;
        let node: &'a SchemaNode = document.root().navigate(&segments).ok_or_else(unresolved)?;
        self.memo.insert(memo_key, node);
        Ok(node)
    }
}

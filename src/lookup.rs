//! Lookup collaborators consulted during synthesis.
//!
//! The registry calls out to two external collaborators: a comment source
//! keyed by `(namespace, type, field)` and an enum constant source keyed by
//! type identity. Both are expected to be fast, local and non-blocking.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::customize::EnumValues;

/// Error type produced by lookup collaborators.
pub type LookupError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Source of human-authored comments.
///
/// Keys in the returned map are either `"<namespace>.<TypeName>"` or
/// `"<namespace>.<TypeName>.<FieldName>"`. A failed lookup aborts the
/// enclosing synthesis; results are cached per namespace for the lifetime
/// of the registry.
pub trait CommentProvider {
    /// All comments declared in `namespace`.
    fn comments(&self, namespace: &str) -> Result<BTreeMap<String, String>, LookupError>;
}

/// Source of discoverable enumeration constants, consulted only when a
/// caller explicitly opts into
/// [`RegisterOpt::DiscoveredEnum`](crate::customize::RegisterOpt::DiscoveredEnum).
pub trait EnumConstantProvider {
    /// The ordered permitted values for the type with the given canonical
    /// name.
    fn constants(&self, identity: &str) -> Result<EnumValues, LookupError>;
}

/// In-memory comment source, keyed by namespace.
///
/// Useful for tests and for hosts that extract comments ahead of time.
#[derive(Debug, Clone, Default)]
pub struct StaticComments {
    namespaces: HashMap<String, BTreeMap<String, String>>,
}

impl StaticComments {
    /// An empty comment source.
    pub fn new() -> Self { Self::default() }

    /// Add a comment under `"<namespace>.<key>"`.
    pub fn with_comment(mut self, namespace: &str, key: &str, comment: &str) -> Self {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(format!("{namespace}.{key}"), comment.to_string());
        self
    }
}

impl CommentProvider for StaticComments {
    fn comments(&self, namespace: &str) -> Result<BTreeMap<String, String>, LookupError> {
        Ok(self.namespaces.get(namespace).cloned().unwrap_or_default())
    }
}

/// Whether a comment carries a deprecation marker.
///
/// A comment is a deprecation marker only if one of its lines, after
/// trimming leading whitespace, begins with the literal `Deprecated:`.
/// Mentioning the word mid-sentence does not count.
pub fn is_marked_deprecated(comment: &str) -> bool {
    comment
        .lines()
        .any(|line| line.trim_start().starts_with("Deprecated:"))
}

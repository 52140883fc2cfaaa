//! Error types for schema synthesis.

use thiserror::Error;

/// Result type for the `typeschema` library
pub type Result<T> = error_stack::Result<T, Error>;

/// Failures that abort a document synthesis run.
///
/// All variants are fatal to the enclosing [`crate::Registry::register`]
/// call; there is no partial-document recovery. Malformed constraint
/// annotations are deliberately not represented here - they are skipped
/// individually with a warning during extraction.
#[derive(Debug, Error)]
pub enum Error {
    /// A type descriptor whose kind has no synthesis branch.
    #[error("unsupported type kind for {identity}")]
    UnsupportedType {
        /// Canonical name of the offending type.
        identity: String,
    },

    /// A map-kind type whose key does not reduce to the text primitive.
    #[error("map {identity} must have a text key, found {key_kind}")]
    InvalidMapKey {
        /// Canonical name of the map type.
        identity: String,
        /// Kind of the rejected key type.
        key_kind: String,
    },

    /// The comment lookup collaborator failed for a namespace.
    #[error("comment lookup failed for namespace {namespace}")]
    CommentLookup {
        /// Namespace whose comments could not be resolved.
        namespace: String,
    },

    /// The enum constant lookup collaborator failed for a type.
    #[error("enum constant lookup failed for {identity}")]
    EnumLookup {
        /// Canonical name of the type whose constants were requested.
        identity: String,
    },

    /// A nested registration failed while synthesizing a container or record.
    #[error("failed to synthesize schema for {identity}")]
    Synthesis {
        /// Canonical name of the enclosing type.
        identity: String,
    },
}

//! Assembled schema document.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::Schema;

/// The externally visible artifact of one synthesis run: every durable,
/// referenceable definition keyed by canonical name, plus document
/// identification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    /// Document title, usually the service name.
    pub title: String,
    /// Document version.
    pub version: String,
    /// Named definitions, ordered by canonical name.
    pub definitions: BTreeMap<String, Schema>,
}

impl SchemaDocument {
    /// Default version stamped on assembled documents.
    pub const DEFAULT_VERSION: &'static str = "0.0.0";

    /// An empty document with the default version.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            version: Self::DEFAULT_VERSION.to_string(),
            definitions: BTreeMap::new(),
        }
    }
}

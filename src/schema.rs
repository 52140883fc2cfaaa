//! In-memory schema tree.
//!
//! A [`Schema`] is the synthesized result for one type identity. It is
//! created once by the registry, mutated in place by customization hooks
//! immediately after creation, and treated as immutable afterwards.
//! Serializing the tree to a concrete wire format is left to the consumer.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;

/// Schema kind tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// A record or associative map.
    Object,
    /// A sequence of elements.
    Array,
    /// Text.
    String,
    /// Floating-point numbers (width is not preserved).
    Number,
    /// Whole numbers (width is not preserved).
    Integer,
    /// True or false.
    Boolean,
}

/// Either an inline schema or a symbolic pointer to a named definition,
/// never both.
///
/// Used wherever one schema embeds another: record fields, array items and
/// map values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaRef {
    /// Symbolic pointer to a named definition.
    Reference {
        /// Location of the definition, e.g. `#/components/schemas/User`.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline copy of the schema.
    Inline(Box<Schema>),
}

impl SchemaRef {
    /// Create a symbolic reference to the named definition.
    pub fn reference(name: &str) -> Self {
        Self::Reference {
            reference: format!("#/components/schemas/{name}"),
        }
    }

    /// Wrap a schema as an inline value.
    pub fn inline(schema: Schema) -> Self { Self::Inline(Box::new(schema)) }

    /// The inline schema, if this is not a reference.
    pub const fn as_inline(&self) -> Option<&Schema> {
        match self {
            Self::Inline(schema) => Some(schema),
            Self::Reference { .. } => None,
        }
    }

    /// Mutable access to the inline schema, if this is not a reference.
    pub const fn as_inline_mut(&mut self) -> Option<&mut Schema> {
        match self {
            Self::Inline(schema) => Some(schema),
            Self::Reference { .. } => None,
        }
    }

    /// The referenced definition name, if this is a reference.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            Self::Reference { reference } => reference.rsplit('/').next(),
            Self::Inline(_) => None,
        }
    }
}

/// The synthesized schema for one type identity.
///
/// Fields are public so customization hooks can mutate the node directly.
/// The `required` list is populated exclusively by hooks - base synthesis
/// never infers requiredness from optionality.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Kind tag of this schema.
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    /// Ordered-by-name properties, for object kinds.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaRef>,

    /// Names of required properties. Must be a subset of `properties`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Whether absence is a representable value.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,

    /// Human-authored description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the type or field is marked as deprecated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,

    /// Element schema, for array kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,

    /// Value schema, for associative-map objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaRef>>,

    /// Closed list of permitted values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    /// Format hint (e.g. `date-time`), set only by hooks or known schemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Anchored regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Inclusive lower bound, for numeric kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Inclusive upper bound, for numeric kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Minimum length, for text kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum length, for text kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl Schema {
    /// Create an empty schema of the given kind.
    pub const fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            properties: BTreeMap::new(),
            required: Vec::new(),
            nullable: false,
            description: None,
            deprecated: false,
            items: None,
            additional_properties: None,
            enum_values: Vec::new(),
            format: None,
            pattern: None,
            example: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
        }
    }

    /// An empty object schema.
    pub const fn object() -> Self { Self::new(SchemaType::Object) }

    /// An empty array schema.
    pub const fn array() -> Self { Self::new(SchemaType::Array) }

    /// A text schema.
    pub const fn string() -> Self { Self::new(SchemaType::String) }

    /// A whole-number schema.
    pub const fn integer() -> Self { Self::new(SchemaType::Integer) }

    /// A floating-point schema.
    pub const fn number() -> Self { Self::new(SchemaType::Number) }

    /// A boolean schema.
    pub const fn boolean() -> Self { Self::new(SchemaType::Boolean) }

    /// Mark the schema as nullable.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set the format hint.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_name_round_trip() {
        let reference = SchemaRef::reference("User");
        assert_eq!(reference.reference_name(), Some("User"));
        assert!(reference.as_inline().is_none());
    }

    #[test]
    fn inline_schema_access() {
        let mut reference = SchemaRef::inline(Schema::string());
        assert!(reference.reference_name().is_none());
        assert_eq!(
            reference.as_inline().map(|s| s.schema_type),
            Some(SchemaType::String)
        );
        if let Some(inner) = reference.as_inline_mut() {
            inner.description = Some("a field".to_string());
        }
        assert_eq!(
            reference.as_inline().and_then(|s| s.description.as_deref()),
            Some("a field")
        );
    }

    #[test]
    fn serialization_skips_empty_slots() {
        let schema = Schema::integer();
        let value = serde_json::to_value(&schema).unwrap_or_default();
        assert_eq!(value, serde_json::json!({ "type": "integer" }));
    }

    #[test]
    fn serialization_emits_reference_shape() {
        let mut schema = Schema::object();
        schema
            .properties
            .insert("user".to_string(), SchemaRef::reference("User"));
        let value = serde_json::to_value(&schema).unwrap_or_default();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "object",
                "properties": { "user": { "$ref": "#/components/schemas/User" } }
            })
        );
    }
}

//! Layered schema customization.
//!
//! Three stages may mutate a schema after base synthesis, in order: global
//! customizers configured on the registry, the type's own self-customization
//! hook, and the options passed to a single `register` call. Later stages
//! win on scalar fields; list-valued fields are additive unless a stage
//! replaces the whole list.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::descriptor::TypeDescriptor;
use crate::schema::Schema;
use crate::schema::SchemaType;

/// Explicit enumeration values supplied to a registration.
///
/// The value kind also forces the schema kind, mirroring how enumerated
/// scalar types behave in source metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValues {
    /// Text constants; forces the string schema kind.
    Strings(Vec<String>),
    /// Whole-number constants; forces the integer schema kind.
    Integers(Vec<i64>),
}

impl EnumValues {
    /// Apply the values to a schema. An empty list is a no-op and leaves
    /// the schema kind untouched.
    pub fn apply(&self, schema: &mut Schema) {
        match self {
            Self::Strings(values) => {
                if values.is_empty() {
                    return;
                }
                schema.schema_type = SchemaType::String;
                schema.enum_values = values.iter().cloned().map(Value::String).collect();
            }
            Self::Integers(values) => {
                if values.is_empty() {
                    return;
                }
                schema.schema_type = SchemaType::Integer;
                schema.enum_values = values.iter().copied().map(Value::from).collect();
            }
        }
    }
}

/// Options applied to the final schema of one `register` call.
#[derive(Debug, Clone)]
pub enum RegisterOpt {
    /// Mark the schema as nullable.
    Nullable,
    /// Set the description.
    Description(String),
    /// Set an example value.
    Example(Value),
    /// Set an explicit enumeration value list.
    EnumValues(EnumValues),
    /// Enumerate constants discovered through the registry's
    /// [`EnumConstantProvider`](crate::lookup::EnumConstantProvider).
    DiscoveredEnum,
}

/// A global customization hook: a named predicate/mutator pair.
///
/// Customizers run once per registered type, in configuration order, before
/// the type's self-customization hook. They replace ambient process-wide
/// callbacks so independent registries never interfere.
#[derive(Clone)]
pub struct Customizer {
    predicate: Arc<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>,
    mutator: Arc<dyn Fn(&TypeDescriptor, &mut Schema) + Send + Sync>,
}

impl Customizer {
    /// A customizer applied to every descriptor matching `predicate`.
    pub fn new(
        predicate: impl Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
        mutator: impl Fn(&TypeDescriptor, &mut Schema) + Send + Sync + 'static,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            mutator: Arc::new(mutator),
        }
    }

    /// A customizer applied to every registered type.
    pub fn for_all(mutator: impl Fn(&TypeDescriptor, &mut Schema) + Send + Sync + 'static) -> Self {
        Self::new(|_| true, mutator)
    }

    /// Run the mutator if the predicate matches.
    pub fn apply(&self, descriptor: &TypeDescriptor, schema: &mut Schema) {
        if (self.predicate)(descriptor) {
            (self.mutator)(descriptor, schema);
        }
    }
}

impl fmt::Debug for Customizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Customizer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_enum_values_force_string_kind() {
        let mut schema = Schema::integer();
        EnumValues::Strings(vec!["A".to_string(), "B".to_string()]).apply(&mut schema);
        assert_eq!(schema.schema_type, SchemaType::String);
        assert_eq!(schema.enum_values, vec![Value::from("A"), Value::from("B")]);
    }

    #[test]
    fn integer_enum_values_force_integer_kind() {
        let mut schema = Schema::string();
        EnumValues::Integers(vec![1, 2, 3]).apply(&mut schema);
        assert_eq!(schema.schema_type, SchemaType::Integer);
        assert_eq!(schema.enum_values.len(), 3);
    }

    #[test]
    fn empty_enum_values_are_a_no_op() {
        let mut schema = Schema::integer();
        EnumValues::Strings(Vec::new()).apply(&mut schema);
        assert_eq!(schema.schema_type, SchemaType::Integer);
        assert!(schema.enum_values.is_empty());
    }

    #[test]
    fn customizer_respects_predicate() {
        let customizer = Customizer::new(
            |descriptor| descriptor.name() == "User",
            |_, schema| schema.description = Some("matched".to_string()),
        );

        let user = TypeDescriptor::record("pkg", "User", Vec::new());
        let other = TypeDescriptor::record("pkg", "Other", Vec::new());

        let mut schema = Schema::object();
        customizer.apply(&other, &mut schema);
        assert!(schema.description.is_none());
        customizer.apply(&user, &mut schema);
        assert_eq!(schema.description.as_deref(), Some("matched"));
    }
}

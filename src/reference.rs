//! Referencing policy.
//!
//! Decides, for every use site, whether a synthesized schema is handed to
//! the consumer as an inline copy or as a symbolic pointer into the
//! definitions map. The same rule applies to record fields, array items,
//! map values and top-level registrations.

use crate::schema::Schema;
use crate::schema::SchemaRef;
use crate::schema::SchemaType;

/// Canonical names minted for unnamed scalar descriptors. Primitives are
/// structurally equal but not uniquely definitional, so these names are
/// never memoized or persisted.
const PRIMITIVE_NAMES: [&str; 15] = [
    "bool", "float32", "float64", "int", "int8", "int16", "int32", "int64", "string", "uint",
    "uint8", "uint16", "uint32", "uint64", "uintptr",
];

/// Whether `name` is a reserved primitive-kind name.
pub fn is_primitive_name(name: &str) -> bool { PRIMITIVE_NAMES.contains(&name) }

/// Whether consumers should receive `schema` as a named reference.
///
/// Genuine records (object kind without an additional-properties slot) are
/// referenceable, as is any schema carrying enumerated values - enums are
/// always promoted so the permitted values are declared exactly once.
/// Arrays, maps and bare scalars are inlined at every use site.
pub fn should_reference(schema: &Schema) -> bool {
    if schema.schema_type == SchemaType::Object && schema.additional_properties.is_none() {
        return true;
    }
    !schema.enum_values.is_empty()
}

/// Produce the representation of `schema` at one use site: a symbolic
/// reference when the policy qualifies it and the name is not a reserved
/// primitive, an inline copy otherwise.
pub fn reference_or_inline(name: &str, schema: Schema) -> SchemaRef {
    if !is_primitive_name(name) && should_reference(&schema) {
        return SchemaRef::reference(name);
    }
    SchemaRef::inline(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_referenceable() {
        assert!(should_reference(&Schema::object()));
    }

    #[test]
    fn maps_and_scalars_are_inlined() {
        let mut map = Schema::object();
        map.additional_properties = Some(Box::new(SchemaRef::inline(Schema::integer())));
        assert!(!should_reference(&map));
        assert!(!should_reference(&Schema::string()));
        assert!(!should_reference(&Schema::array()));
    }

    #[test]
    fn enums_are_always_promoted() {
        let mut schema = Schema::string();
        schema.enum_values = vec![serde_json::Value::from("A")];
        assert!(should_reference(&schema));
    }

    #[test]
    fn primitive_names_are_never_referenced() {
        let mut schema = Schema::string();
        schema.enum_values = vec![serde_json::Value::from("A")];
        assert!(matches!(
            reference_or_inline("string", schema.clone()),
            SchemaRef::Inline(_)
        ));
        assert!(matches!(
            reference_or_inline("Level", schema),
            SchemaRef::Reference { .. }
        ));
    }
}

//! Tag-derived constraint extraction.
//!
//! Constraints (bounds, lengths, enumerations, closed-set patterns) are
//! parsed from field annotations and attached to the field's own resolved
//! schema node, never merged into a shared named definition. Extraction is
//! a table keyed by scalar kind; a malformed value skips that single
//! constraint with a warning and never aborts synthesis.

use itertools::Itertools;
use serde_json::Value;

use crate::descriptor::FieldAnnotations;
use crate::descriptor::FloatWidth;
use crate::descriptor::TagKey;
use crate::schema::Schema;

use crate::descriptor::TypeKind;

/// Apply every constraint annotation that matches the field's scalar kind.
///
/// Optional/pointer kinds unwrap one level and re-run extraction against
/// the pointed-to kind; container and record kinds carry no constraints.
pub fn apply_constraints(annotations: &FieldAnnotations, kind: &TypeKind, schema: &mut Schema) {
    match kind {
        TypeKind::Integer(_) => numeric_constraints(annotations, None, schema),
        TypeKind::Float(width) => numeric_constraints(annotations, Some(*width), schema),
        TypeKind::Text => text_constraints(annotations, schema),
        TypeKind::Optional(inner) => {
            apply_constraints(annotations, inner.resolve().kind(), schema);
        }
        _ => {}
    }
}

/// Parse a numeric annotation value at the field's width. Integer-family
/// fields parse as whole numbers; float fields parse at their bit width so
/// out-of-precision literals round the way the source language would.
#[allow(
    clippy::cast_precision_loss,
    reason = "bounds widen to float the way the source metadata does"
)]
fn parse_number(raw: &str, width: Option<FloatWidth>) -> Option<f64> {
    match width {
        None => raw.parse::<i64>().ok().map(|v| v as f64),
        Some(FloatWidth::Float32) => raw.parse::<f32>().ok().map(f64::from),
        Some(FloatWidth::Float64) => raw.parse::<f64>().ok(),
    }
}

/// Parse one enumeration token, keeping whole-number representation for
/// integer-family fields.
fn parse_enum_value(token: &str, width: Option<FloatWidth>) -> Option<Value> {
    match width {
        None => token.parse::<i64>().ok().map(Value::from),
        Some(FloatWidth::Float32) => token
            .parse::<f32>()
            .ok()
            .map(|v| Value::from(f64::from(v))),
        Some(FloatWidth::Float64) => token.parse::<f64>().ok().map(Value::from),
    }
}

fn numeric_constraints(
    annotations: &FieldAnnotations,
    width: Option<FloatWidth>,
    schema: &mut Schema,
) {
    if let Some(raw) = annotations.get(TagKey::Minimum) {
        match parse_number(raw, width) {
            Some(minimum) => schema.minimum = Some(minimum),
            None => tracing::warn!("skipping unparseable minimum constraint {raw:?}"),
        }
    }
    if let Some(raw) = annotations.get(TagKey::Maximum) {
        match parse_number(raw, width) {
            Some(maximum) => schema.maximum = Some(maximum),
            None => tracing::warn!("skipping unparseable maximum constraint {raw:?}"),
        }
    }
    if let Some(raw) = annotations.get(TagKey::Enums) {
        let values: Vec<Value> = raw
            .split(',')
            .filter_map(|token| {
                let parsed = parse_enum_value(token, width);
                if parsed.is_none() {
                    tracing::warn!("skipping unparseable enum value {token:?}");
                }
                parsed
            })
            .collect();
        if !values.is_empty() {
            schema.enum_values = values;
        }
    }
}

fn text_constraints(annotations: &FieldAnnotations, schema: &mut Schema) {
    if let Some(raw) = annotations.get(TagKey::MinLength) {
        match raw.parse::<u64>() {
            Ok(min_length) => schema.min_length = Some(min_length),
            Err(_) => tracing::warn!("skipping unparseable minLength constraint {raw:?}"),
        }
    }
    if let Some(raw) = annotations.get(TagKey::MaxLength) {
        match raw.parse::<u64>() {
            Ok(max_length) => schema.max_length = Some(max_length),
            Err(_) => tracing::warn!("skipping unparseable maxLength constraint {raw:?}"),
        }
    }
    if let Some(raw) = annotations.get(TagKey::Enums) {
        schema.enum_values = raw.split(',').map(Value::from).collect();
    }
    if let Some(raw) = annotations.get(TagKey::Set) {
        schema.pattern = Some(set_pattern(raw));
    }
}

/// Compile a comma-separated vocabulary into an anchored pattern matching a
/// comma/space-delimited sub-sequence of the allowed tokens. A single
/// optional space is permitted after each comma.
fn set_pattern(set: &str) -> String {
    let alternation = set.split(',').join("|");
    format!("^({alternation})(, {{0,1}}({alternation}))*$")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "test-local assertions")]

    use regex::Regex;

    use super::*;
    use crate::descriptor::FieldDescriptor;
    use crate::descriptor::IntWidth;
    use crate::descriptor::TypeDescriptor;

    fn annotations(pairs: &[(TagKey, &str)]) -> FieldAnnotations {
        let mut field = FieldDescriptor::new("f", TypeDescriptor::text());
        for (key, value) in pairs {
            field = field.annotate(*key, value);
        }
        field.annotations().clone()
    }

    #[test]
    fn text_length_bounds_round_trip() {
        let mut schema = Schema::string();
        apply_constraints(
            &annotations(&[(TagKey::MinLength, "2"), (TagKey::MaxLength, "5")]),
            &TypeKind::Text,
            &mut schema,
        );
        assert_eq!(schema.min_length, Some(2));
        assert_eq!(schema.max_length, Some(5));
    }

    #[test]
    fn integer_bounds_and_enums() {
        let mut schema = Schema::integer();
        apply_constraints(
            &annotations(&[
                (TagKey::Minimum, "0"),
                (TagKey::Maximum, "255"),
                (TagKey::Enums, "1,2,3"),
            ]),
            &TypeKind::Integer(IntWidth::Int),
            &mut schema,
        );
        assert_eq!(schema.minimum, Some(0.0));
        assert_eq!(schema.maximum, Some(255.0));
        assert_eq!(
            schema.enum_values,
            vec![Value::from(1), Value::from(2), Value::from(3)]
        );
    }

    #[test]
    fn float_bounds_parse_at_field_width() {
        let mut schema = Schema::number();
        apply_constraints(
            &annotations(&[(TagKey::Minimum, "0"), (TagKey::Maximum, "9.9999")]),
            &TypeKind::Float(FloatWidth::Float64),
            &mut schema,
        );
        assert_eq!(schema.minimum, Some(0.0));
        assert_eq!(schema.maximum, Some(9.9999));
    }

    #[test]
    fn float32_bounds_widen_from_field_width() {
        let mut schema = Schema::number();
        apply_constraints(
            &annotations(&[(TagKey::Minimum, "0.1"), (TagKey::Maximum, "0.3")]),
            &TypeKind::Float(FloatWidth::Float32),
            &mut schema,
        );
        // Parsed as f32 first, then widened; not the same value as a direct
        // f64 parse of the literal.
        assert_eq!(schema.minimum, Some(f64::from(0.1_f32)));
        assert_eq!(schema.maximum, Some(f64::from(0.3_f32)));
        assert_ne!(schema.minimum, Some(0.1));
    }

    #[test]
    fn malformed_values_are_skipped_individually() {
        let mut schema = Schema::integer();
        apply_constraints(
            &annotations(&[
                (TagKey::Minimum, "not-a-number"),
                (TagKey::Maximum, "10"),
                (TagKey::Enums, "1,bogus,3"),
            ]),
            &TypeKind::Integer(IntWidth::Int),
            &mut schema,
        );
        assert_eq!(schema.minimum, None);
        assert_eq!(schema.maximum, Some(10.0));
        assert_eq!(schema.enum_values, vec![Value::from(1), Value::from(3)]);
    }

    #[test]
    fn text_enum_values_stay_strings() {
        let mut schema = Schema::string();
        apply_constraints(
            &annotations(&[(TagKey::Enums, "foo,bar,baz")]),
            &TypeKind::Text,
            &mut schema,
        );
        assert_eq!(
            schema.enum_values,
            vec![Value::from("foo"), Value::from("bar"), Value::from("baz")]
        );
    }

    #[test]
    fn set_pattern_matches_unordered_subsequences() {
        let mut schema = Schema::string();
        apply_constraints(
            &annotations(&[(TagKey::Set, "foo,bar")]),
            &TypeKind::Text,
            &mut schema,
        );
        let pattern = Regex::new(schema.pattern.as_deref().unwrap()).unwrap();
        assert!(pattern.is_match("foo"));
        assert!(pattern.is_match("bar, foo"));
        assert!(pattern.is_match("bar,foo"));
        assert!(!pattern.is_match("baz"));
        assert!(!pattern.is_match("foo, baz"));
    }

    #[test]
    fn optional_fields_unwrap_before_extraction() {
        let mut schema = Schema::string();
        apply_constraints(
            &annotations(&[(TagKey::Enums, "foo,bar")]),
            &TypeKind::Optional(TypeDescriptor::text().into()),
            &mut schema,
        );
        assert_eq!(schema.enum_values.len(), 2);
    }

    #[test]
    fn container_kinds_carry_no_constraints() {
        let mut schema = Schema::array();
        apply_constraints(
            &annotations(&[(TagKey::Minimum, "1")]),
            &TypeKind::Sequence(TypeDescriptor::text().into()),
            &mut schema,
        );
        assert_eq!(schema.minimum, None);
    }
}

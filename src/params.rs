//! Path and query parameter schemas.
//!
//! Route bookkeeping lives outside this crate; the routing layer hands the
//! core parameter descriptors and receives scalar schema nodes back.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;

use crate::schema::Schema;
use crate::schema::SchemaType;

/// Primitive kinds a parameter can declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr, Serialize, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// Text; also the default when a parameter declares no type.
    #[default]
    String,
    /// True or false.
    Boolean,
    /// Whole number.
    Integer,
    /// Floating-point number.
    Number,
}

impl PrimitiveType {
    /// The scalar schema for this primitive kind.
    pub const fn schema(self) -> Schema {
        match self {
            Self::String => Schema::new(SchemaType::String),
            Self::Boolean => Schema::new(SchemaType::Boolean),
            Self::Integer => Schema::new(SchemaType::Integer),
            Self::Number => Schema::new(SchemaType::Number),
        }
    }
}

/// A path or query parameter descriptor handed to the core by the routing
/// layer.
#[derive(Clone, Default)]
pub struct Param {
    /// Human-readable description.
    pub description: String,
    /// Whether the parameter must be present (query parameters only).
    pub required: bool,
    /// Whether an empty value is permitted (query parameters only).
    pub allow_empty: bool,
    /// Primitive kind of the parameter value.
    pub ty: PrimitiveType,
    /// Regular expression the value must match.
    pub pattern: Option<String>,
    customize: Option<Arc<dyn Fn(&mut Schema) + Send + Sync>>,
}

impl Param {
    /// A parameter of the given primitive kind.
    pub fn new(ty: PrimitiveType) -> Self {
        Self {
            ty,
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Mark the parameter as required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Permit empty values.
    pub const fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Constrain the value with a regular expression.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Attach a hook that mutates the synthesized schema last.
    pub fn customize(mut self, hook: impl Fn(&mut Schema) + Send + Sync + 'static) -> Self {
        self.customize = Some(Arc::new(hook));
        self
    }

    /// Synthesize the parameter's scalar schema.
    pub fn schema(&self) -> Schema {
        let mut schema = self.ty.schema();
        schema.pattern = self.pattern.clone();
        if !self.description.is_empty() {
            schema.description = Some(self.description.clone());
        }
        if let Some(hook) = &self.customize {
            hook(&mut schema);
        }
        schema
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("description", &self.description)
            .field("required", &self.required)
            .field("allow_empty", &self.allow_empty)
            .field("ty", &self.ty)
            .field("pattern", &self.pattern)
            .field("customize", &self.customize.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameter_type_is_string() {
        let param = Param::default();
        assert_eq!(param.schema().schema_type, SchemaType::String);
    }

    #[test]
    fn pattern_and_description_carry_over() {
        let param = Param::new(PrimitiveType::Integer)
            .description("Organisation ID")
            .pattern(r"\d+")
            .required();
        let schema = param.schema();
        assert_eq!(schema.schema_type, SchemaType::Integer);
        assert_eq!(schema.pattern.as_deref(), Some(r"\d+"));
        assert_eq!(schema.description.as_deref(), Some("Organisation ID"));
    }

    #[test]
    fn customize_hook_runs_last() {
        let param = Param::new(PrimitiveType::String)
            .description("original")
            .customize(|schema| schema.description = Some("overridden".to_string()));
        assert_eq!(param.schema().description.as_deref(), Some("overridden"));
    }
}

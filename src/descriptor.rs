//! Structural, language-neutral type descriptions.
//!
//! A [`TypeDescriptor`] describes one type's shape: its kind, its declaring
//! namespace and local name, and - for containers and records - the
//! descriptors of its constituent types. Descriptors can be backed by a
//! host language's reflection, a derive-generated table, or a parsed schema
//! file; the registry only ever sees this interface.
//!
//! Nested descriptors are held behind [`DescriptorRef`], which is either an
//! already-built descriptor or a lazy thunk. Thunks let mutually recursive
//! record graphs be declared without constructing an infinite tree; identity
//! is by canonical name, so each resolution may return a fresh allocation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use strum::AsRefStr;
use strum::Display;

use crate::schema::Schema;

/// Self-customization hook carried by a descriptor.
///
/// Invoked with the in-progress schema after base synthesis and global
/// customizers, before externally supplied per-call options.
pub type SchemaHook = Arc<dyn Fn(&mut Schema) + Send + Sync>;

/// Integer kinds of the source language. Width collapses to a single
/// `integer` schema kind in the output; it is kept here only so canonical
/// names of bare primitives stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum IntWidth {
    /// Platform-width signed integer.
    Int,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Platform-width unsigned integer.
    Uint,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit unsigned integer.
    Uint32,
    /// 64-bit unsigned integer.
    Uint64,
}

/// Floating-point kinds. The bit width decides how constraint annotation
/// values are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FloatWidth {
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
}

impl FloatWidth {
    /// Bit width used when parsing constraint values for this kind.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Float32 => 32,
            Self::Float64 => 64,
        }
    }
}

/// A nested descriptor slot: either a built descriptor or a lazy thunk.
#[derive(Clone)]
pub struct DescriptorRef(RefInner);

#[derive(Clone)]
enum RefInner {
    Fixed(Arc<TypeDescriptor>),
    Lazy(Arc<dyn Fn() -> Arc<TypeDescriptor> + Send + Sync>),
}

impl DescriptorRef {
    /// Defer construction of the nested descriptor until synthesis reaches
    /// it. Required for mutually recursive record graphs.
    pub fn lazy(thunk: impl Fn() -> Arc<TypeDescriptor> + Send + Sync + 'static) -> Self {
        Self(RefInner::Lazy(Arc::new(thunk)))
    }

    /// Resolve to a concrete descriptor.
    pub fn resolve(&self) -> Arc<TypeDescriptor> {
        match &self.0 {
            RefInner::Fixed(descriptor) => Arc::clone(descriptor),
            RefInner::Lazy(thunk) => thunk(),
        }
    }
}

impl From<TypeDescriptor> for DescriptorRef {
    fn from(descriptor: TypeDescriptor) -> Self { Self(RefInner::Fixed(Arc::new(descriptor))) }
}

impl From<Arc<TypeDescriptor>> for DescriptorRef {
    fn from(descriptor: Arc<TypeDescriptor>) -> Self { Self(RefInner::Fixed(descriptor)) }
}

impl fmt::Debug for DescriptorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            RefInner::Fixed(descriptor) => descriptor.fmt(f),
            RefInner::Lazy(_) => f.write_str("<lazy>"),
        }
    }
}

/// Kind of a type descriptor.
#[derive(Debug, Clone, Display, AsRefStr)]
pub enum TypeKind {
    /// True or false.
    Boolean,
    /// Signed or unsigned whole number.
    Integer(IntWidth),
    /// Floating-point number.
    Float(FloatWidth),
    /// Text.
    Text,
    /// Ordered sequence of elements.
    Sequence(DescriptorRef),
    /// Associative map. The key must reduce to [`TypeKind::Text`].
    Map {
        /// Key type descriptor.
        key: DescriptorRef,
        /// Value type descriptor.
        value: DescriptorRef,
    },
    /// Optional or pointer wrapper around another type.
    Optional(DescriptorRef),
    /// Named or anonymous record with fields.
    Record(Vec<FieldDescriptor>),
    /// A kind with no schema representation (functions, channels, handles).
    /// Registering one is an error.
    Opaque,
}

impl TypeKind {
    /// Canonical name minted for an unnamed descriptor of this kind, if it
    /// is a primitive.
    pub const fn primitive_token(&self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("bool"),
            Self::Integer(width) => Some(match width {
                IntWidth::Int => "int",
                IntWidth::Int8 => "int8",
                IntWidth::Int16 => "int16",
                IntWidth::Int32 => "int32",
                IntWidth::Int64 => "int64",
                IntWidth::Uint => "uint",
                IntWidth::Uint8 => "uint8",
                IntWidth::Uint16 => "uint16",
                IntWidth::Uint32 => "uint32",
                IntWidth::Uint64 => "uint64",
            }),
            Self::Float(width) => Some(match width {
                FloatWidth::Float32 => "float32",
                FloatWidth::Float64 => "float64",
            }),
            Self::Text => Some("string"),
            _ => None,
        }
    }
}

/// Keys recognized in field annotations.
///
/// This enum provides type-safe annotation keys so callers and the
/// constraint extraction table never hardcode strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum TagKey {
    /// Comma-separated closed list of permitted values.
    Enums,
    /// Maximum length of a text field.
    MaxLength,
    /// Inclusive upper bound of a numeric field.
    Maximum,
    /// Minimum length of a text field.
    MinLength,
    /// Inclusive lower bound of a numeric field.
    Minimum,
    /// External name override for a field.
    Name,
    /// Marks a field as omitted when empty; forces nullability.
    OmitEmpty,
    /// Comma-separated vocabulary compiled into a multi-value pattern.
    Set,
    /// Forces a field to be treated as a different kind (only `string` is
    /// recognized).
    TypeOverride,
}

/// Tag-like key/value annotations attached to one field.
#[derive(Debug, Clone, Default)]
pub struct FieldAnnotations(BTreeMap<String, String>);

impl FieldAnnotations {
    /// Raw lookup by key.
    pub fn get(&self, key: TagKey) -> Option<&str> {
        self.0.get(key.as_ref()).map(String::as_str)
    }

    /// External name override, if present and non-empty.
    pub fn rename(&self) -> Option<&str> {
        self.get(TagKey::Name).filter(|name| !name.is_empty())
    }

    /// Whether the field is marked as omitted when empty.
    pub fn omit_empty(&self) -> bool { self.get(TagKey::OmitEmpty).is_some() }

    /// Kind override for the field's effective type.
    pub fn type_override(&self) -> Option<&str> { self.get(TagKey::TypeOverride) }

    fn insert(&mut self, key: TagKey, value: &str) {
        self.0.insert(key.as_ref().to_string(), value.to_string());
    }
}

/// One field of a record descriptor.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: DescriptorRef,
    visible: bool,
    embedded: bool,
    annotations: FieldAnnotations,
}

impl FieldDescriptor {
    /// A visible, non-embedded field.
    pub fn new(name: &str, ty: impl Into<DescriptorRef>) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.into(),
            visible: true,
            embedded: false,
            annotations: FieldAnnotations::default(),
        }
    }

    /// Mark the field as not externally visible; it is skipped entirely.
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark the field as anonymous/embedded; its properties are spliced
    /// into the containing record.
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Attach one annotation.
    pub fn annotate(mut self, key: TagKey, value: &str) -> Self {
        self.annotations.insert(key, value);
        self
    }

    /// The field's identifier in its declaring record.
    pub fn name(&self) -> &str { &self.name }

    /// Descriptor of the field's declared type.
    pub const fn ty(&self) -> &DescriptorRef { &self.ty }

    /// Whether the field participates in the schema.
    pub const fn is_visible(&self) -> bool { self.visible }

    /// Whether the field is anonymous/embedded.
    pub const fn is_embedded(&self) -> bool { self.embedded }

    /// The field's annotations.
    pub const fn annotations(&self) -> &FieldAnnotations { &self.annotations }
}

/// Structural description of one type.
#[derive(Clone)]
pub struct TypeDescriptor {
    namespace: String,
    name: String,
    kind: TypeKind,
    customize: Option<SchemaHook>,
}

impl TypeDescriptor {
    /// A named type declared in a namespace.
    pub fn new(namespace: &str, name: &str, kind: TypeKind) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
            customize: None,
        }
    }

    /// An unnamed type (builtin primitive, container, or anonymous record).
    pub fn unnamed(kind: TypeKind) -> Self { Self::new("", "", kind) }

    /// The builtin text type.
    pub fn text() -> Self { Self::unnamed(TypeKind::Text) }

    /// The builtin boolean type.
    pub fn boolean() -> Self { Self::unnamed(TypeKind::Boolean) }

    /// A builtin integer type.
    pub fn integer(width: IntWidth) -> Self { Self::unnamed(TypeKind::Integer(width)) }

    /// A builtin floating-point type.
    pub fn float(width: FloatWidth) -> Self { Self::unnamed(TypeKind::Float(width)) }

    /// An unnamed sequence of the given element type.
    pub fn sequence_of(element: impl Into<DescriptorRef>) -> Self {
        Self::unnamed(TypeKind::Sequence(element.into()))
    }

    /// An unnamed map from `key` to `value`.
    pub fn map_of(key: impl Into<DescriptorRef>, value: impl Into<DescriptorRef>) -> Self {
        Self::unnamed(TypeKind::Map {
            key: key.into(),
            value: value.into(),
        })
    }

    /// An optional/pointer wrapper around the given type.
    pub fn optional(inner: impl Into<DescriptorRef>) -> Self {
        Self::unnamed(TypeKind::Optional(inner.into()))
    }

    /// A named record with the given fields.
    pub fn record(namespace: &str, name: &str, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(namespace, name, TypeKind::Record(fields))
    }

    /// Attach a self-customization hook, invoked with the in-progress schema
    /// on every registration of this type.
    pub fn with_customizer(mut self, hook: impl Fn(&mut Schema) + Send + Sync + 'static) -> Self {
        self.customize = Some(Arc::new(hook));
        self
    }

    /// The declaring namespace, empty for builtins and anonymous types.
    pub fn namespace(&self) -> &str { &self.namespace }

    /// The local name, empty for builtins and anonymous types.
    pub fn name(&self) -> &str { &self.name }

    /// The descriptor's kind.
    pub const fn kind(&self) -> &TypeKind { &self.kind }

    /// The self-customization hook, if the type exposes one.
    pub const fn customizer(&self) -> Option<&SchemaHook> { self.customize.as_ref() }

    /// Local name as it appears inside compound names such as `map[K]V`:
    /// the declared name, or the primitive token for unnamed scalars.
    pub fn local_name(&self) -> &str {
        if self.name.is_empty() {
            self.kind.primitive_token().unwrap_or_default()
        } else {
            &self.name
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("customize", &self.customize.is_some())
            .finish()
    }
}

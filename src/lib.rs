//! Type-descriptor to schema-document synthesis.
//!
//! This crate converts structural descriptions of data types - records,
//! enumerations, collections, optional wrappers and associative maps - into
//! a normalized, de-duplicated schema document. Shared substructures are
//! resolved into named, referenceable definitions; embedded records are
//! flattened into their containers; constraint annotations and
//! human-authored comments are attached along the way.
//!
//! # Usage
//!
//! ```
//! use typeschema::{FieldDescriptor, IntWidth, Registry, TypeDescriptor};
//!
//! let user = TypeDescriptor::record(
//!     "github.com/acme/api",
//!     "User",
//!     vec![
//!         FieldDescriptor::new("id", TypeDescriptor::integer(IntWidth::Int64)),
//!         FieldDescriptor::new("name", TypeDescriptor::text()),
//!     ],
//! );
//!
//! let mut registry = Registry::new().strip_namespace("github.com/acme");
//! let (name, _schema) = registry.register(&user, &[])?;
//! assert_eq!(name, "User");
//!
//! let document = registry.into_document("acme api");
//! assert!(document.definitions.contains_key("User"));
//! # Ok::<(), error_stack::Report<typeschema::Error>>(())
//! ```
//!
//! Synthesis runs to completion on one thread of control; registries hold
//! per-document state and are not shared between concurrent runs.

mod constraints;
mod customize;
mod descriptor;
mod document;
mod error;
mod lookup;
mod params;
mod reference;
mod registry;
mod schema;

pub use customize::Customizer;
pub use customize::EnumValues;
pub use customize::RegisterOpt;
pub use descriptor::DescriptorRef;
pub use descriptor::FieldAnnotations;
pub use descriptor::FieldDescriptor;
pub use descriptor::FloatWidth;
pub use descriptor::IntWidth;
pub use descriptor::SchemaHook;
pub use descriptor::TagKey;
pub use descriptor::TypeDescriptor;
pub use descriptor::TypeKind;
pub use document::SchemaDocument;
pub use error::Error;
pub use error::Result;
pub use lookup::CommentProvider;
pub use lookup::EnumConstantProvider;
pub use lookup::LookupError;
pub use lookup::StaticComments;
pub use lookup::is_marked_deprecated;
pub use params::Param;
pub use params::PrimitiveType;
pub use reference::reference_or_inline;
pub use reference::should_reference;
pub use registry::Registry;
pub use schema::Schema;
pub use schema::SchemaRef;
pub use schema::SchemaType;

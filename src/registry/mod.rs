//! Model registry and schema synthesis.
//!
//! The registry owns the map from canonical name to synthesized schema, the
//! cycle-detection set, the namespace-stripping policy and the per-namespace
//! comment cache. [`Registry::register`] is the single entry point: it
//! memoizes by canonical name, delegates kind-specific construction to the
//! synthesizer, runs the customization pipeline and decides persistence.
//!
//! Registry state is scoped to one generated document. It is not safe for
//! concurrent mutation; callers synthesizing independent documents
//! concurrently use independent registries.

mod naming;

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use error_stack::Report;
use error_stack::ResultExt;

use crate::constraints::apply_constraints;
use crate::customize::Customizer;
use crate::customize::RegisterOpt;
use crate::descriptor::FieldDescriptor;
use crate::descriptor::TypeDescriptor;
use crate::descriptor::TypeKind;
use crate::document::SchemaDocument;
use crate::error::Error;
use crate::error::Result;
use crate::lookup::CommentProvider;
use crate::lookup::EnumConstantProvider;
use crate::lookup::is_marked_deprecated;
use crate::reference::is_primitive_name;
use crate::reference::reference_or_inline;
use crate::reference::should_reference;
use crate::schema::Schema;
use crate::schema::SchemaRef;

/// Owns synthesized definitions and the policies applied while building
/// them. One instance per generated document.
#[derive(Default)]
pub struct Registry {
    strip_namespaces: Vec<String>,
    customizers: Vec<Customizer>,
    comment_provider: Option<Box<dyn CommentProvider + Send + Sync>>,
    enum_provider: Option<Box<dyn EnumConstantProvider + Send + Sync>>,
    known: HashMap<String, Schema>,
    definitions: BTreeMap<String, Schema>,
    visiting: HashSet<String>,
    comment_cache: HashMap<String, BTreeMap<String, String>>,
}

impl Registry {
    /// An empty registry with no customization or lookup collaborators.
    pub fn new() -> Self { Self::default() }

    /// Omit namespaces starting with `prefix` from canonical names.
    pub fn strip_namespace(mut self, prefix: &str) -> Self {
        self.strip_namespaces.push(prefix.to_string());
        self
    }

    /// Append a global customizer. Customizers run in configuration order
    /// for every registered type, before self-customization hooks.
    pub fn with_customizer(mut self, customizer: Customizer) -> Self {
        self.customizers.push(customizer);
        self
    }

    /// Attach the comment lookup collaborator.
    pub fn with_comment_provider(
        mut self,
        provider: impl CommentProvider + Send + Sync + 'static,
    ) -> Self {
        self.comment_provider = Some(Box::new(provider));
        self
    }

    /// Attach the enum constant lookup collaborator.
    pub fn with_enum_provider(
        mut self,
        provider: impl EnumConstantProvider + Send + Sync + 'static,
    ) -> Self {
        self.enum_provider = Some(Box::new(provider));
        self
    }

    /// Seed a pre-registered schema for the type with the given canonical
    /// name (e.g. a timestamp type rendered as a formatted string). The
    /// schema is reused directly whenever that identity is registered.
    pub fn with_known_schema(mut self, identity: &str, schema: Schema) -> Self {
        self.known.insert(identity.to_string(), schema);
        self
    }

    /// The durable named definitions synthesized so far.
    pub const fn definitions(&self) -> &BTreeMap<String, Schema> { &self.definitions }

    /// Consume the registry into an assembled document.
    pub fn into_document(self, title: &str) -> SchemaDocument {
        let mut document = SchemaDocument::new(title);
        document.definitions = self.definitions;
        document
    }

    /// Synthesize (or reuse) the schema for `descriptor`, applying `opts`
    /// to the final node, and return its canonical name alongside it.
    ///
    /// Whether the returned schema also becomes a durable definition is
    /// decided by the referencing policy; callers embed the result through
    /// [`crate::reference::reference_or_inline`].
    ///
    /// # Errors
    ///
    /// Fails on unsupported kinds, non-text map keys, and comment or enum
    /// lookup collaborator failures. Any error aborts the enclosing
    /// document synthesis.
    pub fn register(
        &mut self,
        descriptor: &TypeDescriptor,
        opts: &[RegisterOpt],
    ) -> Result<(String, Schema)> {
        let name = self.model_name(descriptor);

        // Memoization by canonical name. Primitives are structurally equal
        // but not uniquely definitional, so their reserved names never hit.
        if !is_primitive_name(&name) {
            if let Some(existing) = self.definitions.get(&name) {
                return Ok((name, existing.clone()));
            }
        }

        // Pre-registered schemas are reused directly, persisted only when
        // the referencing policy qualifies them.
        if let Some(known) = self.known.get(&name) {
            let schema = known.clone();
            if !is_primitive_name(&name) && should_reference(&schema) {
                self.definitions.insert(name.clone(), schema.clone());
            }
            return Ok((name, schema));
        }

        // Cycle detection, record kinds only: a name already being visited
        // gets a minimal placeholder; the outer level resolves it into a
        // reference by the established name.
        let mut visit_key = None;
        if matches!(descriptor.kind(), TypeKind::Record(_)) {
            if self.visiting.contains(&name) {
                return Ok((name, Schema::object()));
            }
            self.visiting.insert(name.clone());
            visit_key = Some(name.clone());
        }

        let synthesized = self.synthesize(descriptor, name);
        // Removed on success and error alike; the set is scoped to one
        // top-level synthesis call tree.
        if let Some(key) = visit_key {
            self.visiting.remove(&key);
        }
        let (name, mut schema) = synthesized?;

        for customizer in &self.customizers {
            customizer.apply(descriptor, &mut schema);
        }
        if let Some(hook) = descriptor.customizer() {
            hook(&mut schema);
        }
        self.apply_opts(&name, &mut schema, opts)?;

        if !is_primitive_name(&name) && should_reference(&schema) {
            tracing::debug!("persisting definition {name}");
            self.definitions.insert(name.clone(), schema.clone());
        }

        Ok((name, schema))
    }

    /// Kind-specific construction of one schema node. Pure in the sense
    /// that it makes no persistence decisions of its own; nested types
    /// re-enter [`Self::register`].
    fn synthesize(
        &mut self,
        descriptor: &TypeDescriptor,
        name: String,
    ) -> Result<(String, Schema)> {
        let schema = match descriptor.kind() {
            TypeKind::Boolean => Schema::boolean(),
            TypeKind::Integer(_) => Schema::integer(),
            TypeKind::Float(_) => Schema::number(),
            TypeKind::Text => Schema::string(),
            TypeKind::Sequence(element) => {
                let element = element.resolve();
                let (element_name, element_schema) = self
                    .register(element.as_ref(), &[])
                    .change_context_lazy(|| Error::Synthesis {
                        identity: name.clone(),
                    })
                    .attach_printable("sequence element")?;
                // Absence and empty-sequence are both representable.
                let mut schema = Schema::array().nullable();
                schema.items = Some(Box::new(reference_or_inline(&element_name, element_schema)));
                schema
            }
            TypeKind::Map { key, value } => {
                let key = key.resolve();
                if !matches!(key.kind(), TypeKind::Text) {
                    return Err(Report::new(Error::InvalidMapKey {
                        identity: name,
                        key_kind: key.kind().to_string(),
                    }));
                }
                let value = value.resolve();
                let (value_name, value_schema) = self
                    .register(value.as_ref(), &[])
                    .change_context_lazy(|| Error::Synthesis {
                        identity: name.clone(),
                    })
                    .attach_printable("map value")?;
                let mut schema = Schema::object().nullable();
                schema.additional_properties =
                    Some(Box::new(reference_or_inline(&value_name, value_schema)));
                schema
            }
            TypeKind::Optional(inner) => {
                // The pointed-to type, registered with nullability forced;
                // the optional wrapper contributes nothing else and the
                // inner name replaces the `Ptr`-suffixed identity.
                let inner = inner.resolve();
                return self.register(inner.as_ref(), &[RegisterOpt::Nullable]);
            }
            TypeKind::Record(fields) => self.synthesize_record(descriptor, &name, fields)?,
            TypeKind::Opaque => {
                return Err(Report::new(Error::UnsupportedType { identity: name }));
            }
        };
        Ok((name, schema))
    }

    fn synthesize_record(
        &mut self,
        descriptor: &TypeDescriptor,
        name: &str,
        fields: &[FieldDescriptor],
    ) -> Result<Schema> {
        let mut schema = Schema::object();
        if let Some((comment, deprecated)) =
            self.type_comment(descriptor.namespace(), descriptor.name())?
        {
            if !comment.is_empty() {
                schema.description = Some(comment);
            }
            schema.deprecated = deprecated;
        }

        for field in fields {
            if !field.is_visible() {
                continue;
            }

            let mut effective = field.ty().resolve();
            if field.annotations().type_override() == Some("string") {
                effective = Arc::new(TypeDescriptor::text());
            }

            let external_name = field
                .annotations()
                .rename()
                .unwrap_or_else(|| field.name())
                .to_string();

            let field_opts: &[RegisterOpt] = if field.annotations().omit_empty() {
                &[RegisterOpt::Nullable]
            } else {
                &[]
            };

            // Whether the field's type already had a durable definition
            // before this registration; a freshly minted definition for an
            // embedded type is a throwaway and must not survive as an
            // orphan.
            let already_existed = self
                .definitions
                .contains_key(&self.model_name(effective.as_ref()));

            let (field_type_name, mut field_schema) = self
                .register(effective.as_ref(), field_opts)
                .change_context_lazy(|| Error::Synthesis {
                    identity: name.to_string(),
                })
                .attach_printable_lazy(|| format!("field {external_name}"))?;

            // Constraints land on this field's resolved node only, never on
            // a shared named definition.
            apply_constraints(field.annotations(), effective.kind(), &mut field_schema);

            if field.is_embedded() {
                if !already_existed {
                    self.definitions.remove(&field_type_name);
                }
                for (property, reference) in field_schema.properties {
                    schema.properties.insert(property, reference);
                }
                schema.required.extend(field_schema.required);
                continue;
            }

            let mut reference = reference_or_inline(&field_type_name, field_schema);
            if let SchemaRef::Inline(inline) = &mut reference {
                if let Some((comment, deprecated)) =
                    self.field_comment(descriptor.namespace(), descriptor.name(), field.name())?
                {
                    if !comment.is_empty() {
                        inline.description = Some(comment);
                    }
                    inline.deprecated = deprecated;
                }
            }
            schema.properties.insert(external_name, reference);
        }

        Ok(schema)
    }

    fn apply_opts(&self, identity: &str, schema: &mut Schema, opts: &[RegisterOpt]) -> Result<()> {
        for opt in opts {
            match opt {
                RegisterOpt::Nullable => schema.nullable = true,
                RegisterOpt::Description(description) => {
                    schema.description = Some(description.clone());
                }
                RegisterOpt::Example(example) => schema.example = Some(example.clone()),
                RegisterOpt::EnumValues(values) => values.apply(schema),
                RegisterOpt::DiscoveredEnum => {
                    let provider = self.enum_provider.as_ref().ok_or_else(|| {
                        Report::new(Error::EnumLookup {
                            identity: identity.to_string(),
                        })
                        .attach_printable("no enum constant provider configured")
                    })?;
                    let values = provider.constants(identity).map_err(|source| {
                        Report::new(Error::EnumLookup {
                            identity: identity.to_string(),
                        })
                        .attach_printable(source.to_string())
                    })?;
                    values.apply(schema);
                }
            }
        }
        Ok(())
    }

    /// Canonical name for a descriptor: namespace-stripped and normalized,
    /// `Ptr`-suffixed for optional wrappers, `map[K]V` for maps, and a
    /// session-unique `AnonymousType<N>` placeholder for unnamed records
    /// and sequences.
    fn model_name(&self, descriptor: &TypeDescriptor) -> String {
        let mut namespace = descriptor.namespace().to_string();
        let mut local = descriptor.local_name().to_string();
        match descriptor.kind() {
            TypeKind::Optional(inner) => {
                let inner = inner.resolve();
                namespace = inner.namespace().to_string();
                local = format!("{}Ptr", inner.local_name());
            }
            TypeKind::Map { key, value } => {
                local = format!(
                    "map[{}]{}",
                    key.resolve().local_name(),
                    value.resolve().local_name()
                );
            }
            _ => {}
        }
        if local.is_empty() {
            return format!("AnonymousType{}", self.definitions.len());
        }
        naming::canonical(&self.strip_namespaces, &namespace, &local)
    }

    fn type_comment(&mut self, namespace: &str, type_name: &str) -> Result<Option<(String, bool)>> {
        if namespace.is_empty() || type_name.is_empty() || self.comment_provider.is_none() {
            return Ok(None);
        }
        let comment = self.lookup_comment(namespace, &format!("{namespace}.{type_name}"))?;
        let deprecated = is_marked_deprecated(&comment);
        Ok(Some((comment, deprecated)))
    }

    fn field_comment(
        &mut self,
        namespace: &str,
        type_name: &str,
        field_name: &str,
    ) -> Result<Option<(String, bool)>> {
        if namespace.is_empty() || type_name.is_empty() || self.comment_provider.is_none() {
            return Ok(None);
        }
        let comment =
            self.lookup_comment(namespace, &format!("{namespace}.{type_name}.{field_name}"))?;
        let deprecated = is_marked_deprecated(&comment);
        Ok(Some((comment, deprecated)))
    }

    /// Resolve one comment key, populating the per-namespace cache on first
    /// use. Collaborator failure is fatal and carries namespace context.
    fn lookup_comment(&mut self, namespace: &str, key: &str) -> Result<String> {
        if !self.comment_cache.contains_key(namespace) {
            let Some(provider) = &self.comment_provider else {
                return Ok(String::new());
            };
            let comments = provider.comments(namespace).map_err(|source| {
                Report::new(Error::CommentLookup {
                    namespace: namespace.to_string(),
                })
                .attach_printable(source.to_string())
            })?;
            self.comment_cache.insert(namespace.to_string(), comments);
        }
        Ok(self
            .comment_cache
            .get(namespace)
            .and_then(|comments| comments.get(key))
            .cloned()
            .unwrap_or_default())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("strip_namespaces", &self.strip_namespaces)
            .field("customizers", &self.customizers.len())
            .field("definitions", &self.definitions.len())
            .field("visiting", &self.visiting.len())
            .finish_non_exhaustive()
    }
}

//! Documentation build session.
//!
//! A [`DocSession`] owns the shared pieces of one documentation build: the
//! type catalog, the resolver over it, and the schema/error/header
//! registries. Sessions are explicitly constructed and passed around; there
//! is no global state, so parallel builds and tests never observe each
//! other.

use crate::descriptor::{TypeCatalog, TypeRef};
use crate::error::Result;
use crate::registry::{
    ApiError, ApiHeader, DocRegistry, ErrorRegistry, HeaderRegistry, SchemaRegistry,
};
use crate::renderer::{self, RenderedSchema};
use crate::resolver::SchemaResolver;
use crate::schema::Schema;
use log::debug;
use std::sync::Arc;

/// One documentation build: catalog, resolver and shared registries.
///
/// Independent resolutions may run concurrently against the same session;
/// the registries deduplicate their results.
pub struct DocSession {
    resolver: SchemaResolver,
    schemas: SchemaRegistry,
    errors: ErrorRegistry,
    headers: HeaderRegistry,
}

impl DocSession {
    /// Create a session over a type catalog
    pub fn new(catalog: TypeCatalog) -> Self {
        debug!("Starting documentation session over {} types", catalog.len());
        Self {
            resolver: SchemaResolver::new(Arc::new(catalog)),
            schemas: DocRegistry::new("schema"),
            errors: DocRegistry::new("error"),
            headers: DocRegistry::new("header"),
        }
    }

    /// The catalog backing this session
    pub fn catalog(&self) -> &TypeCatalog {
        self.resolver.catalog()
    }

    /// Resolve a type into a fresh schema tree
    pub fn resolve_schema(&self, ty: &TypeRef) -> Schema {
        self.resolver.resolve(ty)
    }

    /// Register a resolved schema under the stable key derived from the
    /// originally requested type and return that key. Registration is
    /// idempotent; an existing entry is kept.
    pub fn register_and_get_ref(&self, ty: &TypeRef, schema: Schema) -> String {
        let key = ty.ref_name();
        self.schemas.register(key.clone(), schema);
        key
    }

    /// Resolve, register and render a type in one step.
    ///
    /// The rendered views always come from the registered tree, so repeated
    /// documentation of the same type stays consistent with the first.
    pub fn document(&self, ty: &TypeRef, include_metadata: bool) -> RenderedSchema {
        let schema = self.resolve_schema(ty);
        let key = self.register_and_get_ref(ty, schema);

        match self.schemas.get(&key) {
            Some(stored) => renderer::render(&stored, include_metadata),
            // Unregisterable input (empty name) still renders fail-soft
            None => renderer::render(&Schema::null(), include_metadata),
        }
    }

    /// Look up a previously registered schema by its stable key
    pub fn lookup_schema(&self, key: &str) -> Result<Arc<Schema>> {
        self.schemas.lookup(key)
    }

    /// Render a previously registered schema by its stable key
    pub fn render_registered(&self, key: &str, include_metadata: bool) -> Result<RenderedSchema> {
        let schema = self.schemas.lookup(key)?;
        Ok(renderer::render(&schema, include_metadata))
    }

    /// Register a documented error outcome, keyed by its name
    pub fn register_error(&self, error: ApiError) -> String {
        let key = error.name.clone();
        self.errors.register(key.clone(), error);
        key
    }

    /// Register a reusable documented header, keyed by its name
    pub fn register_header(&self, header: ApiHeader) -> String {
        let key = header.name.clone();
        self.headers.register(key.clone(), header);
        key
    }

    /// The schema registry of this session
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// The error registry of this session
    pub fn errors(&self) -> &ErrorRegistry {
        &self.errors
    }

    /// The header registry of this session
    pub fn headers(&self) -> &HeaderRegistry {
        &self.headers
    }
}

//! Type descriptors and the type catalog.
//!
//! The resolver never inspects live language types. It consumes plain data
//! descriptors: a [`TypeRef`] names a possibly-generic type occurrence, a
//! [`TypeDef`] describes the declared shape of a named type, and a
//! [`TypeCatalog`] is the injected provider that maps raw names to
//! definitions and answers the domain-boundary question. Catalogs are built
//! either by hand (host environments with their own metadata) or by the
//! source [`loader`](crate::loader).

use crate::constraint::ValidationMarker;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// Raw name of the universal top type.
///
/// Unresolvable generic arguments and erased container parameters default to
/// this type; it is never registered in a catalog, so it always resolves to
/// an opaque placeholder.
pub const TOP_TYPE: &str = "Value";

/// A reference to a possibly-generic type: raw name plus ordered actual
/// type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The raw type name (e.g. "String", "Vec", "User")
    pub name: String,
    /// Ordered actual type arguments (e.g. for `Vec<User>`, the ref for User)
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// Create a reference to an unparameterized type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Create a reference to a parameterized type
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Reference to the universal top type
    pub fn top() -> Self {
        Self::new(TOP_TYPE)
    }

    /// Whether this reference carries actual type arguments
    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }

    /// Positional type argument, if present
    pub fn arg(&self, index: usize) -> Option<&TypeRef> {
        self.args.get(index)
    }

    /// Produces a stable, collision-free name for this reference, including
    /// nested generic structure (e.g. `Vec<User>` names as "Vec.User").
    ///
    /// Keys derived from this name keep structurally distinct instantiations
    /// of the same raw shape apart in the registries.
    pub fn ref_name(&self) -> String {
        if self.args.is_empty() {
            return self.name.clone();
        }

        let mut name = self.name.clone();
        for arg in &self.args {
            name.push('.');
            name.push_str(&arg.ref_name());
        }
        name
    }
}

/// Secondary documentation source for a field: free-form description plus an
/// optional declared example value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldInfo {
    pub description: Option<String>,
    pub example: Option<Value>,
}

/// Documentation and validation metadata attached to a field declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMetadata {
    /// Primary description source
    pub description: Option<String>,
    /// Secondary description/example source, consulted when no primary
    /// description exists
    pub info: Option<FieldInfo>,
    /// Validation markers declared on the field
    pub markers: Vec<ValidationMarker>,
}

impl FieldMetadata {
    /// Description to document: the primary source wins, the field-info
    /// source is the fallback, absence stays absent.
    pub fn effective_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or_else(|| self.info.as_ref().and_then(|i| i.description.as_deref()))
    }

    /// Explicitly declared example value, if any
    pub fn example(&self) -> Option<&Value> {
        self.info.as_ref().and_then(|i| i.example.as_ref())
    }
}

/// A declared field: name, declared type, attached metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub metadata: FieldMetadata,
}

impl FieldDef {
    /// Create a field with no metadata
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            metadata: FieldMetadata::default(),
        }
    }

    /// Attach metadata to the field
    pub fn with_metadata(mut self, metadata: FieldMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach a validation marker to the field
    pub fn with_marker(mut self, marker: ValidationMarker) -> Self {
        self.metadata.markers.push(marker);
        self
    }

    /// Attach a primary description to the field
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }
}

/// Declared shape of a named type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// A record type with named fields and an optional supertype
    Struct {
        fields: Vec<FieldDef>,
        supertype: Option<String>,
    },
    /// A closed enumeration of named constants
    Enum { constants: Vec<String> },
}

/// Definition of a named type: raw name, owning module, declared type
/// parameters and shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    /// Dot-separated module path used by the domain-boundary predicate
    pub module: String,
    /// Declared type parameter names, in order
    pub params: Vec<String>,
    pub shape: TypeShape,
}

impl TypeDef {
    /// Create a struct definition with no fields yet
    pub fn structure(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            params: Vec::new(),
            shape: TypeShape::Struct {
                fields: Vec::new(),
                supertype: None,
            },
        }
    }

    /// Create an enum definition from its constant names
    pub fn enumeration(
        name: impl Into<String>,
        module: impl Into<String>,
        constants: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            params: Vec::new(),
            shape: TypeShape::Enum { constants },
        }
    }

    /// Declare a type parameter (ordered)
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Add a field (structs only; ignored for enums)
    pub fn with_field(mut self, field: FieldDef) -> Self {
        if let TypeShape::Struct { fields, .. } = &mut self.shape {
            fields.push(field);
        }
        self
    }

    /// Declare a supertype to inherit fields from (structs only)
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        if let TypeShape::Struct { supertype: s, .. } = &mut self.shape {
            *s = Some(supertype.into());
        }
        self
    }

    /// Whether this definition describes an enumeration
    pub fn is_enum(&self) -> bool {
        matches!(self.shape, TypeShape::Enum { .. })
    }

    /// Declared fields, empty for enums
    pub fn fields(&self) -> &[FieldDef] {
        match &self.shape {
            TypeShape::Struct { fields, .. } => fields,
            TypeShape::Enum { .. } => &[],
        }
    }

    /// Declared supertype name, if any
    pub fn supertype(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Struct { supertype, .. } => supertype.as_deref(),
            TypeShape::Enum { .. } => None,
        }
    }

    /// Enum constant names, empty for structs
    pub fn constants(&self) -> &[String] {
        match &self.shape {
            TypeShape::Enum { constants } => constants,
            TypeShape::Struct { .. } => &[],
        }
    }
}

/// Catalog of type definitions plus the domain-namespace boundary.
///
/// Only catalog types inside the boundary are expanded into full object
/// layouts; everything else resolves to an opaque placeholder. An empty
/// domain-module list means every registered type is domain-eligible, which
/// is the right default for catalogs loaded from the application's own
/// source tree.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: HashMap<String, TypeDef>,
    domain_modules: Vec<String>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the domain boundary to modules under the given prefix.
    /// May be called repeatedly to admit several prefixes.
    pub fn with_domain_module(mut self, prefix: impl Into<String>) -> Self {
        self.domain_modules.push(prefix.into());
        self
    }

    /// Register a type definition. The first definition of a name wins;
    /// later registrations of the same name are ignored.
    pub fn register(&mut self, def: TypeDef) {
        if self.types.contains_key(&def.name) {
            debug!("Type {} already registered, keeping first definition", def.name);
            return;
        }
        debug!("Registering type definition: {}", def.name);
        self.types.insert(def.name.clone(), def);
    }

    /// Look up a definition by raw name
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Boundary predicate: whether the named type may be expanded into a
    /// full object layout.
    pub fn is_expandable(&self, name: &str) -> bool {
        let Some(def) = self.types.get(name) else {
            return false;
        };

        self.domain_modules.is_empty()
            || self
                .domain_modules
                .iter()
                .any(|prefix| def.module.starts_with(prefix.as_str()))
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog holds no definitions
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over registered definitions in no particular order
    pub fn definitions(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }
}

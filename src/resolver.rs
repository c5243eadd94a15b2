//! Recursive schema resolution.
//!
//! [`SchemaResolver`] walks a type reference into a [`Schema`] tree: generic
//! parameters are substituted before classification, containers recurse into
//! their element and value types, domain objects expand field by field, and a
//! path-local recursion guard turns cyclic edges into terminal reference
//! markers. Resolution is fail-soft throughout; malformed input degrades to
//! NULL or opaque nodes instead of aborting the document build.

use crate::classifier;
use crate::constraint;
use crate::descriptor::{FieldDef, TypeCatalog, TypeDef, TypeRef};
use crate::generics::GenericContext;
use crate::schema::{
    ArraySchema, MapSchema, ObjectSchema, Property, PropertyKind, Schema, ValueSchema,
};
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

/// Path-local set of types currently being expanded.
///
/// Scoped to a single top-level resolution and never shared across calls.
/// Entries are keyed by substituted stable ref names and removed on the way
/// back up, so sibling branches may independently re-expand the same type.
#[derive(Debug, Default)]
struct RecursionGuard {
    expanding: HashSet<String>,
}

impl RecursionGuard {
    /// Returns false if the key is already on the current path
    fn enter(&mut self, key: &str) -> bool {
        self.expanding.insert(key.to_string())
    }

    fn exit(&mut self, key: &str) {
        self.expanding.remove(key);
    }
}

/// Resolves type references into schema trees against a shared type catalog.
///
/// The resolver holds only the immutable catalog; every top-level call owns a
/// fresh guard and root binding context, so independent resolutions may run
/// concurrently.
pub struct SchemaResolver {
    catalog: Arc<TypeCatalog>,
}

impl SchemaResolver {
    /// Create a resolver over the given catalog
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        debug!("Initializing SchemaResolver over {} type definitions", catalog.len());
        Self { catalog }
    }

    /// The catalog this resolver reads from
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Resolve a type into a schema tree.
    ///
    /// Entry point for one top-level resolution: initializes a fresh
    /// recursion guard and an empty root binding context.
    pub fn resolve(&self, ty: &TypeRef) -> Schema {
        debug!("Resolving schema for type: {}", ty.ref_name());
        let mut guard = RecursionGuard::default();
        self.resolve_with(ty, &GenericContext::root(), &mut guard)
    }

    /// Recursive resolution step: substitution, recursion guard,
    /// classification and dispatch.
    fn resolve_with(
        &self,
        ty: &TypeRef,
        ctx: &GenericContext,
        guard: &mut RecursionGuard,
    ) -> Schema {
        if ty.name.trim().is_empty() {
            return Schema::null();
        }

        // Substitute bound parameters before classifying; an unresolved
        // generic must never classify as an opaque object when a concrete
        // binding exists.
        let resolved = ctx.resolve(ty);

        // Option<T> documents as its inner type; presence is a field-level
        // concern handled by markers.
        if resolved.name == "Option" {
            return match resolved.arg(0) {
                Some(inner) => self.resolve_with(inner, ctx, guard),
                None => Schema::null(),
            };
        }

        let key = resolved.ref_name();
        if !guard.enter(&key) {
            debug!("Already expanding {}, emitting reference marker", key);
            return Schema::Object(ObjectSchema::reference(resolved.name.clone()));
        }

        let kind = classifier::classify(&resolved, &self.catalog);
        let schema = match kind {
            PropertyKind::Array => self.resolve_array(&resolved, ctx, guard),
            PropertyKind::Map => self.resolve_map(&resolved, ctx, guard),
            PropertyKind::Object => self.resolve_object(&resolved, ctx, guard),
            leaf => Schema::Value(ValueSchema::new(leaf)),
        };

        guard.exit(&key);
        schema
    }

    /// Arrays recurse once on the element type.
    fn resolve_array(
        &self,
        ty: &TypeRef,
        ctx: &GenericContext,
        guard: &mut RecursionGuard,
    ) -> Schema {
        // Raw containers with erased generics default to the top type
        let element_ty = ty.arg(0).cloned().unwrap_or_else(TypeRef::top);
        let element = self.resolve_with(&element_ty, ctx, guard);
        Schema::Array(ArraySchema::new(element))
    }

    /// Maps recurse on the value type; keys classify as leaf kinds only and
    /// are never expanded into objects.
    fn resolve_map(
        &self,
        ty: &TypeRef,
        ctx: &GenericContext,
        guard: &mut RecursionGuard,
    ) -> Schema {
        let key_ty = ty.arg(0).cloned().unwrap_or_else(|| TypeRef::new("String"));
        let value_ty = ty.arg(1).cloned().unwrap_or_else(TypeRef::top);

        let key_resolved = ctx.resolve(&key_ty);
        let key_kind = match classifier::classify(&key_resolved, &self.catalog) {
            kind if kind.is_container() => PropertyKind::String,
            kind => kind,
        };

        let value = self.resolve_with(&value_ty, ctx, guard);
        Schema::Map(MapSchema::new(key_kind, value))
    }

    /// Objects expand into their field layout, but only inside the domain
    /// boundary; everything else resolves to an opaque placeholder.
    fn resolve_object(
        &self,
        ty: &TypeRef,
        ctx: &GenericContext,
        guard: &mut RecursionGuard,
    ) -> Schema {
        if !self.catalog.is_expandable(&ty.name) {
            debug!("Type {} is outside the domain boundary, using opaque placeholder", ty.name);
            return Schema::Object(ObjectSchema::new());
        }

        let Some(def) = self.catalog.get(&ty.name) else {
            return Schema::Object(ObjectSchema::new());
        };

        // The expanded type's own parameters shadow the enclosing scope
        let child = GenericContext::for_type(&def.params, &ty.args);
        let field_ctx = ctx.merge(&child);

        let mut object = ObjectSchema::new();
        for field in self.collect_fields(def) {
            object.add_property(self.resolve_field(field, &field_ctx, guard));
        }

        Schema::Object(object)
    }

    /// Collects declared fields, own first, then up the supertype chain.
    /// Climbing stops at the first supertype outside the domain boundary.
    fn collect_fields<'a>(&'a self, def: &'a TypeDef) -> Vec<&'a FieldDef> {
        let mut fields: Vec<&FieldDef> = def.fields().iter().collect();
        let mut visited: HashSet<&str> = HashSet::from([def.name.as_str()]);
        let mut current = def;

        while let Some(super_name) = current.supertype() {
            if !visited.insert(super_name) || !self.catalog.is_expandable(super_name) {
                break;
            }
            let Some(super_def) = self.catalog.get(super_name) else {
                break;
            };
            fields.extend(super_def.fields().iter());
            current = super_def;
        }

        fields
    }

    /// Resolves a single field into an enriched property: nested schema plus
    /// required flag, description, example and constraint metadata.
    fn resolve_field(
        &self,
        field: &FieldDef,
        ctx: &GenericContext,
        guard: &mut RecursionGuard,
    ) -> Property {
        debug!("Resolving field: {}", field.name);

        let declared = unwrap_option(ctx.resolve(&field.ty));
        let kind = classifier::classify(&declared, &self.catalog);
        let value = self.resolve_with(&declared, ctx, guard);

        let mut property = Property::new(field.name.clone(), kind, value);

        if constraint::is_required(&field.metadata.markers) {
            property = property.required();
        }
        if let Some(description) = field.metadata.effective_description() {
            property = property.description(description);
        }
        if let Some(example) = field.metadata.example() {
            property = property.example(example.clone());
        }
        for formatted in constraint::resolve(&field.metadata.markers) {
            property.add_constraint(formatted);
        }

        // Enum leaves list every constant as an explicit allowed-values
        // constraint.
        if kind == PropertyKind::Enum {
            if let Some(def) = self.catalog.get(&declared.name) {
                if def.is_enum() {
                    property.add_constraint(constraint::allowed_values(def.constants()));
                }
            }
        }

        property
    }
}

/// Unwraps a single `Option` layer; presence is tracked by markers, not by
/// the schema shape.
fn unwrap_option(ty: TypeRef) -> TypeRef {
    if ty.name == "Option" && ty.args.len() == 1 {
        let mut args = ty.args;
        args.remove(0)
    } else {
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ValidationMarker;
    use crate::descriptor::TypeDef;

    fn resolver(catalog: TypeCatalog) -> SchemaResolver {
        SchemaResolver::new(Arc::new(catalog))
    }

    /// Helper asserting a schema is an object and returning it
    fn as_object(schema: &Schema) -> &ObjectSchema {
        match schema {
            Schema::Object(obj) => obj,
            other => panic!("expected object schema, got {:?}", other),
        }
    }

    fn as_array(schema: &Schema) -> &ArraySchema {
        match schema {
            Schema::Array(arr) => arr,
            other => panic!("expected array schema, got {:?}", other),
        }
    }

    /// Recursively checks that a tree contains no reference markers
    fn assert_no_references(schema: &Schema) {
        match schema {
            Schema::Value(_) => {}
            Schema::Object(obj) => {
                assert!(!obj.is_reference(), "unexpected reference marker");
                for p in obj.properties() {
                    assert_no_references(&p.value);
                }
            }
            Schema::Array(arr) => assert_no_references(arr.element()),
            Schema::Map(map) => assert_no_references(map.value()),
            Schema::Property(p) => assert_no_references(&p.value),
        }
    }

    fn user_catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("User", "app.models")
                .with_field(FieldDef::new("id", TypeRef::new("u64")))
                .with_field(FieldDef::new("name", TypeRef::new("String"))),
        );
        catalog
    }

    #[test]
    fn test_resolve_leaf_type() {
        let r = resolver(TypeCatalog::new());

        let schema = r.resolve(&TypeRef::new("String"));
        assert_eq!(
            schema,
            Schema::Value(ValueSchema::new(PropertyKind::String))
        );
    }

    #[test]
    fn test_resolve_unrecognizable_type() {
        let r = resolver(TypeCatalog::new());

        assert_eq!(r.resolve(&TypeRef::new("")), Schema::null());
        assert_eq!(r.resolve(&TypeRef::new("()")), Schema::null());
    }

    #[test]
    fn test_resolve_simple_struct() {
        let r = resolver(user_catalog());

        let schema = r.resolve(&TypeRef::new("User"));
        let obj = as_object(&schema);

        let names: Vec<&str> = obj.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
        assert_eq!(obj.property("id").unwrap().kind, PropertyKind::Number);
        assert_eq!(obj.property("name").unwrap().kind, PropertyKind::String);
        assert_no_references(&schema);
    }

    #[test]
    fn test_nested_struct_expansion() {
        let mut catalog = user_catalog();
        catalog.register(
            TypeDef::structure("Post", "app.models")
                .with_field(FieldDef::new("title", TypeRef::new("String")))
                .with_field(FieldDef::new("author", TypeRef::new("User"))),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Post"));
        let obj = as_object(&schema);

        let author = obj.property("author").unwrap();
        assert_eq!(author.kind, PropertyKind::Object);
        let author_obj = as_object(&author.value);
        assert!(author_obj.property("id").is_some());
        assert_no_references(&schema);
    }

    #[test]
    fn test_non_domain_type_resolves_to_placeholder() {
        let mut catalog = TypeCatalog::new().with_domain_module("app");
        catalog.register(
            TypeDef::structure("Order", "app.models")
                .with_field(FieldDef::new("audit", TypeRef::new("AuditRecord"))),
        );
        catalog.register(
            TypeDef::structure("AuditRecord", "platform.audit")
                .with_field(FieldDef::new("trace", TypeRef::new("String"))),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Order"));
        let obj = as_object(&schema);

        // Registered but outside the boundary: opaque, not expanded
        let audit = as_object(&obj.property("audit").unwrap().value);
        assert!(audit.is_empty());
        assert!(!audit.is_reference());
    }

    #[test]
    fn test_direct_self_recursion_yields_reference_marker() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Node", "app.models")
                .with_field(FieldDef::new("id", TypeRef::new("String")))
                .with_field(FieldDef::new(
                    "children",
                    TypeRef::generic("Vec", vec![TypeRef::new("Node")]),
                )),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Node"));
        let obj = as_object(&schema);
        assert_eq!(obj.properties().len(), 2);

        let children = obj.property("children").unwrap();
        assert_eq!(children.kind, PropertyKind::Array);

        let element = as_object(as_array(&children.value).element());
        assert!(element.is_reference());
        assert_eq!(element.reference_target(), Some("Node"));
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Author", "app.models")
                .with_field(FieldDef::new("name", TypeRef::new("String")))
                .with_field(FieldDef::new(
                    "posts",
                    TypeRef::generic("Vec", vec![TypeRef::new("Post")]),
                )),
        );
        catalog.register(
            TypeDef::structure("Post", "app.models")
                .with_field(FieldDef::new("title", TypeRef::new("String")))
                .with_field(FieldDef::new("author", TypeRef::new("Author"))),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Author"));
        let obj = as_object(&schema);

        let posts_element = as_array(&obj.property("posts").unwrap().value).element();
        let post_obj = as_object(posts_element);
        assert!(post_obj.property("title").is_some());

        // The cyclic edge back to Author is a terminal marker
        let author_ref = as_object(&post_obj.property("author").unwrap().value);
        assert!(author_ref.is_reference());
        assert_eq!(author_ref.reference_target(), Some("Author"));
    }

    #[test]
    fn test_map_value_self_recursion() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Tree", "app.models").with_field(FieldDef::new(
                "branches",
                TypeRef::generic("HashMap", vec![TypeRef::new("String"), TypeRef::new("Tree")]),
            )),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Tree"));
        let obj = as_object(&schema);

        let branches = obj.property("branches").unwrap();
        let map = match &branches.value {
            Schema::Map(map) => map,
            other => panic!("expected map schema, got {:?}", other),
        };
        assert_eq!(map.key_kind(), PropertyKind::String);

        let value_obj = as_object(map.value());
        assert!(value_obj.is_reference());
        assert_eq!(value_obj.reference_target(), Some("Tree"));
    }

    #[test]
    fn test_sibling_branches_expand_independently() {
        let mut catalog = user_catalog();
        catalog.register(
            TypeDef::structure("Conversation", "app.models")
                .with_field(FieldDef::new("sender", TypeRef::new("User")))
                .with_field(FieldDef::new("recipient", TypeRef::new("User"))),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Conversation"));
        let obj = as_object(&schema);

        // The guard is path-scoped: both sibling fields expand fully
        for name in ["sender", "recipient"] {
            let user_obj = as_object(&obj.property(name).unwrap().value);
            assert!(!user_obj.is_reference());
            assert!(user_obj.property("id").is_some());
        }
    }

    #[test]
    fn test_generic_substitution() {
        let mut catalog = user_catalog();
        catalog.register(
            TypeDef::structure("Envelope", "app.models")
                .with_param("T")
                .with_field(FieldDef::new("payload", TypeRef::new("T")))
                .with_field(FieldDef::new("sent_at", TypeRef::new("DateTime"))),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::generic("Envelope", vec![TypeRef::new("User")]));
        let obj = as_object(&schema);

        // T classified through its binding, not as an opaque object
        let payload = obj.property("payload").unwrap();
        let payload_obj = as_object(&payload.value);
        assert!(payload_obj.property("name").is_some());
        assert_eq!(
            obj.property("sent_at").unwrap().kind,
            PropertyKind::DateTime
        );
    }

    #[test]
    fn test_generic_container_field() {
        let mut catalog = user_catalog();
        catalog.register(
            TypeDef::structure("Page", "app.models")
                .with_param("T")
                .with_field(FieldDef::new(
                    "items",
                    TypeRef::generic("Vec", vec![TypeRef::new("T")]),
                ))
                .with_field(FieldDef::new("total", TypeRef::new("u64"))),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::generic("Page", vec![TypeRef::new("User")]));
        let obj = as_object(&schema);

        let items = obj.property("items").unwrap();
        assert_eq!(items.kind, PropertyKind::Array);
        let element_obj = as_object(as_array(&items.value).element());
        assert!(element_obj.property("id").is_some());
    }

    #[test]
    fn test_raw_generic_defaults_to_top_type() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Envelope", "app.models")
                .with_param("T")
                .with_field(FieldDef::new("payload", TypeRef::new("T"))),
        );
        let r = resolver(catalog);

        // No type argument supplied: the payload becomes an opaque object
        let schema = r.resolve(&TypeRef::new("Envelope"));
        let obj = as_object(&schema);
        let payload_obj = as_object(&obj.property("payload").unwrap().value);
        assert!(payload_obj.is_empty());
        assert!(!payload_obj.is_reference());
    }

    #[test]
    fn test_raw_map_defaults() {
        let r = resolver(TypeCatalog::new());

        let schema = r.resolve(&TypeRef::new("HashMap"));
        let map = match &schema {
            Schema::Map(map) => map,
            other => panic!("expected map schema, got {:?}", other),
        };

        assert_eq!(map.key_kind(), PropertyKind::String);
        let value_obj = as_object(map.value());
        assert!(value_obj.is_empty());
    }

    #[test]
    fn test_map_keys_are_never_expanded() {
        let mut catalog = user_catalog();
        catalog.register(
            TypeDef::structure("Index", "app.models").with_field(FieldDef::new(
                "by_user",
                TypeRef::generic("HashMap", vec![TypeRef::new("User"), TypeRef::new("u64")]),
            )),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Index"));
        let obj = as_object(&schema);

        let map = match &obj.property("by_user").unwrap().value {
            Schema::Map(map) => map,
            other => panic!("expected map schema, got {:?}", other),
        };
        // Object-kinded keys fall back to the string leaf kind
        assert_eq!(map.key_kind(), PropertyKind::String);
    }

    #[test]
    fn test_option_field_unwraps() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Profile", "app.models").with_field(FieldDef::new(
                "nickname",
                TypeRef::generic("Option", vec![TypeRef::new("String")]),
            )),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Profile"));
        let obj = as_object(&schema);

        let nickname = obj.property("nickname").unwrap();
        assert_eq!(nickname.kind, PropertyKind::String);
        assert!(!nickname.required);
    }

    #[test]
    fn test_field_constraint_metadata() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Account", "app.models").with_field(
                FieldDef::new("username", TypeRef::new("String"))
                    .with_marker(ValidationMarker::NotNull)
                    .with_marker(ValidationMarker::Length {
                        min: Some(3),
                        max: Some(10),
                    }),
            ),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Account"));
        let username = as_object(&schema).property("username").unwrap().clone();

        assert!(username.required);
        assert!(username.constraints.contains("NOT_NULL"));
        assert!(username.constraints.contains("MIN_LENGTH:3"));
        assert!(username.constraints.contains("MAX_LENGTH:10"));
    }

    #[test]
    fn test_enum_field_lists_allowed_values() {
        let mut catalog = TypeCatalog::new();
        catalog.register(TypeDef::enumeration(
            "Status",
            "app.models",
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        ));
        catalog.register(
            TypeDef::structure("Ticket", "app.models")
                .with_field(FieldDef::new("status", TypeRef::new("Status"))),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Ticket"));
        let status = as_object(&schema).property("status").unwrap();

        assert_eq!(status.kind, PropertyKind::Enum);
        assert!(status.constraints.contains("ALLOWED_VALUES:[A, B, C]"));
    }

    #[test]
    fn test_description_and_example_metadata() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Product", "app.models").with_field(
                FieldDef::new("sku", TypeRef::new("String"))
                    .with_description("Stock keeping unit")
                    .with_marker(ValidationMarker::NotBlank),
            ),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Product"));
        let sku = as_object(&schema).property("sku").unwrap();

        assert_eq!(sku.description.as_deref(), Some("Stock keeping unit"));
        assert!(sku.required);
    }

    #[test]
    fn test_inherited_fields_follow_supertype_chain() {
        let mut catalog = TypeCatalog::new().with_domain_module("app");
        catalog.register(
            TypeDef::structure("Base", "app.models")
                .with_field(FieldDef::new("created_at", TypeRef::new("DateTime")))
                .with_supertype("PlatformRecord"),
        );
        catalog.register(
            TypeDef::structure("PlatformRecord", "platform.persistence")
                .with_field(FieldDef::new("row_version", TypeRef::new("u64"))),
        );
        catalog.register(
            TypeDef::structure("Customer", "app.models")
                .with_field(FieldDef::new("name", TypeRef::new("String")))
                .with_supertype("Base"),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Customer"));
        let obj = as_object(&schema);

        // Own fields first, then inherited; the climb stops at the
        // platform-side supertype
        let names: Vec<&str> = obj.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "created_at"]);
    }

    #[test]
    fn test_subtype_fields_shadow_inherited() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Base", "app.models")
                .with_field(FieldDef::new("id", TypeRef::new("u64"))),
        );
        catalog.register(
            TypeDef::structure("Tagged", "app.models")
                .with_field(FieldDef::new("id", TypeRef::new("Uuid")))
                .with_supertype("Base"),
        );
        let r = resolver(catalog);

        let schema = r.resolve(&TypeRef::new("Tagged"));
        let obj = as_object(&schema);

        assert_eq!(obj.properties().len(), 1);
        assert_eq!(obj.property("id").unwrap().kind, PropertyKind::Uuid);
    }

    #[test]
    fn test_concurrent_resolutions_do_not_interfere() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDef::structure("Node", "app.models")
                .with_field(FieldDef::new("id", TypeRef::new("String")))
                .with_field(FieldDef::new(
                    "children",
                    TypeRef::generic("Vec", vec![TypeRef::new("Node")]),
                )),
        );
        let r = Arc::new(resolver(catalog));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                std::thread::spawn(move || r.resolve(&TypeRef::new("Node")))
            })
            .collect();

        let first = r.resolve(&TypeRef::new("Node"));
        for handle in handles {
            let schema = handle.join().expect("resolution thread panicked");
            assert_eq!(schema, first);
        }
    }
}

//! Generic type-parameter binding.
//!
//! When the resolver crosses an object boundary it derives a fresh
//! [`GenericContext`] from the declared parameters of the type being expanded
//! and the actual arguments it was instantiated with, merged over the
//! enclosing context with lexical-scoping precedence. Contexts are plain
//! values threaded through the traversal; nothing is shared between
//! concurrent resolutions.

use crate::descriptor::TypeRef;
use std::collections::HashMap;

/// A binding from declared type-parameter names to actual type arguments,
/// scoped to one branch of a resolution.
#[derive(Debug, Clone, Default)]
pub struct GenericContext {
    bindings: HashMap<String, TypeRef>,
}

impl GenericContext {
    /// The empty root context
    pub fn root() -> Self {
        Self::default()
    }

    /// Derive a context from a type's declared parameters and the actual
    /// arguments of an instantiation, paired positionally.
    ///
    /// Parameters left without an argument (raw instantiations with erased
    /// generics) bind to the universal top type.
    pub fn for_type(params: &[String], args: &[TypeRef]) -> Self {
        let bindings = params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let bound = args.get(i).cloned().unwrap_or_else(TypeRef::top);
                (param.clone(), bound)
            })
            .collect();

        Self { bindings }
    }

    /// Merge a child context over this one. Child entries take precedence on
    /// name collision, giving inner declarations lexical-scoping semantics.
    pub fn merge(&self, child: &GenericContext) -> GenericContext {
        let mut bindings = self.bindings.clone();
        for (name, ty) in &child.bindings {
            bindings.insert(name.clone(), ty.clone());
        }
        GenericContext { bindings }
    }

    /// Substitute bound parameters in a type reference.
    ///
    /// A bare occurrence of a bound parameter name becomes its bound
    /// argument; parameterized references keep their raw name and substitute
    /// recursively through their arguments; everything else is returned
    /// unchanged.
    pub fn resolve(&self, ty: &TypeRef) -> TypeRef {
        if ty.args.is_empty() {
            return match self.bindings.get(&ty.name) {
                Some(bound) => bound.clone(),
                None => ty.clone(),
            };
        }

        TypeRef::generic(
            ty.name.clone(),
            ty.args.iter().map(|arg| self.resolve(arg)).collect(),
        )
    }

    /// Whether this context binds no parameters
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

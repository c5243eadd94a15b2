//! Schema Documentation Generator - Structured schema views from Rust data types.
//!
//! This library resolves application data types into recursively defined
//! schema trees and projects each tree into three independent views: a
//! structural model, an example payload, and per-field metadata
//! (descriptions, constraints, required flags). Generic types are expanded
//! through positional parameter binding, and self-referential types are
//! bounded by a per-resolution recursion guard that turns cyclic edges into
//! terminal reference markers.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`loader`] - Scans and parses a Rust project into a type catalog
//! 2. [`descriptor`] - Type references, definitions and the catalog itself
//! 3. [`classifier`] - Maps type references to semantic schema kinds
//! 4. [`generics`] - Binds and substitutes generic type parameters
//! 5. [`resolver`] - Recursively resolves types into schema trees
//! 6. [`registry`] - Deduplicating keyed stores for schemas, errors and headers
//! 7. [`renderer`] - Projects schema trees into the three output views
//! 8. [`session`] - One documentation build: catalog, resolver and registries
//! 9. [`document`] - Assembles rendered views into the final bundle
//! 10. [`serializer`] - Serializes the bundle to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_schema::descriptor::TypeRef;
//! use apidoc_schema::document;
//! use apidoc_schema::loader::CatalogLoader;
//! use apidoc_schema::serializer::serialize_yaml;
//! use apidoc_schema::session::DocSession;
//! use std::path::PathBuf;
//!
//! // Load a type catalog from a project directory
//! let loader = CatalogLoader::new(PathBuf::from("./my-project"));
//! let load_result = loader.load().unwrap();
//!
//! // Open a session and document a root type
//! let session = DocSession::new(load_result.catalog);
//! let rendered = session.document(&TypeRef::new("User"), true);
//! println!("{}", rendered.model);
//!
//! // Or bundle several roots and serialize
//! let roots = vec![TypeRef::new("User"), TypeRef::new("Order")];
//! let bundle = document::assemble("My API", "1.0.0", &session, &roots, true);
//! let yaml = serialize_yaml(&bundle).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod loader;
pub mod descriptor;
pub mod classifier;
pub mod generics;
pub mod resolver;
pub mod registry;
pub mod renderer;
pub mod session;
pub mod document;
pub mod serializer;
pub mod schema;
pub mod constraint;
pub mod error;

//! Catalog loading from Rust source code.
//!
//! The resolver consumes abstract type descriptors; this module produces them
//! by static analysis of a project directory. It scans for `.rs` files,
//! parses them with `syn`, and extracts a [`TypeDef`] for every named-field
//! struct and every enum: field types become [`TypeRef`]s, doc comments
//! become descriptions, `#[serde(...)]` renames and skips are honored, and
//! `#[validate(...)]` attributes become validation markers. Files that fail
//! to parse are reported as warnings and skipped, so a project with a broken
//! file still documents everything else.

use crate::constraint::ValidationMarker;
use crate::descriptor::{FieldDef, FieldMetadata, TypeCatalog, TypeDef, TypeRef};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Loads a [`TypeCatalog`] from the Rust sources under a project directory.
pub struct CatalogLoader {
    root: PathBuf,
}

/// Outcome of a load: the catalog plus scan statistics and any warnings
/// collected along the way.
#[derive(Debug)]
pub struct LoadResult {
    /// The populated catalog
    pub catalog: TypeCatalog,
    /// Number of Rust files found
    pub files_scanned: usize,
    /// Number of files parsed successfully
    pub files_parsed: usize,
    /// Non-fatal problems encountered while scanning and parsing
    pub warnings: Vec<String>,
}

impl CatalogLoader {
    /// Create a loader rooted at a project directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Scan, parse and extract type definitions.
    ///
    /// # Errors
    ///
    /// Returns an error only if the root directory itself cannot be read;
    /// individual file problems are collected as warnings.
    pub fn load(&self) -> Result<LoadResult> {
        if !self.root.is_dir() {
            anyhow::bail!("Project path is not a directory: {}", self.root.display());
        }

        let mut warnings = Vec::new();
        let files = self.scan(&mut warnings);
        debug!("Found {} Rust files under {}", files.len(), self.root.display());

        let mut catalog = TypeCatalog::new();
        let mut files_parsed = 0;

        for path in &files {
            match self.parse_file(path) {
                Ok(syntax_tree) => {
                    files_parsed += 1;
                    let module = module_path_for(&self.root, path);
                    extract_items(&syntax_tree.items, &module, &mut catalog);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    warnings.push(format!("Skipping {}: {}", path.display(), e));
                }
            }
        }

        debug!(
            "Catalog loaded: {} types from {}/{} files",
            catalog.len(),
            files_parsed,
            files.len()
        );

        Ok(LoadResult {
            catalog,
            files_scanned: files.len(),
            files_parsed,
            warnings,
        })
    }

    /// Collects `.rs` files, skipping hidden directories and build output
    fn scan(&self, warnings: &mut Vec<String>) -> Vec<PathBuf> {
        let mut rust_files = Vec::new();

        // The root entry itself is never filtered, only directories below it
        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "rs") {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => warnings.push(format!("Cannot access path: {}", e)),
            }
        }

        rust_files.sort();
        rust_files
    }

    /// Parses a single Rust source file into a syntax tree
    fn parse_file(&self, path: &Path) -> Result<syn::File> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))
    }
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "target" || name.starts_with('.')
}

/// Derives a dot-separated module path from the file location, so the
/// domain-boundary predicate can filter by module prefix.
fn module_path_for(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);

    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = segments.last_mut() {
        *last = last.trim_end_matches(".rs").to_string();
    }

    // src/ is layout, not namespace; mod/lib/main files name their directory
    segments.retain(|s| s != "src");
    if matches!(
        segments.last().map(String::as_str),
        Some("mod") | Some("lib") | Some("main")
    ) {
        segments.pop();
    }

    segments.join(".")
}

/// Extracts definitions from items, descending into inline modules
fn extract_items(items: &[syn::Item], module: &str, catalog: &mut TypeCatalog) {
    for item in items {
        match item {
            syn::Item::Struct(item_struct) => {
                if let Some(def) = extract_struct(item_struct, module) {
                    catalog.register(def);
                }
            }
            syn::Item::Enum(item_enum) => {
                catalog.register(extract_enum(item_enum, module));
            }
            syn::Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    let nested_module = if module.is_empty() {
                        item_mod.ident.to_string()
                    } else {
                        format!("{}.{}", module, item_mod.ident)
                    };
                    extract_items(nested, &nested_module, catalog);
                }
            }
            _ => {}
        }
    }
}

fn extract_struct(item_struct: &syn::ItemStruct, module: &str) -> Option<TypeDef> {
    let name = item_struct.ident.to_string();

    let syn::Fields::Named(named) = &item_struct.fields else {
        debug!("Skipping struct {} without named fields", name);
        return None;
    };

    let mut def = TypeDef::structure(name, module);
    for param in item_struct.generics.type_params() {
        def = def.with_param(param.ident.to_string());
    }

    for field in &named.named {
        if let Some(field_def) = extract_field(field) {
            def = def.with_field(field_def);
        }
    }

    Some(def)
}

fn extract_enum(item_enum: &syn::ItemEnum, module: &str) -> TypeDef {
    let constants = item_enum
        .variants
        .iter()
        .map(|v| v.ident.to_string())
        .collect();

    TypeDef::enumeration(item_enum.ident.to_string(), module, constants)
}

fn extract_field(field: &syn::Field) -> Option<FieldDef> {
    let declared_name = field.ident.as_ref()?.to_string();
    let attrs = FieldAttributes::parse(&field.attrs);

    if attrs.skip {
        debug!("Skipping field {} marked serde(skip)", declared_name);
        return None;
    }

    let ty = type_ref_from(&field.ty);
    let (ty, optional) = lower_option(ty);

    let mut markers = attrs.markers;
    if !optional {
        // Non-optional fields must be present in the payload
        markers.push(ValidationMarker::NotNull);
    }

    Some(FieldDef {
        name: attrs.rename.unwrap_or(declared_name),
        ty,
        metadata: FieldMetadata {
            description: attrs.doc,
            info: None,
            markers,
        },
    })
}

/// `Option<T>` lowers to an optional `T`
fn lower_option(ty: TypeRef) -> (TypeRef, bool) {
    if ty.name == "Option" && ty.args.len() == 1 {
        let mut args = ty.args;
        (args.remove(0), true)
    } else {
        (ty, false)
    }
}

/// Maps a `syn::Type` to a descriptor reference
fn type_ref_from(ty: &syn::Type) -> TypeRef {
    match ty {
        syn::Type::Path(type_path) => type_ref_from_path(&type_path.path),
        syn::Type::Reference(reference) => type_ref_from(&reference.elem),
        // Slices and fixed arrays document as homogeneous sequences
        syn::Type::Slice(slice) => TypeRef::generic("Vec", vec![type_ref_from(&slice.elem)]),
        syn::Type::Array(array) => TypeRef::generic("Vec", vec![type_ref_from(&array.elem)]),
        syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::new("()"),
        syn::Type::Paren(paren) => type_ref_from(&paren.elem),
        _ => TypeRef::top(),
    }
}

fn type_ref_from_path(path: &syn::Path) -> TypeRef {
    let Some(segment) = path.segments.last() else {
        return TypeRef::top();
    };
    let name = segment.ident.to_string();

    let args: Vec<TypeRef> = match &segment.arguments {
        syn::PathArguments::AngleBracketed(bracketed) => bracketed
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(inner) => Some(type_ref_from(inner)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    // Smart pointers are transparent wrappers around their pointee
    if matches!(name.as_str(), "Box" | "Arc" | "Rc") && args.len() == 1 {
        let mut args = args;
        return args.remove(0);
    }

    TypeRef::generic(name, args)
}

/// Attributes collected from a field declaration
#[derive(Debug, Default)]
struct FieldAttributes {
    doc: Option<String>,
    rename: Option<String>,
    skip: bool,
    markers: Vec<ValidationMarker>,
}

impl FieldAttributes {
    fn parse(attrs: &[syn::Attribute]) -> Self {
        let mut result = FieldAttributes::default();
        let mut doc_lines: Vec<String> = Vec::new();

        for attr in attrs {
            if attr.path().is_ident("doc") {
                if let syn::Meta::NameValue(name_value) = &attr.meta {
                    if let syn::Expr::Lit(expr_lit) = &name_value.value {
                        if let syn::Lit::Str(lit) = &expr_lit.lit {
                            doc_lines.push(lit.value().trim().to_string());
                        }
                    }
                }
                continue;
            }

            if attr.path().is_ident("serde") {
                if let Ok(meta_list) = attr.meta.require_list() {
                    let tokens_str = meta_list.tokens.to_string();

                    if let Some(value) = extract_assigned_string(&tokens_str, "rename") {
                        result.rename = Some(value);
                    }
                    if tokens_str.contains("skip") && !tokens_str.contains("skip_serializing_if") {
                        result.skip = true;
                    }
                }
                continue;
            }

            if attr.path().is_ident("validate") {
                if let Ok(meta_list) = attr.meta.require_list() {
                    let tokens_str = meta_list.tokens.to_string();
                    result.markers.extend(parse_validate_markers(&tokens_str));
                }
            }
        }

        if !doc_lines.is_empty() {
            result.doc = Some(doc_lines.join(" ").trim().to_string());
        }

        result
    }
}

/// Parses `#[validate(...)]` token text into validation markers.
///
/// Recognizes the common forms: `length(min = 3, max = 10)`,
/// `range(min = 0, max = 150)`, `regex = "..."` / `pattern = "..."` and
/// `required`.
fn parse_validate_markers(tokens_str: &str) -> Vec<ValidationMarker> {
    let mut markers = Vec::new();

    if let Some(group) = extract_group(tokens_str, "length") {
        markers.push(ValidationMarker::Length {
            min: extract_assigned_number(&group, "min"),
            max: extract_assigned_number(&group, "max"),
        });
    }

    if let Some(group) = extract_group(tokens_str, "range") {
        markers.push(ValidationMarker::Range {
            min: extract_assigned_number(&group, "min"),
            max: extract_assigned_number(&group, "max"),
        });
    }

    for key in ["regex", "pattern"] {
        if let Some(pattern) = extract_assigned_string(tokens_str, key) {
            markers.push(ValidationMarker::Pattern(pattern));
            break;
        }
    }

    if tokens_str.contains("required") {
        markers.push(ValidationMarker::NotNull);
    }

    markers
}

/// Extracts the parenthesized group following a key, e.g. `length(...)`
fn extract_group(tokens_str: &str, key: &str) -> Option<String> {
    let key_pos = tokens_str.find(key)?;
    let after_key = &tokens_str[key_pos + key.len()..];
    let open = after_key.find('(')?;
    let close = after_key[open..].find(')')? + open;
    Some(after_key[open + 1..close].to_string())
}

/// Extracts a number assigned to a key, e.g. `min = 3`
fn extract_assigned_number<T: std::str::FromStr>(tokens_str: &str, key: &str) -> Option<T> {
    let key_pos = tokens_str.find(key)?;
    let after_eq = tokens_str[key_pos..].find('=')? + key_pos + 1;
    let rest = tokens_str[after_eq..].trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '-')
        .unwrap_or(rest.len());
    rest[..end].trim().parse().ok()
}

/// Extracts a quoted string assigned to a key, e.g. `rename = "userName"`
fn extract_assigned_string(tokens_str: &str, key: &str) -> Option<String> {
    let key_pos = tokens_str.find(key)?;
    let after_key = &tokens_str[key_pos..];
    let eq_pos = after_key.find('=')?;
    let after_eq = &after_key[eq_pos + 1..];
    let start_quote = after_eq.find('"')?;
    let after_start = &after_eq[start_quote + 1..];
    let end_quote = after_start.find('"')?;
    Some(after_start[..end_quote].to_string())
}

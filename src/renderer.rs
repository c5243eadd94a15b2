//! View rendering for resolved schema trees.
//!
//! Projects a [`Schema`] into three independent views: the structural model,
//! an example payload, and a flat per-field metadata map. Rendering is
//! read-only over the tree; the three projections can be computed in any
//! order.

use crate::schema::{Property, PropertyKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The rendered views of one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSchema {
    /// Structural skeleton: kind display names in the shape of the type
    pub model: Value,
    /// Same shape populated with declared or synthetic example values
    pub example_model: Value,
    /// Flat field-path metadata, present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Render a schema into its projections.
pub fn render(schema: &Schema, include_metadata: bool) -> RenderedSchema {
    RenderedSchema {
        model: render_model(schema),
        example_model: render_example(schema),
        metadata: include_metadata.then(|| {
            let mut out = Map::new();
            build_metadata(schema, "", &mut out);
            Value::Object(out)
        }),
    }
}

/// Render with metadata, as used for request bodies
pub fn render_request(schema: &Schema) -> RenderedSchema {
    render(schema, true)
}

/// Render without metadata, as used for response bodies
pub fn render_response(schema: &Schema) -> RenderedSchema {
    render(schema, false)
}

fn render_model(schema: &Schema) -> Value {
    match schema {
        Schema::Value(value) => Value::String(value.kind.display_name().to_string()),
        Schema::Property(property) => render_model(&property.value),
        Schema::Array(array) => {
            // A single representative element signals "list of X"
            Value::Array(vec![render_model(array.element())])
        }
        Schema::Map(map) => json!({
            "key": map.key_kind().display_name(),
            "value": render_model(map.value()),
        }),
        Schema::Object(object) => match object.reference_target() {
            Some(target) => Value::String(target.to_string()),
            None => {
                let mut out = Map::new();
                for property in object.properties() {
                    out.insert(property.name.clone(), render_model(&property.value));
                }
                Value::Object(out)
            }
        },
    }
}

fn render_example(schema: &Schema) -> Value {
    match schema {
        Schema::Value(value) => leaf_example(value.kind),
        Schema::Property(property) => match &property.example {
            Some(example) => example.clone(),
            None => render_example(&property.value),
        },
        Schema::Array(array) => Value::Array(vec![render_example(array.element())]),
        Schema::Map(map) => json!({
            "key": leaf_example(map.key_kind()),
            "value": render_example(map.value()),
        }),
        Schema::Object(object) => match object.reference_target() {
            Some(_) => Value::Null,
            None => {
                let mut out = Map::new();
                for property in object.properties() {
                    out.insert(property.name.clone(), render_example(&property.value));
                }
                Value::Object(out)
            }
        },
    }
}

/// Synthetic default example for a leaf kind. Kinds with no meaningful
/// default (binary among them) render as null.
fn leaf_example(kind: PropertyKind) -> Value {
    match kind {
        PropertyKind::String => json!("hello"),
        PropertyKind::Number => json!(123),
        PropertyKind::Boolean => json!(true),
        PropertyKind::Uuid => json!("550e8400-e29b-41d4-a716-446655440000"),
        PropertyKind::DateTime => json!("2025-01-29T10:15:30Z"),
        PropertyKind::Date => json!("2025-01-29"),
        PropertyKind::Time => json!("10:15:30"),
        _ => Value::Null,
    }
}

/// Collects metadata entries for every leaf field reachable from the node.
///
/// Container nodes are traversed through without producing entries of their
/// own; array positions are marked with `[0]`, map values continue at the
/// parent path.
fn build_metadata(schema: &Schema, path: &str, out: &mut Map<String, Value>) {
    match schema {
        Schema::Value(_) => {}
        Schema::Property(property) => property_metadata(property, path, out),
        Schema::Array(array) => {
            build_metadata(array.element(), &format!("{}[0]", path), out);
        }
        Schema::Map(map) => {
            build_metadata(map.value(), path, out);
        }
        Schema::Object(object) => {
            for property in object.properties() {
                let child_path = if path.is_empty() {
                    property.name.clone()
                } else {
                    format!("{}.{}", path, property.name)
                };
                property_metadata(property, &child_path, out);
            }
        }
    }
}

fn property_metadata(property: &Property, path: &str, out: &mut Map<String, Value>) {
    match &property.value {
        Schema::Value(_) => {
            let mut entry = Map::new();
            if let Some(description) = &property.description {
                entry.insert("description".to_string(), json!(description));
            }
            entry.insert("required".to_string(), json!(property.required));
            entry.insert(
                "constraints".to_string(),
                Value::Array(property.constraints.iter().map(|c| json!(c)).collect()),
            );

            let key = if path.is_empty() {
                property.name.clone()
            } else {
                path.to_string()
            };
            out.insert(key, Value::Object(entry));
        }
        nested => build_metadata(nested, path, out),
    }
}

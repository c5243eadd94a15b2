//! Schema tree data model.
//!
//! A resolved type is represented as a tree of [`Schema`] nodes. Trees are
//! built bottom-up by the resolver and never mutated afterwards; registries
//! take ownership of finished trees.

use serde_json::Value;
use std::collections::BTreeSet;

/// Semantic kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Null,
    Enum,
    Uuid,
    Date,
    Time,
    DateTime,
    Duration,
    Period,
    Uri,
    Binary,
    Object,
    Array,
    Map,
}

impl PropertyKind {
    /// Display name used when rendering the structural model view.
    pub fn display_name(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Number => "number",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Null => "null",
            PropertyKind::Enum => "enum",
            PropertyKind::Uuid => "uuid",
            PropertyKind::Date => "date",
            PropertyKind::Time => "time",
            PropertyKind::DateTime => "date-time",
            PropertyKind::Duration => "duration",
            PropertyKind::Period => "period",
            PropertyKind::Uri => "uri",
            PropertyKind::Binary => "binary",
            PropertyKind::Object => "object",
            PropertyKind::Array => "array",
            PropertyKind::Map => "map",
        }
    }

    /// Whether this kind describes a container node rather than a leaf value.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            PropertyKind::Object | PropertyKind::Array | PropertyKind::Map
        )
    }
}

/// A node in the resolved schema tree.
///
/// Every node has exactly one kind. Matches over this enum are exhaustive
/// everywhere in the crate, so adding a variant surfaces every render and
/// traversal site at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// An atomic value of a leaf kind
    Value(ValueSchema),
    /// A set of named properties, or a reference/placeholder marker
    Object(ObjectSchema),
    /// A homogeneous sequence
    Array(ArraySchema),
    /// An associative container with leaf-kind keys
    Map(MapSchema),
    /// A named field wrapping a nested schema plus documentation metadata
    Property(Box<Property>),
}

impl Schema {
    /// Minimal NULL-kind leaf used for malformed or unrecognizable input.
    pub fn null() -> Schema {
        Schema::Value(ValueSchema::new(PropertyKind::Null))
    }
}

/// An atomic value node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSchema {
    /// The leaf kind of the value
    pub kind: PropertyKind,
}

impl ValueSchema {
    /// Create a value node of the given kind
    pub fn new(kind: PropertyKind) -> Self {
        Self { kind }
    }
}

/// A JSON-object-shaped node: named properties in declaration order.
///
/// Also doubles as two degenerate markers: an empty placeholder for types
/// outside the domain boundary, and a reference marker standing in for a type
/// already being expanded earlier on the current resolution path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    reference: Option<String>,
    properties: Vec<Property>,
}

impl ObjectSchema {
    /// Create an empty object schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a terminal reference marker naming the target type.
    ///
    /// Reference markers carry no children and are never re-expanded on the
    /// resolution path that produced them.
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            properties: Vec::new(),
        }
    }

    /// Add a property, preserving insertion order.
    ///
    /// Property names are unique within an object; a property whose name is
    /// already present is ignored (first declaration wins, so subtype fields
    /// shadow inherited ones).
    pub fn add_property(&mut self, property: Property) {
        if self.properties.iter().any(|p| p.name == property.name) {
            return;
        }
        self.properties.push(property);
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Whether this object has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Whether this object is a reference marker
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Target type name if this object is a reference marker
    pub fn reference_target(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// A homogeneous array node holding the schema of its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    element: Box<Schema>,
}

impl ArraySchema {
    /// Create an array schema from a fully formed element schema
    pub fn new(element: Schema) -> Self {
        Self {
            element: Box::new(element),
        }
    }

    /// Schema describing every element of the array
    pub fn element(&self) -> &Schema {
        &self.element
    }
}

/// An associative container node: leaf key kind plus value schema.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSchema {
    key_kind: PropertyKind,
    value: Box<Schema>,
}

impl MapSchema {
    /// Create a map schema from a leaf key kind and a fully formed value schema
    pub fn new(key_kind: PropertyKind, value: Schema) -> Self {
        Self {
            key_kind,
            value: Box::new(value),
        }
    }

    /// Kind of the map keys (always a leaf kind; keys are never expanded)
    pub fn key_kind(&self) -> PropertyKind {
        self.key_kind
    }

    /// Schema describing the map values
    pub fn value(&self) -> &Schema {
        &self.value
    }
}

/// A named field within an object, wrapping its value schema and the
/// documentation metadata collected from field markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Field name
    pub name: String,
    /// Classified kind of the field's declared type
    pub kind: PropertyKind,
    /// Schema of the field's value
    pub value: Schema,
    /// Whether a must-be-present marker was declared on the field
    pub required: bool,
    /// Human-readable description, if any source declared one
    pub description: Option<String>,
    /// Explicitly declared example value
    pub example: Option<Value>,
    /// Formatted constraint strings, ordered for deterministic output
    pub constraints: BTreeSet<String>,
}

impl Property {
    /// Create a property with no metadata attached
    pub fn new(name: impl Into<String>, kind: PropertyKind, value: Schema) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
            required: false,
            description: None,
            example: None,
            constraints: BTreeSet::new(),
        }
    }

    /// Mark the property as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an example value
    pub fn example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Add a constraint string; blank constraints are ignored
    pub fn add_constraint(&mut self, constraint: impl Into<String>) {
        let constraint = constraint.into();
        if !constraint.trim().is_empty() {
            self.constraints.insert(constraint);
        }
    }
}

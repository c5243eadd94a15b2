//! Assembly of the final documentation bundle.
//!
//! A [`DocumentBundle`] collects the rendered views of every documented root
//! type, together with the error and header records registered during the
//! session, into one serializable value.

use crate::descriptor::TypeRef;
use crate::registry::{ApiError, ApiHeader};
use crate::renderer::RenderedSchema;
use crate::session::DocSession;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete documentation output for one build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentBundle {
    /// Document title
    pub title: String,
    /// Document version
    pub version: String,
    /// Rendered views per stable schema key, sorted by key
    pub schemas: BTreeMap<String, RenderedSchema>,
    /// Documented error outcomes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiError>,
    /// Documented reusable headers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<ApiHeader>,
}

impl DocumentBundle {
    /// Create an empty bundle
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            schemas: BTreeMap::new(),
            errors: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Add a rendered schema under its stable key
    pub fn add_schema(&mut self, key: impl Into<String>, rendered: RenderedSchema) {
        self.schemas.insert(key.into(), rendered);
    }
}

/// Documents every root type through the session and bundles the results
/// together with the session's registered errors and headers.
pub fn assemble(
    title: &str,
    version: &str,
    session: &DocSession,
    roots: &[TypeRef],
    include_metadata: bool,
) -> DocumentBundle {
    debug!("Assembling document bundle for {} root types", roots.len());

    let mut bundle = DocumentBundle::new(title, version);
    for root in roots {
        let rendered = session.document(root, include_metadata);
        bundle.add_schema(root.ref_name(), rendered);
    }

    bundle.errors = session
        .errors()
        .entries()
        .into_iter()
        .map(|(_, error)| (*error).clone())
        .collect();
    bundle.headers = session
        .headers()
        .entries()
        .into_iter()
        .map(|(_, header)| (*header).clone())
        .collect();

    bundle
}

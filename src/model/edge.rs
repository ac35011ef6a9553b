//! Edge — a directed attack relationship between two vertices.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value, VertexId};

/// Opaque edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge in the attack graph.
///
/// The label names the attack ("POD_EXEC", "VOLUME_MOUNT", "IDENTITY_ASSUME", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub src: VertexId,
    pub dst: VertexId,
    pub label: String,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(id: EdgeId, src: VertexId, dst: VertexId, label: impl Into<String>) -> Self {
        Self {
            id,
            src,
            dst,
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

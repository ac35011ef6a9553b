//! Vertex — an infrastructure entity in the attack graph.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value};

/// Property marking a vertex as a high-value compromise target.
pub const CRITICAL_PROPERTY: &str = "critical";

/// Opaque vertex identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex in the attack graph: one infrastructure entity.
///
/// The label is the entity type ("Container", "Identity", "Node", ...);
/// everything else lives in the property map. Vertices are immutable for
/// the duration of a search — the engine only ever clones them into paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub label: String,
    pub properties: PropertyMap,
}

impl Vertex {
    pub fn new(id: VertexId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// A vertex is critical iff the `critical` property is present and `true`.
    pub fn is_critical(&self) -> bool {
        matches!(self.get(CRITICAL_PROPERTY), Some(Value::Bool(true)))
    }

    /// The `name` property, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_flag() {
        let plain = Vertex::new(VertexId(1), "Container");
        assert!(!plain.is_critical());

        let flagged = Vertex::new(VertexId(2), "Node").with_property(CRITICAL_PROPERTY, true);
        assert!(flagged.is_critical());

        // Anything other than Bool(true) does not count.
        let odd = Vertex::new(VertexId(3), "Node").with_property(CRITICAL_PROPERTY, "true");
        assert!(!odd.is_critical());
    }
}

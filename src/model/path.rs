//! AttackPath — a sequence of alternating vertices and edges.

use serde::{Deserialize, Serialize};
use super::{Edge, Vertex, VertexId};

/// A path through the attack graph: vertex -[edge]-> vertex -[edge]-> vertex ...
///
/// Invariants: `vertices` always has one more element than `edges`, and no
/// vertex id appears twice (simple path). The search engine maintains both;
/// `append` only upholds the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackPath {
    /// Vertices along the path, start first.
    pub vertices: Vec<Vertex>,
    /// Edges connecting consecutive vertices.
    pub edges: Vec<Edge>,
}

impl AttackPath {
    pub fn single(vertex: Vertex) -> Self {
        Self { vertices: vec![vertex], edges: Vec::new() }
    }

    /// Path length in hops (edge count).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn start(&self) -> &Vertex {
        self.vertices.first().expect("AttackPath always has at least one vertex")
    }

    pub fn end(&self) -> &Vertex {
        self.vertices.last().expect("AttackPath always has at least one vertex")
    }

    /// Extend the path with an edge and its target vertex.
    pub fn append(&mut self, edge: Edge, vertex: Vertex) {
        self.edges.push(edge);
        self.vertices.push(vertex);
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.iter().any(|v| v.id == id)
    }
}

impl std::fmt::Display for AttackPath {
    /// Renders as `Container(app-pod) -[CE_NSENTER]-> Node(worker-1)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, " -[{}]-> ", self.edges[i - 1].label)?;
            }
            match vertex.name() {
                Some(name) => write!(f, "{}({})", vertex.label, name)?,
                None => write!(f, "{}({})", vertex.label, vertex.id)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeId;

    #[test]
    fn test_append_and_endpoints() {
        let a = Vertex::new(VertexId(1), "Container").with_property("name", "web");
        let b = Vertex::new(VertexId(2), "Node").with_property("name", "worker-1");
        let e = Edge::new(EdgeId(1), VertexId(1), VertexId(2), "CE_NSENTER");

        let mut path = AttackPath::single(a);
        assert_eq!(path.len(), 0);

        path.append(e, b);
        assert_eq!(path.len(), 1);
        assert_eq!(path.start().id, VertexId(1));
        assert_eq!(path.end().id, VertexId(2));
        assert!(path.contains_vertex(VertexId(2)));
        assert!(!path.contains_vertex(VertexId(3)));

        assert_eq!(
            path.to_string(),
            "Container(web) -[CE_NSENTER]-> Node(worker-1)"
        );
    }
}

//! # Graph View Trait
//!
//! This is THE contract between the search engine and any graph store.
//! The engine only ever reads: an already-populated attack graph is handed
//! in, traversed, and left untouched.
//!
//! ## Implementations
//!
//! | View | Module | Description |
//! |------|--------|-------------|
//! | `MemoryGraph` | `memory` | In-memory reference implementation |
//!
//! Only three operations are required; everything else has a default built
//! on top of them. A backing store with real indexes should override the
//! lookup methods rather than paying for the full-scan defaults.

pub mod memory;

use async_trait::async_trait;

use crate::model::{Edge, Value, Vertex, VertexId};
use crate::{Error, Result};

pub use memory::MemoryGraph;

/// Read-only access to a populated attack graph.
///
/// Contract the search engine relies on: `outgoing_edges` must return the
/// same edges in the same order for the same vertex across calls within one
/// search. The order itself is store-defined.
#[async_trait]
pub trait GraphView: Send + Sync + 'static {
    /// Look up a vertex by id. Returns None if not present.
    async fn vertex(&self, id: VertexId) -> Result<Option<Vertex>>;

    /// All vertices in the graph.
    async fn all_vertices(&self) -> Result<Vec<Vertex>>;

    /// All edges whose source is `from`, in stable store order.
    async fn outgoing_edges(&self, from: VertexId) -> Result<Vec<Edge>>;

    /// Materialize the target vertex of an edge.
    ///
    /// A dangling edge is a store inconsistency and surfaces as `GraphRead`.
    async fn target_of(&self, edge: &Edge) -> Result<Vertex> {
        self.vertex(edge.dst).await?.ok_or_else(|| {
            Error::GraphRead(format!(
                "edge {} points at missing vertex {}",
                edge.id, edge.dst
            ))
        })
    }

    /// All vertices with the given label.
    async fn vertices_by_label(&self, label: &str) -> Result<Vec<Vertex>> {
        let mut vertices = self.all_vertices().await?;
        vertices.retain(|v| v.label == label);
        Ok(vertices)
    }

    /// All vertices with the given label whose property `key` equals `value`.
    async fn vertices_by_property(
        &self,
        label: &str,
        key: &str,
        value: &Value,
    ) -> Result<Vec<Vertex>> {
        let mut vertices = self.vertices_by_label(label).await?;
        vertices.retain(|v| v.get(key) == Some(value));
        Ok(vertices)
    }

    /// Total number of vertices.
    async fn vertex_count(&self) -> Result<u64> {
        Ok(self.all_vertices().await?.len() as u64)
    }

    /// Total number of edges.
    async fn edge_count(&self) -> Result<u64> {
        let mut count = 0u64;
        for vertex in self.all_vertices().await? {
            count += self.outgoing_edges(vertex.id).await?.len() as u64;
        }
        Ok(count)
    }

    /// All distinct vertex labels.
    async fn labels(&self) -> Result<Vec<String>> {
        let mut labels: Vec<String> =
            self.all_vertices().await?.into_iter().map(|v| v.label).collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }

    /// All distinct edge labels (attack names).
    async fn edge_labels(&self) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for vertex in self.all_vertices().await? {
            for edge in self.outgoing_edges(vertex.id).await? {
                labels.push(edge.label);
            }
        }
        labels.sort();
        labels.dedup();
        Ok(labels)
    }
}

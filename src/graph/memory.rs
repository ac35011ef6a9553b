//! In-memory attack graph.
//!
//! This is the reference implementation of `GraphView`. It uses simple
//! hashbrown maps protected by RwLock.
//!
//! The population API (`add_vertex`, `add_edge`, `set_property`) sits
//! outside the search boundary: an ingestion pipeline (or a test) builds
//! the graph up front, then the search engine reads it through `GraphView`.
//! Outgoing edges are kept in insertion order, which gives the stable
//! per-vertex ordering the engine requires.
//!
//! ## Limitations
//!
//! - **No property indexes**: `vertices_by_property` scans the label index.
//! - **No snapshot isolation**: concurrent population during a search will
//!   change results between polls. Populate first, then query.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;

use super::GraphView;
use crate::model::*;
use crate::{Error, Result};

/// In-memory attack graph storage.
#[derive(Clone)]
pub struct MemoryGraph {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    vertices: RwLock<HashMap<VertexId, Vertex>>,
    edges: RwLock<HashMap<EdgeId, Edge>>,
    /// vertex id → outgoing edge ids, in insertion order
    adjacency: RwLock<HashMap<VertexId, Vec<EdgeId>>>,
    /// label → vertex ids (poor man's label index)
    label_index: RwLock<HashMap<String, Vec<VertexId>>>,
    next_vertex_id: AtomicU64,
    next_edge_id: AtomicU64,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                vertices: RwLock::new(HashMap::new()),
                edges: RwLock::new(HashMap::new()),
                adjacency: RwLock::new(HashMap::new()),
                label_index: RwLock::new(HashMap::new()),
                next_vertex_id: AtomicU64::new(1),
                next_edge_id: AtomicU64::new(1),
            }),
        }
    }

    // ========================================================================
    // Population (outside the search boundary)
    // ========================================================================

    /// Add a vertex with the given entity label and properties.
    pub fn add_vertex(&self, label: &str, props: PropertyMap) -> VertexId {
        let id = VertexId(self.inner.next_vertex_id.fetch_add(1, Ordering::Relaxed));
        let vertex = Vertex {
            id,
            label: label.to_string(),
            properties: props,
        };

        self.inner
            .label_index
            .write()
            .entry(vertex.label.clone())
            .or_default()
            .push(id);
        self.inner.vertices.write().insert(id, vertex);
        self.inner.adjacency.write().insert(id, Vec::new());

        id
    }

    /// Add a directed edge between two existing vertices.
    pub fn add_edge(
        &self,
        src: VertexId,
        dst: VertexId,
        label: &str,
        props: PropertyMap,
    ) -> Result<EdgeId> {
        {
            let vertices = self.inner.vertices.read();
            if !vertices.contains_key(&src) {
                return Err(Error::NotFound(format!("source vertex {src}")));
            }
            if !vertices.contains_key(&dst) {
                return Err(Error::NotFound(format!("target vertex {dst}")));
            }
        }

        let id = EdgeId(self.inner.next_edge_id.fetch_add(1, Ordering::Relaxed));
        let edge = Edge {
            id,
            src,
            dst,
            label: label.to_string(),
            properties: props,
        };

        self.inner.edges.write().insert(id, edge);
        self.inner.adjacency.write().entry(src).or_default().push(id);

        Ok(id)
    }

    /// Set a property on an existing vertex (upsert).
    pub fn set_property(&self, id: VertexId, key: &str, value: Value) -> Result<()> {
        let mut vertices = self.inner.vertices.write();
        let vertex = vertices
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("vertex {id}")))?;
        vertex.properties.insert(key.to_string(), value);
        Ok(())
    }

    /// Flag a vertex as a critical asset.
    pub fn mark_critical(&self, id: VertexId) -> Result<()> {
        self.set_property(id, CRITICAL_PROPERTY, Value::Bool(true))
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GraphView impl
// ============================================================================

#[async_trait]
impl GraphView for MemoryGraph {
    async fn vertex(&self, id: VertexId) -> Result<Option<Vertex>> {
        Ok(self.inner.vertices.read().get(&id).cloned())
    }

    async fn all_vertices(&self) -> Result<Vec<Vertex>> {
        Ok(self.inner.vertices.read().values().cloned().collect())
    }

    async fn outgoing_edges(&self, from: VertexId) -> Result<Vec<Edge>> {
        let adjacency = self.inner.adjacency.read();
        let edges = self.inner.edges.read();

        let edge_ids = adjacency.get(&from).cloned().unwrap_or_default();
        edge_ids
            .iter()
            .map(|eid| {
                edges.get(eid).cloned().ok_or_else(|| {
                    Error::GraphRead(format!("adjacency references missing edge {eid}"))
                })
            })
            .collect()
    }

    async fn vertices_by_label(&self, label: &str) -> Result<Vec<Vertex>> {
        let index = self.inner.label_index.read();
        let vertices = self.inner.vertices.read();

        let ids = index.get(label).cloned().unwrap_or_default();
        Ok(ids.iter().filter_map(|id| vertices.get(id).cloned()).collect())
    }

    async fn vertex_count(&self) -> Result<u64> {
        Ok(self.inner.vertices.read().len() as u64)
    }

    async fn edge_count(&self) -> Result<u64> {
        Ok(self.inner.edges.read().len() as u64)
    }

    async fn labels(&self) -> Result<Vec<String>> {
        let mut labels: Vec<String> = self.inner.label_index.read().keys().cloned().collect();
        labels.sort();
        Ok(labels)
    }

    async fn edge_labels(&self) -> Result<Vec<String>> {
        let edges = self.inner.edges.read();
        let mut labels: Vec<String> = edges.values().map(|e| e.label.clone()).collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! # attackgraph-rs — Critical-Path Search over Attack Graphs
//!
//! Reachability queries over a directed, labeled attack graph: from any
//! infrastructure entity, discover every simple path that reaches a
//! high-value ("critical") asset within a bounded number of hops.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `GraphView` is the contract between the search engine
//!    and whatever store holds the graph
//! 2. **Clean DTOs**: `Vertex`, `Edge`, `AttackPath`, `Value` cross all boundaries
//! 3. **The engine never mutates**: a populated graph goes in, paths come out
//! 4. **Lazy by construction**: results are pulled one at a time; dropping
//!    the cursor cancels the rest of the search
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use attackgraph_rs::{AttackGraph, GraphView, PropertyMap};
//!
//! # async fn example() -> attackgraph_rs::Result<()> {
//! let graph = AttackGraph::open_memory();
//!
//! // Populate (normally done by an ingestion pipeline)
//! let web = graph.view().add_vertex("Container", PropertyMap::new());
//! let node = graph.view().add_vertex("Node", PropertyMap::new());
//! graph.view().mark_critical(node)?;
//! graph.view().add_edge(web, node, "CE_NSENTER", PropertyMap::new())?;
//!
//! // Search
//! let start = graph.view().vertex(web).await?.unwrap();
//! let mut paths = graph.searcher().critical_paths(start, 10)?;
//! while let Some(path) = paths.try_next().await? {
//!     println!("{path}");
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod search;
pub mod query;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Vertex, VertexId, Edge, EdgeId, AttackPath, Value, PropertyMap,
    CRITICAL_PROPERTY,
};

// ============================================================================
// Re-exports: Graph view
// ============================================================================

pub use graph::{GraphView, MemoryGraph};

// ============================================================================
// Re-exports: Search
// ============================================================================

pub use search::{
    CriticalPaths, EdgeFilter, PathSearcher,
    PATH_HOPS_DEFAULT, PATH_HOPS_MAX, PATH_HOPS_MIN,
};

// ============================================================================
// Re-exports: Query facade
// ============================================================================

pub use query::{AttackSurface, EndpointExposure};

// ============================================================================
// Top-level AttackGraph handle
// ============================================================================

/// The primary entry point. An `AttackGraph` wraps a graph view and hands
/// out the searcher and the start-vertex selectors.
pub struct AttackGraph<G: GraphView> {
    view: G,
}

impl<G: GraphView> AttackGraph<G> {
    /// Wrap an already-populated graph view.
    pub fn with_view(view: G) -> Self {
        Self { view }
    }

    /// The path search engine.
    pub fn searcher(&self) -> PathSearcher<'_, G> {
        PathSearcher::new(&self.view)
    }

    /// Entity-type start-vertex selectors.
    pub fn surface(&self) -> AttackSurface<'_, G> {
        AttackSurface::new(&self.view)
    }

    /// Access the underlying view (for population or advanced use).
    pub fn view(&self) -> &G {
        &self.view
    }
}

/// In-memory graph for testing and embedding.
impl AttackGraph<MemoryGraph> {
    pub fn open_memory() -> Self {
        Self::with_view(MemoryGraph::new())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Search configuration rejected before any traversal: hop bound outside
    /// the accepted range, or an exclusion filter built from an empty set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A failure reading graph data; aborts the in-flight search.
    #[error("graph read error: {0}")]
    GraphRead(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! JSON export — serialize a graph or a set of discovered paths.
//!
//! Produces plain JSON documents for offline analysis or dashboards:
//!
//! ```text
//! attackgraph-rs → export_graph_json() → {"vertices": [...], "edges": [...]}
//!               → export_paths_json() → [{"vertices": [...], "edges": [...]}, ...]
//! ```

use std::io::Write;

use serde::Serialize;

use crate::graph::GraphView;
use crate::model::{AttackPath, Edge, Vertex};
use crate::Result;

#[derive(Serialize)]
struct GraphDump {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

/// Export the whole graph as a JSON document.
///
/// Vertices are sorted by id so the output is stable across runs.
pub async fn export_graph_json<G: GraphView>(view: &G, writer: &mut dyn Write) -> Result<()> {
    let mut vertices = view.all_vertices().await?;
    vertices.sort_by_key(|v| v.id.0);

    let mut edges = Vec::new();
    for vertex in &vertices {
        edges.extend(view.outgoing_edges(vertex.id).await?);
    }

    let dump = GraphDump { vertices, edges };
    serde_json::to_writer_pretty(&mut *writer, &dump)?;
    writeln!(writer)?;
    Ok(())
}

/// Export discovered attack paths as a JSON array.
pub fn export_paths_json(paths: &[AttackPath], writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, paths)?;
    writeln!(writer)?;
    Ok(())
}

//! # Critical-Path Search Engine
//!
//! Depth-bounded, simple-path DFS over the attack graph: from a start
//! vertex, expand a frontier of in-progress paths one edge at a time until
//! a critical asset is reached or the hop budget runs out.
//!
//! The frontier is an explicit worklist (a stack of in-flight paths), not
//! recursion — deep graphs cannot blow the call stack, and cancellation is
//! simply dropping the cursor. Results are pulled lazily through
//! [`CriticalPaths::try_next`]; nothing beyond the branch that produced the
//! next result is ever explored, which is what makes the existence probe
//! cheap on large graphs.

use std::collections::VecDeque;

use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::graph::GraphView;
use crate::model::{AttackPath, Vertex, VertexId};
use crate::{Error, Result};

/// Smallest accepted hop budget.
pub const PATH_HOPS_MIN: usize = 1;
/// Largest accepted hop budget.
pub const PATH_HOPS_MAX: usize = 15;
/// Hop budget used by the existence probe.
pub const PATH_HOPS_DEFAULT: usize = 10;

// ============================================================================
// EdgeFilter
// ============================================================================

/// Predicate over edge labels deciding which attacks may be traversed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EdgeFilter {
    /// Every edge is eligible.
    #[default]
    TraverseAll,
    /// Edges whose label is in the set are never expanded.
    Excluding(HashSet<String>),
}

impl EdgeFilter {
    /// Build an exclusion filter from a non-empty set of edge labels.
    ///
    /// An empty exclusion set is rejected: callers who want everything
    /// traversed must say so with [`EdgeFilter::TraverseAll`] rather than
    /// passing an empty list that silently means the same thing.
    pub fn excluding<I, S>(exclusions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = exclusions.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(Error::InvalidArgument(
                "exclusions must be non-empty (use EdgeFilter::TraverseAll instead)".into(),
            ));
        }
        Ok(EdgeFilter::Excluding(set))
    }

    pub fn allows(&self, label: &str) -> bool {
        match self {
            EdgeFilter::TraverseAll => true,
            EdgeFilter::Excluding(exclusions) => !exclusions.contains(label),
        }
    }
}

// ============================================================================
// PathSearcher
// ============================================================================

/// Entry point for path queries against a [`GraphView`].
pub struct PathSearcher<'g, G: GraphView> {
    graph: &'g G,
}

impl<'g, G: GraphView> PathSearcher<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// All simple paths from `start` to a critical asset, within `max_hops`.
    ///
    /// Returns a lazy cursor; no traversal happens until it is polled.
    /// `max_hops` must lie in `[PATH_HOPS_MIN, PATH_HOPS_MAX]` — violations
    /// are rejected here, before any graph read.
    ///
    /// A start vertex that is itself critical is NOT reported as a
    /// zero-length path: termination is only checked after an edge has been
    /// traversed, so every result has at least one hop. Callers that need
    /// "am I standing on a critical asset" should test the vertex directly.
    pub fn critical_paths(&self, start: Vertex, max_hops: usize) -> Result<CriticalPaths<'g, G>> {
        self.critical_paths_filtered(start, max_hops, EdgeFilter::TraverseAll)
    }

    /// [`Self::critical_paths`] with an edge-label filter applied to every
    /// expansion step.
    pub fn critical_paths_filtered(
        &self,
        start: Vertex,
        max_hops: usize,
        filter: EdgeFilter,
    ) -> Result<CriticalPaths<'g, G>> {
        if max_hops < PATH_HOPS_MIN {
            return Err(Error::InvalidArgument(format!(
                "max_hops must be >= {PATH_HOPS_MIN}, got {max_hops}"
            )));
        }
        if max_hops > PATH_HOPS_MAX {
            return Err(Error::InvalidArgument(format!(
                "max_hops must be <= {PATH_HOPS_MAX}, got {max_hops}"
            )));
        }
        // `EdgeFilter::excluding` already rejects this, but the variant is
        // public — re-check so an invalid filter never reaches traversal.
        if let EdgeFilter::Excluding(exclusions) = &filter {
            if exclusions.is_empty() {
                return Err(Error::InvalidArgument(
                    "exclusion-filtered search requires a non-empty exclusion set".into(),
                ));
            }
        }

        debug!(start = %start.id, max_hops, "critical path search started");

        let mut visited = VisitedSet::new();
        visited.push(start.id);
        let frame = Frame {
            path: AttackPath::single(start),
            visited,
        };

        Ok(CriticalPaths {
            graph: self.graph,
            filter,
            max_hops,
            stack: vec![frame],
            ready: VecDeque::new(),
        })
    }

    /// Whether at least one critical path exists from `start` within the
    /// default hop budget.
    ///
    /// Polls the search cursor exactly once, so exploration stops at the
    /// first successful branch instead of enumerating the whole graph.
    pub async fn has_critical_path(&self, start: Vertex) -> Result<bool> {
        let mut paths = self.critical_paths(start, PATH_HOPS_DEFAULT)?;
        Ok(paths.try_next().await?.is_some())
    }

    /// Immediate attacks from a vertex: every outgoing edge as a one-hop path.
    pub async fn attacks(&self, start: Vertex) -> Result<Vec<AttackPath>> {
        let edges = self.graph.outgoing_edges(start.id).await?;
        let mut paths = Vec::with_capacity(edges.len());
        for edge in edges {
            let target = self.graph.target_of(&edge).await?;
            let mut path = AttackPath::single(start.clone());
            path.append(edge, target);
            paths.push(path);
        }
        Ok(paths)
    }
}

// ============================================================================
// CriticalPaths cursor
// ============================================================================

/// Companion set of vertex ids already on the in-flight path, so candidate
/// edges are checked without re-scanning the path itself. The hop cap is 15,
/// so in-budget paths never spill to the heap.
type VisitedSet = SmallVec<[VertexId; PATH_HOPS_MAX + 1]>;

/// One in-flight branch of the frontier.
struct Frame {
    path: AttackPath,
    visited: VisitedSet,
}

/// Lazy sequence of discovered critical paths.
///
/// Pull results with [`Self::try_next`]; drop the cursor to cancel the rest
/// of the search. Emission order follows per-branch expansion order
/// (inherited from `outgoing_edges`) — no global ordering by length or any
/// other metric is guaranteed.
pub struct CriticalPaths<'g, G: GraphView> {
    graph: &'g G,
    filter: EdgeFilter,
    max_hops: usize,
    stack: Vec<Frame>,
    ready: VecDeque<AttackPath>,
}

impl<G: GraphView> std::fmt::Debug for CriticalPaths<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriticalPaths")
            .field("max_hops", &self.max_hops)
            .finish_non_exhaustive()
    }
}

impl<'g, G: GraphView> CriticalPaths<'g, G> {
    /// Next discovered path, or None once every branch is exhausted.
    ///
    /// A graph read failure aborts the search: the error is returned and the
    /// cursor yields nothing further. Paths already handed out stay valid.
    pub async fn try_next(&mut self) -> Result<Option<AttackPath>> {
        loop {
            if let Some(path) = self.ready.pop_front() {
                return Ok(Some(path));
            }
            let Some(frame) = self.stack.pop() else {
                return Ok(None);
            };
            if let Err(err) = self.expand(frame).await {
                self.stack.clear();
                self.ready.clear();
                return Err(err);
            }
        }
    }

    /// Drain the cursor into a Vec.
    pub async fn try_collect(mut self) -> Result<Vec<AttackPath>> {
        let mut paths = Vec::new();
        while let Some(path) = self.try_next().await? {
            paths.push(path);
        }
        Ok(paths)
    }

    /// Expand one frame: try every eligible outgoing edge at the path tip.
    ///
    /// An extension reaching a critical vertex is emitted and its branch
    /// terminated; a non-critical extension survives only while under the
    /// hop budget. A tip with no eligible edges dead-ends silently.
    async fn expand(&mut self, frame: Frame) -> Result<()> {
        let tip = frame.path.end().id;
        let edges = self.graph.outgoing_edges(tip).await?;

        let mut children = Vec::new();
        for edge in edges {
            if !self.filter.allows(&edge.label) {
                continue;
            }
            // Simple-path constraint: never revisit a vertex on this branch.
            if frame.visited.contains(&edge.dst) {
                continue;
            }

            let target = self.graph.target_of(&edge).await?;
            let dst = edge.dst;
            let mut path = frame.path.clone();
            path.append(edge, target);

            if path.end().is_critical() {
                trace!(%path, hops = path.len(), "critical asset reached");
                self.ready.push_back(path);
            } else if path.len() < self.max_hops {
                let mut visited = frame.visited.clone();
                visited.push(dst);
                children.push(Frame { path, visited });
            }
            // else: hop budget exhausted on a non-critical vertex — drop it
        }

        // Push in reverse so the first outgoing edge is expanded first.
        for child in children.into_iter().rev() {
            self.stack.push(child);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use crate::model::PropertyMap;

    #[test]
    fn test_edge_filter_allows() {
        assert!(EdgeFilter::TraverseAll.allows("POD_EXEC"));

        let filter = EdgeFilter::excluding(["POD_EXEC"]).unwrap();
        assert!(!filter.allows("POD_EXEC"));
        assert!(filter.allows("VOLUME_MOUNT"));
    }

    #[test]
    fn test_edge_filter_rejects_empty_exclusions() {
        let err = EdgeFilter::excluding(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_diamond_yields_both_routes() {
        // A → B → D and A → C → D, with D critical. The simple-path
        // constraint is per-branch, so both routes must be discovered.
        let graph = MemoryGraph::new();
        let a = graph.add_vertex("Container", PropertyMap::new());
        let b = graph.add_vertex("Identity", PropertyMap::new());
        let c = graph.add_vertex("Volume", PropertyMap::new());
        let d = graph.add_vertex("Node", PropertyMap::new());
        graph.mark_critical(d).unwrap();
        graph.add_edge(a, b, "IDENTITY_ASSUME", PropertyMap::new()).unwrap();
        graph.add_edge(a, c, "VOLUME_DISCOVER", PropertyMap::new()).unwrap();
        graph.add_edge(b, d, "TOKEN_STEAL", PropertyMap::new()).unwrap();
        graph.add_edge(c, d, "VOLUME_MOUNT", PropertyMap::new()).unwrap();

        let start = graph.vertex(a).await.unwrap().unwrap();
        let paths = PathSearcher::new(&graph)
            .critical_paths(start, 5)
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.end().id, d);
            assert_eq!(path.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_expansion_follows_outgoing_order() {
        // Two direct critical neighbors: emission must follow edge insertion order.
        let graph = MemoryGraph::new();
        let a = graph.add_vertex("Container", PropertyMap::new());
        let first = graph.add_vertex("Node", PropertyMap::new());
        let second = graph.add_vertex("Node", PropertyMap::new());
        graph.mark_critical(first).unwrap();
        graph.mark_critical(second).unwrap();
        graph.add_edge(a, first, "CE_NSENTER", PropertyMap::new()).unwrap();
        graph.add_edge(a, second, "CE_PRIV_MOUNT", PropertyMap::new()).unwrap();

        let start = graph.vertex(a).await.unwrap().unwrap();
        let paths = PathSearcher::new(&graph)
            .critical_paths(start, 3)
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].end().id, first);
        assert_eq!(paths[1].end().id, second);
    }

    #[tokio::test]
    async fn test_dead_end_is_silent() {
        let graph = MemoryGraph::new();
        let a = graph.add_vertex("Container", PropertyMap::new());
        let b = graph.add_vertex("Volume", PropertyMap::new());
        graph.add_edge(a, b, "VOLUME_DISCOVER", PropertyMap::new()).unwrap();

        let start = graph.vertex(a).await.unwrap().unwrap();
        let paths = PathSearcher::new(&graph)
            .critical_paths(start, 10)
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn test_attacks_lists_immediate_edges() {
        let graph = MemoryGraph::new();
        let a = graph.add_vertex("Container", PropertyMap::new());
        let b = graph.add_vertex("Node", PropertyMap::new());
        let c = graph.add_vertex("Volume", PropertyMap::new());
        graph.add_edge(a, b, "CE_NSENTER", PropertyMap::new()).unwrap();
        graph.add_edge(a, c, "VOLUME_DISCOVER", PropertyMap::new()).unwrap();

        let start = graph.vertex(a).await.unwrap().unwrap();
        let attacks = PathSearcher::new(&graph).attacks(start).await.unwrap();

        assert_eq!(attacks.len(), 2);
        assert!(attacks.iter().all(|p| p.len() == 1 && p.start().id == a));
    }
}

//! # Query Facade — start-vertex selectors
//!
//! Entity-type lookups used to pick starting points for a path search.
//! Every selector follows the same two-step shape: select by entity label,
//! then optionally keep only vertices whose property value is in an
//! allow-list. Pure filters over [`GraphView`] — no traversal logic lives
//! here; feed the returned vertices into
//! [`PathSearcher`](crate::search::PathSearcher).

use serde::{Deserialize, Serialize};

use crate::graph::GraphView;
use crate::model::{AttackPath, Value, Vertex};
use crate::Result;

pub const CONTAINER_LABEL: &str = "Container";
pub const POD_LABEL: &str = "Pod";
pub const NODE_LABEL: &str = "Node";
pub const ENDPOINT_LABEL: &str = "Endpoint";
pub const VOLUME_LABEL: &str = "Volume";
pub const IDENTITY_LABEL: &str = "Identity";
pub const PERMISSION_SET_LABEL: &str = "PermissionSet";

/// How far outside the cluster an endpoint is reachable.
///
/// Ordinals are stored in the `exposure` property and compared with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EndpointExposure {
    None = 0,
    /// Container port exposed to the cluster.
    ClusterIp = 1,
    /// Endpoint exposed on a node IP.
    NodeIp = 2,
    /// Endpoint exposed outside the cluster.
    External = 3,
    /// External DNS API endpoint.
    Public = 4,
}

impl EndpointExposure {
    pub fn ordinal(self) -> i64 {
        self as i64
    }
}

/// Start-vertex selectors over a populated attack graph.
pub struct AttackSurface<'g, G: GraphView> {
    graph: &'g G,
}

impl<'g, G: GraphView> AttackSurface<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// All Container vertices, optionally filtered by name.
    pub async fn containers(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.labeled_with_names(CONTAINER_LABEL, "name", names).await
    }

    /// All Pod vertices, optionally filtered by name.
    pub async fn pods(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.labeled_with_names(POD_LABEL, "name", names).await
    }

    /// All Node vertices, optionally filtered by name.
    pub async fn nodes(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.labeled_with_names(NODE_LABEL, "name", names).await
    }

    /// All Volume vertices, optionally filtered by name.
    pub async fn volumes(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.labeled_with_names(VOLUME_LABEL, "name", names).await
    }

    /// All Identity vertices, optionally filtered by name.
    pub async fn identities(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.labeled_with_names(IDENTITY_LABEL, "name", names).await
    }

    /// All Endpoint vertices.
    pub async fn endpoints(&self) -> Result<Vec<Vertex>> {
        self.graph.vertices_by_label(ENDPOINT_LABEL).await
    }

    /// Endpoints reachable at `min` exposure or wider.
    pub async fn endpoints_exposed(&self, min: EndpointExposure) -> Result<Vec<Vertex>> {
        let mut endpoints = self.endpoints().await?;
        endpoints.retain(|v| {
            v.get("exposure")
                .and_then(Value::as_int)
                .is_some_and(|e| e >= min.ordinal())
        });
        Ok(endpoints)
    }

    /// Endpoints exposed outside the cluster as a service, optionally
    /// filtered by port name.
    pub async fn services(&self, port_names: &[&str]) -> Result<Vec<Vertex>> {
        let mut services = self.endpoints_exposed(EndpointExposure::External).await?;
        retain_by_allow_list(&mut services, "portName", port_names);
        Ok(services)
    }

    /// HostPath volume mounts, optionally filtered by host source path.
    pub async fn host_mounts(&self, source_paths: &[&str]) -> Result<Vec<Vertex>> {
        let mut mounts = self
            .graph
            .vertices_by_property(VOLUME_LABEL, "type", &Value::from("HostPath"))
            .await?;
        retain_by_allow_list(&mut mounts, "sourcePath", source_paths);
        Ok(mounts)
    }

    /// Service account identities, optionally filtered by name.
    pub async fn service_accounts(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.typed_identities("ServiceAccount", names).await
    }

    /// User identities, optionally filtered by name.
    pub async fn users(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.typed_identities("User", names).await
    }

    /// Group identities, optionally filtered by name.
    pub async fn groups(&self, names: &[&str]) -> Result<Vec<Vertex>> {
        self.typed_identities("Group", names).await
    }

    /// All PermissionSet vertices, optionally filtered by underlying role.
    pub async fn permissions(&self, roles: &[&str]) -> Result<Vec<Vertex>> {
        self.labeled_with_names(PERMISSION_SET_LABEL, "role", roles).await
    }

    /// Container escape edges as one-hop Container → Node paths, optionally
    /// filtered by target node name.
    pub async fn escapes(&self, node_names: &[&str]) -> Result<Vec<AttackPath>> {
        let mut paths = Vec::new();
        for container in self.graph.vertices_by_label(CONTAINER_LABEL).await? {
            for edge in self.graph.outgoing_edges(container.id).await? {
                let target = self.graph.target_of(&edge).await?;
                if target.label != NODE_LABEL {
                    continue;
                }
                if !node_names.is_empty()
                    && !target.name().is_some_and(|n| node_names.contains(&n))
                {
                    continue;
                }
                let mut path = AttackPath::single(container.clone());
                path.append(edge, target);
                paths.push(path);
            }
        }
        Ok(paths)
    }

    async fn labeled_with_names(
        &self,
        label: &str,
        key: &str,
        allowed: &[&str],
    ) -> Result<Vec<Vertex>> {
        let mut vertices = self.graph.vertices_by_label(label).await?;
        retain_by_allow_list(&mut vertices, key, allowed);
        Ok(vertices)
    }

    async fn typed_identities(&self, identity_type: &str, names: &[&str]) -> Result<Vec<Vertex>> {
        let mut identities = self
            .graph
            .vertices_by_property(IDENTITY_LABEL, "type", &Value::from(identity_type))
            .await?;
        retain_by_allow_list(&mut identities, "name", names);
        Ok(identities)
    }
}

/// Keep only vertices whose string property `key` is in `allowed`.
/// An empty allow-list means "keep everything".
fn retain_by_allow_list(vertices: &mut Vec<Vertex>, key: &str, allowed: &[&str]) {
    if allowed.is_empty() {
        return;
    }
    vertices.retain(|v| {
        v.get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| allowed.contains(&s))
    });
}

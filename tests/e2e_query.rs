//! End-to-end tests for the query facade (start-vertex selectors) and the
//! JSON export of discovered paths.

use attackgraph_rs::{
    AttackGraph, EndpointExposure, MemoryGraph, PropertyMap, Value, VertexId,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helper: a small cluster fixture
// ============================================================================

struct Cluster {
    graph: AttackGraph<MemoryGraph>,
    web: VertexId,
    worker: VertexId,
}

fn props(pairs: &[(&str, Value)]) -> PropertyMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn setup_cluster() -> Cluster {
    let graph = AttackGraph::open_memory();
    let view = graph.view();

    let web = view.add_vertex("Container", props(&[("name", "web".into())]));
    view.add_vertex("Container", props(&[("name", "sidecar".into())]));
    view.add_vertex("Pod", props(&[("name", "web-pod".into())]));

    let worker = view.add_vertex("Node", props(&[("name", "worker-1".into())]));
    let master = view.add_vertex("Node", props(&[("name", "control-plane".into())]));
    view.mark_critical(master).unwrap();

    view.add_vertex(
        "Endpoint",
        props(&[
            ("name", "metrics".into()),
            ("portName", "http-metrics".into()),
            ("exposure", Value::Int(EndpointExposure::ClusterIp.ordinal())),
        ]),
    );
    view.add_vertex(
        "Endpoint",
        props(&[
            ("name", "ingress".into()),
            ("portName", "https".into()),
            ("exposure", Value::Int(EndpointExposure::External.ordinal())),
        ]),
    );

    view.add_vertex(
        "Volume",
        props(&[
            ("name", "host-logs".into()),
            ("type", "HostPath".into()),
            ("sourcePath", "/var/log".into()),
        ]),
    );
    view.add_vertex(
        "Volume",
        props(&[("name", "scratch".into()), ("type", "EmptyDir".into())]),
    );

    view.add_vertex(
        "Identity",
        props(&[("name", "app-sa".into()), ("type", "ServiceAccount".into())]),
    );
    view.add_vertex(
        "Identity",
        props(&[("name", "alice".into()), ("type", "User".into())]),
    );
    view.add_vertex(
        "Identity",
        props(&[("name", "ops".into()), ("type", "Group".into())]),
    );

    view.add_vertex(
        "PermissionSet",
        props(&[("name", "admin-binding".into()), ("role", "cluster-admin".into())]),
    );

    // Container escapes: web escapes to both nodes, sidecar to neither.
    view.add_edge(web, worker, "CE_PRIV_MOUNT", PropertyMap::new()).unwrap();
    view.add_edge(web, master, "CE_NSENTER", PropertyMap::new()).unwrap();

    Cluster { graph, web, worker }
}

// ============================================================================
// 1. Label selectors with name allow-lists
// ============================================================================

#[tokio::test]
async fn test_containers_selector() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    let all = surface.containers(&[]).await.unwrap();
    assert_eq!(all.len(), 2);

    let filtered = surface.containers(&["web"]).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, cluster.web);

    let none = surface.containers(&["nope"]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_nodes_and_pods_selectors() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    assert_eq!(surface.nodes(&[]).await.unwrap().len(), 2);
    assert_eq!(surface.nodes(&["worker-1"]).await.unwrap().len(), 1);
    assert_eq!(surface.pods(&[]).await.unwrap().len(), 1);
}

// ============================================================================
// 2. Endpoint exposure and services
// ============================================================================

#[tokio::test]
async fn test_endpoint_exposure_thresholds() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    assert_eq!(surface.endpoints().await.unwrap().len(), 2);
    assert_eq!(
        surface.endpoints_exposed(EndpointExposure::ClusterIp).await.unwrap().len(),
        2
    );
    assert_eq!(
        surface.endpoints_exposed(EndpointExposure::External).await.unwrap().len(),
        1
    );
    assert!(surface.endpoints_exposed(EndpointExposure::Public).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_services_selector() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    let services = surface.services(&[]).await.unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].name(), Some("ingress"));

    assert_eq!(surface.services(&["https"]).await.unwrap().len(), 1);
    assert!(surface.services(&["dns"]).await.unwrap().is_empty());
}

// ============================================================================
// 3. Volumes, identities, permissions
// ============================================================================

#[tokio::test]
async fn test_host_mounts_selector() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    let mounts = surface.host_mounts(&[]).await.unwrap();
    assert_eq!(mounts.len(), 1);
    assert_eq!(mounts[0].name(), Some("host-logs"));

    assert_eq!(surface.host_mounts(&["/var/log"]).await.unwrap().len(), 1);
    assert!(surface.host_mounts(&["/etc"]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_identity_selectors() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    assert_eq!(surface.identities(&[]).await.unwrap().len(), 3);
    assert_eq!(surface.service_accounts(&[]).await.unwrap().len(), 1);
    assert_eq!(surface.users(&["alice"]).await.unwrap().len(), 1);
    assert!(surface.users(&["bob"]).await.unwrap().is_empty());
    assert_eq!(surface.groups(&[]).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_permissions_selector() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    assert_eq!(surface.permissions(&[]).await.unwrap().len(), 1);
    assert_eq!(surface.permissions(&["cluster-admin"]).await.unwrap().len(), 1);
    assert!(surface.permissions(&["view"]).await.unwrap().is_empty());
}

// ============================================================================
// 4. Escapes and immediate attacks
// ============================================================================

#[tokio::test]
async fn test_escapes_selector() {
    let cluster = setup_cluster();
    let surface = cluster.graph.surface();

    let escapes = surface.escapes(&[]).await.unwrap();
    assert_eq!(escapes.len(), 2);
    for path in &escapes {
        assert_eq!(path.len(), 1);
        assert_eq!(path.start().label, "Container");
        assert_eq!(path.end().label, "Node");
    }

    let to_worker = surface.escapes(&["worker-1"]).await.unwrap();
    assert_eq!(to_worker.len(), 1);
    assert_eq!(to_worker[0].end().id, cluster.worker);
}

#[tokio::test]
async fn test_selected_vertices_feed_the_searcher() {
    // Facade output is directly usable as search input.
    let cluster = setup_cluster();

    let containers = cluster.graph.surface().containers(&["web"]).await.unwrap();
    assert_eq!(containers.len(), 1);

    let paths = cluster
        .graph
        .searcher()
        .critical_paths(containers[0].clone(), 5)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    // web escapes straight onto the critical control-plane node.
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), 1);
}

// ============================================================================
// 5. Path export
// ============================================================================

#[tokio::test]
async fn test_export_paths_json() {
    let cluster = setup_cluster();

    let containers = cluster.graph.surface().containers(&["web"]).await.unwrap();
    let paths = cluster
        .graph
        .searcher()
        .critical_paths(containers[0].clone(), 5)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let mut buf = Vec::new();
    attackgraph_rs::export::export_paths_json(&paths, &mut buf).unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["edges"][0]["label"], "CE_NSENTER");
}

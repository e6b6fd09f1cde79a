//! Graph integration tests
//!
//! Topological order, shortest paths, dominance and size trees over graphs
//! built the way the CLI builds them.

use depadvice::graph::{GraphBuilder, GraphError};
use depadvice::{DependencyGraph, DependencySizeTree, DominanceCache, DominanceTree};
use std::collections::HashMap;

/// A layered graph with plenty of diamonds
fn layered_graph(layers: usize, width: usize) -> DependencyGraph {
    let mut builder = GraphBuilder::new().with_root(":app");
    for i in 0..width {
        builder.edge(":app", &format!("g:l0-{}:1", i));
    }
    for layer in 0..layers - 1 {
        for i in 0..width {
            let from = format!("g:l{}-{}:1", layer, i);
            builder.edge(&from, &format!("g:l{}-{}:1", layer + 1, i));
            builder.edge(&from, &format!("g:l{}-{}:1", layer + 1, (i + 1) % width));
        }
    }
    builder.build()
}

fn okhttp_graph() -> DependencyGraph {
    let mut builder = GraphBuilder::new();
    builder.edges([
        (":app", ":lib"),
        (":app", "com.squareup.okhttp3:okhttp:4.12.0"),
        ("com.squareup.okhttp3:okhttp:4.12.0", "com.squareup.okio:okio:3.6.0"),
        (":lib", "com.squareup.okio:okio:3.6.0"),
        (":lib", "org.jetbrains:annotations:24.1.0"),
        (":lib", "com.squareup.okhttp3:okhttp:4.12.0"),
    ]);
    builder.build()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_duplicate_edges_are_ignored() {
    let mut builder = GraphBuilder::new();
    builder.edges([(":app", "g:a:1"), (":app", "g:a:1"), (":app", "g:a:1")]);
    let graph = builder.build();
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.out_degree(":app").unwrap(), 1);
}

#[test]
fn test_same_edges_same_fingerprint() {
    assert_eq!(layered_graph(4, 3).fingerprint(), layered_graph(4, 3).fingerprint());
    assert_ne!(layered_graph(4, 3).fingerprint(), layered_graph(4, 4).fingerprint());
}

#[test]
fn test_unknown_node_is_an_error() {
    let graph = okhttp_graph();
    assert_eq!(
        graph.successors("g:missing").unwrap_err(),
        GraphError::MissingNode("g:missing".to_string())
    );
}

// ============================================================================
// Topological order
// ============================================================================

#[test]
fn test_topological_order_respects_edges() {
    let graph = layered_graph(5, 4);
    let topological = graph.topological(":app").unwrap();
    let position: HashMap<&str, usize> = topological
        .order()
        .enumerate()
        .map(|(i, node)| (node.identifier(), i))
        .collect();

    assert_eq!(position.len(), graph.node_count());
    for edge in graph.edges() {
        assert!(
            position[edge.from.identifier()] < position[edge.to.identifier()],
            "{} should come before {}",
            edge.from,
            edge.to
        );
    }
}

#[test]
fn test_topological_order_is_deterministic() {
    let first: Vec<String> = layered_graph(5, 4)
        .topological(":app")
        .unwrap()
        .order()
        .map(|n| n.identifier().to_string())
        .collect();
    let second: Vec<String> = layered_graph(5, 4)
        .topological(":app")
        .unwrap()
        .order()
        .map(|n| n.identifier().to_string())
        .collect();
    assert_eq!(first, second);
}

// ============================================================================
// Shortest path
// ============================================================================

#[test]
fn test_shortest_path_through_project() {
    let graph = okhttp_graph();
    let path: Vec<&str> = graph
        .shortest_path(":app", "com.squareup.okio:okio")
        .unwrap()
        .into_iter()
        .map(|n| n.identifier())
        .collect();

    assert_eq!(path.len(), 3);
    assert_eq!(path[0], ":app");
    assert_eq!(path[2], "com.squareup.okio:okio");
}

#[test]
fn test_shortest_path_triangle_property() {
    let graph = layered_graph(6, 5);
    let paths = graph.shortest_paths(":app").unwrap();

    for edge in graph.edges() {
        let from = paths.distance_to(edge.from.identifier()).unwrap();
        let to = paths.distance_to(edge.to.identifier()).unwrap();
        if let (Some(from), Some(to)) = (from, to) {
            assert!(to <= from + edge.weight);
        }
    }
}

#[test]
fn test_unreachable_has_empty_path() {
    let mut builder = GraphBuilder::new();
    builder.edges([(":app", "g:a:1"), ("g:other:1", "g:orphan:1")]);
    let graph = builder.build();

    assert!(graph.shortest_path(":app", "g:orphan").unwrap().is_empty());
    assert!(!graph.shortest_paths(":app").unwrap().has_path_to("g:orphan"));
}

// ============================================================================
// Dominance
// ============================================================================

#[test]
fn test_root_dominates_itself_only() {
    let graph = layered_graph(4, 3);
    let tree = DominanceTree::new(&graph, ":app").unwrap();

    let self_dominating: Vec<&str> = tree
        .self_dominating_nodes()
        .into_iter()
        .map(|n| n.identifier())
        .collect();
    assert_eq!(self_dominating, vec![":app"]);
    assert!(tree.immediate_dominator(":app").unwrap().is_none());
}

#[test]
fn test_shared_dependency_is_dominated_by_common_ancestor() {
    let graph = okhttp_graph();
    let tree = DominanceTree::new(&graph, ":app").unwrap();

    // okio is reachable through okhttp and through :lib
    let idom = tree.immediate_dominator("com.squareup.okio:okio").unwrap().unwrap();
    assert_eq!(idom.identifier(), ":app");

    let idom = tree
        .immediate_dominator("org.jetbrains:annotations")
        .unwrap()
        .unwrap();
    assert_eq!(idom.identifier(), ":lib");
    assert!(tree.dominates(":app", "org.jetbrains:annotations").unwrap());
}

#[test]
fn test_multi_entry_graph_is_rejected() {
    let mut builder = GraphBuilder::new();
    builder.edges([(":app", "g:a:1"), (":other", "g:a:1")]);
    let graph = builder.build();

    assert!(matches!(
        DominanceTree::new(&graph, ":app"),
        Err(GraphError::NotSingleEntry { .. })
    ));
    assert!(DominanceTree::from_root(&graph).is_err());
}

// ============================================================================
// Size trees
// ============================================================================

#[test]
fn test_size_tree_attributes_shared_size_once() {
    let graph = okhttp_graph();
    let sizes: HashMap<&str, u64> = [
        (":lib", 10),
        ("com.squareup.okhttp3:okhttp", 800),
        ("com.squareup.okio:okio", 350),
        ("org.jetbrains:annotations", 20),
    ]
    .into_iter()
    .collect();

    let cache = DominanceCache::new();
    let tree = cache.get_or_compute(&graph, ":app").unwrap();
    let size_tree = DependencySizeTree::from_dominance_tree(
        &tree,
        |c| sizes.get(c.identifier.as_str()).copied(),
        DependencySizeTree::by_tree_size_descending,
    );

    assert_eq!(size_tree.tree_size, 1180);
    let order: Vec<&str> = size_tree
        .children
        .iter()
        .map(|c| c.node.identifier.as_str())
        .collect();
    assert_eq!(
        order,
        vec!["com.squareup.okhttp3:okhttp", "com.squareup.okio:okio", ":lib"]
    );
    assert_eq!(size_tree.find(":lib").unwrap().tree_size, 30);
}

#[test]
fn test_cache_shares_identical_views() {
    let cache = DominanceCache::new();
    let debug = okhttp_graph();
    let release = okhttp_graph();

    cache.get_or_compute(&debug, ":app").unwrap();
    cache.get_or_compute(&release, ":app").unwrap();

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}

//! Integration Tests for the Dependency Graph
//!
//! These tests exercise the full surface (store, queries, resolution, and
//! codecs) together, including sharing one graph across threads.

use std::sync::Arc;
use std::thread;

use strata_core::DependencyGraph;

struct Node {
    ptr: u64,
    deps: Vec<u64>,
}

fn build(nodes: &[Node]) -> DependencyGraph {
    let graph = DependencyGraph::new();
    for node in nodes {
        graph.insert(node.ptr, node.deps.iter().copied());
    }
    graph
}

fn node(ptr: u64, deps: &[u64]) -> Node {
    Node {
        ptr,
        deps: deps.to_vec(),
    }
}

/// A resolvable build graph: two rounds of mutually independent units.
#[test]
fn scheduler_graph_resolves_in_two_batches() {
    let graph = build(&[
        node(0, &[]),
        node(1, &[0, 2, 4]),
        node(2, &[]),
        node(3, &[]),
        node(4, &[]),
        node(5, &[]),
        node(6, &[]),
        node(7, &[]),
        node(8, &[7, 5]),
        node(9, &[0, 4, 5]),
        node(10, &[0, 6]),
    ]);

    assert_eq!(graph.len(), 11);
    assert_eq!(
        graph.to_string(),
        "DependencyGraph{0, 1:[0 2 4], 2, 3, 4, 5, 6, 7, 8:[5 7], 9:[0 4 5], 10:[0 6]}"
    );

    let ids: Vec<u64> = graph.iter().collect();
    assert_eq!(ids, (0..=10).collect::<Vec<u64>>());

    assert_eq!(
        graph.resolve_batches(),
        Some(vec![vec![0, 2, 3, 4, 5, 6, 7], vec![1, 8, 9, 10]])
    );
    assert_eq!(
        graph.resolve(),
        Some(vec![0, 2, 3, 4, 5, 6, 7, 1, 8, 9, 10])
    );

    assert_eq!(graph, graph.clone());
}

/// A mutual cycle between two vertices blocks resolution even when every
/// other vertex is independent.
#[test]
fn mutual_cycle_blocks_resolution() {
    let graph = build(&[
        node(0, &[]),
        node(1, &[]),
        node(2, &[3]),
        node(3, &[2]),
        node(4, &[]),
        node(5, &[]),
    ]);

    assert_eq!(graph.len(), 6);
    assert_eq!(
        graph.to_string(),
        "DependencyGraph{0, 1, 2:[3], 3:[2], 4, 5}"
    );
    assert_eq!(graph.iter().collect::<Vec<u64>>(), vec![0, 1, 2, 3, 4, 5]);

    assert_eq!(graph.resolve_batches(), None);
    assert_eq!(graph.resolve(), None);
}

/// A cycle threaded through three vertices likewise blocks resolution.
#[test]
fn three_vertex_cycle_blocks_resolution() {
    let graph = build(&[
        node(0, &[]),
        node(1, &[3]),
        node(2, &[1]),
        node(3, &[2]),
    ]);

    assert_eq!(
        graph.to_string(),
        "DependencyGraph{0, 1:[3], 2:[1], 3:[2]}"
    );
    assert_eq!(graph.resolve_batches(), None);
    assert_eq!(graph.resolve(), None);
}

/// Removing a vertex leaves edges to it dangling, which makes the graph
/// unresolvable until the vertex is reinserted.
#[test]
fn removal_creates_dangling_dependency() {
    let graph = build(&[node(0, &[]), node(1, &[0])]);
    assert!(graph.resolve().is_some());

    graph.remove(0);
    assert!(!graph.contains(0));
    assert!(graph.contains(1));
    assert_eq!(graph.edges(1), vec![0]);
    assert_eq!(graph.resolve(), None);

    graph.insert(0, []);
    assert!(graph.resolve().is_some());
}

/// The transitive closure unions every dependency layer, deduplicated and
/// ascending.
#[test]
fn transitive_dependencies_fixed_point() {
    let graph = build(&[
        node(0, &[]),
        node(1, &[0, 2, 4, 8]),
        node(2, &[]),
        node(3, &[]),
        node(4, &[]),
        node(5, &[]),
        node(6, &[]),
        node(7, &[]),
        node(8, &[7, 5, 9]),
        node(9, &[0, 4, 5]),
        node(10, &[0, 6]),
    ]);

    assert_eq!(graph.dependencies(1), Some(vec![0, 2, 4, 5, 7, 8, 9]));
}

/// Both codecs round-trip equivalent graph content, including graphs a
/// resolver would reject.
#[test]
fn codecs_round_trip_equivalent_graphs() {
    let graphs = [
        build(&[
            node(0, &[]),
            node(1, &[0, 2, 4, 8]),
            node(2, &[]),
            node(8, &[7, 5, 9]),
            node(9, &[0, 4, 5]),
        ]),
        build(&[node(2, &[3]), node(3, &[2])]),
        build(&[node(1, &[99])]),
        DependencyGraph::new(),
    ];

    for graph in &graphs {
        let json = graph.to_json().expect("JSON encode");
        let from_json = DependencyGraph::from_json(&json).expect("JSON decode");
        assert_eq!(&from_json, graph);

        let bytes = graph.to_msgpack().expect("MessagePack encode");
        let from_bytes = DependencyGraph::from_msgpack(&bytes).expect("MessagePack decode");
        assert_eq!(&from_bytes, graph);

        // The two codecs agree on content even though their wire bytes differ.
        assert_eq!(from_json, from_bytes);
    }
}

/// Concurrent writers over disjoint id ranges all land.
#[test]
fn concurrent_inserts_land_all_vertices() {
    let graph = Arc::new(DependencyGraph::new());
    let mut handles = Vec::new();

    for chunk in 0..4u64 {
        let graph = Arc::clone(&graph);
        handles.push(thread::spawn(move || {
            for ptr in chunk * 100..(chunk + 1) * 100 {
                graph.insert(ptr, []);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    assert_eq!(graph.len(), 400);
    let ids: Vec<u64> = graph.iter().collect();
    assert_eq!(ids, (0..400).collect::<Vec<u64>>());
}

/// Readers and resolvers may run concurrently against a shared instance and
/// agree on the result.
#[test]
fn concurrent_resolutions_agree() {
    let graph = Arc::new(build(&[
        node(0, &[]),
        node(1, &[0, 2, 4]),
        node(2, &[]),
        node(3, &[]),
        node(4, &[]),
        node(5, &[]),
        node(6, &[]),
        node(7, &[]),
        node(8, &[7, 5]),
        node(9, &[0, 4, 5]),
        node(10, &[0, 6]),
    ]));

    let expected = graph.resolve();
    let mut handles = Vec::new();
    for _ in 0..4 {
        let graph = Arc::clone(&graph);
        handles.push(thread::spawn(move || graph.resolve()));
    }

    for handle in handles {
        let resolved = handle.join().expect("resolver thread panicked");
        assert_eq!(resolved, expected);
    }
}

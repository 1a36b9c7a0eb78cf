//! MiniGraph
//!
//! A small in-memory graph container: nodes with attribute maps, and
//! directed or undirected edges that may be labeled and carry attributes.
//!
//! # Features
//!
//! - Nodes are created explicitly or on first use as an edge endpoint
//! - Re-adding a node or an edge merges attributes instead of failing
//! - Parallel edges between the same nodes, told apart by label (`None` included)
//! - Self-loops, directed and undirected
//! - O(1) outgoing and incoming edge lookup; mirrored entries share one attribute map
//! - Degree queries, filtered edge search and subgraph extraction
//!
//! Traversal and path algorithms are out of scope.
//!
//! ## Example Usage
//!
//! ```rust
//! use minigraph::graph::{EdgeSpec, Graph, PropertyMap};
//!
//! let mut graph: Graph<&str> = Graph::new();
//! graph.add_node("alice", PropertyMap::new());
//!
//! // "bob" is created on first use
//! graph.add_edge(EdgeSpec::new("alice", "bob").label("knows").property("since", 2020i64)).unwrap();
//! graph.add_edge(EdgeSpec::new("bob", "carol").undirected()).unwrap();
//!
//! assert_eq!(graph.order(), 3);
//! assert_eq!(graph.size(), 2);
//! assert_eq!(graph.out_degree(&"alice").unwrap(), 1);
//! assert_eq!(graph.degree(&"bob").unwrap(), 2);
//!
//! let knows = graph.edge(&"alice", &"bob", &Some("knows".to_string()), None).unwrap();
//! assert_eq!(knows.get_property("since").unwrap().as_integer(), Some(2020));
//! ```

pub mod graph;

pub use graph::{
    Edge, EdgeFilter, EdgeLabel, EdgeSpec, Graph, GraphConfig, GraphError, GraphResult, Node,
    PropertyMap, PropertyValue,
};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

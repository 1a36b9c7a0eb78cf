//! Core graph container
//!
//! This module implements a small in-memory graph with:
//! - Nodes keyed by any hashable id, each carrying an attribute map
//! - Directed and undirected edges, optionally labeled, with attributes
//! - Parallel edges between the same nodes, distinguished by label
//! - Self-loops
//! - O(1) forward and reverse edge lookup through mirrored hash indices

pub mod config;
pub mod edge;
pub mod index;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use config::GraphConfig;
pub use edge::{Edge, EdgeFilter, EdgeSpec};
pub use index::EdgeIndex;
pub use node::Node;
pub use property::{properties_from_json, PropertyMap, PropertyValue, SharedProperties};
pub use store::{Graph, GraphError, GraphResult};
pub use types::{EdgeLabel, GraphKey};

//! Construction-time settings for a graph

use super::store::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};

/// Capacity hints applied when a graph is created
///
/// Both fields default to zero, which lets the collections grow on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Expected number of nodes
    pub node_capacity: usize,

    /// Expected number of nodes with at least one incident edge
    pub edge_capacity: usize,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    pub fn with_edge_capacity(mut self, capacity: usize) -> Self {
        self.edge_capacity = capacity;
        self
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> GraphResult<Self> {
        serde_json::from_str(json).map_err(|e| GraphError::InvalidConfig(e.to_string()))
    }
}

//! Node view for graph enumeration and node descriptor for construction

use super::property::{PropertyMap, PropertyValue};
use super::types::GraphKey;

/// A node as reported by [`Graph::nodes`](super::Graph::nodes)
///
/// Holds a copy of the node's attributes at the time of enumeration.
/// Two nodes are equal when both id and attributes match. Also used as the
/// node batch item of [`Graph::from_parts`](super::Graph::from_parts).
#[derive(Debug, Clone, PartialEq)]
pub struct Node<N> {
    /// Caller-chosen identifier
    pub id: N,

    /// Attributes attached to this node
    pub properties: PropertyMap,
}

impl<N: GraphKey> Node<N> {
    /// Create a node view with no attributes
    pub fn new(id: N) -> Self {
        Node {
            id,
            properties: PropertyMap::new(),
        }
    }

    /// Create a node view with attributes
    pub fn new_with_properties(id: N, properties: PropertyMap) -> Self {
        Node { id, properties }
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl<N> From<(N, PropertyMap)> for Node<N> {
    fn from((id, properties): (N, PropertyMap)) -> Self {
        Node { id, properties }
    }
}

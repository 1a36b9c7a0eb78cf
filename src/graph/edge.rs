//! Edge views, edge descriptors and edge queries
//!
//! - [`Edge`] is what lookups and enumerations hand back. Its attribute map
//!   is the live shared handle stored in the graph, so writes through it are
//!   seen by every index entry of that edge. While a view from
//!   [`Edge::properties`] is held, writes to that map fail with
//!   [`GraphError::AttributesBorrowed`] instead of panicking.
//! - [`EdgeSpec`] describes an edge to insert. Missing fields default to
//!   the unlabeled, attribute-free, directed edge.
//! - [`EdgeFilter`] narrows [`Graph::find_edges`](super::Graph::find_edges).

use super::property::{share, PropertyMap, PropertyValue, SharedProperties};
use super::store::{GraphError, GraphResult};
use super::types::{EdgeLabel, GraphKey};
use std::cell::Ref;
use std::rc::Rc;

/// An edge in the graph
///
/// Edges have:
/// - A start node and an end node
/// - A label (`None` is a valid label)
/// - Attributes (shared with the graph's index entries)
/// - A directed flag
#[derive(Debug, Clone)]
pub struct Edge<N, L> {
    /// Node the edge leaves (for undirected edges, the endpoint it was reached from)
    pub start: N,

    /// Node the edge enters
    pub end: N,

    /// Discriminates parallel edges between the same pair of nodes
    pub label: EdgeLabel<L>,

    /// Attribute map, shared with the graph
    pub(crate) properties: SharedProperties,

    pub directed: bool,
}

impl<N: GraphKey, L: GraphKey> Edge<N, L> {
    /// Create a detached edge value, mostly useful as an expected value in comparisons
    pub fn new(
        start: N,
        end: N,
        label: EdgeLabel<L>,
        properties: PropertyMap,
        directed: bool,
    ) -> Self {
        Edge {
            start,
            end,
            label,
            properties: share(properties),
            directed,
        }
    }

    /// Borrow the attribute map without copying it.
    ///
    /// Writes to this edge's attributes, through [`set_property`](Self::set_property)
    /// or by re-adding the edge, fail until the view is dropped.
    pub fn properties(&self) -> Ref<'_, PropertyMap> {
        self.properties.borrow()
    }

    /// Copy of the attribute map, detached from the graph
    pub fn to_properties(&self) -> PropertyMap {
        self.properties.borrow().clone()
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<PropertyValue> {
        self.properties.borrow().get(key).cloned()
    }

    /// Set a property value; visible through the graph as well
    pub fn set_property(
        &self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<()> {
        let mut properties = self.properties.try_borrow_mut().map_err(|_| {
            GraphError::attributes_borrowed(&self.start, &self.end, &self.label)
        })?;
        properties.insert(key.into(), value.into());
        Ok(())
    }

    pub fn is_self_loop(&self) -> bool {
        self.start == self.end
    }

    /// Check if this edge connects two specific nodes (in either direction)
    pub fn connects(&self, node1: &N, node2: &N) -> bool {
        (&self.start == node1 && &self.end == node2)
            || (&self.start == node2 && &self.end == node1)
    }

    fn same_endpoints(&self, other: &Self) -> bool {
        if self.start == other.start && self.end == other.end {
            return true;
        }
        // undirected endpoints are an unordered pair
        !self.directed && self.start == other.end && self.end == other.start
    }
}

impl<N: GraphKey, L: GraphKey> PartialEq for Edge<N, L> {
    fn eq(&self, other: &Self) -> bool {
        self.directed == other.directed
            && self.label == other.label
            && self.same_endpoints(other)
            && (Rc::ptr_eq(&self.properties, &other.properties)
                || *self.properties.borrow() == *other.properties.borrow())
    }
}

/// Descriptor for an edge to insert
///
/// ```
/// use minigraph::graph::EdgeSpec;
///
/// let spec: EdgeSpec<u32, String> = EdgeSpec::new(1, 2)
///     .label("knows")
///     .property("since", 2020i64)
///     .undirected();
/// assert!(!spec.directed);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec<N, L> {
    pub start: N,
    pub end: N,
    pub label: EdgeLabel<L>,
    pub properties: PropertyMap,
    pub directed: bool,
}

impl<N, L> EdgeSpec<N, L> {
    /// Unlabeled, attribute-free, directed edge from `start` to `end`
    pub fn new(start: N, end: N) -> Self {
        EdgeSpec {
            start,
            end,
            label: None,
            properties: PropertyMap::new(),
            directed: true,
        }
    }

    pub fn label(mut self, label: impl Into<L>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the label explicitly, `None` included
    pub fn with_label(mut self, label: EdgeLabel<L>) -> Self {
        self.label = label;
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace the attribute map
    pub fn properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn undirected(self) -> Self {
        self.directed(false)
    }
}

impl<N, L> From<(N, N)> for EdgeSpec<N, L> {
    fn from((start, end): (N, N)) -> Self {
        EdgeSpec::new(start, end)
    }
}

/// Filter for [`Graph::find_edges`](super::Graph::find_edges)
///
/// Every unset field matches anything. A set `data` pattern matches edges
/// whose attributes contain every given key with an equal value.
#[derive(Debug, Clone)]
pub struct EdgeFilter<N, L> {
    pub(crate) start: Option<N>,
    pub(crate) end: Option<N>,
    pub(crate) label: Option<EdgeLabel<L>>,
    pub(crate) directed: Option<bool>,
    pub(crate) data: Option<PropertyMap>,
}

impl<N, L> Default for EdgeFilter<N, L> {
    fn default() -> Self {
        EdgeFilter {
            start: None,
            end: None,
            label: None,
            directed: None,
            data: None,
        }
    }
}

impl<N, L> EdgeFilter<N, L> {
    /// Filter that matches every edge
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: N) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: N) -> Self {
        self.end = Some(end);
        self
    }

    pub fn label(mut self, label: impl Into<L>) -> Self {
        self.label = Some(Some(label.into()));
        self
    }

    /// Only edges stored under the `None` label
    pub fn unlabeled(mut self) -> Self {
        self.label = Some(None);
        self
    }

    pub fn with_label(mut self, label: EdgeLabel<L>) -> Self {
        self.label = Some(label);
        self
    }

    /// Restrict to the directed (`true`) or undirected (`false`) index
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = Some(directed);
        self
    }

    pub fn data(mut self, pattern: PropertyMap) -> Self {
        self.data = Some(pattern);
        self
    }

    /// Add one key/value pair to the attribute pattern
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.data
            .get_or_insert_with(PropertyMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub(crate) fn wants_directed(&self) -> bool {
        self.directed != Some(false)
    }

    pub(crate) fn wants_undirected(&self) -> bool {
        self.directed != Some(true)
    }
}

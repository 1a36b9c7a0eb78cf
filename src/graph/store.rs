//! In-memory graph container
//!
//! A [`Graph`] owns a node table and three [`EdgeIndex`]es:
//! - `edges`: directed edges keyed by start node (node -> label -> end)
//! - `reverse`: the same directed edges keyed by end node (node -> label -> start)
//! - `undirected`: undirected edges, stored under both endpoints
//!   (a self-loop occupies a single entry)
//!
//! Mirrored entries hold the same [`SharedProperties`] handle, so attributes
//! written through one lookup are visible through every other. Each mutation
//! updates all affected indices before it returns.
//!
//! The graph is single-threaded (`!Send`); callers that need sharing across
//! threads wrap it in their own lock.

use super::config::GraphConfig;
use super::edge::{Edge, EdgeFilter, EdgeSpec};
use super::index::{EdgeIndex, FxIndexMap, LabelMap};
use super::node::Node;
use super::property::{matches_subset, merge_properties, share, PropertyMap, SharedProperties};
use super::types::{describe, EdgeLabel, GraphKey};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(String),

    #[error("Edge ({start}, {end}, label {label}) not found")]
    EdgeNotFound {
        start: String,
        end: String,
        label: String,
    },

    #[error("Edge ({start}, {end}, label {label}) conflicts with an existing edge of the opposite directedness")]
    MixedDirectionality {
        start: String,
        end: String,
        label: String,
    },

    #[error("Expected directed={expected} but the stored edge has directed={actual}")]
    AssertionViolation { expected: bool, actual: bool },

    #[error("Attributes of edge ({start}, {end}, label {label}) are borrowed")]
    AttributesBorrowed {
        start: String,
        end: String,
        label: String,
    },

    #[error("Invalid graph config: {0}")]
    InvalidConfig(String),
}

impl GraphError {
    fn node_not_found<N: fmt::Debug>(id: &N) -> Self {
        GraphError::NodeNotFound(describe(id))
    }

    fn edge_not_found<N: fmt::Debug, L: fmt::Debug>(start: &N, end: &N, label: &EdgeLabel<L>) -> Self {
        GraphError::EdgeNotFound {
            start: describe(start),
            end: describe(end),
            label: describe(label),
        }
    }

    fn mixed_directionality<N: fmt::Debug, L: fmt::Debug>(
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
    ) -> Self {
        GraphError::MixedDirectionality {
            start: describe(start),
            end: describe(end),
            label: describe(label),
        }
    }

    pub(crate) fn attributes_borrowed<N: fmt::Debug, L: fmt::Debug>(
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
    ) -> Self {
        GraphError::AttributesBorrowed {
            start: describe(start),
            end: describe(end),
            label: describe(label),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// One index entry as (node, label, neighbour, attributes)
type Entry<'a, N, L> = (&'a N, &'a EdgeLabel<L>, &'a N, &'a SharedProperties);

/// Identity of an edge's attribute cell, used to report each undirected edge once
type CellId = *const RefCell<PropertyMap>;

/// In-memory graph with labeled, directed and undirected edges
///
/// `N` is the node id type and `L` the label type; both only need to be
/// cloneable, hashable and comparable. `None` is a valid label of its own.
#[derive(Debug)]
pub struct Graph<N, L = String> {
    /// Node storage: id -> attributes
    nodes: FxIndexMap<N, PropertyMap>,

    /// Directed edges by start node
    edges: EdgeIndex<N, L>,

    /// Directed edges by end node
    reverse: EdgeIndex<N, L>,

    /// Undirected edges by either endpoint
    undirected: EdgeIndex<N, L>,
}

impl<N: GraphKey, L: GraphKey> Graph<N, L> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty graph pre-sized from `config`
    pub fn with_config(config: GraphConfig) -> Self {
        Graph {
            nodes: IndexMap::with_capacity_and_hasher(config.node_capacity, FxBuildHasher),
            edges: EdgeIndex::with_capacity(config.edge_capacity),
            reverse: EdgeIndex::with_capacity(config.edge_capacity),
            undirected: EdgeIndex::with_capacity(config.edge_capacity),
        }
    }

    /// Build a graph from an initial node batch and edge batch.
    ///
    /// Nodes are applied first; edges may name nodes that are not in the
    /// node batch, which are then created with no attributes. Edge errors
    /// follow [`add_edges`](Self::add_edges).
    ///
    /// A node is a bare id (`Node::new(id)`) or an `(id, attributes)` pair.
    pub fn from_parts<I, T, E, S>(nodes: I, edges: E) -> GraphResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Node<N>>,
        E: IntoIterator<Item = S>,
        S: Into<EdgeSpec<N, L>>,
    {
        let mut graph = Self::new();
        for node in nodes {
            let node: Node<N> = node.into();
            graph.add_node(node.id, node.properties);
        }
        graph.add_edges(edges)?;
        Ok(graph)
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Insert a node, or merge `properties` into an existing node's
    /// attributes (incoming keys overwrite).
    pub fn add_node(&mut self, id: N, properties: PropertyMap) {
        merge_properties(self.nodes.entry(id).or_default(), properties);
    }

    /// Remove a node and every edge touching it; returns its attributes
    pub fn remove_node(&mut self, id: &N) -> GraphResult<PropertyMap> {
        if !self.nodes.contains_key(id) {
            return Err(GraphError::node_not_found(id));
        }

        // Take the node's own buckets, then drop the mirror entries they
        // point at. Self-loops live only in these buckets.
        let outgoing = self.edges.remove_bucket(id);
        let incoming = self.reverse.remove_bucket(id);
        let undirected = self.undirected.remove_bucket(id);

        let mut removed = Self::detach_mirrors(outgoing, &mut self.reverse, id, true);
        removed += Self::detach_mirrors(incoming, &mut self.edges, id, true);
        removed += Self::detach_mirrors(undirected, &mut self.undirected, id, false);

        let properties = self.nodes.swap_remove(id).unwrap_or_default();
        debug!(node = ?id, edge_entries = removed, "Removed node");
        Ok(properties)
    }

    /// For every entry of `bucket` (owned by `id`), delete the entry that
    /// points back at `id` from `mirror`. Returns the number of entries seen.
    fn detach_mirrors(
        bucket: Option<LabelMap<N, L>>,
        mirror: &mut EdgeIndex<N, L>,
        id: &N,
        directed: bool,
    ) -> usize {
        let mut seen = 0;
        for (label, neighbors) in bucket.into_iter().flatten() {
            for neighbor in neighbors.into_keys() {
                seen += 1;
                if &neighbor == id {
                    continue;
                }
                if mirror.remove(&neighbor, &label, id).is_none() {
                    warn!(
                        node = ?id,
                        neighbor = ?neighbor,
                        label = ?label,
                        directed,
                        "Missing mirror entry while removing node"
                    );
                }
            }
        }
        seen
    }

    /// Get a node's attributes
    pub fn node(&self, id: &N) -> GraphResult<&PropertyMap> {
        self.nodes.get(id).ok_or_else(|| GraphError::node_not_found(id))
    }

    pub fn node_mut(&mut self, id: &N) -> GraphResult<&mut PropertyMap> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::node_not_found(id))
    }

    pub fn has_node(&self, id: &N) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes with a copy of their attributes
    pub fn nodes(&self) -> Vec<Node<N>> {
        self.nodes
            .iter()
            .map(|(id, properties)| Node::new_with_properties(id.clone(), properties.clone()))
            .collect()
    }

    fn ensure_node(&self, id: &N) -> GraphResult<()> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::node_not_found(id))
        }
    }

    // ------------------------------------------------------------------
    // Edge insertion
    // ------------------------------------------------------------------

    /// Insert one edge, creating missing endpoints.
    ///
    /// Re-adding an edge with the same start, end, label and directedness
    /// merges attributes. Adding it with the opposite directedness fails
    /// with [`GraphError::MixedDirectionality`] and changes nothing.
    pub fn add_edge(&mut self, edge: impl Into<EdgeSpec<N, L>>) -> GraphResult<()> {
        self.insert_edge(edge.into())
    }

    /// Insert a batch of edges in order.
    ///
    /// Stops at the first failing edge. Edges before it stay applied, the
    /// failing edge writes nothing, and later edges are not processed.
    pub fn add_edges<E, S>(&mut self, edges: E) -> GraphResult<()>
    where
        E: IntoIterator<Item = S>,
        S: Into<EdgeSpec<N, L>>,
    {
        for edge in edges {
            self.insert_edge(edge.into())?;
        }
        Ok(())
    }

    fn insert_edge(&mut self, spec: EdgeSpec<N, L>) -> GraphResult<()> {
        let EdgeSpec {
            start,
            end,
            label,
            properties,
            directed,
        } = spec;

        self.check_directionality(&start, &end, &label, directed)?;

        self.nodes.entry(start.clone()).or_default();
        self.nodes.entry(end.clone()).or_default();

        trace!(start = ?start, end = ?end, label = ?label, directed, "Adding edge");

        if directed {
            if let Some(existing) = self.edges.get(&start, &label, &end) {
                return Self::merge_into(existing, properties, &start, &end, &label);
            }
            let data = share(properties);
            self.reverse
                .insert(end.clone(), label.clone(), start.clone(), Rc::clone(&data));
            self.edges.insert(start, label, end, data);
        } else {
            if let Some(existing) = self.undirected.get(&start, &label, &end) {
                return Self::merge_into(existing, properties, &start, &end, &label);
            }
            let data = share(properties);
            if start != end {
                self.undirected
                    .insert(end.clone(), label.clone(), start.clone(), Rc::clone(&data));
            }
            self.undirected.insert(start, label, end, data);
        }
        Ok(())
    }

    /// Merge re-added attributes into a stored edge. Fails, leaving the map
    /// untouched, while a caller still holds a view of it.
    fn merge_into(
        existing: &SharedProperties,
        properties: PropertyMap,
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
    ) -> GraphResult<()> {
        let mut target = existing
            .try_borrow_mut()
            .map_err(|_| GraphError::attributes_borrowed(start, end, label))?;
        merge_properties(&mut target, properties);
        Ok(())
    }

    /// Reject an edge whose slots are held by an edge of the other kind
    fn check_directionality(
        &self,
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
        directed: bool,
    ) -> GraphResult<()> {
        let conflict = if directed {
            self.undirected.contains(start, label, end)
        } else {
            self.edges.contains(start, label, end) || self.edges.contains(end, label, start)
        };

        if conflict {
            Err(GraphError::mixed_directionality(start, end, label))
        } else {
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Edge lookup and removal
    // ------------------------------------------------------------------

    /// Work out whether (start, label, end) is stored as directed or
    /// undirected, checking the caller's expectation if one was given
    fn resolve_directed(
        &self,
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
        expected: Option<bool>,
    ) -> GraphResult<bool> {
        let actual = if self.edges.contains(start, label, end) {
            true
        } else if self.undirected.contains(start, label, end) {
            false
        } else {
            return Err(GraphError::edge_not_found(start, end, label));
        };

        match expected {
            Some(expected) if expected != actual => {
                Err(GraphError::AssertionViolation { expected, actual })
            }
            _ => Ok(actual),
        }
    }

    /// Remove one edge and its mirror entry; returns the removed edge
    pub fn remove_edge(
        &mut self,
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
        directed: Option<bool>,
    ) -> GraphResult<Edge<N, L>> {
        let directed = self.resolve_directed(start, end, label, directed)?;

        let data = if directed {
            let data = self
                .edges
                .remove(start, label, end)
                .ok_or_else(|| GraphError::edge_not_found(start, end, label))?;
            if self.reverse.remove(end, label, start).is_none() {
                warn!(start = ?start, end = ?end, label = ?label, "Missing reverse entry for directed edge");
            }
            data
        } else {
            let data = self
                .undirected
                .remove(start, label, end)
                .ok_or_else(|| GraphError::edge_not_found(start, end, label))?;
            // a self-loop has only the one entry
            if start != end && self.undirected.remove(end, label, start).is_none() {
                warn!(start = ?start, end = ?end, label = ?label, "Missing mirror entry for undirected edge");
            }
            data
        };

        debug!(start = ?start, end = ?end, label = ?label, directed, "Removed edge");
        Ok(Edge {
            start: start.clone(),
            end: end.clone(),
            label: label.clone(),
            properties: data,
            directed,
        })
    }

    /// Look up one edge. The returned edge shares its attribute map with
    /// the graph.
    pub fn edge(
        &self,
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
        directed: Option<bool>,
    ) -> GraphResult<Edge<N, L>> {
        let directed = self.resolve_directed(start, end, label, directed)?;
        let index = if directed { &self.edges } else { &self.undirected };
        let data = index
            .get(start, label, end)
            .ok_or_else(|| GraphError::edge_not_found(start, end, label))?;

        Ok(Edge {
            start: start.clone(),
            end: end.clone(),
            label: label.clone(),
            properties: Rc::clone(data),
            directed,
        })
    }

    /// True if the edge exists (with the given directedness, when one is given)
    pub fn has_edge(&self, start: &N, end: &N, label: &EdgeLabel<L>, directed: Option<bool>) -> bool {
        self.resolve_directed(start, end, label, directed).is_ok()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every edge matching `filter`.
    ///
    /// Directed edges come first, then undirected ones; each edge appears
    /// exactly once. An undirected edge found through a `start` filter is
    /// reported from that endpoint.
    pub fn find_edges(&self, filter: &EdgeFilter<N, L>) -> Vec<Edge<N, L>> {
        let mut found = Vec::new();
        if filter.wants_directed() {
            Self::collect_matches(&self.edges, filter, true, &mut found);
        }
        if filter.wants_undirected() {
            Self::collect_matches(&self.undirected, filter, false, &mut found);
        }
        found
    }

    fn collect_matches<'a>(
        index: &'a EdgeIndex<N, L>,
        filter: &'a EdgeFilter<N, L>,
        directed: bool,
        found: &mut Vec<Edge<N, L>>,
    ) {
        let entries: Box<dyn Iterator<Item = Entry<'a, N, L>> + 'a> = match &filter.start {
            Some(start) => Box::new(
                index
                    .iter_from(start)
                    .map(move |(label, end, data)| (start, label, end, data)),
            ),
            None => Box::new(index.iter()),
        };

        let mut seen: FxHashSet<CellId> = FxHashSet::default();
        for (start, label, end, data) in entries {
            if filter.label.as_ref().is_some_and(|wanted| wanted != label) {
                continue;
            }
            if filter.end.as_ref().is_some_and(|wanted| wanted != end) {
                continue;
            }
            if let Some(pattern) = &filter.data {
                if !matches_subset(&data.borrow(), pattern) {
                    continue;
                }
            }
            if !directed && !seen.insert(Rc::as_ptr(data)) {
                continue;
            }
            found.push(Edge {
                start: start.clone(),
                end: end.clone(),
                label: label.clone(),
                properties: Rc::clone(data),
                directed,
            });
        }
    }

    /// Every edge in the graph
    pub fn edges(&self) -> Vec<Edge<N, L>> {
        self.find_edges(&EdgeFilter::new())
    }

    /// Every edge from `start` to `end`, across all labels
    pub fn edges_between(&self, start: &N, end: &N) -> Vec<Edge<N, L>> {
        self.find_edges(&EdgeFilter::new().start(start.clone()).end(end.clone()))
    }

    /// Number of nodes
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    pub fn size(&self) -> usize {
        let (loops, others) = self
            .undirected
            .iter()
            .fold((0, 0), |(loops, others), (start, _, end, _)| {
                if start == end {
                    (loops + 1, others)
                } else {
                    (loops, others + 1)
                }
            });
        // every non-loop undirected edge holds two entries
        self.edges.len() + loops + others / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Directed edges leaving `id` plus undirected edges touching it
    pub fn out_degree(&self, id: &N) -> GraphResult<usize> {
        self.ensure_node(id)?;
        Ok(self.edges.bucket_len(id) + self.undirected.bucket_len(id))
    }

    /// Directed edges entering `id` plus undirected edges touching it
    pub fn in_degree(&self, id: &N) -> GraphResult<usize> {
        self.ensure_node(id)?;
        Ok(self.reverse.bucket_len(id) + self.undirected.bucket_len(id))
    }

    /// Edges touching `id`; any self-loop counts twice
    pub fn degree(&self, id: &N) -> GraphResult<usize> {
        self.ensure_node(id)?;
        Ok(self.edges.bucket_len(id)
            + self.reverse.bucket_len(id)
            + self.undirected.bucket_len(id)
            + self.undirected.loops_at(id))
    }

    /// Copy the given nodes and every edge with both endpoints among them
    /// into a new graph. Attributes are copied, not shared.
    pub fn subgraph<I>(&self, ids: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = N>,
    {
        let wanted: FxIndexSet<N> = ids.into_iter().collect();
        for id in &wanted {
            self.ensure_node(id)?;
        }

        let mut sub = Self::with_config(
            GraphConfig::new()
                .with_node_capacity(wanted.len())
                .with_edge_capacity(wanted.len()),
        );
        for id in &wanted {
            sub.add_node(id.clone(), self.node(id)?.clone());
        }

        let mut seen: FxHashSet<CellId> = FxHashSet::default();
        for start in &wanted {
            for (label, end, data) in self.edges.iter_from(start) {
                if wanted.contains(end) {
                    sub.insert_edge(Self::detached_spec(start, end, label, data, true))?;
                }
            }
            for (label, end, data) in self.undirected.iter_from(start) {
                if wanted.contains(end) && seen.insert(Rc::as_ptr(data)) {
                    sub.insert_edge(Self::detached_spec(start, end, label, data, false))?;
                }
            }
        }

        debug!(nodes = sub.order(), edges = sub.size(), "Extracted subgraph");
        Ok(sub)
    }

    fn detached_spec(
        start: &N,
        end: &N,
        label: &EdgeLabel<L>,
        data: &SharedProperties,
        directed: bool,
    ) -> EdgeSpec<N, L> {
        EdgeSpec::new(start.clone(), end.clone())
            .with_label(label.clone())
            .properties(data.borrow().clone())
            .directed(directed)
    }

    /// Drop every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.reverse.clear();
        self.undirected.clear();
    }
}

impl<N: GraphKey, L: GraphKey> Default for Graph<N, L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Graphs are equal when they hold the same nodes (with equal attributes)
/// and the same edges (with equal attributes), in any order.
impl<N: GraphKey, L: GraphKey> PartialEq for Graph<N, L> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.size() == other.size()
            && self.edges().iter().all(|edge| {
                other
                    .edge(&edge.start, &edge.end, &edge.label, Some(edge.directed))
                    .is_ok_and(|found| found == *edge)
            })
    }
}

//! Three-level edge index: node -> label -> neighbour -> attributes
//!
//! The graph keeps three of these: outgoing directed edges, incoming
//! directed edges, and undirected edges (stored under both endpoints).
//! Removal prunes emptied label and node buckets so an index never holds
//! empty containers.

use super::property::SharedProperties;
use super::types::{EdgeLabel, GraphKey};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Insertion-ordered map with the fast Fx hasher
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Neighbour -> edge attributes
pub type NeighborMap<N> = FxIndexMap<N, SharedProperties>;

/// Label -> neighbours
pub type LabelMap<N, L> = FxIndexMap<EdgeLabel<L>, NeighborMap<N>>;

#[derive(Debug)]
pub struct EdgeIndex<N, L> {
    buckets: FxIndexMap<N, LabelMap<N, L>>,
}

impl<N: GraphKey, L: GraphKey> EdgeIndex<N, L> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size the node level
    pub fn with_capacity(nodes: usize) -> Self {
        EdgeIndex {
            buckets: IndexMap::with_capacity_and_hasher(nodes, FxBuildHasher),
        }
    }

    pub fn get(&self, node: &N, label: &EdgeLabel<L>, neighbor: &N) -> Option<&SharedProperties> {
        self.buckets.get(node)?.get(label)?.get(neighbor)
    }

    pub fn contains(&self, node: &N, label: &EdgeLabel<L>, neighbor: &N) -> bool {
        self.get(node, label, neighbor).is_some()
    }

    /// Store `data` at (node, label, neighbor), returning the handle it replaced
    pub fn insert(
        &mut self,
        node: N,
        label: EdgeLabel<L>,
        neighbor: N,
        data: SharedProperties,
    ) -> Option<SharedProperties> {
        self.buckets
            .entry(node)
            .or_default()
            .entry(label)
            .or_default()
            .insert(neighbor, data)
    }

    /// Remove one entry and prune the label and node buckets if they emptied
    pub fn remove(
        &mut self,
        node: &N,
        label: &EdgeLabel<L>,
        neighbor: &N,
    ) -> Option<SharedProperties> {
        let labels = self.buckets.get_mut(node)?;
        let neighbors = labels.get_mut(label)?;
        let removed = neighbors.swap_remove(neighbor)?;

        if neighbors.is_empty() {
            labels.swap_remove(label);
        }
        if labels.is_empty() {
            self.buckets.swap_remove(node);
        }
        Some(removed)
    }

    /// Drop every entry stored under `node`
    pub fn remove_bucket(&mut self, node: &N) -> Option<LabelMap<N, L>> {
        self.buckets.swap_remove(node)
    }

    pub fn bucket(&self, node: &N) -> Option<&LabelMap<N, L>> {
        self.buckets.get(node)
    }

    /// Number of entries stored under `node`, across all labels
    pub fn bucket_len(&self, node: &N) -> usize {
        self.buckets
            .get(node)
            .map(|labels| labels.values().map(|neighbors| neighbors.len()).sum())
            .unwrap_or(0)
    }

    /// Number of self-loop entries stored under `node`
    pub fn loops_at(&self, node: &N) -> usize {
        self.buckets
            .get(node)
            .map(|labels| {
                labels
                    .values()
                    .filter(|neighbors| neighbors.contains_key(node))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Every entry as (node, label, neighbour, attributes)
    pub fn iter(&self) -> impl Iterator<Item = (&N, &EdgeLabel<L>, &N, &SharedProperties)> + '_ {
        self.buckets.iter().flat_map(|(node, labels)| {
            labels.iter().flat_map(move |(label, neighbors)| {
                neighbors
                    .iter()
                    .map(move |(neighbor, data)| (node, label, neighbor, data))
            })
        })
    }

    /// Entries stored under one node as (label, neighbour, attributes)
    pub fn iter_from<'a>(
        &'a self,
        node: &N,
    ) -> impl Iterator<Item = (&'a EdgeLabel<L>, &'a N, &'a SharedProperties)> + 'a {
        self.buckets.get(node).into_iter().flat_map(|labels| {
            labels.iter().flat_map(|(label, neighbors)| {
                neighbors.iter().map(move |(neighbor, data)| (label, neighbor, data))
            })
        })
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.buckets.keys().map(|node| self.bucket_len(node)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of nodes that own at least one entry
    pub fn node_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl<N: GraphKey, L: GraphKey> Default for EdgeIndex<N, L> {
    fn default() -> Self {
        Self::new()
    }
}

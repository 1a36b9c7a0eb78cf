//! Core type definitions for the graph container

use std::fmt;
use std::hash::Hash;

/// Bound shared by node ids and edge labels.
///
/// Any comparable, hashable, cloneable value works; `Debug` is needed so
/// keys can be named in errors and log lines.
pub trait GraphKey: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> GraphKey for T {}

/// Edge label as stored in the indices.
///
/// `None` is a label in its own right: an unlabeled edge and an edge
/// labeled `"x"` between the same pair of nodes are two parallel edges.
pub type EdgeLabel<L> = Option<L>;

/// Render a key for error messages
pub(crate) fn describe<K: fmt::Debug>(key: &K) -> String {
    format!("{:?}", key)
}

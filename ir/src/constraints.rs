//! Synthetic ordering constraints layered over the data graph.
//!
//! Constraint edges carry no data. They exist so that reordering passes
//! still respect an externally imposed order between nodes, notably the
//! global order of communication starts. The data graph itself is never
//! mutated: traversals see the union of data and constraint edges through
//! [`GraphView`](crate::GraphView).

use std::collections::{BTreeMap, BTreeSet};

use crate::node::NodeId;

/// A set of ordering-only predecessor edges.
///
/// Stored symmetrically (predecessor and successor maps) so both
/// traversal directions stay linear in the reachable subgraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingConstraints {
    preds: BTreeMap<NodeId, BTreeSet<NodeId>>,
    succs: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl OrderingConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `later` must not be scheduled before `earlier`.
    ///
    /// Idempotent: repeated identical calls leave the set unchanged.
    pub fn add_ordering_dependency(&mut self, later: NodeId, earlier: NodeId) {
        self.preds.entry(later).or_default().insert(earlier);
        self.succs.entry(earlier).or_default().insert(later);
    }

    /// Whether a direct constraint edge `earlier -> later` exists.
    pub fn constrains(&self, later: NodeId, earlier: NodeId) -> bool {
        self.preds.get(&later).is_some_and(|set| set.contains(&earlier))
    }

    /// Constraint predecessors of `id`, ascending by id.
    pub fn preds_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.preds.get(&id).into_iter().flatten().copied()
    }

    /// Constraint successors of `id`, ascending by id.
    pub fn succs_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.succs.get(&id).into_iter().flatten().copied()
    }

    /// Total number of constraint edges.
    pub fn len(&self) -> usize {
        self.preds.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.preds.values().all(BTreeSet::is_empty)
    }
}

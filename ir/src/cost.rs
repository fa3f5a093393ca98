//! Runtime-cost estimation seam.
//!
//! The scheduler treats per-node runtime as an opaque oracle supplied by
//! the embedding compiler. Estimates only need to be mutually consistent
//! and non-negative; units are arbitrary.

use std::collections::BTreeMap;

use crate::graph::Graph;
use crate::node::NodeId;

/// External estimator of a node's runtime.
pub trait CostModel {
    /// Estimated runtime of `node`, non-negative, in arbitrary but
    /// consistent units.
    fn estimate(&self, graph: &Graph, node: NodeId) -> f64;
}

/// Name-keyed cost table with a fallback for unlisted nodes.
///
/// Mostly useful for tests and for drivers that precompute estimates.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    costs: BTreeMap<String, f64>,
    fallback: f64,
}

impl CostTable {
    /// Empty table; unlisted nodes cost zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with the given fallback for unlisted nodes.
    pub fn with_fallback(fallback: f64) -> Self {
        Self { costs: BTreeMap::new(), fallback }
    }

    /// Set the estimate for the named node.
    pub fn cost(mut self, name: impl Into<String>, estimate: f64) -> Self {
        self.costs.insert(name.into(), estimate);
        self
    }
}

impl CostModel for CostTable {
    fn estimate(&self, graph: &Graph, node: NodeId) -> f64 {
        self.costs.get(graph.node(node).name()).copied().unwrap_or(self.fallback)
    }
}

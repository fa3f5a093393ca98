//! Graph arena, builder and the ancestor/descendant analyzer.
//!
//! The [`Graph`] owns all nodes in original program order. Construction
//! goes through kind-specific builder methods that only accept ids the
//! graph has already issued, so the data-edge relation is acyclic by
//! construction. [`GraphView`] pairs an immutable graph with a set of
//! [`OrderingConstraints`] and answers all traversal queries over the
//! merged edge relation.

use std::collections::{BTreeSet, HashMap};

use smallvec::SmallVec;

use crate::constraints::OrderingConstraints;
use crate::error::{DuplicateNameSnafu, ForeignNodeSnafu, Result, WaitPairsNonCommSnafu};
use crate::node::{Node, NodeId, NodeKind};

/// Dependency graph of scheduling units.
///
/// Arena insertion order is the "original order" every scheduling pass
/// refers to: it is assumed to be a valid topological order of the data
/// edges, which the builder guarantees by rejecting forward references.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in original program order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Access a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different graph. Builder methods
    /// validate caller-supplied ids, so stored edges are always in range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Access a node, or `None` for a foreign id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node by its stable name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// All communication starts, in original order.
    pub fn comm_starts(&self) -> Vec<NodeId> {
        self.ids().filter(|id| self.node(*id).kind.is_comm()).collect()
    }

    /// Sort ids ascending by node name.
    ///
    /// Every iteration whose order can leak into scheduler output goes
    /// through this helper, keeping schedules byte-identical across runs.
    pub fn name_sorted(&self, ids: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = ids.into_iter().collect();
        ids.sort_unstable_by(|a, b| self.node(*a).name.cmp(&self.node(*b).name));
        ids
    }

    /// Names of the given nodes, in the given order.
    pub fn names_of(&self, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
        ids.into_iter().map(|id| self.node(id).name.clone()).collect()
    }

    /// Add a compute node consuming `args`.
    pub fn add_compute(&mut self, name: impl Into<String>, args: &[NodeId]) -> Result<NodeId> {
        self.insert(name.into(), NodeKind::Compute, args)
    }

    /// Add a communication start consuming `args`.
    pub fn add_comm_start(&mut self, name: impl Into<String>, args: &[NodeId]) -> Result<NodeId> {
        self.insert(name.into(), NodeKind::CommStart, args)
    }

    /// Add a wait paired with the communication `start`.
    ///
    /// The pairing is structural: the wait's only predecessor is `start`,
    /// and `start` must be a [`NodeKind::CommStart`].
    pub fn add_wait(&mut self, name: impl Into<String>, start: NodeId) -> Result<NodeId> {
        let name = name.into();
        self.check(start)?;
        let kind = self.node(start).kind;
        snafu::ensure!(
            kind.is_comm(),
            WaitPairsNonCommSnafu { name: name.clone(), start: self.node(start).name.clone(), kind: kind.as_ref() }
        );
        self.insert(name, NodeKind::Wait { start }, &[start])
    }

    /// Record that `id` reads or writes the named buffer.
    pub fn record_buffer(&mut self, id: NodeId, buffer: impl Into<String>) -> Result<()> {
        self.check(id)?;
        self.nodes[id.index()].buffers.insert(buffer.into());
        Ok(())
    }

    fn check(&self, id: NodeId) -> Result<()> {
        snafu::ensure!(id.index() < self.nodes.len(), ForeignNodeSnafu { id });
        Ok(())
    }

    fn insert(&mut self, name: String, kind: NodeKind, args: &[NodeId]) -> Result<NodeId> {
        snafu::ensure!(!self.by_name.contains_key(&name), DuplicateNameSnafu { name });
        for &arg in args {
            self.check(arg)?;
        }

        let id = NodeId(self.nodes.len() as u32);
        for &arg in args {
            self.nodes[arg.index()].users.insert(id);
        }
        self.by_name.insert(name.clone(), id);
        self.nodes.push(Node {
            name,
            kind,
            args: SmallVec::from_slice(args),
            users: BTreeSet::new(),
            buffers: BTreeSet::new(),
        });
        Ok(id)
    }
}

/// Immutable graph plus ordering constraints, merged at traversal time.
///
/// All scheduling passes read dependencies through this view, so data
/// edges and synthetic ordering edges are indistinguishable to them.
#[derive(Clone, Copy)]
pub struct GraphView<'a> {
    graph: &'a Graph,
    constraints: &'a OrderingConstraints,
}

impl<'a> GraphView<'a> {
    pub fn new(graph: &'a Graph, constraints: &'a OrderingConstraints) -> Self {
        Self { graph, constraints }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Merged predecessors of `id`: data args first (deduplicated,
    /// preserving first occurrence), then constraint-only edges.
    pub fn preds(&self, id: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let args = self.graph.node(id).args();
        let data = args
            .iter()
            .copied()
            .enumerate()
            .filter(move |(i, p)| !args[..*i].contains(p))
            .map(|(_, p)| p);
        data.chain(self.constraints.preds_of(id).filter(move |p| !args.contains(p)))
    }

    /// Merged successors of `id`.
    pub fn succs(&self, id: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let users = self.graph.node(id).users();
        users.iter().copied().chain(self.constraints.succs_of(id).filter(move |s| !users.contains(s)))
    }

    /// Whether `pred` is a direct merged predecessor of `id`.
    pub fn is_pred(&self, id: NodeId, pred: NodeId) -> bool {
        self.graph.node(id).args().contains(&pred) || self.constraints.constrains(id, pred)
    }

    /// All transitive merged predecessors of `id`, excluding `id`.
    ///
    /// Breadth-first with a visited set; linear in the reachable subgraph.
    pub fn ancestors(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.closure(id, |view, n| view.preds(n).collect())
    }

    /// All transitive merged successors of `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.closure(id, |view, n| view.succs(n).collect())
    }

    fn closure(&self, id: NodeId, step: impl Fn(&Self, NodeId) -> Vec<NodeId>) -> BTreeSet<NodeId> {
        let mut reached = BTreeSet::new();
        let mut cur = vec![id];
        while !cur.is_empty() {
            let mut next = Vec::new();
            for n in cur {
                for m in step(self, n) {
                    if reached.insert(m) {
                        next.push(m);
                    }
                }
            }
            cur = next;
        }
        reached
    }
}

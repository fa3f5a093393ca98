//! Node model for the scheduling dependency graph.
//!
//! A [`Node`] is one scheduling unit: a fused region of compute, the start
//! of an asynchronous collective, or a wait blocking on a collective's
//! completion. Nodes are owned by a [`Graph`](crate::Graph) arena and
//! referenced by [`NodeId`].

use std::collections::BTreeSet;

use smallvec::SmallVec;

/// Identifier of a node within its owning [`Graph`](crate::Graph).
///
/// Ids are dense arena indices handed out in original program order:
/// `NodeId` comparisons therefore reflect insertion order, not name order.
/// Use [`Graph::name_sorted`](crate::Graph::name_sorted) wherever iteration
/// order must be deterministic by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node does at execution time.
///
/// The scheduler never probes beyond this tag: all dispatch on node
/// behavior is an exhaustive match over these three variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
pub enum NodeKind {
    /// Ordinary compute work.
    Compute,
    /// Initiation of an asynchronous collective communication.
    CommStart,
    /// Blocks until the paired [`CommStart`](NodeKind::CommStart) completes.
    Wait {
        /// The communication this wait is paired with.
        start: NodeId,
    },
}

impl NodeKind {
    /// Whether this is a communication start.
    pub fn is_comm(&self) -> bool {
        matches!(self, Self::CommStart)
    }

    /// Whether this is a wait.
    pub fn is_wait(&self) -> bool {
        matches!(self, Self::Wait { .. })
    }
}

/// One scheduling unit in the dependency graph.
///
/// Carries the stable name used for deterministic tie-breaks, the kind
/// tag, the ordered predecessor list (`args`), the successor set
/// (`users`), and the set of buffer names the node reads or writes.
/// Runtime cost is deliberately absent: it is queried through the
/// [`CostModel`](crate::CostModel) oracle.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) args: SmallVec<[NodeId; 2]>,
    pub(crate) users: BTreeSet<NodeId>,
    pub(crate) buffers: BTreeSet<String>,
}

impl Node {
    /// Stable unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind tag.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Ordered list of predecessors whose outputs this node consumes.
    pub fn args(&self) -> &[NodeId] {
        &self.args
    }

    /// Set of nodes consuming this node's output.
    pub fn users(&self) -> &BTreeSet<NodeId> {
        &self.users
    }

    /// Names of the buffers this node reads or writes.
    pub fn buffers(&self) -> &BTreeSet<String> {
        &self.buffers
    }
}

//! Sink waits down to their first use.

use std::collections::BTreeSet;

use weft_ir::{GraphView, NodeId};

/// Move every wait as late as possible.
///
/// One forward scan over a topologically valid sequence. Waits are held
/// back in a pending set; just before emitting a node that consumes one
/// or more pending waits, those waits are released in ascending name
/// order. Waits nothing ever demands are flushed at the end, also in
/// name order. This maximizes the gap between a communication's start
/// and the point execution must block on it, and is idempotent on an
/// already-sunk sequence.
pub fn sink_waits(view: GraphView<'_>, order: Vec<NodeId>) -> Vec<NodeId> {
    let graph = view.graph();
    let mut result = Vec::with_capacity(order.len());
    let mut pending: BTreeSet<NodeId> = BTreeSet::new();

    for id in order {
        if graph.node(id).kind().is_wait() {
            pending.insert(id);
            continue;
        }
        for wait in graph.name_sorted(pending.iter().copied()) {
            if view.is_pred(id, wait) {
                pending.remove(&wait);
                result.push(wait);
            }
        }
        result.push(id);
    }
    result.extend(graph.name_sorted(pending));
    result
}

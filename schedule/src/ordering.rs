//! Global ordering of communication starts.

use tracing::trace;
use weft_ir::{Graph, OrderingConstraints};

/// Chain all communication starts in their original relative order.
///
/// Scheduling may move compute freely, but collectives have to run in
/// the same order on every participant. A synthetic edge between each
/// consecutive pair enforces that while leaving the rest of the graph
/// unconstrained. Safe to reapply: existing edges are not duplicated.
pub fn order_comms(graph: &Graph, constraints: &mut OrderingConstraints) {
    let comms = graph.comm_starts();
    for pair in comms.windows(2) {
        trace!(
            earlier = graph.node(pair[0]).name(),
            later = graph.node(pair[1]).name(),
            "comm ordering edge"
        );
        constraints.add_ordering_dependency(pair[1], pair[0]);
    }
}

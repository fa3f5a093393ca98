//! Raise communication starts up to their inputs.

use std::collections::VecDeque;

use snafu::ensure;
use weft_ir::{GraphView, NodeId};

use crate::error::{Result, TrailingCommsSnafu};

/// Move every communication start as early as possible, i.e. to just
/// after the last of its own predecessors.
///
/// Scans the sequence in reverse, holding back communication starts in
/// a queue ordered earliest-delayed first. When the scanned node feeds
/// any held communication, the queue is drained from the front through
/// the last such entry, which keeps the relative communication order
/// intact. At most one communication may still be held once the scan
/// ends; it has no predecessor at all and becomes the first element.
/// More than one left over means the dependency shape between
/// communications is inconsistent, and the pass fails with their names.
///
/// Idempotent on an already-raised sequence.
pub fn raise_comms(view: GraphView<'_>, order: Vec<NodeId>) -> Result<Vec<NodeId>> {
    let graph = view.graph();
    let mut reversed = Vec::with_capacity(order.len());
    let mut pending: VecDeque<NodeId> = VecDeque::new();

    for &id in order.iter().rev() {
        if graph.node(id).kind().is_comm() {
            pending.push_back(id);
            continue;
        }
        while pending.iter().any(|&comm| view.is_pred(comm, id)) {
            if let Some(comm) = pending.pop_front() {
                reversed.push(comm);
            }
        }
        reversed.push(id);
    }

    ensure!(pending.len() <= 1, TrailingCommsSnafu { pending: graph.names_of(pending.iter().copied()) });
    reversed.extend(pending);
    reversed.reverse();
    Ok(reversed)
}

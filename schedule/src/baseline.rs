//! Fallback scheduler without overlap optimization.

use weft_ir::{GraphView, NodeId};

use crate::error::Result;
use crate::raise::raise_comms;
use crate::sink::sink_waits;

/// Sink waits and raise communications over the original order.
///
/// Does not reorder compute to maximize overlap; useful as a fallback
/// and as a correctness baseline for the overlap scheduler.
pub fn reorder_baseline(view: GraphView<'_>) -> Result<Vec<NodeId>> {
    let order = view.graph().ids().collect();
    raise_comms(view, sink_waits(view, order))
}

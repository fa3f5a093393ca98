//! Priority-based greedy scheduling of compute around communication.
//!
//! Produces a full topological order of the graph that hides
//! communication latency behind independent compute. Assumes the global
//! communication order has already been fixed (see
//! [`order_comms`](crate::ordering::order_comms)).
//!
//! # Algorithm
//!
//! After scheduling everything the first communication needs, each pair
//! of consecutive communications (`prev`, `next`) is handled in three
//! priority tiers:
//!
//! 1. **Required**: all unscheduled ancestors of `next` that are not
//!    descendants of `prev`, i.e. work `next` needs that can run while
//!    `prev` is in flight.
//! 2. **Filler**: if the required work is too cheap to hide `prev`'s
//!    latency, admit ready nodes that do not depend on `prev`,
//!    soonest-needed first, skipping candidates whose runtime would be
//!    mostly wasted (see [`ScheduleConfig::fill_threshold`]).
//! 3. **Blocked**: the remaining ancestors of `next` (those that had to
//!    wait for `prev`), then `next` itself.
//!
//! Filler admitted in tier 2 is not required to finish before `next`
//! starts, so its cost rolls over toward hiding the next communication.
//! The exception is when `next` transitively depends on `prev`
//! ("comm-blocking"), which forces the slack to be spent in this window.
//!
//! Every set iteration is either over an ordered container or sorted by
//! node name first, so equal graphs always yield byte-identical
//! schedules.

use std::collections::BTreeSet;

use itertools::Itertools;
use snafu::ensure;
use tracing::{debug, trace};
use weft_ir::{CostModel, GraphView, NodeId};

use crate::config::ScheduleConfig;
use crate::error::{DependencyCycleSnafu, NotSchedulableSnafu, Result};
use crate::raise::raise_comms;
use crate::sink::sink_waits;

/// List-scheduling state over the merged edge relation.
///
/// Tracks the in-degree of every node (counting data and ordering edges
/// alike), the set of ready nodes, and the set of not-yet-scheduled
/// nodes.
struct ListScheduler<'a> {
    view: GraphView<'a>,
    indeg: Vec<usize>,
    free: BTreeSet<NodeId>,
    unused: BTreeSet<NodeId>,
    result: Vec<NodeId>,
}

impl<'a> ListScheduler<'a> {
    fn new(view: GraphView<'a>) -> Self {
        let graph = view.graph();
        let indeg: Vec<usize> = graph.ids().map(|id| view.preds(id).count()).collect();
        let free = graph.ids().filter(|id| indeg[id.index()] == 0).collect();
        let unused = graph.ids().collect();
        Self { view, indeg, free, unused, result: Vec::with_capacity(graph.len()) }
    }

    /// Emit one eligible node and release its successors.
    fn schedule_node(&mut self, id: NodeId) -> Result<()> {
        let ready = self.free.remove(&id);
        let unscheduled = self.unused.remove(&id);
        ensure!(
            ready && unscheduled,
            NotSchedulableSnafu { name: self.view.graph().node(id).name(), ready, unscheduled }
        );
        trace!(node = self.view.graph().node(id).name(), "scheduled");
        self.result.push(id);
        for succ in self.view.succs(id) {
            let deg = &mut self.indeg[succ.index()];
            *deg = deg.saturating_sub(1);
            if *deg == 0 {
                self.free.insert(succ);
            }
        }
        Ok(())
    }

    /// Schedule every member of `subset`, in an arbitrary but
    /// deterministic topologically valid order.
    ///
    /// Sweeps the subset in name order, scheduling whatever is ready,
    /// until it is exhausted. A sweep that schedules nothing while the
    /// subset is non-empty means a cycle.
    fn schedule_all(&mut self, subset: impl IntoIterator<Item = NodeId>) -> Result<()> {
        let mut left: BTreeSet<NodeId> = subset.into_iter().collect();
        if let Some(&id) = left.iter().find(|id| !self.unused.contains(id)) {
            return NotSchedulableSnafu {
                name: self.view.graph().node(id).name(),
                ready: self.free.contains(&id),
                unscheduled: false,
            }
            .fail();
        }
        while !left.is_empty() {
            let mut progressed = false;
            for id in self.view.graph().name_sorted(left.iter().copied()) {
                if self.free.contains(&id) {
                    self.schedule_node(id)?;
                    left.remove(&id);
                    progressed = true;
                }
            }
            let graph = self.view.graph();
            ensure!(progressed, DependencyCycleSnafu { stuck: graph.names_of(graph.name_sorted(left)) });
        }
        Ok(())
    }
}

/// Reorder the whole graph so communications overlap independent compute.
///
/// Requires the input graph (in arena order) to be a valid topological
/// order of the data edges, which the graph builder guarantees. The
/// result is a topological order of the merged relation, with waits sunk
/// to first use and communications raised to their inputs.
///
/// A graph without communication starts is returned in its input order,
/// unchanged.
///
/// # Errors
///
/// Fails on internal consistency violations only: a cycle introduced by
/// the ordering constraints, or a node scheduled while ineligible. Both
/// indicate an upstream bug and carry the offending node names.
pub fn reorder_for_overlap(
    view: GraphView<'_>,
    cost: &dyn CostModel,
    config: &ScheduleConfig,
) -> Result<Vec<NodeId>> {
    let order = overlap_order(view, cost, config)?;
    let order = sink_waits(view, order);
    raise_comms(view, order)
}

/// The greedy priority schedule itself, before the wait/comm cleanup.
pub(crate) fn overlap_order(
    view: GraphView<'_>,
    cost: &dyn CostModel,
    config: &ScheduleConfig,
) -> Result<Vec<NodeId>> {
    let graph = view.graph();
    let comms = graph.comm_starts();
    if comms.is_empty() {
        return Ok(graph.ids().collect());
    }

    let comm_ancestors: Vec<BTreeSet<NodeId>> = comms.iter().map(|&c| view.ancestors(c)).collect();
    let comm_descendants: Vec<BTreeSet<NodeId>> = comms.iter().map(|&c| view.descendants(c)).collect();

    let mut state = ListScheduler::new(view);

    // Everything the first communication needs, then the comm itself.
    let mut lead_in = comm_ancestors[0].clone();
    lead_in.insert(comms[0]);
    state.schedule_all(lead_in)?;

    let mut rolled_over = 0.0_f64;
    for idx in 1..comms.len() {
        let (prev, next) = (comms[idx - 1], comms[idx]);
        let comm_blocking = !comm_descendants[idx - 1].is_disjoint(&comm_ancestors[idx]);
        debug!(
            prev = graph.node(prev).name(),
            next = graph.node(next).name(),
            comm_blocking,
            rolled_over,
            "overlap window"
        );

        // Tier 1: work `next` needs that does not wait on `prev`.
        let required: BTreeSet<NodeId> = comm_ancestors[idx]
            .iter()
            .copied()
            .filter(|n| state.unused.contains(n) && !comm_descendants[idx - 1].contains(n))
            .collect();
        let comm_cost = cost.estimate(graph, prev);
        let mut total_cost = rolled_over + required.iter().map(|&n| cost.estimate(graph, n)).sum::<f64>();
        state.schedule_all(required)?;

        // Tier 2: extra ready work admitted purely to hide latency.
        let required_cost = total_cost;
        if total_cost < comm_cost {
            let ready = graph
                .name_sorted(state.free.iter().copied().filter(|n| !comm_descendants[idx - 1].contains(n)));
            let earliest_need = |n: NodeId| {
                comm_ancestors.iter().position(|anc| anc.contains(&n)).unwrap_or(comm_ancestors.len())
            };
            // Stable sort: candidates needed by an earlier communication
            // come first, ties stay in name order.
            for cand in ready.into_iter().sorted_by_key(|&n| earliest_need(n)) {
                if total_cost >= comm_cost {
                    break;
                }
                if graph.node(cand).kind().is_comm() {
                    continue;
                }
                let cand_cost = cost.estimate(graph, cand);
                if comm_cost - total_cost <= cand_cost * config.fill_threshold {
                    trace!(node = graph.node(cand).name(), cand_cost, gap = comm_cost - total_cost, "filler skipped");
                    continue;
                }
                state.schedule_node(cand)?;
                total_cost += cand_cost;
            }
        }

        // Filler is not needed before `next` starts, so its slack can
        // roll over, unless `next` is blocked on `prev` anyway.
        rolled_over = if comm_blocking { 0.0 } else { total_cost - required_cost };
        debug!(comm = graph.node(prev).name(), overlapped = total_cost, comm_cost, "window closed");

        // Tier 3: the rest of `next`'s ancestors, then `next`.
        let mut blocked: BTreeSet<NodeId> =
            comm_ancestors[idx].iter().copied().filter(|n| state.unused.contains(n)).collect();
        blocked.insert(next);
        state.schedule_all(blocked)?;
    }

    let remaining = state.unused.clone();
    state.schedule_all(remaining)?;

    Ok(state.result)
}

//! Unit tests for the overlap scheduler.
//!
//! Accounting behavior (which nodes hide which communication) is
//! asserted on [`overlap_order`], the schedule before the final
//! sink/raise cleanup: the cleanup deliberately hoists communications
//! past filler compute, which erases window placement without changing
//! execution-time overlap.

use test_case::test_case;
use weft_ir::{CostTable, Graph, GraphView, OrderingConstraints};

use crate::config::ScheduleConfig;
use crate::error::Error;
use crate::ordering::order_comms;
use crate::overlap::{overlap_order, reorder_for_overlap};
use crate::test::helpers::{assert_comm_order, assert_topological, comm_chain, names, pos};

#[test]
fn test_comm_free_graph_unchanged() {
    let mut g = Graph::new();
    let a = g.add_compute("a", &[]).unwrap();
    let b = g.add_compute("b", &[a]).unwrap();
    let _c = g.add_compute("c", &[a, b]).unwrap();
    let constraints = OrderingConstraints::new();
    let view = GraphView::new(&g, &constraints);

    let order = reorder_for_overlap(view, &CostTable::new(), &ScheduleConfig::default()).unwrap();

    assert_eq!(order, g.ids().collect::<Vec<_>>());
}

#[test]
fn test_chain_schedule() {
    let chain = comm_chain();
    let view = GraphView::new(&chain.graph, &chain.constraints);

    let order = reorder_for_overlap(view, &chain.costs, &ScheduleConfig::default()).unwrap();

    assert_eq!(names(&chain.graph, &order), ["a", "c1", "w1", "b", "c2", "w2", "d"]);
    assert_topological(view, &order);
    assert_comm_order(&chain.graph, &order);
}

#[test]
fn test_sufficient_required_work_suppresses_filler() {
    let mut g = Graph::new();
    let a = g.add_compute("a", &[]).unwrap();
    let c1 = g.add_comm_start("c1", &[a]).unwrap();
    let _w1 = g.add_wait("w1", c1).unwrap();
    let m = g.add_compute("m", &[]).unwrap();
    let f = g.add_compute("f", &[]).unwrap();
    let c2 = g.add_comm_start("c2", &[m]).unwrap();
    let _w2 = g.add_wait("w2", c2).unwrap();
    let mut constraints = OrderingConstraints::new();
    order_comms(&g, &mut constraints);
    let view = GraphView::new(&g, &constraints);
    let costs = CostTable::new().cost("c1", 2.0).cost("m", 5.0).cost("f", 1.0);

    let order = overlap_order(view, &costs, &ScheduleConfig::default()).unwrap();

    // The work c2 requires already hides c1 entirely; no filler admitted.
    assert!(pos(&order, m) < pos(&order, c2));
    assert!(pos(&order, f) > pos(&order, c2));
    assert_topological(view, &order);
}

// With the default threshold, a candidate is admitted only while more
// than half of its runtime still fits into the window. f (cost 4) fits
// the 9-unit gap; g (cost 30) does not. Dropping the threshold to zero
// admits any candidate with a non-empty gap.
#[test_case(0.5, true,  false ; "default threshold admits only the cheap filler")]
#[test_case(0.0, true,  true  ; "zero threshold admits any filler")]
#[test_case(1.0, true,  false ; "strict threshold still admits fully fitting filler")]
fn test_filler_admission(fill_threshold: f64, f_overlaps: bool, g_overlaps: bool) {
    let mut graph = Graph::new();
    let a = graph.add_compute("a", &[]).unwrap();
    let c1 = graph.add_comm_start("c1", &[a]).unwrap();
    let _w1 = graph.add_wait("w1", c1).unwrap();
    let m = graph.add_compute("m", &[]).unwrap();
    let f = graph.add_compute("f", &[]).unwrap();
    let big = graph.add_compute("g", &[]).unwrap();
    let c2 = graph.add_comm_start("c2", &[m]).unwrap();
    let _w2 = graph.add_wait("w2", c2).unwrap();
    let mut constraints = OrderingConstraints::new();
    order_comms(&graph, &mut constraints);
    let view = GraphView::new(&graph, &constraints);
    let costs = CostTable::new().cost("c1", 10.0).cost("m", 1.0).cost("f", 4.0).cost("g", 30.0);

    let order = overlap_order(view, &costs, &ScheduleConfig { fill_threshold }).unwrap();

    assert_eq!(pos(&order, f) < pos(&order, c2), f_overlaps);
    assert_eq!(pos(&order, big) < pos(&order, c2), g_overlaps);
    assert_topological(view, &order);
}

#[test]
fn test_soonest_needed_filler_admitted_first() {
    let mut graph = Graph::new();
    let a = graph.add_compute("a", &[]).unwrap();
    let c1 = graph.add_comm_start("c1", &[a]).unwrap();
    let _w1 = graph.add_wait("w1", c1).unwrap();
    let needed = graph.add_compute("z_needed", &[]).unwrap();
    let loose = graph.add_compute("a_loose", &[]).unwrap();
    let c2 = graph.add_comm_start("c2", &[a]).unwrap();
    let _w2 = graph.add_wait("w2", c2).unwrap();
    let c3 = graph.add_comm_start("c3", &[needed]).unwrap();
    let _w3 = graph.add_wait("w3", c3).unwrap();
    let mut constraints = OrderingConstraints::new();
    order_comms(&graph, &mut constraints);
    let view = GraphView::new(&graph, &constraints);
    let costs = CostTable::new()
        .cost("a", 1.0)
        .cost("c1", 3.0)
        .cost("z_needed", 3.0)
        .cost("a_loose", 3.0)
        .cost("c2", 5.0)
        .cost("c3", 1.0);

    let order = overlap_order(view, &costs, &ScheduleConfig::default()).unwrap();

    // Both fillers are free while c1 is in flight and name order favors
    // a_loose, but z_needed feeds c3 and must win the window.
    assert!(pos(&order, needed) < pos(&order, c2));
    assert!(pos(&order, loose) > pos(&order, c2));
    assert_topological(view, &order);
}

#[test]
fn test_rollover_hides_next_comm() {
    let mut graph = Graph::new();
    let a = graph.add_compute("a", &[]).unwrap();
    let c1 = graph.add_comm_start("c1", &[a]).unwrap();
    let _w1 = graph.add_wait("w1", c1).unwrap();
    let _f1 = graph.add_compute("f1", &[]).unwrap();
    let f2 = graph.add_compute("f2", &[]).unwrap();
    let c2 = graph.add_comm_start("c2", &[a]).unwrap();
    let _w2 = graph.add_wait("w2", c2).unwrap();
    let c3 = graph.add_comm_start("c3", &[a]).unwrap();
    let _w3 = graph.add_wait("w3", c3).unwrap();
    let mut constraints = OrderingConstraints::new();
    order_comms(&graph, &mut constraints);
    let view = GraphView::new(&graph, &constraints);
    let costs =
        CostTable::new().cost("a", 1.0).cost("c1", 4.0).cost("f1", 3.0).cost("f2", 3.0).cost("c2", 3.0).cost("c3", 1.0);

    let order = overlap_order(view, &costs, &ScheduleConfig::default()).unwrap();

    // c2 does not depend on c1, so f1's slack rolls over and already
    // hides c2; f2 is kept for later and ends up behind c3.
    assert!(pos(&order, f2) > pos(&order, c3));
    assert_topological(view, &order);
}

#[test]
fn test_comm_blocking_resets_rollover() {
    let mut graph = Graph::new();
    let a = graph.add_compute("a", &[]).unwrap();
    let c1 = graph.add_comm_start("c1", &[a]).unwrap();
    let w1 = graph.add_wait("w1", c1).unwrap();
    let _f1 = graph.add_compute("f1", &[]).unwrap();
    let f2 = graph.add_compute("f2", &[]).unwrap();
    let c2 = graph.add_comm_start("c2", &[w1, a]).unwrap();
    let _w2 = graph.add_wait("w2", c2).unwrap();
    let c3 = graph.add_comm_start("c3", &[a]).unwrap();
    let _w3 = graph.add_wait("w3", c3).unwrap();
    let mut constraints = OrderingConstraints::new();
    order_comms(&graph, &mut constraints);
    let view = GraphView::new(&graph, &constraints);
    let costs =
        CostTable::new().cost("a", 1.0).cost("c1", 4.0).cost("f1", 3.0).cost("f2", 3.0).cost("c2", 3.0).cost("c3", 1.0);

    let order = overlap_order(view, &costs, &ScheduleConfig::default()).unwrap();

    // c2 waits on c1, so f1's slack cannot roll over; f2 is the only
    // compute left to hide c2 and runs before c3.
    assert!(pos(&order, f2) < pos(&order, c3));
    assert_topological(view, &order);
}

#[test]
fn test_constraint_cycle_detected() {
    let mut graph = Graph::new();
    let a = graph.add_compute("a", &[]).unwrap();
    let c1 = graph.add_comm_start("c1", &[a]).unwrap();
    let c2 = graph.add_comm_start("c2", &[a]).unwrap();
    let mut constraints = OrderingConstraints::new();
    order_comms(&graph, &mut constraints);
    constraints.add_ordering_dependency(c1, c2);
    let view = GraphView::new(&graph, &constraints);

    let err = reorder_for_overlap(view, &CostTable::new(), &ScheduleConfig::default()).unwrap_err();

    assert!(matches!(err, Error::DependencyCycle { .. }), "got {err:?}");
}

#[test]
fn test_leftover_compute_scheduled_in_name_order() {
    let mut graph = Graph::new();
    let x = graph.add_compute("x", &[]).unwrap();
    let _c1 = graph.add_comm_start("c1", &[x]).unwrap();
    let _z = graph.add_compute("z", &[]).unwrap();
    let _y = graph.add_compute("y", &[]).unwrap();
    let mut constraints = OrderingConstraints::new();
    order_comms(&graph, &mut constraints);
    let view = GraphView::new(&graph, &constraints);

    let order = reorder_for_overlap(view, &CostTable::new(), &ScheduleConfig::default()).unwrap();

    assert_eq!(names(&graph, &order), ["x", "c1", "y", "z"]);
}

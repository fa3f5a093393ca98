//! Scheduling passes for the weft compiler.
//!
//! Reorders a finalized mixed compute/communication dependency graph so
//! that asynchronous communications overlap with independent compute,
//! while preserving all data dependencies and a fixed relative order
//! among the communications. Runs once, statically; the resulting linear
//! order is handed to the downstream code generator.
//!
//! # Module Organization
//!
//! - [`ordering`] - Global ordering of communication starts
//! - [`sink`] - Sink waits down to their first use
//! - [`raise`] - Raise communication starts up to their inputs
//! - [`overlap`] - Priority-based greedy overlap scheduler
//! - [`baseline`] - Sink + raise only, no overlap optimization
//! - [`config`] - Tuning threaded into the scheduler call
//!
//! # Pipeline
//!
//! ```ignore
//! use weft_ir::{CostTable, Graph, GraphView, OrderingConstraints};
//! use weft_schedule::{ScheduleConfig, order_comms, reorder_for_overlap};
//!
//! let mut constraints = OrderingConstraints::new();
//! order_comms(&graph, &mut constraints);
//! let view = GraphView::new(&graph, &constraints);
//! let schedule = reorder_for_overlap(view, &costs, &ScheduleConfig::default())?;
//! ```

pub mod baseline;
pub mod config;
pub mod error;
pub mod ordering;
pub mod overlap;
pub mod raise;
pub mod sink;

#[cfg(test)]
pub mod test;

// Re-export pass entry points
pub use baseline::reorder_baseline;
pub use config::ScheduleConfig;
pub use error::{Error, Result};
pub use ordering::order_comms;
pub use overlap::reorder_for_overlap;
pub use raise::raise_comms;
pub use sink::sink_waits;

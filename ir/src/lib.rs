//! Dependency-graph model for the weft scheduling passes.
//!
//! This crate defines the node and edge representation consumed by the
//! scheduling passes in `weft-schedule`, plus the read-only analysis
//! queries over it.
//!
//! # Module Organization
//!
//! - [`node`] - Node model (kind tag, args, users, buffers)
//! - [`graph`] - Graph arena, builder, and ancestor/descendant analysis
//! - [`constraints`] - Synthetic ordering edges kept apart from data edges
//! - [`cost`] - Runtime-cost oracle seam
//! - [`error`] - Error types and result handling

pub mod constraints;
pub mod cost;
pub mod error;
pub mod graph;
pub mod node;

// Re-exports: all core types remain accessible at the crate root.
pub use constraints::OrderingConstraints;
pub use cost::{CostModel, CostTable};
pub use error::{Error, Result};
pub use graph::{Graph, GraphView};
pub use node::{Node, NodeId, NodeKind};

use snafu::Snafu;

use crate::node::NodeId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Node names must be unique within a graph.
    #[snafu(display("duplicate node name {name:?}"))]
    DuplicateName { name: String },

    /// A NodeId was used with a graph that never issued it.
    #[snafu(display("node id {id:?} does not belong to this graph"))]
    ForeignNode { id: NodeId },

    /// A wait must be paired with a communication start.
    #[snafu(display("wait {name:?} pairs with {start:?}, which is a {kind} node, not a communication start"))]
    WaitPairsNonComm { name: String, start: String, kind: String },
}

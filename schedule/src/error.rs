use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Internal-consistency failures of the scheduling passes.
///
/// None of these are recoverable: each one indicates a bug in upstream
/// graph construction, and the driver is expected to abort compilation
/// with the offending node names.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A node was scheduled while not ready or already scheduled.
    /// Indicates a corrupted in-degree count or a cyclic graph.
    #[snafu(display("node {name:?} is not eligible for scheduling (ready: {ready}, unscheduled: {unscheduled})"))]
    NotSchedulable { name: String, ready: bool, unscheduled: bool },

    /// A scheduling sweep made no progress over the listed nodes.
    #[snafu(display("dependency cycle: no schedulable node among {stuck:?}"))]
    DependencyCycle { stuck: Vec<String> },

    /// More than one communication reached the front of the schedule
    /// with no predecessor behind it.
    #[snafu(display("communications {pending:?} all have no predecessor scheduled after them; expected at most one"))]
    TrailingComms { pending: Vec<String> },
}

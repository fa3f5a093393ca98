//! Tuning threaded into the scheduler call.
//!
//! There is no ambient configuration: callers construct a
//! [`ScheduleConfig`] and pass it in, so two invocations with equal
//! inputs always behave identically.

/// Knobs for the overlap scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    /// Admission cutoff for overlap filler.
    ///
    /// A ready candidate of cost `c` is only admitted while the not yet
    /// hidden part of the in-flight communication exceeds
    /// `c * fill_threshold`; otherwise too little of the candidate's
    /// runtime would overlap and it is better spent later. `0.0` admits
    /// any candidate, `1.0` only candidates that fit entirely.
    pub fill_threshold: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { fill_threshold: 0.5 }
    }
}

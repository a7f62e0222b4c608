//! Metric helpers for `framesync`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

use crate::parse::ParseState;

/// Name of the counter tracking completed parse cycles, labelled by state.
pub const PARSE_CYCLES: &str = "framesync_parse_cycles_total";
/// Name of the counter tracking frames assembled.
pub const FRAMES_PARSED: &str = "framesync_frames_parsed_total";
/// Name of the counter tracking resync attempts, labelled by outcome.
pub const RESYNCS: &str = "framesync_resyncs_total";

/// Outcome of a requested resync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResyncOutcome {
    /// The adapter located a plausible frame start.
    Found,
    /// No boundary was found; parsing fell back to the buffer start.
    Fallback,
}

impl ResyncOutcome {
    fn as_str(self) -> &'static str {
        match self {
            ResyncOutcome::Found => "found",
            ResyncOutcome::Fallback => "fallback",
        }
    }
}

/// Record one finished parse cycle and the frames it produced.
pub fn record_parse(state: ParseState, frames: usize) {
    #[cfg(feature = "metrics")]
    {
        metrics::counter!(PARSE_CYCLES, "state" => state.as_str()).increment(1);
        metrics::counter!(FRAMES_PARSED).increment(u64::try_from(frames).unwrap_or(u64::MAX));
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (state, frames);
}

/// Record the result of a resync request.
pub fn record_resync(outcome: ResyncOutcome) {
    #[cfg(feature = "metrics")]
    metrics::counter!(RESYNCS, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome.as_str();
}

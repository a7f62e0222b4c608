//! Results of attempting to split a contiguous buffer into frames.
//!
//! Protocol adapters report where frames start and how far they consumed in
//! plain stream offsets (`ParseOutcome<usize>`). The assembler translates the
//! same outcome into fragment coordinates
//! (`ParseOutcome<FragmentPosition>`) before handing it back to its caller.

mod outcome;
mod state;

pub use outcome::ParseOutcome;
pub use state::ParseState;

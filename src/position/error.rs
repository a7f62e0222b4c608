//! Contract violations reported by the position translator.

use thiserror::Error;

/// Errors produced by [`PositionTranslator::try_translate`](super::PositionTranslator::try_translate).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    /// An offset was queried after a larger one on the same translator.
    #[error("position translator cannot go backwards: offset {requested} after {previous}")]
    Regressed {
        /// Largest offset translated so far.
        previous: usize,
        /// Offending offset.
        requested: usize,
    },
}

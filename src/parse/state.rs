//! Terminal status of a parse attempt.

use std::fmt;

/// How the last frame parse attempt in a cycle ended.
///
/// Errors are expressed as states rather than `Err` values: an `Invalid`
/// result is a normal observation about captured traffic and tells the caller
/// to request a resync on its next cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParseState {
    /// No parse attempt has been made. Real adapters never report this.
    #[default]
    Unknown,
    /// All available bytes were consumed up to a clean frame boundary.
    Success,
    /// A partial frame was recognised; more bytes are required.
    NeedsMoreData,
    /// Bytes at the current alignment cannot start a valid frame.
    Invalid,
}

impl ParseState {
    /// Stable lowercase label, used for log fields and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Success => "success",
            Self::NeedsMoreData => "needs_more_data",
            Self::Invalid => "invalid",
        }
    }

    /// Whether the caller should ask for a resync on its next cycle.
    #[must_use]
    pub const fn wants_resync(self) -> bool { matches!(self, Self::Invalid) }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

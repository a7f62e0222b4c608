//! Fragment-relative stream coordinates.

use std::fmt;

use super::FragmentIndex;

/// A stream offset expressed as (fragment index, offset within that fragment).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentPosition {
    /// Fragment holding the byte.
    pub index: FragmentIndex,
    /// Offset of the byte inside the fragment's payload.
    pub offset: usize,
}

impl FragmentPosition {
    /// Construct a position from raw parts.
    #[must_use]
    pub const fn new(index: usize, offset: usize) -> Self {
        Self {
            index: FragmentIndex::new(index),
            offset,
        }
    }

    /// Sentinel marking "at or past the end" of `fragment_count` fragments.
    #[must_use]
    pub const fn end(fragment_count: usize) -> Self { Self::new(fragment_count, 0) }

    /// Whether this is the end sentinel for `fragment_count` fragments.
    #[must_use]
    pub fn is_end(&self, fragment_count: usize) -> bool {
        self.index.get() >= fragment_count && self.offset == 0
    }
}

impl fmt::Display for FragmentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.offset)
    }
}

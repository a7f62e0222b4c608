//! Zero-based fragment ordinal within one accumulation cycle.

use derive_more::{Display, From};

/// Position of a fragment within the assembler's accumulated stream.
///
/// An index equal to the number of accumulated fragments is valid and
/// denotes "past the last fragment"; see
/// [`FragmentPosition::end`](super::FragmentPosition::end).
///
/// # Examples
///
/// ```
/// use framesync::fragment::FragmentIndex;
/// let index = FragmentIndex::new(3);
/// assert_eq!(index.get(), 3);
/// assert_eq!(index.to_string(), "3");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("{_0}")]
pub struct FragmentIndex(usize);

impl FragmentIndex {
    /// Construct an index from a `usize` value.
    #[must_use]
    pub const fn new(value: usize) -> Self { Self(value) }

    /// Return the first fragment index.
    #[must_use]
    pub const fn zero() -> Self { Self(0) }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl From<FragmentIndex> for usize {
    fn from(value: FragmentIndex) -> Self { value.0 }
}

//! Forward-only cursor over a borrowed fragment list.

use super::PositionError;
use crate::fragment::FragmentPosition;

/// Maps offsets in the concatenation of `fragments` to [`FragmentPosition`]s.
///
/// Offsets must be presented in non-decreasing order. The cursor remembers
/// the fragment it stopped in and the number of bytes before it, so a whole
/// batch of queries is answered in time linear in the number of fragments.
///
/// # Examples
///
/// ```
/// use framesync::{fragment::FragmentPosition, position::PositionTranslator};
///
/// let fragments: [&[u8]; 2] = [b"0123456789", b"abcdefghij"];
/// let mut translator = PositionTranslator::new(&fragments);
/// assert_eq!(translator.translate(3), FragmentPosition::new(0, 3));
/// assert_eq!(translator.translate(12), FragmentPosition::new(1, 2));
/// assert_eq!(translator.translate(20), FragmentPosition::end(2));
/// ```
#[derive(Debug)]
pub struct PositionTranslator<'a, T> {
    fragments: &'a [T],
    // Fragment the cursor is parked in and the bytes preceding it.
    current: usize,
    consumed: usize,
    last_query: usize,
}

impl<'a, T: AsRef<[u8]>> PositionTranslator<'a, T> {
    /// Start a translator at the beginning of `fragments`.
    #[must_use]
    pub fn new(fragments: &'a [T]) -> Self {
        Self {
            fragments,
            current: 0,
            consumed: 0,
            last_query: 0,
        }
    }

    /// Translate `offset`, which must not be smaller than any offset
    /// previously given to this translator.
    ///
    /// Offsets at or beyond the total length map to
    /// [`FragmentPosition::end`].
    ///
    /// # Panics
    ///
    /// Panics in debug builds when `offset` regresses. Release builds skip the
    /// check and clamp the answer to the start of the fragment the cursor is
    /// parked in.
    pub fn translate(&mut self, offset: usize) -> FragmentPosition {
        debug_assert!(
            offset >= self.last_query,
            "position translator cannot go backwards: offset {offset} after {}",
            self.last_query
        );
        self.advance_to(offset)
    }

    /// Translate `offset`, rejecting a regressing query instead of panicking.
    ///
    /// A rejected query leaves the cursor untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::Regressed`] when `offset` is smaller than an
    /// offset already translated.
    pub fn try_translate(&mut self, offset: usize) -> Result<FragmentPosition, PositionError> {
        if offset < self.last_query {
            return Err(PositionError::Regressed {
                previous: self.last_query,
                requested: offset,
            });
        }
        Ok(self.advance_to(offset))
    }

    /// Number of fragments being translated against.
    #[must_use]
    pub fn fragment_count(&self) -> usize { self.fragments.len() }

    fn advance_to(&mut self, offset: usize) -> FragmentPosition {
        self.last_query = self.last_query.max(offset);

        while let Some(fragment) = self.fragments.get(self.current) {
            let len = fragment.as_ref().len();
            if offset < self.consumed + len {
                return FragmentPosition::new(self.current, offset.saturating_sub(self.consumed));
            }
            self.current += 1;
            self.consumed += len;
        }
        FragmentPosition::end(self.fragments.len())
    }
}

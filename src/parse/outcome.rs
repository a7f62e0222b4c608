//! Frame start positions, consumption marker and state from one parse.

use super::ParseState;

/// Result of one parse attempt, generic over the position representation.
///
/// Two representations are in use:
///
/// - `usize`: a byte offset into the contiguous buffer handed to an adapter.
/// - [`FragmentPosition`](crate::fragment::FragmentPosition): the same offset
///   expressed against the fragments that made up that buffer.
///
/// `start_positions` holds one entry per frame appended during the attempt,
/// in the order the frames were appended, and is strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutcome<P> {
    /// Where each newly parsed frame starts.
    pub start_positions: Vec<P>,
    /// Position through which input was definitively consumed.
    pub end_position: P,
    /// State of the last attempted frame parse.
    pub state: ParseState,
}

impl<P> ParseOutcome<P> {
    /// Construct an outcome from its parts.
    #[must_use]
    pub fn new(start_positions: Vec<P>, end_position: P, state: ParseState) -> Self {
        Self {
            start_positions,
            end_position,
            state,
        }
    }

    /// Number of frames found by the attempt.
    #[must_use]
    pub fn frame_count(&self) -> usize { self.start_positions.len() }

    /// Apply `f` to every position, preserving order and state.
    ///
    /// Positions are visited start offsets first, then the end position, so
    /// an order-sensitive mapper (such as a forward-only translator) sees a
    /// non-decreasing sequence when the outcome is well formed.
    pub fn map_positions<Q>(self, mut f: impl FnMut(P) -> Q) -> ParseOutcome<Q> {
        let start_positions = self.start_positions.into_iter().map(&mut f).collect();
        let end_position = f(self.end_position);
        ParseOutcome {
            start_positions,
            end_position,
            state: self.state,
        }
    }
}

impl ParseOutcome<usize> {
    /// Shift every offset forward by `base`.
    ///
    /// Adapters report offsets relative to the slice they were given; the
    /// assembler uses this to restore stream-relative offsets after a resync
    /// started parsing part way into the buffer.
    #[must_use]
    pub fn rebased(self, base: usize) -> Self { self.map_positions(|offset| offset + base) }

    /// Whether the offsets obey the adapter contract for a buffer of
    /// `buf_len` bytes: strictly increasing starts, all before the end
    /// position, and the end position within the buffer.
    #[must_use]
    pub fn is_well_formed(&self, buf_len: usize) -> bool {
        let increasing = self.start_positions.windows(2).all(|pair| pair[0] < pair[1]);
        let before_end = self
            .start_positions
            .last()
            .is_none_or(|last| *last < self.end_position);
        increasing && before_end && self.end_position <= buf_len
    }
}

//! Shared loop for adapters that decode one frame at a time.

use std::collections::VecDeque;

use crate::parse::{ParseOutcome, ParseState};

/// Result of decoding a single frame from the front of a buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameParse<F> {
    /// A whole frame occupying the first `len` bytes.
    Complete {
        /// Decoded frame.
        frame: F,
        /// Bytes the frame occupied on the wire; must be non-zero.
        len: usize,
    },
    /// The bytes look like the beginning of a frame but it is cut short.
    Incomplete,
    /// The bytes cannot start a frame.
    Invalid,
}

/// Decode frames back to back until the buffer runs out or a frame fails.
///
/// `parse_one` receives the unconsumed remainder of `buf`. Decoding an empty
/// remainder is never attempted: reaching the end of `buf` on a frame
/// boundary is [`ParseState::Success`].
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
///
/// use framesync::{
///     adapter::{FrameParse, parse_frames_loop},
///     parse::ParseState,
/// };
///
/// // Toy grammar: every frame is exactly two bytes.
/// let mut frames = VecDeque::new();
/// let outcome = parse_frames_loop(b"abcde", &mut frames, |rest| match rest {
///     [a, b, ..] => FrameParse::Complete { frame: (*a, *b), len: 2 },
///     _ => FrameParse::Incomplete,
/// });
/// assert_eq!(outcome.start_positions, vec![0, 2]);
/// assert_eq!(outcome.end_position, 4);
/// assert_eq!(outcome.state, ParseState::NeedsMoreData);
/// assert_eq!(frames.len(), 2);
/// ```
pub fn parse_frames_loop<F>(
    buf: &[u8],
    frames: &mut VecDeque<F>,
    mut parse_one: impl FnMut(&[u8]) -> FrameParse<F>,
) -> ParseOutcome<usize> {
    let mut start_positions = Vec::new();
    let mut offset = 0;
    let mut state = ParseState::Success;

    while let Some(rest) = buf.get(offset..).filter(|rest| !rest.is_empty()) {
        match parse_one(rest) {
            FrameParse::Complete { frame, len } if len > 0 && len <= rest.len() => {
                start_positions.push(offset);
                frames.push_back(frame);
                offset += len;
            }
            FrameParse::Complete { len, .. } => {
                log::warn!(
                    "adapter reported an impossible frame length: len={len}, available={}",
                    rest.len()
                );
                state = ParseState::Invalid;
                break;
            }
            FrameParse::Incomplete => {
                state = ParseState::NeedsMoreData;
                break;
            }
            FrameParse::Invalid => {
                state = ParseState::Invalid;
                break;
            }
        }
    }

    ParseOutcome::new(start_positions, offset, state)
}

//! Adapter for protocols that prefix every frame with a 4-byte length.
//!
//! Decoding is delegated to `tokio_util`'s [`LengthDelimitedCodec`] with its
//! default layout: a big-endian `u32` payload length followed by the payload.
//! A fresh codec is built for every parse so no decoder state leaks between
//! cycles.
//!
//! Frames own their payloads while adapters only borrow the cycle buffer, so
//! each parse copies that buffer once into the codec's `BytesMut`. Decoded
//! payloads are split off that copy without copying again.

use std::{collections::VecDeque, fmt};

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, LengthDelimitedCodec};

use super::{FrameParse, MessageType, ProtocolAdapter, TimestampedFrame, parse_frames_loop};
use crate::parse::ParseOutcome;

/// Minimum accepted `max_frame_length`.
///
/// Limits passed to [`LengthDelimitedAdapter::new`] are clamped to at least
/// this value.
pub const MIN_FRAME_LENGTH: usize = 64;

/// Maximum accepted `max_frame_length` (16 MiB).
///
/// Limits passed to [`LengthDelimitedAdapter::new`] are clamped to at most
/// this value to bound the allocation a corrupt prefix can request.
pub const MAX_FRAME_LENGTH: usize = 16 * 1024 * 1024;

/// Length prefix size (4 bytes, big-endian `u32`).
pub const LENGTH_HEADER_SIZE: usize = 4;

pub(crate) fn clamp_frame_length(value: usize) -> usize {
    value.clamp(MIN_FRAME_LENGTH, MAX_FRAME_LENGTH)
}

/// One length-prefixed frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LengthDelimitedFrame {
    payload: Bytes,
    timestamp_ns: u64,
}

impl LengthDelimitedFrame {
    /// Construct a frame with an unset timestamp.
    #[must_use]
    pub fn new(payload: Bytes) -> Self {
        Self {
            payload,
            timestamp_ns: 0,
        }
    }

    /// Payload bytes following the length prefix.
    #[must_use]
    pub fn payload(&self) -> &Bytes { &self.payload }
}

impl TimestampedFrame for LengthDelimitedFrame {
    fn timestamp_ns(&self) -> u64 { self.timestamp_ns }

    fn set_timestamp_ns(&mut self, timestamp_ns: u64) { self.timestamp_ns = timestamp_ns; }
}

impl fmt::Display for LengthDelimitedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "len={} payload={}",
            self.payload.len(),
            hex::encode(&self.payload)
        )
    }
}

/// [`ProtocolAdapter`] for 4-byte big-endian length-prefixed frames.
///
/// Request and response traffic share the same layout.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
///
/// use framesync::{
///     adapter::{LengthDelimitedAdapter, MessageType, ProtocolAdapter},
///     parse::ParseState,
/// };
///
/// let adapter = LengthDelimitedAdapter::default();
/// let mut frames = VecDeque::new();
/// let outcome = adapter.parse_frames(
///     MessageType::Request,
///     &[0, 0, 0, 2, b'h', b'i', 0, 0],
///     &mut frames,
/// );
/// assert_eq!(outcome.start_positions, vec![0]);
/// assert_eq!(outcome.end_position, 6);
/// assert_eq!(outcome.state, ParseState::NeedsMoreData);
/// assert_eq!(frames[0].payload().as_ref(), b"hi");
/// ```
#[derive(Clone, Debug)]
pub struct LengthDelimitedAdapter {
    max_frame_length: usize,
}

impl LengthDelimitedAdapter {
    /// Construct an adapter rejecting payloads longer than `max_frame_length`.
    ///
    /// The limit is clamped to [`MIN_FRAME_LENGTH`]`..=`[`MAX_FRAME_LENGTH`].
    #[must_use]
    pub fn new(max_frame_length: usize) -> Self {
        Self {
            max_frame_length: clamp_frame_length(max_frame_length),
        }
    }

    /// Return the maximum payload length accepted by this adapter.
    #[must_use]
    pub fn max_frame_length(&self) -> usize { self.max_frame_length }

    fn new_inner_codec(&self) -> LengthDelimitedCodec {
        LengthDelimitedCodec::builder()
            .max_frame_length(self.max_frame_length)
            .new_codec()
    }

    fn header_at(buf: &[u8], pos: usize) -> Option<[u8; LENGTH_HEADER_SIZE]> {
        let end = pos.checked_add(LENGTH_HEADER_SIZE)?;
        buf.get(pos..end)
            .and_then(|slice| <[u8; LENGTH_HEADER_SIZE]>::try_from(slice).ok())
    }

    fn plausible_length(&self, header: [u8; LENGTH_HEADER_SIZE]) -> Option<usize> {
        let len = u32::from_be_bytes(header) as usize;
        (1..=self.max_frame_length).contains(&len).then_some(len)
    }

    // A prefix is plausible when it announces a non-empty payload within the
    // limit and, if the buffer reaches the following prefix, that one is too.
    fn looks_like_frame_start(&self, buf: &[u8], pos: usize) -> bool {
        let Some(len) = Self::header_at(buf, pos).and_then(|h| self.plausible_length(h)) else {
            return false;
        };
        let next = pos + LENGTH_HEADER_SIZE + len;
        Self::header_at(buf, next).is_none_or(|h| self.plausible_length(h).is_some())
    }
}

impl Default for LengthDelimitedAdapter {
    fn default() -> Self {
        Self {
            max_frame_length: 1024,
        }
    }
}

impl ProtocolAdapter for LengthDelimitedAdapter {
    type Frame = LengthDelimitedFrame;

    fn find_frame_boundary(
        &self,
        _message_type: MessageType,
        buf: &[u8],
        start: usize,
    ) -> Option<usize> {
        let first = start.checked_add(1)?;
        (first..buf.len()).find(|&pos| self.looks_like_frame_start(buf, pos))
    }

    fn parse_frames(
        &self,
        _message_type: MessageType,
        buf: &[u8],
        frames: &mut VecDeque<Self::Frame>,
    ) -> ParseOutcome<usize> {
        let mut codec = self.new_inner_codec();
        // The one owned copy that decoded payloads are split from.
        let mut src = BytesMut::from(buf);

        // `src` tracks the loop's remainder at every frame boundary.
        parse_frames_loop(buf, frames, |_rest| {
            let before = src.len();
            match codec.decode(&mut src) {
                Ok(Some(payload)) => FrameParse::Complete {
                    frame: LengthDelimitedFrame::new(payload.freeze()),
                    len: before - src.len(),
                },
                Ok(None) => FrameParse::Incomplete,
                Err(err) => {
                    log::debug!("length-delimited decode rejected frame: error={err}");
                    FrameParse::Invalid
                }
            }
        })
    }
}

//! Per-protocol frame grammars consumed by the assembler.
//!
//! A [`ProtocolAdapter`] knows how one wire protocol lays frames out in a
//! contiguous buffer of one traffic direction. It offers two operations:
//!
//! - [`find_frame_boundary`](ProtocolAdapter::find_frame_boundary): a cheap
//!   heuristic that points at the next place a frame could plausibly start,
//!   used to realign after corruption or capture loss.
//! - [`parse_frames`](ProtocolAdapter::parse_frames): decode as many whole
//!   frames as possible, reporting where each one started.
//!
//! The assembler is generic over the adapter, so the protocol is fixed at the
//! point a connection's protocol is identified and dispatch is static.
//!
//! Two reference adapters ship with the crate: [`LengthDelimitedAdapter`] and
//! [`LineAdapter`]. Most adapters decode one frame at a time and can reuse
//! [`parse_frames_loop`] for the bookkeeping.

use std::{collections::VecDeque, fmt};

use crate::parse::ParseOutcome;

mod driver;
pub mod length_delimited;
pub mod line;

pub use driver::{FrameParse, parse_frames_loop};
pub use length_delimited::{LengthDelimitedAdapter, LengthDelimitedFrame};
pub use line::{LineAdapter, LineFrame};

/// Traffic direction tag selecting the request or response grammar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Traffic sent by the client side of the connection.
    #[default]
    Request,
    /// Traffic sent by the server side of the connection.
    Response,
}

impl MessageType {
    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A decoded frame that carries the capture time of its first byte.
///
/// Adapters construct frames with any placeholder timestamp; the assembler
/// overwrites it once it knows which fragment the frame started in.
pub trait TimestampedFrame {
    /// Capture time of the fragment holding the frame's first byte.
    fn timestamp_ns(&self) -> u64;

    /// Record the capture time of the frame's first byte.
    fn set_timestamp_ns(&mut self, timestamp_ns: u64);
}

/// Frame-boundary search and decoding for one wire protocol.
pub trait ProtocolAdapter {
    /// Frame type produced by [`parse_frames`](Self::parse_frames).
    type Frame: TimestampedFrame;

    /// Find the next plausible frame start in `buf` after `start`.
    ///
    /// Implementations must return an offset strictly greater than `start`
    /// (and no greater than `buf.len()`), or `None` when nothing plausible
    /// follows. This is a recogniser, not a decoder: a returned offset only
    /// needs to look like a frame start.
    fn find_frame_boundary(
        &self,
        message_type: MessageType,
        buf: &[u8],
        start: usize,
    ) -> Option<usize>;

    /// Decode frames from the start of `buf`, appending them to `frames`.
    ///
    /// The returned outcome carries one start offset per appended frame, in
    /// the same order, the offset through which `buf` was consumed, and the
    /// state of the last attempt (never
    /// [`ParseState::Unknown`](crate::parse::ParseState::Unknown)).
    /// Frames already present in `frames` must not be touched.
    fn parse_frames(
        &self,
        message_type: MessageType,
        buf: &[u8],
        frames: &mut VecDeque<Self::Frame>,
    ) -> ParseOutcome<usize>;
}

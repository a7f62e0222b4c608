//! Adapter for CRLF-terminated text protocols.
//!
//! Each frame is one UTF-8 line terminated by `\r\n`, as used by the command
//! channels of SMTP, FTP, POP3 and the inline form of RESP.

use std::{collections::VecDeque, fmt, str};

use super::{
    FrameParse,
    MessageType,
    ProtocolAdapter,
    TimestampedFrame,
    length_delimited::MAX_FRAME_LENGTH,
    parse_frames_loop,
};
use crate::parse::ParseOutcome;

const CRLF: &[u8; 2] = b"\r\n";

/// One text line, without its terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineFrame {
    text: String,
    timestamp_ns: u64,
}

impl LineFrame {
    /// Construct a frame with an unset timestamp.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp_ns: 0,
        }
    }

    /// Line content without the trailing `\r\n`.
    #[must_use]
    pub fn text(&self) -> &str { &self.text }
}

impl TimestampedFrame for LineFrame {
    fn timestamp_ns(&self) -> u64 { self.timestamp_ns }

    fn set_timestamp_ns(&mut self, timestamp_ns: u64) { self.timestamp_ns = timestamp_ns; }
}

impl fmt::Display for LineFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:?}", self.text) }
}

/// [`ProtocolAdapter`] for `\r\n`-terminated UTF-8 lines.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
///
/// use framesync::adapter::{LineAdapter, MessageType, ProtocolAdapter};
///
/// let adapter = LineAdapter::default();
/// assert_eq!(
///     adapter.find_frame_boundary(MessageType::Request, b"garbage\r\nNOOP\r\n", 1),
///     Some(9)
/// );
/// ```
#[derive(Clone, Debug)]
pub struct LineAdapter {
    max_line_length: usize,
}

impl LineAdapter {
    /// Construct an adapter rejecting lines longer than `max_line_length`
    /// bytes (terminator excluded).
    ///
    /// The limit is clamped to `1..=16 MiB`.
    #[must_use]
    pub fn new(max_line_length: usize) -> Self {
        Self {
            max_line_length: max_line_length.clamp(1, MAX_FRAME_LENGTH),
        }
    }

    /// Return the maximum accepted line length.
    #[must_use]
    pub fn max_line_length(&self) -> usize { self.max_line_length }

    fn parse_line(&self, rest: &[u8]) -> FrameParse<LineFrame> {
        let limit = self.max_line_length + CRLF.len();
        let window = &rest[..rest.len().min(limit)];
        let Some(newline) = window.iter().position(|byte| *byte == b'\n') else {
            // Only a full window without a terminator proves the line too long.
            return if window.len() == limit {
                FrameParse::Invalid
            } else {
                FrameParse::Incomplete
            };
        };

        let Some(body_len) = newline.checked_sub(1).filter(|at| rest[*at] == b'\r') else {
            return FrameParse::Invalid;
        };
        match str::from_utf8(&rest[..body_len]) {
            Ok(text) => FrameParse::Complete {
                frame: LineFrame::new(text),
                len: newline + 1,
            },
            Err(_) => FrameParse::Invalid,
        }
    }
}

impl Default for LineAdapter {
    fn default() -> Self {
        Self {
            max_line_length: 8 * 1024,
        }
    }
}

impl ProtocolAdapter for LineAdapter {
    type Frame = LineFrame;

    fn find_frame_boundary(
        &self,
        _message_type: MessageType,
        buf: &[u8],
        start: usize,
    ) -> Option<usize> {
        // A terminator ending at `start + 1` is the earliest one that yields
        // a boundary past `start`.
        let from = start.saturating_sub(1);
        buf.get(from..)?
            .windows(CRLF.len())
            .position(|pair| pair == CRLF)
            .map(|at| from + at + CRLF.len())
    }

    fn parse_frames(
        &self,
        _message_type: MessageType,
        buf: &[u8],
        frames: &mut VecDeque<Self::Frame>,
    ) -> ParseOutcome<usize> {
        parse_frames_loop(buf, frames, |rest| self.parse_line(rest))
    }
}

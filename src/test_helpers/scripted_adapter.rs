//! Protocol adapter whose answers are programmed by the test.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    adapter::{MessageType, ProtocolAdapter, TimestampedFrame},
    parse::{ParseOutcome, ParseState},
};

/// Frame produced by [`ScriptedAdapter`], remembering where it was reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedFrame {
    /// Start offset reported for the frame, relative to the adapter's buffer.
    pub start: usize,
    /// Timestamp assigned by the assembler.
    pub timestamp_ns: u64,
}

impl TimestampedFrame for ScriptedFrame {
    fn timestamp_ns(&self) -> u64 { self.timestamp_ns }

    fn set_timestamp_ns(&mut self, timestamp_ns: u64) { self.timestamp_ns = timestamp_ns; }
}

#[derive(Debug, Default)]
struct Recorded {
    buffers: Vec<Vec<u8>>,
    boundary_starts: Vec<usize>,
}

/// Adapter replying with a fixed boundary and a fixed decode outcome.
///
/// Every buffer handed to [`parse_frames`](ProtocolAdapter::parse_frames)
/// and every boundary search start is recorded. Clones share the recording,
/// so a test can keep one clone while the assembler owns another.
#[derive(Clone, Debug)]
pub struct ScriptedAdapter {
    boundary: Option<usize>,
    starts: Vec<usize>,
    end: Option<usize>,
    state: ParseState,
    recorded: Arc<Mutex<Recorded>>,
}

impl ScriptedAdapter {
    /// Adapter reporting no frames, consuming its whole buffer, and ending
    /// in `state`.
    #[must_use]
    pub fn new(state: ParseState) -> Self {
        Self {
            boundary: None,
            starts: Vec::new(),
            end: None,
            state,
            recorded: Arc::default(),
        }
    }

    /// Reply to boundary searches with `boundary`.
    #[must_use]
    pub fn with_boundary(mut self, boundary: Option<usize>) -> Self {
        self.boundary = boundary;
        self
    }

    /// Report one frame per entry in `starts` and consumption through `end`.
    #[must_use]
    pub fn with_frames(mut self, starts: impl Into<Vec<usize>>, end: usize) -> Self {
        self.starts = starts.into();
        self.end = Some(end);
        self
    }

    /// Buffers handed to the decoder so far, oldest first.
    #[must_use]
    pub fn buffers(&self) -> Vec<Vec<u8>> { self.recorded().buffers.clone() }

    /// Start offsets of boundary searches so far, oldest first.
    #[must_use]
    pub fn boundary_starts(&self) -> Vec<usize> { self.recorded().boundary_starts.clone() }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("scripted adapter recording poisoned")
    }
}

impl ProtocolAdapter for ScriptedAdapter {
    type Frame = ScriptedFrame;

    fn find_frame_boundary(
        &self,
        _message_type: MessageType,
        _buf: &[u8],
        start: usize,
    ) -> Option<usize> {
        self.recorded().boundary_starts.push(start);
        self.boundary
    }

    fn parse_frames(
        &self,
        _message_type: MessageType,
        buf: &[u8],
        frames: &mut VecDeque<Self::Frame>,
    ) -> ParseOutcome<usize> {
        self.recorded().buffers.push(buf.to_vec());
        frames.extend(self.starts.iter().map(|&start| ScriptedFrame {
            start,
            timestamp_ns: 0,
        }));
        ParseOutcome::new(
            self.starts.clone(),
            self.end.unwrap_or(buf.len()),
            self.state,
        )
    }
}

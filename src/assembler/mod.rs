//! Frame assembly for one traced direction of one connection.
//!
//! [`FrameAssembler`] accumulates captured [`Fragment`]s and, on request,
//! runs a single parse cycle over them with a [`ProtocolAdapter`]:
//!
//! 1. the fragments are presented to the adapter as one contiguous buffer;
//! 2. when asked to resync, the adapter's boundary search picks the offset
//!    parsing starts from;
//! 3. frames decoded by the adapter are stamped with the capture time of the
//!    fragment holding their first byte;
//! 4. every offset in the adapter's outcome is translated into fragment
//!    coordinates;
//! 5. the accumulation is cleared, whatever the outcome.
//!
//! Parsing is destructive: the assembler never keeps an unconsumed tail.
//! Callers wanting those bytes reconsidered re-append them, for example with
//! [`fragment::remainder`](crate::fragment::remainder).

use std::collections::VecDeque;

use crate::{
    adapter::{MessageType, ProtocolAdapter, TimestampedFrame},
    fragment::{Fragment, FragmentPosition},
    metrics::{self, ResyncOutcome},
    parse::{ParseOutcome, ParseState},
    position::PositionTranslator,
};

mod stream;

use stream::AccumulatedStream;

/// Offset from which a resync searches for the next frame boundary.
///
/// Searching from 1 rather than 0 guarantees a resync moves forward even
/// when the stream is already aligned on a frame start.
pub const RESYNC_SEARCH_START: usize = 1;

/// Accumulates fragments and turns them into timestamped frames.
///
/// One assembler serves one direction of one connection and is driven from a
/// single thread; it holds no locks and performs no I/O.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
///
/// use framesync::{
///     adapter::{LineAdapter, MessageType, TimestampedFrame},
///     assembler::FrameAssembler,
///     fragment::{Fragment, FragmentPosition},
///     parse::ParseState,
/// };
///
/// let mut assembler = FrameAssembler::new(LineAdapter::default());
/// assembler.append(Fragment::new(&b"PI"[..], 100));
/// assembler.append(Fragment::new(&b"NG\r\nPONG\r\n"[..], 200));
///
/// let mut frames = VecDeque::new();
/// let outcome = assembler.parse(MessageType::Request, &mut frames, false);
///
/// assert_eq!(outcome.state, ParseState::Success);
/// assert_eq!(
///     outcome.start_positions,
///     vec![FragmentPosition::new(0, 0), FragmentPosition::new(1, 4)]
/// );
/// assert_eq!(outcome.end_position, FragmentPosition::end(2));
/// assert_eq!(frames[0].timestamp_ns(), 100);
/// assert_eq!(frames[1].timestamp_ns(), 200);
/// assert!(assembler.is_empty());
/// ```
#[derive(Debug)]
pub struct FrameAssembler<A> {
    adapter: A,
    stream: AccumulatedStream,
    skipped: usize,
}

impl<A: ProtocolAdapter> FrameAssembler<A> {
    /// Create an assembler parsing with `adapter`.
    #[must_use]
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            stream: AccumulatedStream::default(),
            skipped: 0,
        }
    }

    /// Create an assembler with room for `fragments` fragments per cycle.
    #[must_use]
    pub fn with_capacity(adapter: A, fragments: usize) -> Self {
        Self {
            adapter,
            stream: AccumulatedStream::with_capacity(fragments),
            skipped: 0,
        }
    }

    /// Borrow the protocol adapter.
    #[must_use]
    pub fn adapter(&self) -> &A { &self.adapter }

    /// Total bytes accumulated since the last parse.
    #[must_use]
    pub fn len(&self) -> usize { self.stream.len() }

    /// Whether no bytes are waiting to be parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.stream.len() == 0 }

    /// Number of fragments accumulated since the last parse, empty ones
    /// included.
    #[must_use]
    pub fn fragment_count(&self) -> usize { self.stream.fragments().len() }

    /// Bytes the most recent [`parse`](Self::parse) stepped over to reach a
    /// resync boundary. Zero when no resync was requested or none was found.
    #[must_use]
    pub fn skipped_bytes(&self) -> usize { self.skipped }

    /// Add one captured fragment to the stream. No parsing happens here.
    pub fn append(&mut self, fragment: Fragment) {
        log::trace!(
            "fragment appended: len={}, timestamp_ns={}, buffered={}",
            fragment.len(),
            fragment.timestamp_ns(),
            self.stream.len()
        );
        self.stream.push(fragment);
    }

    /// Run one parse cycle over everything appended since the last one.
    ///
    /// Newly decoded frames are appended to `frames` and stamped with their
    /// capture time; entries already in `frames` are left alone. When
    /// `resync` is set, parsing starts at the next plausible frame boundary
    /// after offset [`RESYNC_SEARCH_START`], or at offset 0 when the adapter
    /// finds none.
    ///
    /// The returned outcome is expressed in fragment coordinates: one
    /// position per new frame, the position through which input was
    /// consumed, and the adapter's final state. Accumulated fragments are
    /// dropped before returning, regardless of that state.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when the adapter breaks its contract (offsets
    /// out of order or out of range, or a start count differing from the
    /// number of frames appended).
    pub fn parse(
        &mut self,
        message_type: MessageType,
        frames: &mut VecDeque<A::Frame>,
        resync: bool,
    ) -> ParseOutcome<FragmentPosition> {
        let buf = self.stream.contiguous();
        let start = if resync {
            self.resync_start(message_type, &buf)
        } else {
            0
        };
        self.skipped = start;

        let prev_len = frames.len();
        let outcome = self
            .adapter
            .parse_frames(message_type, &buf[start..], frames)
            .rebased(start);
        let appended = frames.len().saturating_sub(prev_len);
        check_adapter_contract(&outcome, appended, buf.len());

        let positions = self.stamp_and_translate(&outcome, frames, prev_len);

        log::debug!(
            "parse cycle finished: message_type={message_type}, state={}, frames={appended}, \
             bytes={}, start={start}, end={}",
            positions.state,
            buf.len(),
            positions.end_position
        );
        metrics::record_parse(positions.state, appended);

        self.stream.clear();
        positions
    }

    fn resync_start(&self, message_type: MessageType, buf: &[u8]) -> usize {
        match self
            .adapter
            .find_frame_boundary(message_type, buf, RESYNC_SEARCH_START)
        {
            Some(boundary) if boundary > RESYNC_SEARCH_START && boundary <= buf.len() => {
                log::debug!("resync found frame boundary: offset={boundary}, len={}", buf.len());
                metrics::record_resync(ResyncOutcome::Found);
                boundary
            }
            Some(boundary) => {
                log::warn!(
                    "adapter returned out-of-range frame boundary: offset={boundary}, \
                     search_start={RESYNC_SEARCH_START}, len={}",
                    buf.len()
                );
                metrics::record_resync(ResyncOutcome::Fallback);
                0
            }
            None => {
                log::debug!("resync found no frame boundary; parsing from start");
                metrics::record_resync(ResyncOutcome::Fallback);
                0
            }
        }
    }

    fn stamp_and_translate(
        &self,
        outcome: &ParseOutcome<usize>,
        frames: &mut VecDeque<A::Frame>,
        first_new: usize,
    ) -> ParseOutcome<FragmentPosition> {
        let fragments = self.stream.fragments();
        let mut translator = PositionTranslator::new(fragments);
        let mut translate = |offset: usize| {
            translator.try_translate(offset).unwrap_or_else(|err| {
                log::warn!("adapter offsets out of order: {err}");
                FragmentPosition::end(fragments.len())
            })
        };

        let mut start_positions = Vec::with_capacity(outcome.start_positions.len());
        for (i, &offset) in outcome.start_positions.iter().enumerate() {
            let position = translate(offset);
            debug_assert!(
                position.index.get() < fragments.len(),
                "frame start {offset} must fall inside one of {} fragments",
                fragments.len()
            );
            match (frames.get_mut(first_new + i), fragments.get(position.index.get())) {
                (Some(frame), Some(fragment)) => frame.set_timestamp_ns(fragment.timestamp_ns()),
                (Some(_), None) => {
                    log::warn!("frame start beyond captured bytes: offset={offset}");
                }
                (None, _) => {}
            }
            start_positions.push(position);
        }

        ParseOutcome::new(start_positions, translate(outcome.end_position), outcome.state)
    }
}

fn check_adapter_contract(outcome: &ParseOutcome<usize>, appended: usize, buf_len: usize) {
    debug_assert_eq!(
        outcome.start_positions.len(),
        appended,
        "adapter must report one start offset per appended frame"
    );
    debug_assert!(
        outcome.is_well_formed(buf_len),
        "adapter offsets must be increasing and within the buffer: {outcome:?}, len={buf_len}"
    );
    if outcome.start_positions.len() != appended {
        log::warn!(
            "adapter start offsets do not match frames appended: starts={}, frames={appended}",
            outcome.start_positions.len()
        );
    }
    if outcome.state == ParseState::Unknown {
        log::warn!("adapter returned unknown parse state");
    }
}

//! Caller-side policy around a [`FrameAssembler`].

use std::collections::VecDeque;

use derive_more::Display;

use super::ReplayConfig;
use crate::{
    adapter::ProtocolAdapter,
    assembler::FrameAssembler,
    fragment::{Fragment, FragmentPosition, remainder},
    parse::{ParseOutcome, ParseState},
};

/// Running totals for one replay.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
#[display(
    "cycles={cycles} frames={frames} resyncs={resyncs} dropped_bytes={dropped_bytes}"
)]
pub struct ReplayStats {
    /// Parse cycles run.
    pub cycles: usize,
    /// Frames produced.
    pub frames: usize,
    /// Cycles that asked the adapter for a resync.
    pub resyncs: usize,
    /// Bytes discarded without being parsed into a frame.
    pub dropped_bytes: usize,
}

/// Feeds fragments to an assembler and carries unconsumed tails forward.
///
/// Positions returned by [`poll`](Self::poll) refer to fragments in the
/// order they were pushed, so a frame can be traced to the exact capture
/// record holding its first byte even when that record was re-appended over
/// several cycles. The end sentinel is the index the next pushed fragment
/// will receive.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
///
/// use framesync::{
///     adapter::LineAdapter,
///     fragment::{Fragment, FragmentPosition},
///     replay::{ReplayConfig, ReplayDriver},
/// };
///
/// let mut driver = ReplayDriver::new(LineAdapter::default(), ReplayConfig::default());
/// let mut frames = VecDeque::new();
///
/// driver.push(Fragment::new(&b"HEL"[..], 10));
/// driver.poll(&mut frames);
/// assert!(frames.is_empty());
/// assert_eq!(driver.pending_bytes(), 3);
///
/// driver.push(Fragment::new(&b"LO\r\n"[..], 20));
/// let outcome = driver.poll(&mut frames);
/// assert_eq!(frames[0].text(), "HELLO");
/// assert_eq!(outcome.start_positions, vec![FragmentPosition::new(0, 0)]);
/// assert_eq!(driver.pending_bytes(), 0);
/// ```
#[derive(Debug)]
pub struct ReplayDriver<A> {
    assembler: FrameAssembler<A>,
    config: ReplayConfig,
    // Clones of what the assembler holds, with where each one came from.
    pending: Vec<Fragment>,
    origins: Vec<FragmentPosition>,
    pending_len: usize,
    pushed: usize,
    unpolled: bool,
    last_state: ParseState,
    resync_next: bool,
    stats: ReplayStats,
}

impl<A: ProtocolAdapter> ReplayDriver<A> {
    /// Create a driver around a fresh assembler for `adapter`.
    #[must_use]
    pub fn new(adapter: A, config: ReplayConfig) -> Self {
        Self {
            assembler: FrameAssembler::new(adapter),
            config,
            pending: Vec::new(),
            origins: Vec::new(),
            pending_len: 0,
            pushed: 0,
            unpolled: false,
            last_state: ParseState::Unknown,
            resync_next: false,
            stats: ReplayStats::default(),
        }
    }

    /// The policy this driver applies.
    #[must_use]
    pub fn config(&self) -> &ReplayConfig { &self.config }

    /// Totals so far.
    #[must_use]
    pub fn stats(&self) -> ReplayStats { self.stats }

    /// Bytes waiting for the next cycle, re-appended tail included.
    #[must_use]
    pub fn pending_bytes(&self) -> usize { self.pending_len }

    /// Queue one captured fragment for the next cycle.
    pub fn push(&mut self, fragment: Fragment) {
        self.pending_len += fragment.len();
        self.pending.push(fragment.clone());
        self.origins.push(FragmentPosition::new(self.pushed, 0));
        self.pushed += 1;
        self.unpolled = true;
        self.assembler.append(fragment);
    }

    /// Run one parse cycle and carry its unconsumed tail forward.
    ///
    /// New frames are appended to `frames`. A resync is requested when the
    /// previous cycle ended `Invalid` or had to discard bytes, provided
    /// [`ReplayConfig::resync_on_invalid`] is set.
    pub fn poll(&mut self, frames: &mut VecDeque<A::Frame>) -> ParseOutcome<FragmentPosition> {
        let resync = self.config.resync_on_invalid && self.resync_next;
        let before = frames.len();
        let outcome = self
            .assembler
            .parse(self.config.message_type, frames, resync);

        self.stats.cycles += 1;
        self.stats.frames += frames.len().saturating_sub(before);
        if resync {
            self.stats.resyncs += 1;
        }
        let skipped = self.assembler.skipped_bytes();
        if skipped > 0 {
            log::debug!("resync skipped unparsed bytes: bytes={skipped}");
            self.stats.dropped_bytes += skipped;
        }

        let (mut tail, mut origins) = self.tail_after(outcome.end_position);
        let mut tail_len: usize = tail.iter().map(Fragment::len).sum();
        let state = outcome.state;
        let captured = outcome.map_positions(|position| self.origin_of(position));
        self.unpolled = false;
        self.last_state = state;
        self.resync_next = state.wants_resync();

        let stalled = state == ParseState::Invalid
            && tail_len == self.pending_len
            && (resync || !self.config.resync_on_invalid);
        if stalled && tail_len > 0 {
            skip_first_byte(&mut tail, &mut origins);
            tail_len -= 1;
            self.stats.dropped_bytes += 1;
            log::debug!("no progress on invalid input; skipped one byte: pending={tail_len}");
        }

        if tail_len > self.config.max_pending_bytes.get() {
            log::warn!(
                "dropping unconsumed tail: bytes={tail_len}, limit={}",
                self.config.max_pending_bytes
            );
            self.stats.dropped_bytes += tail_len;
            tail.clear();
            origins.clear();
            tail_len = 0;
            self.resync_next = true;
        }

        for fragment in &tail {
            self.assembler.append(fragment.clone());
        }
        self.pending = tail;
        self.origins = origins;
        self.pending_len = tail_len;
        captured
    }

    /// Poll until no further progress is possible without new input.
    ///
    /// Cycles run while fragments are waiting that no cycle has seen yet, or
    /// while the last cycle ended `Invalid` (which either resyncs or skips a
    /// byte next time). Returns the start position of every frame appended to
    /// `frames`, in order.
    pub fn flush(&mut self, frames: &mut VecDeque<A::Frame>) -> Vec<FragmentPosition> {
        let mut starts = Vec::new();
        while self.pending_len > 0 && (self.unpolled || self.last_state == ParseState::Invalid) {
            starts.extend(self.poll(frames).start_positions);
        }
        starts
    }

    /// [`flush`](Self::flush) and return the final totals.
    ///
    /// Bytes still unconsumed afterwards are counted as dropped.
    pub fn finish(mut self, frames: &mut VecDeque<A::Frame>) -> ReplayStats {
        self.flush(frames);
        if self.pending_len > 0 {
            log::debug!("replay finished with incomplete tail: bytes={}", self.pending_len);
            self.stats.dropped_bytes += self.pending_len;
        }
        self.stats
    }

    fn origin_of(&self, position: FragmentPosition) -> FragmentPosition {
        match self.origins.get(position.index.get()) {
            Some(origin) => {
                FragmentPosition::new(origin.index.get(), origin.offset + position.offset)
            }
            None => FragmentPosition::end(self.pushed),
        }
    }

    fn tail_after(&self, end: FragmentPosition) -> (Vec<Fragment>, Vec<FragmentPosition>) {
        let tail = remainder(&self.pending, end);
        let first = end.index.get();
        let origins = self
            .pending
            .iter()
            .zip(&self.origins)
            .enumerate()
            .skip(first)
            .filter_map(|(i, (fragment, origin))| {
                let cut = if i == first { end.offset } else { 0 };
                (fragment.len() > cut)
                    .then(|| FragmentPosition::new(origin.index.get(), origin.offset + cut))
            })
            .collect();
        (tail, origins)
    }
}

fn skip_first_byte(tail: &mut Vec<Fragment>, origins: &mut Vec<FragmentPosition>) {
    let Some(first) = tail.first_mut() else {
        return;
    };
    if first.len() > 1 {
        *first = Fragment::new(first.payload().slice(1..), first.timestamp_ns());
        if let Some(origin) = origins.first_mut() {
            origin.offset += 1;
        }
    } else {
        tail.remove(0);
        if !origins.is_empty() {
            origins.remove(0);
        }
    }
}

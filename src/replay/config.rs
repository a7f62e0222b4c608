//! Policy knobs for [`ReplayDriver`](super::ReplayDriver).

use std::num::NonZeroUsize;

use crate::adapter::MessageType;

/// Largest unconsumed tail kept for the next cycle unless configured otherwise.
pub const DEFAULT_MAX_PENDING_BYTES: NonZeroUsize = match NonZeroUsize::new(64 * 1024) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// Settings applied by a replay driver on top of the assembler.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use framesync::{adapter::MessageType, replay::ReplayConfig};
///
/// let config = ReplayConfig::default()
///     .with_message_type(MessageType::Response)
///     .with_max_pending_bytes(NonZeroUsize::new(512).expect("non-zero"));
/// assert!(config.resync_on_invalid);
/// assert_eq!(config.max_pending_bytes.get(), 512);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Direction handed to the adapter on every cycle.
    pub message_type: MessageType,
    /// Request a resync on the cycle following an `Invalid` outcome.
    pub resync_on_invalid: bool,
    /// Unconsumed tails longer than this are discarded instead of re-appended.
    pub max_pending_bytes: NonZeroUsize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            message_type: MessageType::Request,
            resync_on_invalid: true,
            max_pending_bytes: DEFAULT_MAX_PENDING_BYTES,
        }
    }
}

impl ReplayConfig {
    /// Set the traffic direction.
    #[must_use]
    pub fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    /// Enable or disable resync after `Invalid` outcomes.
    #[must_use]
    pub fn with_resync_on_invalid(mut self, enabled: bool) -> Self {
        self.resync_on_invalid = enabled;
        self
    }

    /// Bound the unconsumed tail carried between cycles.
    #[must_use]
    pub fn with_max_pending_bytes(mut self, limit: NonZeroUsize) -> Self {
        self.max_pending_bytes = limit;
        self
    }
}

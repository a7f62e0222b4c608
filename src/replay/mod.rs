//! Replaying captured fragments through a [`FrameAssembler`].
//!
//! The assembler leaves tail handling and resync decisions to its caller.
//! [`ReplayDriver`] is such a caller: it keeps clones of everything it
//! pushes, re-appends whatever a cycle left unconsumed, asks for a resync
//! after an `Invalid` outcome and bounds how many bytes may wait for a frame
//! to complete. Capture files are read with [`read_capture`] or
//! [`read_capture_file`].
//!
//! [`FrameAssembler`]: crate::assembler::FrameAssembler

pub mod capture;
pub mod config;
pub mod driver;

pub use capture::{CaptureError, LineError, parse_line, read_capture, read_capture_file};
pub use config::{DEFAULT_MAX_PENDING_BYTES, ReplayConfig};
pub use driver::{ReplayDriver, ReplayStats};

#[cfg(test)]
mod tests;

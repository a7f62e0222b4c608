//! Utilities for exercising `framesync` in tests.
//!
//! Provides wire encoders for the reference protocols, a helper that cuts a
//! byte stream into timestamped [`Fragment`](framesync::Fragment)s the way a
//! syscall capture would, capture-file rendering, and a shared `logtest`
//! fixture.
//!
//! ```rust
//! use framesync_testing::{length_prefixed, split_at};
//!
//! let wire = length_prefixed(&[b"hello"]);
//! let fragments = split_at(&wire, &[2, 7], 100, 10);
//! assert_eq!(fragments.len(), 3);
//! assert_eq!(fragments[2].timestamp_ns(), 120);
//! ```

pub mod capture;
pub mod fragments;
pub mod logging;
pub mod wire;

pub use capture::{capture_text, write_capture};
pub use fragments::split_at;
pub use framesync::test_helpers::{ScriptedAdapter, ScriptedFrame};
pub use logging::{LoggerHandle, logger};
pub use wire::{crlf_lines, length_prefixed};

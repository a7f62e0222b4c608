#![doc(html_root_url = "https://docs.rs/framesync/latest")]
//! Public API for the `framesync` library.
//!
//! This crate reconstructs protocol frames from byte fragments captured on
//! socket read/write syscalls. Fragments for one direction of a connection
//! are accumulated by a [`FrameAssembler`], parsed with a per-protocol
//! [`ProtocolAdapter`], and returned as frames stamped with the capture time
//! of their first byte, together with their positions in fragment
//! coordinates.

pub mod adapter;
pub mod assembler;
pub mod fragment;
pub mod metrics;
pub mod parse;
pub mod position;
pub mod replay;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use adapter::{MessageType, ProtocolAdapter, TimestampedFrame};
pub use assembler::FrameAssembler;
pub use fragment::{Fragment, FragmentIndex, FragmentPosition};
pub use parse::{ParseOutcome, ParseState};
pub use position::{PositionError, PositionTranslator};

//! Captured syscall payloads and their coordinates.
//!
//! A [`Fragment`] is one chunk of bytes observed by the capture layer on a
//! single traced direction of a connection. The assembler concatenates
//! fragments into a logical stream; [`FragmentPosition`] expresses an offset
//! into that stream in fragment-relative form so parsed frames can be traced
//! back to the syscall that carried their first byte.

pub mod capture;
pub mod index;
pub mod position;
pub mod remainder;

pub use capture::Fragment;
pub use index::FragmentIndex;
pub use position::FragmentPosition;
pub use remainder::remainder;

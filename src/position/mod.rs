//! Translation of stream offsets into fragment coordinates.
//!
//! [`PositionTranslator`] walks the fragment list with a cursor that only
//! moves forward, so translating every frame start of a parse cycle costs a
//! single pass over the fragments. The translator borrows the fragments for
//! its whole life and has no way to rewind: build a fresh one for each batch
//! of offsets.

mod error;
mod translator;

pub use error::PositionError;
pub use translator::PositionTranslator;

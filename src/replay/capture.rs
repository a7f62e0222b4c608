//! Text capture files.
//!
//! One fragment per line, `<timestamp_ns> <hex payload>`. The payload field
//! may be omitted for a syscall that moved no bytes. Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! # GET split across two reads
//! 1000 474554202f
//! 1250 20485454502f312e310d0a
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    num::ParseIntError,
    path::Path,
};

use thiserror::Error;

use crate::fragment::Fragment;

/// Errors produced while reading a capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The capture could not be read.
    #[error("failed to read capture: {0}")]
    Io(#[from] io::Error),
    /// A line does not follow the capture format.
    #[error("malformed capture line {line}: {reason}")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        #[source]
        reason: LineError,
    },
}

/// Problems with a single capture line.
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    /// The timestamp is not an unsigned decimal integer.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] ParseIntError),
    /// The payload is not valid hex.
    #[error("invalid hex payload: {0}")]
    Payload(#[from] hex::FromHexError),
    /// More than two whitespace-separated fields.
    #[error("unexpected trailing field {0:?}")]
    TrailingField(String),
}

/// Parse one capture line. Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns a [`LineError`] when the timestamp or payload cannot be decoded
/// or the line carries extra fields.
pub fn parse_line(line: &str) -> Result<Option<Fragment>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let timestamp_ns = fields.next().unwrap_or_default().parse::<u64>()?;
    let payload = hex::decode(fields.next().unwrap_or_default())?;
    if let Some(extra) = fields.next() {
        return Err(LineError::TrailingField(extra.to_owned()));
    }
    Ok(Some(Fragment::new(payload, timestamp_ns)))
}

/// Read every fragment from `reader`, in file order.
///
/// # Errors
///
/// Returns [`CaptureError::Io`] if reading fails and
/// [`CaptureError::Malformed`] for the first line that cannot be parsed.
pub fn read_capture<R: BufRead>(reader: R) -> Result<Vec<Fragment>, CaptureError> {
    let mut fragments = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Ok(Some(fragment)) => fragments.push(fragment),
            Ok(None) => {}
            Err(reason) => return Err(CaptureError::Malformed { line: i + 1, reason }),
        }
    }
    log::debug!("capture read: fragments={}", fragments.len());
    Ok(fragments)
}

/// Open `path` and read it with [`read_capture`].
///
/// # Errors
///
/// See [`read_capture`]; failing to open the file is reported as
/// [`CaptureError::Io`].
pub fn read_capture_file(path: impl AsRef<Path>) -> Result<Vec<Fragment>, CaptureError> {
    let file = File::open(path)?;
    read_capture(BufReader::new(file))
}

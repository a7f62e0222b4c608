//! Encoders producing wire bytes for the reference adapters.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Encoder, LengthDelimitedCodec};

/// Encode each payload with a 4-byte big-endian length prefix and
/// concatenate the results.
///
/// # Panics
///
/// Panics if a payload is too large for the codec's default limit.
#[must_use]
pub fn length_prefixed(payloads: &[&[u8]]) -> Vec<u8> {
    let mut codec = LengthDelimitedCodec::new();
    let mut buf = BytesMut::new();
    for payload in payloads {
        codec
            .encode(Bytes::copy_from_slice(payload), &mut buf)
            .expect("payload exceeds codec limit");
    }
    buf.to_vec()
}

/// Join `lines` with CRLF terminators.
#[must_use]
pub fn crlf_lines(lines: &[&str]) -> Vec<u8> {
    lines
        .iter()
        .flat_map(|line| line.bytes().chain(*b"\r\n"))
        .collect()
}

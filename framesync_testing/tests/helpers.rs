//! Integration coverage for the `framesync_testing` helpers.

use std::io::Cursor;

use framesync::replay::read_capture;
use framesync_testing::{capture_text, crlf_lines, length_prefixed, split_at};

#[test]
fn length_prefixed_writes_big_endian_headers() {
    let wire = length_prefixed(&[b"ab", b""]);
    assert_eq!(wire, vec![0, 0, 0, 2, b'a', b'b', 0, 0, 0, 0]);
}

#[test]
fn crlf_lines_terminates_every_line() {
    assert_eq!(crlf_lines(&["A", "BC"]), b"A\r\nBC\r\n".to_vec());
}

#[test]
fn split_at_keeps_every_byte_and_steps_timestamps() {
    let fragments = split_at(b"abcdef", &[2, 2, 5], 1_000, 50);
    let payloads: Vec<&[u8]> = fragments.iter().map(|f| f.payload().as_ref()).collect();
    assert_eq!(payloads, vec![&b"ab"[..], b"", b"cde", b"f"]);
    let stamps: Vec<u64> = fragments.iter().map(|f| f.timestamp_ns()).collect();
    assert_eq!(stamps, vec![1_000, 1_050, 1_100, 1_150]);
}

#[test]
fn capture_text_is_readable_by_the_capture_reader() {
    let fragments = split_at(&crlf_lines(&["PING"]), &[3], 7, 1);
    let parsed = read_capture(Cursor::new(capture_text(&fragments))).expect("valid capture");
    assert_eq!(parsed, fragments);
}

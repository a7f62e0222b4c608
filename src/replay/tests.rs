//! Unit tests for capture reading and the replay driver.

use std::{collections::VecDeque, io::Cursor, num::NonZeroUsize};

use bytes::Bytes;
use rstest::rstest;

use super::*;
use crate::{
    adapter::{LengthDelimitedAdapter, LineAdapter, MessageType, TimestampedFrame},
    fragment::{Fragment, FragmentPosition},
    parse::ParseState,
};

#[rstest]
#[case::blank("", None)]
#[case::whitespace("   \t", None)]
#[case::comment("# header", None)]
#[case::empty_payload("42", Some(Fragment::new(Bytes::new(), 42)))]
#[case::payload("7 50494e47", Some(Fragment::new(&b"PING"[..], 7)))]
#[case::surrounding_space("  9 0d0a  ", Some(Fragment::new(&b"\r\n"[..], 9)))]
fn parses_capture_lines(#[case] line: &str, #[case] expected: Option<Fragment>) {
    assert_eq!(parse_line(line), Ok(expected));
}

#[rstest]
#[case::negative_timestamp("-1 00")]
#[case::odd_hex("1 abc")]
#[case::non_hex("1 zz")]
#[case::extra_field("1 00 00")]
fn rejects_malformed_lines(#[case] line: &str) {
    assert!(parse_line(line).is_err(), "{line:?} should be rejected");
}

#[test]
fn odd_length_payload_reports_hex_error() {
    assert_eq!(
        parse_line("1 abc"),
        Err(LineError::Payload(hex::FromHexError::OddLength))
    );
}

#[test]
fn reads_capture_in_file_order() {
    let input = "# two reads\n100 4142\n\n200 43\n300\n";
    let fragments = read_capture(Cursor::new(input)).expect("capture should parse");
    assert_eq!(
        fragments,
        vec![
            Fragment::new(&b"AB"[..], 100),
            Fragment::new(&b"C"[..], 200),
            Fragment::new(Bytes::new(), 300),
        ]
    );
}

#[test]
fn malformed_line_reports_its_number() {
    let input = "1 00\n# ok\nnot-a-timestamp 00\n";
    let err = read_capture(Cursor::new(input)).expect_err("line 3 is malformed");
    assert!(
        matches!(
            err,
            CaptureError::Malformed {
                line: 3,
                reason: LineError::Timestamp(_)
            }
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn missing_capture_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_capture_file(dir.path().join("absent.cap")).expect_err("file is absent");
    assert!(matches!(err, CaptureError::Io(_)));
}

#[test]
fn config_defaults_and_builders() {
    let config = ReplayConfig::default();
    assert_eq!(config.message_type, MessageType::Request);
    assert!(config.resync_on_invalid);
    assert_eq!(config.max_pending_bytes, DEFAULT_MAX_PENDING_BYTES);

    let limit = NonZeroUsize::new(8).expect("non-zero");
    let config = config
        .with_message_type(MessageType::Response)
        .with_resync_on_invalid(false)
        .with_max_pending_bytes(limit);
    assert_eq!(config.message_type, MessageType::Response);
    assert!(!config.resync_on_invalid);
    assert_eq!(config.max_pending_bytes, limit);
}

fn length_prefixed(payload: &[u8]) -> Vec<u8> {
    let len = u32::try_from(payload.len()).expect("payload fits u32");
    let mut out = len.to_be_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}

#[test]
fn tail_is_carried_into_next_cycle() {
    let mut driver = ReplayDriver::new(LengthDelimitedAdapter::default(), ReplayConfig::default());
    let wire = length_prefixed(b"hello");
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(wire[..3].to_vec(), 100));
    let outcome = driver.poll(&mut frames);
    assert_eq!(outcome.state, ParseState::NeedsMoreData);
    assert_eq!(outcome.end_position, FragmentPosition::new(0, 0));
    assert_eq!(driver.pending_bytes(), 3);

    driver.push(Fragment::new(wire[3..].to_vec(), 200));
    let outcome = driver.poll(&mut frames);
    assert_eq!(outcome.state, ParseState::Success);
    assert_eq!(outcome.start_positions, vec![FragmentPosition::new(0, 0)]);
    assert_eq!(outcome.end_position, FragmentPosition::end(2));
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].payload().as_ref(), b"hello");
    assert_eq!(frames[0].timestamp_ns(), 100);
    assert_eq!(driver.pending_bytes(), 0);
}

#[test]
fn positions_refer_to_pushed_fragments() {
    let mut driver = ReplayDriver::new(LineAdapter::default(), ReplayConfig::default());
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"ONE\r\nTW"[..], 10));
    let first = driver.poll(&mut frames);
    assert_eq!(first.start_positions, vec![FragmentPosition::new(0, 0)]);
    assert_eq!(first.end_position, FragmentPosition::new(0, 5));

    driver.push(Fragment::new(&b"O\r\n"[..], 20));
    let second = driver.poll(&mut frames);
    assert_eq!(second.start_positions, vec![FragmentPosition::new(0, 5)]);
    assert_eq!(second.end_position, FragmentPosition::end(2));

    let texts: Vec<&str> = frames.iter().map(|frame| frame.text()).collect();
    assert_eq!(texts, vec!["ONE", "TWO"]);
    assert_eq!(frames[1].timestamp_ns(), 10);
}

#[test]
fn invalid_outcome_triggers_resync_on_next_cycle() {
    let mut driver = ReplayDriver::new(LineAdapter::default(), ReplayConfig::default());
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"BAD\nX\r\nPING\r\n"[..], 10));
    let first = driver.poll(&mut frames);
    assert_eq!(first.state, ParseState::Invalid);
    assert!(frames.is_empty());
    assert_eq!(driver.stats().resyncs, 0);

    let second = driver.poll(&mut frames);
    assert_eq!(second.state, ParseState::Success);
    assert_eq!(second.start_positions, vec![FragmentPosition::new(0, 7)]);
    assert_eq!(frames[0].text(), "PING");
    assert_eq!(driver.stats().resyncs, 1);
    assert_eq!(driver.pending_bytes(), 0);
}

#[test]
fn stalled_invalid_input_skips_a_byte_without_resync() {
    let config = ReplayConfig::default().with_resync_on_invalid(false);
    let mut driver = ReplayDriver::new(LineAdapter::default(), config);
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"\nOK\r\n"[..], 10));
    let first = driver.poll(&mut frames);
    assert_eq!(first.state, ParseState::Invalid);
    assert_eq!(driver.pending_bytes(), 4);
    assert_eq!(driver.stats().dropped_bytes, 1);

    let second = driver.poll(&mut frames);
    assert_eq!(second.start_positions, vec![FragmentPosition::new(0, 1)]);
    assert_eq!(frames[0].text(), "OK");
    assert_eq!(driver.stats().resyncs, 0);
}

#[test]
fn oversized_tail_is_dropped() {
    let config = ReplayConfig::default().with_max_pending_bytes(NonZeroUsize::MIN.saturating_add(3));
    let mut driver = ReplayDriver::new(LineAdapter::default(), config);
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"ABCDEFG"[..], 10));
    let outcome = driver.poll(&mut frames);

    assert_eq!(outcome.state, ParseState::NeedsMoreData);
    assert_eq!(driver.pending_bytes(), 0);
    assert_eq!(driver.stats().dropped_bytes, 7);
}

#[test]
fn finish_counts_incomplete_tail_as_dropped() {
    let mut driver = ReplayDriver::new(LineAdapter::default(), ReplayConfig::default());
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"DONE\r\nPART"[..], 10));
    let stats = driver.finish(&mut frames);

    assert_eq!(frames.len(), 1);
    assert_eq!(
        stats,
        ReplayStats {
            cycles: 1,
            frames: 1,
            resyncs: 0,
            dropped_bytes: 4,
        }
    );
    assert_eq!(
        stats.to_string(),
        "cycles=1 frames=1 resyncs=0 dropped_bytes=4"
    );
}

#[test]
fn finish_without_pending_bytes_runs_no_cycle() {
    let driver = ReplayDriver::new(LineAdapter::default(), ReplayConfig::default());
    assert_eq!(driver.finish(&mut VecDeque::new()), ReplayStats::default());
}

#[test]
fn flush_works_through_leading_garbage_without_resync() {
    let config = ReplayConfig::default().with_resync_on_invalid(false);
    let mut driver = ReplayDriver::new(LineAdapter::default(), config);
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"\n\n\nOK\r\n"[..], 10));
    let starts = driver.flush(&mut frames);

    assert_eq!(starts, vec![FragmentPosition::new(0, 3)]);
    assert_eq!(frames[0].text(), "OK");
    assert_eq!(driver.stats().cycles, 4);
    assert_eq!(driver.stats().dropped_bytes, 3);
    assert_eq!(driver.pending_bytes(), 0);
}

#[test]
fn flush_leaves_incomplete_tail_after_one_cycle() {
    let mut driver = ReplayDriver::new(LineAdapter::default(), ReplayConfig::default());
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"PAR"[..], 10));
    assert!(driver.flush(&mut frames).is_empty());
    assert!(driver.flush(&mut frames).is_empty());

    assert_eq!(driver.stats().cycles, 1);
    assert_eq!(driver.pending_bytes(), 3);
}

#[test]
fn bytes_skipped_by_resync_count_as_dropped() {
    let mut driver = ReplayDriver::new(LineAdapter::default(), ReplayConfig::default());
    let mut frames = VecDeque::new();

    driver.push(Fragment::new(&b"\xff junk\r\nNOOP\r\n"[..], 10));
    let stats = driver.finish(&mut frames);

    assert_eq!(frames[0].text(), "NOOP");
    assert_eq!(
        stats,
        ReplayStats {
            cycles: 2,
            frames: 1,
            resyncs: 1,
            dropped_bytes: 8,
        }
    );
}

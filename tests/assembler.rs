//! End-to-end tests driving the frame assembler with the reference adapters.

use std::collections::VecDeque;

use framesync::{
    FrameAssembler,
    adapter::{LengthDelimitedAdapter, LineAdapter, LineFrame, MessageType, TimestampedFrame},
    fragment::{Fragment, FragmentPosition, remainder},
    parse::{ParseOutcome, ParseState},
    position::{PositionError, PositionTranslator},
};
use framesync_testing::{ScriptedAdapter, crlf_lines, length_prefixed, split_at};
use rstest::rstest;

fn parse_all<A: framesync::ProtocolAdapter>(
    adapter: A,
    fragments: Vec<Fragment>,
    resync: bool,
) -> (ParseOutcome<FragmentPosition>, VecDeque<A::Frame>) {
    let mut assembler = FrameAssembler::new(adapter);
    for fragment in fragments {
        assembler.append(fragment);
    }
    let mut frames = VecDeque::new();
    let outcome = assembler.parse(MessageType::Request, &mut frames, resync);
    (outcome, frames)
}

#[test]
fn frame_spanning_fragments_takes_first_byte_timestamp() {
    let fragments = vec![
        Fragment::new(vec![b'x'; 10], 100),
        Fragment::new(&b"xxOK\r\n\r\n\r\n"[..], 200),
    ];
    let adapter = ScriptedAdapter::new(ParseState::Success).with_frames([12], 20);
    let (outcome, frames) = parse_all(adapter, fragments, false);

    assert_eq!(outcome.start_positions, vec![FragmentPosition::new(1, 2)]);
    assert_eq!(frames[0].timestamp_ns, 200);
}

#[rstest]
#[case::single_fragment(&[][..])]
#[case::split_inside_line(&[2][..])]
#[case::split_on_terminator(&[5, 6][..])]
#[case::one_byte_per_read(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13][..])]
#[case::with_empty_reads(&[0, 0, 7, 7, 14][..])]
fn lines_parse_identically_however_they_were_read(#[case] cuts: &[usize]) {
    let wire = crlf_lines(&["HELO", "MAIL", "QUIT"]);
    let fragments = split_at(&wire, cuts, 1_000, 10);
    let expected_stamps: Vec<u64> = [0_usize, 6, 12]
        .iter()
        .map(|&offset| {
            let index = cuts.iter().filter(|&&cut| cut <= offset).count();
            1_000 + 10 * index as u64
        })
        .collect();

    let (outcome, frames) = parse_all(LineAdapter::default(), fragments.clone(), false);

    assert_eq!(outcome.state, ParseState::Success);
    assert_eq!(outcome.end_position, FragmentPosition::end(fragments.len()));
    let texts: Vec<&str> = frames.iter().map(LineFrame::text).collect();
    assert_eq!(texts, vec!["HELO", "MAIL", "QUIT"]);
    let stamps: Vec<u64> = frames.iter().map(TimestampedFrame::timestamp_ns).collect();
    assert_eq!(stamps, expected_stamps);
    for position in &outcome.start_positions {
        let fragment = &fragments[position.index.get()];
        assert!(position.offset < fragment.len(), "{position} outside its fragment");
    }
}

#[test]
fn needs_more_data_round_trip_matches_single_parse() {
    let wire = length_prefixed(&[b"first", b"second", b"third"]);
    let fragments = split_at(&wire, &[7, 15], 10, 10);
    let (whole, whole_frames) =
        parse_all(LengthDelimitedAdapter::default(), fragments.clone(), false);
    assert_eq!(whole.state, ParseState::Success);

    let mut assembler = FrameAssembler::new(LengthDelimitedAdapter::default());
    let mut frames = VecDeque::new();

    assembler.append(fragments[0].clone());
    let first = assembler.parse(MessageType::Request, &mut frames, false);
    assert_eq!(first.state, ParseState::NeedsMoreData);
    assert!(frames.is_empty());
    assert!(assembler.is_empty());

    let mut held = remainder(&fragments[..1], first.end_position);
    held.extend(fragments[1..].iter().cloned());
    for fragment in held {
        assembler.append(fragment);
    }
    let second = assembler.parse(MessageType::Request, &mut frames, false);

    assert_eq!(second.state, ParseState::Success);
    assert_eq!(frames, whole_frames);
}

#[test]
fn resync_on_aligned_stream_moves_to_the_next_frame() {
    let wire = length_prefixed(&[b"hello", b"world"]);
    let fragments = split_at(&wire, &[], 10, 0);
    let (outcome, frames) = parse_all(LengthDelimitedAdapter::new(64), fragments, true);

    assert_eq!(outcome.start_positions, vec![FragmentPosition::new(0, 9)]);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].payload().as_ref(), b"world");
}

#[test]
fn resync_skips_garbage_before_a_line() {
    let mut wire = b"\xff\xfe junk\r\n".to_vec();
    wire.extend(crlf_lines(&["NOOP"]));
    let fragments = split_at(&wire, &[3], 10, 10);

    let (plain, _) = parse_all(LineAdapter::default(), fragments.clone(), false);
    assert_eq!(plain.state, ParseState::Invalid);
    assert_eq!(plain.end_position, FragmentPosition::new(0, 0));

    let (outcome, frames) = parse_all(LineAdapter::default(), fragments, true);
    assert_eq!(outcome.state, ParseState::Success);
    assert_eq!(outcome.start_positions, vec![FragmentPosition::new(1, 6)]);
    assert_eq!(frames[0].text(), "NOOP");
    assert_eq!(frames[0].timestamp_ns(), 20);
}

#[test]
fn resync_without_boundary_matches_plain_parse() {
    let fragments = split_at(b"\nno terminator here", &[4], 10, 10);

    let plain = parse_all(LineAdapter::default(), fragments.clone(), false);
    let resynced = parse_all(LineAdapter::default(), fragments, true);

    assert_eq!(plain, resynced);
}

#[test]
fn scripted_boundary_not_past_search_start_falls_back() {
    let adapter = ScriptedAdapter::new(ParseState::Invalid)
        .with_boundary(Some(0))
        .with_frames([], 0);
    let probe = adapter.clone();
    let fragments = split_at(b"abcdef", &[3], 1, 1);

    let (outcome, _) = parse_all(adapter, fragments, true);

    assert_eq!(probe.boundary_starts(), vec![1]);
    assert_eq!(probe.buffers(), vec![b"abcdef".to_vec()]);
    assert_eq!(outcome.end_position, FragmentPosition::new(0, 0));
}

#[test]
fn every_parse_starts_from_a_clean_slate() {
    let adapter = ScriptedAdapter::new(ParseState::NeedsMoreData).with_frames([], 0);
    let probe = adapter.clone();
    let mut assembler = FrameAssembler::new(adapter);

    for round in 0_u8..3 {
        assembler.append(Fragment::new(vec![round; 2], u64::from(round)));
        let _ = assembler.parse(MessageType::Response, &mut VecDeque::new(), false);
        assert!(assembler.is_empty());
    }

    assert_eq!(
        probe.buffers(),
        vec![vec![0, 0], vec![1, 1], vec![2, 2]]
    );
}

#[test]
fn translator_reports_regressing_queries() {
    let fragments = split_at(&[0; 10], &[5], 0, 0);
    let mut translator = PositionTranslator::new(&fragments);

    assert_eq!(translator.try_translate(5), Ok(FragmentPosition::new(1, 0)));
    let err = translator.try_translate(3).expect_err("offset 3 follows 5");
    assert_eq!(
        err,
        PositionError::Regressed {
            previous: 5,
            requested: 3,
        }
    );
    assert!(err.to_string().contains('3'));
}

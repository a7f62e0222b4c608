//! Replays a text capture of socket fragments and prints the frames found.
//!
//! Each fragment is pushed through a [`ReplayDriver`] and polled straight
//! away, the way a live capture would feed the assembler. Every frame is
//! printed as `<timestamp_ns> <fragment>:<offset> <frame>`, followed by a
//! summary line.

mod cli;

use std::{
    collections::VecDeque,
    fmt::Display,
    io::{self, BufWriter, Write},
};

use clap::Parser;
use cli::{Cli, Direction, Protocol};
use framesync::{
    adapter::{LengthDelimitedAdapter, LineAdapter, MessageType, ProtocolAdapter, TimestampedFrame},
    fragment::{Fragment, FragmentPosition},
    replay::{ReplayConfig, ReplayDriver, read_capture_file},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let fragments = read_capture_file(&cli.capture)?;
    tracing::info!(
        capture = %cli.capture.display(),
        fragments = fragments.len(),
        protocol = ?cli.protocol,
        "replaying capture"
    );
    let config = replay_config(&cli);
    let mut out = BufWriter::new(io::stdout().lock());

    match cli.protocol {
        Protocol::LengthDelimited => {
            let adapter = cli
                .max_frame_length
                .map_or_else(LengthDelimitedAdapter::default, LengthDelimitedAdapter::new);
            replay(adapter, config, fragments, &mut out)?;
        }
        Protocol::Line => {
            let adapter = cli
                .max_frame_length
                .map_or_else(LineAdapter::default, LineAdapter::new);
            replay(adapter, config, fragments, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn replay_config(cli: &Cli) -> ReplayConfig {
    let message_type = match cli.direction {
        Direction::Request => MessageType::Request,
        Direction::Response => MessageType::Response,
    };
    let mut config = ReplayConfig::default()
        .with_message_type(message_type)
        .with_resync_on_invalid(!cli.no_resync);
    if let Some(limit) = cli.max_pending_bytes {
        config = config.with_max_pending_bytes(limit);
    }
    config
}

fn replay<A>(
    adapter: A,
    config: ReplayConfig,
    fragments: Vec<Fragment>,
    out: &mut impl Write,
) -> io::Result<()>
where
    A: ProtocolAdapter,
    A::Frame: Display,
{
    let mut driver = ReplayDriver::new(adapter, config);
    let mut frames = VecDeque::new();

    for fragment in fragments {
        driver.push(fragment);
        let outcome = driver.poll(&mut frames);
        print_frames(out, &outcome.start_positions, &mut frames)?;
    }
    let starts = driver.flush(&mut frames);
    print_frames(out, &starts, &mut frames)?;

    let stats = driver.stats();
    writeln!(out, "# {stats} pending_bytes={}", driver.pending_bytes())
}

fn print_frames<F: TimestampedFrame + Display>(
    out: &mut impl Write,
    starts: &[FragmentPosition],
    frames: &mut VecDeque<F>,
) -> io::Result<()> {
    for (position, frame) in starts.iter().zip(frames.drain(..)) {
        writeln!(out, "{} {position} {frame}", frame.timestamp_ns())?;
    }
    Ok(())
}

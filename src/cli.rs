//! Command line interface for the `framesync` replay binary.
//!
//! Shared with `build.rs`, which renders the manual page from it, so this
//! module must not depend on the library crate.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Parser, ValueEnum};

/// Frame grammar used to decode the capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    /// Four-byte big-endian length prefix followed by the payload.
    LengthDelimited,
    /// UTF-8 text lines terminated by CRLF.
    Line,
}

/// Traffic direction the capture was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Client to server.
    Request,
    /// Server to client.
    Response,
}

/// Capture file layout, shown in long help and the manual page.
pub const CAPTURE_FORMAT: &str = "\
CAPTURE FORMAT:
    One fragment per line: <timestamp_ns> <hex payload>. The payload may be
    omitted for a read that returned no bytes. Blank lines and lines starting
    with '#' are ignored.

OUTPUT:
    One line per frame, <timestamp_ns> <fragment>:<offset> <frame>, where
    <fragment> counts capture lines holding fragments from zero. A final
    '#' line summarises the replay.";

/// Command line arguments for the `framesync` binary.
#[derive(Debug, Parser)]
#[command(
    name = "framesync",
    version,
    about = "Reassemble protocol frames from captured socket fragments",
    after_long_help = CAPTURE_FORMAT
)]
pub struct Cli {
    /// Capture file holding one `<timestamp_ns> <hex payload>` fragment per
    /// line.
    pub capture: PathBuf,

    /// Frame grammar of the captured traffic.
    #[arg(short, long, value_enum, default_value_t = Protocol::LengthDelimited)]
    pub protocol: Protocol,

    /// Direction of the captured traffic.
    #[arg(short, long, value_enum, default_value_t = Direction::Request)]
    pub direction: Direction,

    /// Largest frame (or line) accepted by the decoder, in bytes.
    #[arg(long)]
    pub max_frame_length: Option<usize>,

    /// Largest unconsumed tail carried between parse cycles, in bytes.
    #[arg(long)]
    pub max_pending_bytes: Option<NonZeroUsize>,

    /// Keep parsing at the current alignment after invalid input instead of
    /// searching for the next frame boundary.
    #[arg(long)]
    pub no_resync: bool,
}

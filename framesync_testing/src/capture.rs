//! Rendering fragments in the capture file format.

use std::{fmt::Write as _, io, path::Path};

use framesync::Fragment;

/// Render `fragments` as capture text, one `<timestamp_ns> <hex>` per line.
#[must_use]
pub fn capture_text(fragments: &[Fragment]) -> String {
    let mut text = String::new();
    for fragment in fragments {
        let _ = writeln!(
            text,
            "{} {}",
            fragment.timestamp_ns(),
            hex::encode(fragment.payload())
        );
    }
    text
}

/// Write `fragments` to `path` in the capture file format.
///
/// # Errors
///
/// Returns any I/O error raised while writing the file.
pub fn write_capture(path: impl AsRef<Path>, fragments: &[Fragment]) -> io::Result<()> {
    std::fs::write(path, capture_text(fragments))
}

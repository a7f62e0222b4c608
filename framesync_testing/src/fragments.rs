//! Cutting byte streams into captured fragments.

use framesync::Fragment;

/// Split `wire` at the given offsets into fragments.
///
/// `cuts` must be non-decreasing and within `wire`; repeated cuts produce
/// empty fragments, as a zero-byte `read` would. Fragment `i` is stamped
/// `first_ts + i * step_ns`.
///
/// # Panics
///
/// Panics if the cuts are out of order or beyond `wire`.
#[must_use]
pub fn split_at(wire: &[u8], cuts: &[usize], first_ts: u64, step_ns: u64) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    let mut ts = first_ts;
    for &cut in cuts.iter().chain(std::iter::once(&wire.len())) {
        assert!(start <= cut && cut <= wire.len(), "cut {cut} out of order or range");
        fragments.push(Fragment::new(wire[start..cut].to_vec(), ts));
        start = cut;
        ts += step_ns;
    }
    fragments
}

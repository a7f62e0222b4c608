//! Recovering the unconsumed tail of a parse cycle.
//!
//! The assembler drops every accumulated fragment when it parses. Callers
//! that want unconsumed bytes reconsidered keep their own clones and use
//! [`remainder`] to cut them down to what the parser did not consume.

use super::{Fragment, FragmentPosition};

/// Return the fragments at or after `end`, with the first one sliced to start
/// at `end.offset`.
///
/// Slicing shares the underlying buffers. Each surviving fragment keeps its
/// original capture timestamp. Fragments left empty by slicing are dropped;
/// an `end` at or past the last fragment yields an empty tail.
///
/// # Examples
///
/// ```
/// use framesync::fragment::{Fragment, FragmentPosition, remainder};
///
/// let fragments = vec![Fragment::new(&b"abcd"[..], 10), Fragment::new(&b"efgh"[..], 20)];
/// let tail = remainder(&fragments, FragmentPosition::new(0, 3));
/// assert_eq!(tail.len(), 2);
/// assert_eq!(tail[0].payload().as_ref(), b"d");
/// assert_eq!(tail[0].timestamp_ns(), 10);
/// ```
#[must_use]
pub fn remainder(fragments: &[Fragment], end: FragmentPosition) -> Vec<Fragment> {
    let Some(tail) = fragments.get(end.index.get()..) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(tail.len());
    let mut iter = tail.iter();
    if let Some(first) = iter.next() {
        let offset = end.offset.min(first.len());
        let sliced = first.payload().slice(offset..);
        if !sliced.is_empty() {
            out.push(Fragment::new(sliced, first.timestamp_ns()));
        }
    }
    out.extend(iter.filter(|fragment| !fragment.is_empty()).cloned());
    out
}

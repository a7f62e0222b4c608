//! The owned unit of captured traffic.

use bytes::Bytes;

/// One captured syscall payload together with its capture timestamp.
///
/// The payload is held as [`Bytes`] so the capture layer can hand over its
/// buffers without copying and callers can keep a cheap clone of anything
/// they may need to re-append later.
///
/// # Examples
///
/// ```
/// use framesync::fragment::Fragment;
///
/// let fragment = Fragment::new(&b"PING\r\n"[..], 1_000);
/// assert_eq!(fragment.len(), 6);
/// assert_eq!(fragment.timestamp_ns(), 1_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    payload: Bytes,
    timestamp_ns: u64,
}

impl Fragment {
    /// Construct a fragment from its payload and monotonic capture time.
    #[must_use]
    pub fn new(payload: impl Into<Bytes>, timestamp_ns: u64) -> Self {
        Self {
            payload: payload.into(),
            timestamp_ns,
        }
    }

    /// Borrow the captured bytes.
    #[must_use]
    pub fn payload(&self) -> &Bytes { &self.payload }

    /// Monotonic capture time in nanoseconds.
    #[must_use]
    pub const fn timestamp_ns(&self) -> u64 { self.timestamp_ns }

    /// Number of captured bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.payload.len() }

    /// Whether the syscall carried no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.payload.is_empty() }

    /// Consume the fragment, returning the owned payload.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }
}

impl AsRef<[u8]> for Fragment {
    fn as_ref(&self) -> &[u8] { self.payload.as_ref() }
}

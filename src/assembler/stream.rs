//! The fragments accumulated between two parse cycles.

use bytes::{Bytes, BytesMut};

use crate::fragment::Fragment;

/// Ordered fragments plus their cached total length.
#[derive(Debug, Default)]
pub(super) struct AccumulatedStream {
    fragments: Vec<Fragment>,
    len: usize,
}

impl AccumulatedStream {
    pub(super) fn with_capacity(fragments: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(fragments),
            len: 0,
        }
    }

    pub(super) fn push(&mut self, fragment: Fragment) {
        self.len += fragment.len();
        self.fragments.push(fragment);
    }

    pub(super) fn len(&self) -> usize { self.len }

    pub(super) fn fragments(&self) -> &[Fragment] { &self.fragments }

    /// Present the fragments as one contiguous buffer.
    ///
    /// A lone fragment is shared as-is; otherwise the payloads are copied
    /// once into a buffer sized from the cached length.
    pub(super) fn contiguous(&self) -> Bytes {
        if let [only] = self.fragments.as_slice() {
            return only.payload().clone();
        }
        let mut buf = BytesMut::with_capacity(self.len);
        for fragment in &self.fragments {
            buf.extend_from_slice(fragment.payload());
        }
        buf.freeze()
    }

    /// Drop every fragment, keeping the allocation for the next cycle.
    pub(super) fn clear(&mut self) {
        self.fragments.clear();
        self.len = 0;
    }
}

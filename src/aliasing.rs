//! Resolving where an engine may write its intermediate results.
//!
//! Callers describe their buffers with [`Buffers`]: either one slice transformed in place, or a
//! distinct source and destination. Because the two variants are the only way to hand buffers to
//! an engine, a partially overlapping source and destination cannot be expressed.
//!
//! Engines never check aliasing themselves. They ask [`Workspace::resolve`] for a working buffer
//! that is guaranteed not to alias the data they are still reading:
//! * out of place, the destination is the working buffer and no final copy is needed;
//! * in place, the caller's scratch is the working buffer and the result is copied back last.

/// The caller's view of source and destination for one transform.
#[derive(Debug)]
pub enum Buffers<'a, T> {
    /// Source and destination are the same storage.
    InPlace(&'a mut [T]),
    /// Distinct storage. `dst` may be longer than `src`; only the first `src.len()` elements are
    /// written.
    OutOfPlace { src: &'a [T], dst: &'a mut [T] },
}

impl<'a, T> Buffers<'a, T> {
    /// The transform length, which is always the source length.
    pub fn len(&self) -> usize {
        match self {
            Buffers::InPlace(buf) => buf.len(),
            Buffers::OutOfPlace { src, .. } => src.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dst_len(&self) -> usize {
        match self {
            Buffers::InPlace(buf) => buf.len(),
            Buffers::OutOfPlace { dst, .. } => dst.len(),
        }
    }

    pub fn is_in_place(&self) -> bool {
        matches!(self, Buffers::InPlace(_))
    }

    /// Reborrows for a nested call without giving up the original borrow.
    pub fn reborrow(&mut self) -> Buffers<'_, T> {
        match self {
            Buffers::InPlace(buf) => Buffers::InPlace(&mut **buf),
            Buffers::OutOfPlace { src, dst } => Buffers::OutOfPlace {
                src: *src,
                dst: &mut **dst,
            },
        }
    }
}

/// Working storage resolved from [`Buffers`] and a scratch slice, all trimmed to `n`.
pub(crate) enum Workspace<'a, T> {
    /// Source, destination and scratch are pairwise distinct; the destination is free to use.
    Direct {
        src: &'a [T],
        dst: &'a mut [T],
        scratch: &'a mut [T],
    },
    /// The destination is the source; intermediate writes go through scratch.
    Staged { buf: &'a mut [T], scratch: &'a mut [T] },
}

impl<'a, T: Copy> Workspace<'a, T> {
    /// Returns `None` if the destination or scratch is shorter than the source.
    pub(crate) fn resolve(buffers: Buffers<'a, T>, scratch: &'a mut [T]) -> Option<Self> {
        let n = buffers.len();
        if buffers.dst_len() < n || scratch.len() < n {
            return None;
        }
        let scratch = &mut scratch[..n];
        Some(match buffers {
            Buffers::InPlace(buf) => Workspace::Staged { buf, scratch },
            Buffers::OutOfPlace { src, dst } => Workspace::Direct {
                src,
                dst: &mut dst[..n],
                scratch,
            },
        })
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Workspace::Direct { src, .. } => src.len(),
            Workspace::Staged { buf, .. } => buf.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_staged(&self) -> bool {
        matches!(self, Workspace::Staged { .. })
    }

    /// Runs `body(source, work)` where `work` never aliases `source`, then lands the result in
    /// the destination.
    pub(crate) fn run<R>(self, body: impl FnOnce(&[T], &mut [T]) -> R) -> R {
        match self {
            Workspace::Direct { src, dst, .. } => body(src, dst),
            Workspace::Staged { buf, scratch } => {
                let result = body(&*buf, &mut *scratch);
                buf.copy_from_slice(scratch);
                result
            }
        }
    }

    /// Reads the whole source through `fill` into scratch, after which the destination and scratch
    /// are both free. `body(dst, scratch)` must leave the result in `dst`.
    pub(crate) fn gather<R>(
        self,
        fill: impl FnOnce(&[T], &mut [T]),
        body: impl FnOnce(&mut [T], &mut [T]) -> R,
    ) -> R {
        match self {
            Workspace::Direct { src, dst, scratch } => {
                fill(src, &mut *scratch);
                body(dst, scratch)
            }
            Workspace::Staged { buf, scratch } => {
                fill(&*buf, &mut *scratch);
                body(buf, scratch)
            }
        }
    }
}

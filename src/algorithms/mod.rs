//! Transform engines.
//!
//! Every engine exposes a forward/inverse pair with the codelet signature
//! `(buffers, twiddles, scratch, bitrev) -> bool`. A `false` return means a buffer was too short
//! or the length does not fit the engine's shape; nothing has been written in that case. Inverse
//! engines scale by `1/N`.
use num_complex::Complex;

use crate::aliasing::{Buffers, Workspace};
use crate::kernels::common::scale_by_len;
use crate::precision::FftFloat;

pub mod bit_reversal;
pub mod composite;
pub mod dit;
pub mod mixed_radix;
pub mod six_step;
pub mod stockham;

/// Entry checks shared by every table-driven engine.
///
/// `Err(done)` means the engine must return `done` immediately: `true` for an empty or 1-point
/// transform (the single value has already been copied through), `false` for a short buffer.
/// Engines apply their own shape checks only after this, so every engine accepts N = 1.
pub(crate) fn prepare<'a, T: FftFloat>(
    buffers: Buffers<'a, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &'a mut [Complex<T>],
    bitrev: &[usize],
) -> Result<Workspace<'a, Complex<T>>, bool> {
    let n = buffers.len();
    if n == 0 {
        return Err(true);
    }
    if twiddles.len() < n || bitrev.len() < n {
        return Err(false);
    }
    let workspace = Workspace::resolve(buffers, scratch).ok_or(false)?;
    if n == 1 {
        workspace.run(|src, work| work[0] = src[bitrev[0]]);
        return Err(true);
    }
    Ok(workspace)
}

/// Runs a butterfly-only kernel on data that is already in the kernel's permuted order.
///
/// In place, `stages` works on the caller's buffer directly. Out of place, the source is copied
/// to the destination first.
pub(crate) fn core_codelet<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    inverse: bool,
    fits: fn(usize) -> bool,
    stages: impl FnOnce(&mut [Complex<T>]),
) -> bool {
    let n = buffers.len();
    if n == 0 {
        return true;
    }
    if buffers.dst_len() < n || twiddles.len() < n || scratch.len() < n || !fits(n) {
        return false;
    }
    let data = match buffers {
        Buffers::InPlace(buf) => buf,
        Buffers::OutOfPlace { src, dst } => {
            let dst = &mut dst[..n];
            dst.copy_from_slice(src);
            dst
        }
    };
    stages(&mut *data);
    if inverse {
        scale_by_len(data);
    }
    true
}

pub(crate) fn is_power_of_four(n: usize) -> bool {
    n.is_power_of_two() && n.trailing_zeros() % 2 == 0
}

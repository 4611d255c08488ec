//! Hard-coded transforms for N = 2, 4 and 8.
//!
//! These codelets self-permute: they read their input in natural order and ignore the
//! bit-reversal argument, so they are registered without a table builder.
use num_complex::Complex;

use crate::aliasing::{Buffers, Workspace};
use crate::kernels::common::{butterfly2, butterfly4, butterfly8, scale_by_len};
use crate::precision::FftFloat;

#[inline(always)]
fn unrolled<T: FftFloat, const N: usize>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    inverse: bool,
    butterfly: fn(&mut [Complex<T>; N], bool),
) -> bool {
    let n = buffers.len();
    if n == 0 {
        return true;
    }
    if twiddles.len() < n {
        return false;
    }
    let Some(workspace) = Workspace::resolve(buffers, scratch) else {
        return false;
    };
    if n == 1 {
        workspace.run(|src, work| work[0] = src[0]);
        return true;
    }
    if n != N {
        return false;
    }

    workspace.run(|src, work| {
        let mut v = [Complex::<T>::default(); N];
        v.copy_from_slice(&src[..N]);
        butterfly(&mut v, inverse);
        work[..N].copy_from_slice(&v);
        if inverse {
            scale_by_len(work);
        }
    });
    true
}

macro_rules! unrolled_codelets {
    ($($forward:ident, $inverse:ident => $size:literal, $butterfly:ident;)+) => {
        $(
            #[doc = concat!("Size-", stringify!($size), " forward transform.")]
            pub fn $forward<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                _bitrev: &[usize],
            ) -> bool {
                unrolled::<T, $size>(buffers, twiddles, scratch, false, $butterfly)
            }

            #[doc = concat!("Size-", stringify!($size), " inverse transform, scaled by 1/", stringify!($size), ".")]
            pub fn $inverse<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                _bitrev: &[usize],
            ) -> bool {
                unrolled::<T, $size>(buffers, twiddles, scratch, true, $butterfly)
            }
        )+
    };
}

unrolled_codelets! {
    fft2_forward, fft2_inverse => 2, butterfly2;
    fft4_forward, fft4_inverse => 4, butterfly4;
    fft8_forward, fft8_inverse => 8, butterfly8;
}

//! A codelet-registry FFT engine.
//!
//! Transforms are carried out by *codelets*: concrete implementations registered per size with an
//! instruction-set level, a priority and the bit-reversal scheme they read. A [`Planner`] picks
//! the best codelet the running CPU supports, precomputes its twiddle and permutation tables into
//! a shareable [`Plan`], and caches the result.
//!
//! The free functions below plan through the process-wide planner of each precision:
//!
//! ```
//! use fftforge::fft_forward;
//! use num_complex::Complex;
//!
//! let mut signal = vec![Complex::new(1.0f64, 0.0); 384];
//! fft_forward(&mut signal).unwrap();
//! assert!((signal[0].re - 384.0).abs() < 1e-9);
//! ```
//!
//! Forward transforms are unscaled; inverse transforms scale by `1/N`.
use num_complex::Complex;

pub mod aliasing;
pub mod algorithms;
pub mod bencher;
pub mod cpu;
pub mod error;
pub mod kernels;
pub mod options;
pub mod planner;
pub mod precision;
pub mod registry;
pub mod twiddles;
pub mod wisdom;

pub use crate::aliasing::Buffers;
pub use crate::algorithms::bit_reversal::BitRevScheme;
pub use crate::cpu::{detect_simd_levels, SimdLevel, SimdLevelSet};
pub use crate::error::{FftError, FftResult};
pub use crate::options::{PlanOptions, PlannerMode, Strategy};
pub use crate::planner::{Direction, Plan, Planner};
pub use crate::precision::{FftFloat, Precision};
pub use crate::registry::{Algorithm, CodeletEntry, CodeletFn, KernelKind, Registry, Resolution};
pub use crate::wisdom::Wisdom;

fn transform_in_place<T: FftFloat>(
    data: &mut [Complex<T>],
    direction: Direction,
) -> FftResult<()> {
    if data.is_empty() {
        return Ok(());
    }
    let plan = T::planner().plan(data.len())?;
    let mut scratch = plan.make_scratch();
    plan.process(direction, Buffers::InPlace(data), &mut scratch)
}

fn transform_split<T: FftFloat>(
    reals: &mut [T],
    imags: &mut [T],
    direction: Direction,
) -> FftResult<()> {
    if reals.len() != imags.len() {
        return Err(FftError::LengthMismatch {
            reals: reals.len(),
            imags: imags.len(),
        });
    }
    let mut data: Vec<Complex<T>> = reals
        .iter()
        .zip(imags.iter())
        .map(|(&re, &im)| Complex::new(re, im))
        .collect();
    transform_in_place(&mut data, direction)?;
    for ((re, im), z) in reals.iter_mut().zip(imags.iter_mut()).zip(&data) {
        *re = z.re;
        *im = z.im;
    }
    Ok(())
}

fn transform_interleaved<T: FftFloat>(data: &mut [T], direction: Direction) -> FftResult<()> {
    let len = data.len();
    let complex: &mut [Complex<T>] =
        bytemuck::try_cast_slice_mut(data).map_err(|_| FftError::LengthMismatch {
            reals: len.div_ceil(2),
            imags: len / 2,
        })?;
    transform_in_place(complex, direction)
}

/// Forward FFT of `data` in place, planned through the global planner for `T`.
///
/// Any non-zero 2/3/5-smooth length up to `2^24` is accepted; an empty slice is left as is.
pub fn fft_forward<T: FftFloat>(data: &mut [Complex<T>]) -> FftResult<()> {
    transform_in_place(data, Direction::Forward)
}

/// Inverse FFT of `data` in place, scaled by `1/N`.
pub fn fft_inverse<T: FftFloat>(data: &mut [Complex<T>]) -> FftResult<()> {
    transform_in_place(data, Direction::Reverse)
}

/// Forward FFT of a signal stored as separate real and imaginary parts.
///
/// Fails with [`FftError::LengthMismatch`] if `reals.len() != imags.len()`.
pub fn fft_forward_split<T: FftFloat>(reals: &mut [T], imags: &mut [T]) -> FftResult<()> {
    transform_split(reals, imags, Direction::Forward)
}

pub fn fft_inverse_split<T: FftFloat>(reals: &mut [T], imags: &mut [T]) -> FftResult<()> {
    transform_split(reals, imags, Direction::Reverse)
}

/// Forward FFT of `[re0, im0, re1, im1, ...]` in place.
pub fn fft_forward_interleaved<T: FftFloat>(data: &mut [T]) -> FftResult<()> {
    transform_interleaved(data, Direction::Forward)
}

pub fn fft_inverse_interleaved<T: FftFloat>(data: &mut [T]) -> FftResult<()> {
    transform_interleaved(data, Direction::Reverse)
}

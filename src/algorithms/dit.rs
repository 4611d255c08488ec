//! Decimation-in-Time (DIT) FFT Implementation
//!
//! The generic radix-2 engine, valid for every power-of-two length and independent of the
//! registry. It is the fallback the registry installs for each power-of-two size.
//!
//! ## Algorithm Overview
//!
//! 1. Copy `src[bitrev[i]]` into working position `i` (binary reversal table)
//! 2. For block sizes `s = 2, 4, ..., N`, pair element `j` with `j + s/2` in every block, rotate
//!    the second by `W_N^{j·N/s}` and replace the pair with `(a + t, a - t)`
//! 3. Scale by `1/N` for the inverse
//!
//! ## Memory Access Pattern
//!
//! Stages whose blocks fit in [`L1_BLOCK_SIZE`] run block by block, so the early stages of one
//! block complete before the next block is touched. Wider stages then sweep the whole array.
use num_complex::Complex;

use crate::aliasing::Buffers;
use crate::algorithms::prepare;
use crate::kernels::common::{permute, scale_by_len};
use crate::precision::FftFloat;
use crate::twiddles::twiddle_at;

/// Block size in complex elements below which stages are run block by block.
const L1_BLOCK_SIZE: usize = 1024;

fn dit<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
    inverse: bool,
) -> bool {
    let workspace = match prepare(buffers, twiddles, scratch, bitrev) {
        Ok(workspace) => workspace,
        Err(done) => return done,
    };
    if !workspace.len().is_power_of_two() {
        return false;
    }

    workspace.run(|src, work| {
        permute(src, work, bitrev);
        radix2_stages(work, twiddles, 1, inverse);
        if inverse {
            scale_by_len(work);
        }
    });
    true
}

/// Forward transform for any power-of-two length; `bitrev` must be the binary reversal table.
pub fn dit_forward<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    dit(buffers, twiddles, scratch, bitrev, false)
}

/// Inverse transform for any power-of-two length, scaled by `1/N`.
pub fn dit_inverse<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    dit(buffers, twiddles, scratch, bitrev, true)
}

/// The no-scale radix-2 row engine.
///
/// Runs every radix-2 stage over `data` (binary-reversed in, natural out). `twiddles` belongs to
/// a transform `stride` times longer than `data`. The inverse direction conjugates twiddles and
/// never scales, so row transforms inside larger decompositions can defer scaling to the end.
#[inline(always)]
pub fn radix2_stages<T: FftFloat>(
    data: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    stride: usize,
    inverse: bool,
) {
    let n = data.len();
    if n < 2 {
        return;
    }
    let block = n.min(L1_BLOCK_SIZE);

    for chunk in data.chunks_exact_mut(block) {
        let mut size = 2;
        while size <= block {
            radix2_stage(chunk, size, (n / size) * stride, twiddles, inverse);
            size <<= 1;
        }
    }

    let mut size = block << 1;
    while size <= n {
        radix2_stage(data, size, (n / size) * stride, twiddles, inverse);
        size <<= 1;
    }
}

#[inline(always)]
fn radix2_stage<T: FftFloat>(
    data: &mut [Complex<T>],
    size: usize,
    step: usize,
    twiddles: &[Complex<T>],
    inverse: bool,
) {
    let half = size >> 1;
    for block in data.chunks_exact_mut(size) {
        let (lo, hi) = block.split_at_mut(half);
        for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
            let t = *b * twiddle_at(twiddles, j * step, inverse);
            let x = *a;
            *a = x + t;
            *b = x - t;
        }
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_complex_closeness, gen_random_complex, naive_dft};

    use super::*;
    use crate::algorithms::bit_reversal::radix2_indices;
    use crate::twiddles::generate_twiddles;

    macro_rules! test_dit_matches_dft {
        ($test_name:ident, $precision:ty, $epsilon:literal) => {
            #[test]
            fn $test_name() {
                for log_n in 0..=12 {
                    let n = 1 << log_n;
                    let twiddles = generate_twiddles::<$precision>(n);
                    let bitrev = radix2_indices(n).unwrap();
                    let input = gen_random_complex::<$precision>(n);
                    let mut dst = vec![Complex::default(); n];
                    let mut scratch = vec![Complex::default(); n];

                    assert!(dit_forward(
                        Buffers::OutOfPlace {
                            src: &input,
                            dst: &mut dst
                        },
                        &twiddles,
                        &mut scratch,
                        &bitrev,
                    ));
                    let tolerance = $epsilon * (n as $precision).max(1.0);
                    assert_complex_closeness(&dst, &naive_dft(&input, false), tolerance);

                    assert!(dit_inverse(Buffers::InPlace(&mut dst), &twiddles, &mut scratch, &bitrev));
                    assert_complex_closeness(&dst, &input, tolerance);
                }
            }
        };
    }

    test_dit_matches_dft!(dit_matches_dft_64, f64, 1e-12);
    test_dit_matches_dft!(dit_matches_dft_32, f32, 1e-5);

    #[test]
    fn blocked_and_unblocked_stages_agree() {
        let n = 4 * L1_BLOCK_SIZE;
        let twiddles = generate_twiddles::<f64>(n);
        let bitrev = radix2_indices(n).unwrap();
        let input = gen_random_complex::<f64>(n);
        let mut blocked = vec![Complex::default(); n];
        permute(&input, &mut blocked, &bitrev);
        let mut plain = blocked.clone();

        radix2_stages(&mut blocked, &twiddles, 1, false);
        let mut size = 2;
        while size <= n {
            radix2_stage(&mut plain, size, n / size, &twiddles, false);
            size <<= 1;
        }
        assert_complex_closeness(&blocked, &plain, 1e-12);
    }

    #[test]
    fn size_one_copies_through() {
        let src = [Complex::new(3.0f64, -1.0)];
        let mut dst = [Complex::default(); 1];
        let mut scratch = [Complex::default(); 1];
        let twiddles = generate_twiddles::<f64>(1);
        assert!(dit_inverse(
            Buffers::OutOfPlace {
                src: &src,
                dst: &mut dst
            },
            &twiddles,
            &mut scratch,
            &[0],
        ));
        assert_eq!(dst, src);
    }

    #[test]
    fn non_power_of_two_is_a_reported_failure() {
        let mut buf = vec![Complex::<f64>::new(1.0, 0.0); 12];
        let before = buf.clone();
        let mut scratch = vec![Complex::default(); 12];
        let twiddles = generate_twiddles::<f64>(12);
        let bitrev: Vec<usize> = (0..12).collect();
        assert!(!dit_forward(Buffers::InPlace(&mut buf), &twiddles, &mut scratch, &bitrev));
        assert_eq!(buf, before);
    }

    #[test]
    fn empty_transform_succeeds() {
        assert!(dit_forward::<f32>(Buffers::InPlace(&mut []), &[], &mut [], &[]));
    }

    #[test]
    fn short_buffers_fail_before_writing() {
        let src = vec![Complex::<f64>::new(1.0, 0.0); 16];
        let mut dst = vec![Complex::default(); 16];
        let twiddles = generate_twiddles::<f64>(16);
        let bitrev = radix2_indices(16).unwrap();
        let mut short_scratch = vec![Complex::default(); 8];
        assert!(!dit_forward(
            Buffers::OutOfPlace {
                src: &src,
                dst: &mut dst
            },
            &twiddles,
            &mut short_scratch,
            &bitrev,
        ));
        assert!(dst.iter().all(|z| *z == Complex::default()));
        assert!(!dit_forward(
            Buffers::OutOfPlace {
                src: &src,
                dst: &mut dst
            },
            &twiddles[..8],
            &mut vec![Complex::default(); 16],
            &bitrev,
        ));
    }
}

//! Stockham autosort radix-2 engine.
//!
//! Each pass reads one buffer and writes the other, reordering as it goes, so no separate
//! bit-reversal pass is needed and the output lands in natural order. The first pass reads the
//! source through an identity table; later passes ping-pong between scratch and the destination.
use num_complex::Complex;

use crate::aliasing::Buffers;
use crate::algorithms::prepare;
use crate::kernels::common::scale_by_len;
use crate::precision::FftFloat;
use crate::twiddles::twiddle_at;

fn stockham<T: FftFloat>(
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
    let n = workspace.len();
    if !n.is_power_of_two() {
        return false;
    }
    workspace.gather(
        |src, scratch| pass(|i| src[bitrev[i]], scratch, n, twiddles, inverse),
        |dst, scratch| {
            let mut in_scratch = true;
            let mut span = n >> 1;
            while span >= 2 {
                if in_scratch {
                    pass(|i| scratch[i], dst, span, twiddles, inverse);
                } else {
                    pass(|i| dst[i], scratch, span, twiddles, inverse);
                }
                in_scratch = !in_scratch;
                span >>= 1;
            }
            if in_scratch {
                dst.copy_from_slice(scratch);
            }
            if inverse {
                scale_by_len(dst);
            }
        },
    );
    true
}

/// One autosort pass over blocks of `span` elements.
#[inline(always)]
fn pass<T: FftFloat>(
    read: impl Fn(usize) -> Complex<T>,
    output: &mut [Complex<T>],
    span: usize,
    twiddles: &[Complex<T>],
    inverse: bool,
) {
    let n = output.len();
    let half = span >> 1;
    let half_n = n >> 1;
    let step = n / span;

    for k in 0..step {
        let base = k * span;
        let out_base = k * half;
        for j in 0..half {
            let a = read(base + j);
            let b = read(base + j + half);
            output[out_base + j] = a + b;
            output[out_base + half_n + j] = (a - b) * twiddle_at(twiddles, j * step, inverse);
        }
    }
}

/// Forward transform for any power-of-two length; `bitrev` is the identity table.
pub fn stockham_forward<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    stockham(buffers, twiddles, scratch, bitrev, false)
}

pub fn stockham_inverse<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    stockham(buffers, twiddles, scratch, bitrev, true)
}

#[cfg(test)]
mod tests {
    use utilities::{assert_complex_closeness, gen_random_complex, naive_dft};

    use super::*;
    use crate::algorithms::bit_reversal::identity_indices;
    use crate::twiddles::generate_twiddles;

    macro_rules! test_stockham {
        ($test_name:ident, $precision:ty, $epsilon:literal) => {
            #[test]
            fn $test_name() {
                for log_n in 0..=11 {
                    let n = 1 << log_n;
                    let twiddles = generate_twiddles::<$precision>(n);
                    let table = identity_indices(n);
                    let input = gen_random_complex::<$precision>(n);
                    let mut buf = input.clone();
                    let mut scratch = vec![Complex::default(); n];

                    assert!(stockham_forward(Buffers::InPlace(&mut buf), &twiddles, &mut scratch, &table));
                    let tolerance = $epsilon * (n as $precision).max(1.0);
                    assert_complex_closeness(&buf, &naive_dft(&input, false), tolerance);

                    let mut back = vec![Complex::default(); n];
                    assert!(stockham_inverse(
                        Buffers::OutOfPlace {
                            src: &buf,
                            dst: &mut back
                        },
                        &twiddles,
                        &mut scratch,
                        &table,
                    ));
                    assert_complex_closeness(&back, &input, tolerance);
                }
            }
        };
    }

    test_stockham!(stockham_matches_dft_64, f64, 1e-12);
    test_stockham!(stockham_matches_dft_32, f32, 1e-5);

    #[test]
    fn reads_through_the_table() {
        let n = 16;
        let twiddles = generate_twiddles::<f64>(n);
        let input = gen_random_complex::<f64>(n);
        let mut reversed: Vec<usize> = (0..n).collect();
        reversed.reverse();
        let mut scratch = vec![Complex::default(); n];

        let mut natural = vec![Complex::default(); n];
        let mut permuted = vec![Complex::default(); n];
        assert!(stockham_forward(
            Buffers::OutOfPlace {
                src: &input,
                dst: &mut natural
            },
            &twiddles,
            &mut scratch,
            &identity_indices(n),
        ));
        assert!(stockham_forward(
            Buffers::OutOfPlace {
                src: &input,
                dst: &mut permuted
            },
            &twiddles,
            &mut scratch,
            &reversed,
        ));
        assert_ne!(natural, permuted);
    }
}

//! The stage loop every schedule-driven engine shares.
//!
//! A stage of radix `r` at span `s = r·m` visits each block of `s` elements, gathers the `m`
//! columns `block[k + i·m]`, rotates column element `i` by `W_s^{i·k}` and applies the radix's
//! small DFT. Data must already sit in the schedule's digit-reversed order; the result comes out
//! in natural order. Stages never scale.
use num_complex::Complex;

use crate::kernels::common::{butterfly2, butterfly3, butterfly4, butterfly5, butterfly8};
use crate::precision::FftFloat;
use crate::twiddles::twiddle_at;

/// `twiddles` is a table for some size `N` with `N = data.len() * stride`, so a transform of
/// `data.len()` points reads every `stride`-th twiddle.
#[inline(always)]
pub(crate) fn run_stages<T: FftFloat>(
    data: &mut [Complex<T>],
    schedule: &[usize],
    twiddles: &[Complex<T>],
    stride: usize,
    inverse: bool,
) {
    let n = data.len();
    let mut m = 1;
    for &radix in schedule {
        let span = radix * m;
        let step = (n / span) * stride;
        match radix {
            2 => radix_stage::<T, 2>(data, m, step, twiddles, inverse, butterfly2),
            3 => radix_stage::<T, 3>(data, m, step, twiddles, inverse, butterfly3),
            4 => radix_stage::<T, 4>(data, m, step, twiddles, inverse, butterfly4),
            5 => radix_stage::<T, 5>(data, m, step, twiddles, inverse, butterfly5),
            8 => radix_stage::<T, 8>(data, m, step, twiddles, inverse, butterfly8),
            _ => unreachable!("no butterfly for radix {radix}"),
        }
        m = span;
    }
}

#[inline(always)]
fn radix_stage<T: FftFloat, const R: usize>(
    data: &mut [Complex<T>],
    m: usize,
    step: usize,
    twiddles: &[Complex<T>],
    inverse: bool,
    butterfly: fn(&mut [Complex<T>; R], bool),
) {
    let mut v = [Complex::<T>::default(); R];
    for block in data.chunks_exact_mut(R * m) {
        for k in 0..m {
            for (i, slot) in v.iter_mut().enumerate() {
                *slot = block[k + i * m];
            }
            if k != 0 {
                for (i, slot) in v.iter_mut().enumerate().skip(1) {
                    *slot = *slot * twiddle_at(twiddles, i * k * step, inverse);
                }
            }
            butterfly(&mut v, inverse);
            for (i, value) in v.iter().enumerate() {
                block[k + i * m] = *value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_complex_closeness, gen_random_complex, naive_dft};

    use super::*;
    use crate::algorithms::bit_reversal::{digit_reversal, radix_schedule, BitRevScheme};
    use crate::kernels::common::permute;
    use crate::twiddles::generate_twiddles;

    fn stages_match_dft(n: usize, scheme: BitRevScheme) {
        let schedule = radix_schedule(n, scheme).unwrap();
        let table = digit_reversal(n, &schedule);
        let twiddles = generate_twiddles::<f64>(n);
        let input = gen_random_complex::<f64>(n);

        for inverse in [false, true] {
            let mut work = vec![Complex::default(); n];
            permute(&input, &mut work, &table);
            run_stages(&mut work, &schedule, &twiddles, 1, inverse);
            assert_complex_closeness(&work, &naive_dft(&input, inverse), 1e-9);
        }
    }

    #[test]
    fn every_scheme_produces_the_dft() {
        stages_match_dft(64, BitRevScheme::Radix2);
        stages_match_dft(256, BitRevScheme::Radix4);
        stages_match_dft(512, BitRevScheme::Radix8);
        stages_match_dft(128, BitRevScheme::Mixed24);
        stages_match_dft(81, BitRevScheme::Radix3);
        stages_match_dft(125, BitRevScheme::Radix5);
        stages_match_dft(360, BitRevScheme::Smooth);
    }

    #[test]
    fn strided_twiddles_serve_a_sub_transform() {
        let big = generate_twiddles::<f64>(1024);
        let schedule = radix_schedule(32, BitRevScheme::Smooth).unwrap();
        let table = digit_reversal(32, &schedule);
        let input = gen_random_complex::<f64>(32);

        let mut work = vec![Complex::default(); 32];
        permute(&input, &mut work, &table);
        run_stages(&mut work, &schedule, &big, 1024 / 32, false);
        assert_complex_closeness(&work, &naive_dft(&input, false), 1e-9);
    }
}

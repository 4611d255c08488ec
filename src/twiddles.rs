use std::f64::consts::PI;

use num_complex::Complex;

use crate::precision::FftFloat;

/// Builds the size-`n` table `W_n^k = exp(-2πik/n)` for `k` in `[0, n)`.
///
/// Angles are evaluated in `f64` and narrowed afterwards, so the single-precision table carries no
/// accumulated error. The quarter-turn points are written exactly.
pub fn generate_twiddles<T: FftFloat>(n: usize) -> Vec<Complex<T>> {
    let mut twiddles = Vec::with_capacity(n);
    let angle = -2.0 * PI / n as f64;

    for k in 0..n {
        let w = match (4 * k).checked_rem(n) {
            Some(0) => exact_quarter_turn(4 * k / n),
            _ => {
                let (sin, cos) = (angle * k as f64).sin_cos();
                Complex::new(T::cast(cos), T::cast(sin))
            }
        };
        twiddles.push(w);
    }

    twiddles
}

fn exact_quarter_turn<T: FftFloat>(quarter: usize) -> Complex<T> {
    match quarter % 4 {
        0 => Complex::new(T::one(), T::zero()),
        1 => Complex::new(T::zero(), -T::one()),
        2 => Complex::new(-T::one(), T::zero()),
        _ => Complex::new(T::zero(), T::one()),
    }
}

/// Reads `W^index` from a table, conjugated for the inverse direction.
#[inline(always)]
pub(crate) fn twiddle_at<T: FftFloat>(
    twiddles: &[Complex<T>],
    index: usize,
    inverse: bool,
) -> Complex<T> {
    let w = twiddles[index];
    if inverse {
        w.conj()
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use utilities::assert_float_closeness;

    use super::*;

    #[test]
    fn twiddles_8() {
        let twiddles = generate_twiddles::<f64>(8);
        assert_eq!(twiddles.len(), 8);

        let expected = [
            (1.0, 0.0),
            (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            (0.0, -1.0),
            (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            (-1.0, 0.0),
            (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            (0.0, 1.0),
            (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        ];
        for (w, (re, im)) in twiddles.iter().zip(expected) {
            assert_float_closeness(w.re, re, 1e-15);
            assert_float_closeness(w.im, im, 1e-15);
        }
    }

    #[test]
    fn quarter_turns_are_exact() {
        let twiddles = generate_twiddles::<f32>(1024);
        assert_eq!(twiddles[256], Complex::new(0.0, -1.0));
        assert_eq!(twiddles[512], Complex::new(-1.0, 0.0));
        assert_eq!(twiddles[768], Complex::new(0.0, 1.0));
    }

    #[test]
    fn odd_sizes_lie_on_the_unit_circle() {
        for n in [3, 5, 15, 375] {
            let twiddles = generate_twiddles::<f64>(n);
            for (k, w) in twiddles.iter().enumerate() {
                assert_float_closeness(w.norm(), 1.0, 1e-12);
                let angle = -2.0 * PI * k as f64 / n as f64;
                assert_float_closeness(w.re, angle.cos(), 1e-12);
            }
        }
    }

    #[test]
    fn inverse_lookup_conjugates() {
        let twiddles = generate_twiddles::<f64>(16);
        assert_eq!(twiddle_at(&twiddles, 3, true), twiddles[3].conj());
        assert_eq!(twiddle_at(&twiddles, 3, false), twiddles[3]);
    }
}

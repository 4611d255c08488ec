//! Common FFT Kernels
//!
//! Closed-form small DFTs shared by every engine, plus the permutation and scaling passes that
//! bracket them. Each butterfly transforms an array in natural order in place and is its own
//! inverse up to conjugated constants.
use num_complex::Complex;

use crate::precision::FftFloat;

/// Multiplies by `-i` (forward) or `+i` (inverse).
#[inline(always)]
pub fn rotate_quarter<T: FftFloat>(z: Complex<T>, inverse: bool) -> Complex<T> {
    if inverse {
        Complex::new(-z.im, z.re)
    } else {
        Complex::new(z.im, -z.re)
    }
}

#[inline(always)]
pub fn butterfly2<T: FftFloat>(v: &mut [Complex<T>; 2], _inverse: bool) {
    let a = v[0];
    let b = v[1];
    v[0] = a + b;
    v[1] = a - b;
}

/// Uses the two real constants `-1/2` and `√3/2`.
#[inline(always)]
pub fn butterfly3<T: FftFloat>(v: &mut [Complex<T>; 3], inverse: bool) {
    let half = T::cast(0.5);
    let sin60 = T::cast(0.866_025_403_784_438_6);

    let sum = v[1] + v[2];
    let diff = v[1] - v[2];
    let mid = v[0] - sum.scale(half);
    let rot = rotate_quarter(diff.scale(sin60), inverse);

    v[0] = v[0] + sum;
    v[1] = mid + rot;
    v[2] = mid - rot;
}

#[inline(always)]
pub fn butterfly4<T: FftFloat>(v: &mut [Complex<T>; 4], inverse: bool) {
    let t0 = v[0] + v[2];
    let t1 = v[0] - v[2];
    let t2 = v[1] + v[3];
    let t3 = rotate_quarter(v[1] - v[3], inverse);

    v[0] = t0 + t2;
    v[1] = t1 + t3;
    v[2] = t0 - t2;
    v[3] = t1 - t3;
}

/// Uses `cos` and `sin` of `2π/5` and `4π/5`; outputs `q` and `5 - q` share their real parts.
#[inline(always)]
pub fn butterfly5<T: FftFloat>(v: &mut [Complex<T>; 5], inverse: bool) {
    let c1 = T::cast(0.309_016_994_374_947_45);
    let c2 = T::cast(-0.809_016_994_374_947_5);
    let s1 = T::cast(0.951_056_516_295_153_5);
    let s2 = T::cast(0.587_785_252_292_473_2);

    let x0 = v[0];
    let a1 = v[1] + v[4];
    let b1 = v[1] - v[4];
    let a2 = v[2] + v[3];
    let b2 = v[2] - v[3];

    let m1 = x0 + a1.scale(c1) + a2.scale(c2);
    let m2 = x0 + a1.scale(c2) + a2.scale(c1);
    let n1 = rotate_quarter(b1.scale(s1) + b2.scale(s2), inverse);
    let n2 = rotate_quarter(b1.scale(s2) - b2.scale(s1), inverse);

    v[0] = x0 + a1 + a2;
    v[1] = m1 + n1;
    v[4] = m1 - n1;
    v[2] = m2 + n2;
    v[3] = m2 - n2;
}

/// Two radix-4 halves joined by the `W_8` twiddles.
#[inline(always)]
pub fn butterfly8<T: FftFloat>(v: &mut [Complex<T>; 8], inverse: bool) {
    let frac = T::FRAC_1_SQRT_2();
    let mut even = [v[0], v[2], v[4], v[6]];
    let mut odd = [v[1], v[3], v[5], v[7]];
    butterfly4(&mut even, inverse);
    butterfly4(&mut odd, inverse);

    let sign = if inverse { T::one() } else { -T::one() };
    odd[1] = odd[1] * Complex::new(frac, sign * frac);
    odd[2] = rotate_quarter(odd[2], inverse);
    odd[3] = odd[3] * Complex::new(-frac, sign * frac);

    for q in 0..4 {
        v[q] = even[q] + odd[q];
        v[q + 4] = even[q] - odd[q];
    }
}

/// `work[i] = src[table[i]]`.
#[inline]
pub(crate) fn permute<T: Copy>(src: &[T], work: &mut [T], table: &[usize]) {
    for (slot, &index) in work.iter_mut().zip(table) {
        *slot = src[index];
    }
}

/// Multiplies every element by `1 / data.len()`.
#[inline]
pub(crate) fn scale_by_len<T: FftFloat>(data: &mut [Complex<T>]) {
    if data.len() < 2 {
        return;
    }
    let factor = T::cast((data.len() as f64).recip());
    data.iter_mut().for_each(|z| *z = z.scale(factor));
}

#[cfg(test)]
mod tests {
    use utilities::{assert_complex_closeness, naive_dft};

    use super::*;

    macro_rules! test_butterfly {
        ($name:ident, $butterfly:ident, $radix:literal) => {
            #[test]
            fn $name() {
                let input: [Complex<f64>; $radix] =
                    core::array::from_fn(|i| Complex::new(i as f64 + 0.25, 1.5 - i as f64 * 0.5));

                let mut forward = input;
                $butterfly(&mut forward, false);
                assert_complex_closeness(&forward, &naive_dft(&input, false), 1e-12);

                let mut inverse = input;
                $butterfly(&mut inverse, true);
                assert_complex_closeness(&inverse, &naive_dft(&input, true), 1e-12);
            }
        };
    }

    test_butterfly!(butterfly2_matches_dft, butterfly2, 2);
    test_butterfly!(butterfly3_matches_dft, butterfly3, 3);
    test_butterfly!(butterfly4_matches_dft, butterfly4, 4);
    test_butterfly!(butterfly5_matches_dft, butterfly5, 5);
    test_butterfly!(butterfly8_matches_dft, butterfly8, 8);

    #[test]
    fn rotate_quarter_turns() {
        let z = Complex::new(1.0f32, 2.0);
        assert_eq!(rotate_quarter(z, false), z * Complex::new(0.0, -1.0));
        assert_eq!(rotate_quarter(z, true), z * Complex::new(0.0, 1.0));
    }

    #[test]
    fn permute_reads_through_the_table() {
        let src = [10, 11, 12, 13];
        let mut work = [0; 4];
        permute(&src, &mut work, &[3, 1, 2, 0]);
        assert_eq!(work, [13, 11, 12, 10]);
    }
}

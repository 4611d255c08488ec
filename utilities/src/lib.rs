pub extern crate rustfft;

// export rustfft to fftforge
use rand::{distributions::Uniform, prelude::*};
use rustfft::num_complex::Complex;
use rustfft::num_traits::Float;

/// Asserts that two fp numbers are approximately equal.
///
/// # Panics
///
/// Panics if `actual` and `expected` are too far from each other
#[allow(dead_code)]
#[track_caller]
pub fn assert_float_closeness<T: Float + std::fmt::Display>(actual: T, expected: T, epsilon: T) {
    if (actual - expected).abs() >= epsilon {
        panic!(
            "Assertion failed: {actual} too far from expected value {expected} (with epsilon {epsilon})",
        );
    }
}

/// Asserts that two complex sequences have equal length and agree element-wise.
///
/// # Panics
///
/// Panics on the first element whose real or imaginary part is off by `epsilon` or more
#[track_caller]
pub fn assert_complex_closeness<T: Float + std::fmt::Display>(
    actual: &[Complex<T>],
    expected: &[Complex<T>],
    epsilon: T,
) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if (a.re - e.re).abs() >= epsilon || (a.im - e.im).abs() >= epsilon {
            panic!(
                "Assertion failed at index {i}: {a} too far from expected value {e} (with epsilon {epsilon})",
            );
        }
    }
}

/// The O(N²) DFT, evaluated in `f64`. Neither direction is scaled.
pub fn naive_dft<T: Float>(input: &[Complex<T>], inverse: bool) -> Vec<Complex<T>> {
    let n = input.len();
    let sign = if inverse { 1.0 } else { -1.0 };
    let to_f64 = |z: &Complex<T>| {
        Complex::new(
            z.re.to_f64().unwrap_or_default(),
            z.im.to_f64().unwrap_or_default(),
        )
    };

    (0..n)
        .map(|k| {
            let sum = input.iter().enumerate().fold(Complex::new(0.0, 0.0), |acc, (j, x)| {
                // reduce k*j first so large indices keep full angle precision
                let angle = sign * 2.0 * std::f64::consts::PI * ((k * j) % n) as f64 / n as f64;
                acc + to_f64(x) * Complex::from_polar(1.0, angle)
            });
            Complex::new(T::from(sum.re).unwrap(), T::from(sum.im).unwrap())
        })
        .collect()
}

/// Generate a random, complex, signal in the provided buffers
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`
pub fn gen_random_signal<T>(reals: &mut [T], imags: &mut [T])
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    assert_eq!(
        reals.len(),
        imags.len(),
        "Real and imaginary slices must be of equal length"
    );

    let mut rng = thread_rng();

    let uniform_dist = Uniform::new(T::from(-1.0).unwrap(), T::from(1.0).unwrap());
    for (real, imag) in reals.iter_mut().zip(imags.iter_mut()) {
        *real = uniform_dist.sample(&mut rng);
        *imag = uniform_dist.sample(&mut rng);
    }
}

/// A random complex signal with both parts uniform in `[-1, 1)`.
pub fn gen_random_complex<T>(n: usize) -> Vec<Complex<T>>
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    let mut reals = vec![T::zero(); n];
    let mut imags = vec![T::zero(); n];
    gen_random_signal(&mut reals, &mut imags);
    reals
        .into_iter()
        .zip(imags)
        .map(|(re, im)| Complex::new(re, im))
        .collect()
}

//! Transform properties checked across every registered codelet, for both precisions.
use fftforge::{
    fft_forward, fft_inverse, Buffers, CodeletEntry, FftFloat, KernelKind, Plan, PlanOptions,
    Planner, Precision, Registry, SimdLevel, SimdLevelSet,
};
use num_complex::Complex;
use rand::distributions::uniform::SampleUniform;
use utilities::rustfft::{FftNum, FftPlanner};
use utilities::{assert_complex_closeness, gen_random_complex, naive_dft};

/// Largest size exercised per codelet; covers the first six-step and eight-step sizes.
const MAX_TESTED: usize = 1 << 14;

fn tolerance<T: FftFloat>(n: usize) -> T {
    let base = match T::PRECISION {
        Precision::Single => 1e-5,
        Precision::Double => 1e-13,
    };
    let n = n as f64;
    T::cast(base * n.sqrt().max(1.0) * n.log2().max(1.0))
}

fn reference<T: FftFloat + FftNum>(input: &[Complex<T>]) -> Vec<Complex<T>> {
    let mut output = input.to_vec();
    FftPlanner::new()
        .plan_fft_forward(input.len())
        .process(&mut output);
    output
}

fn ramp<T: FftFloat>(n: usize) -> Vec<Complex<T>> {
    (0..n)
        .map(|i| Complex::new(T::cast(i as f64 + 1.0), T::cast(0.5 * i as f64)))
        .collect()
}

/// Calls the codelet directly. Core codelets get their input permuted through `table` first and
/// are then called without one, as a plan would.
fn call_codelet<T: FftFloat>(
    entry: &CodeletEntry<T>,
    plan: &Plan<T>,
    input: &[Complex<T>],
    table: &[usize],
    inverse: bool,
    in_place: bool,
) -> Vec<Complex<T>> {
    let n = entry.size;
    let codelet = if inverse { entry.inverse } else { entry.forward };
    let (input, table): (Vec<Complex<T>>, &[usize]) = match entry.kind {
        KernelKind::Complete => (input.to_vec(), table),
        KernelKind::Core => (table.iter().map(|&i| input[i]).collect(), &[][..]),
    };
    let mut scratch = vec![Complex::default(); n];

    let (succeeded, output) = if in_place {
        let mut buf = input;
        let ok = codelet(Buffers::InPlace(&mut buf), plan.twiddles(), &mut scratch, table);
        (ok, buf)
    } else {
        let mut dst = vec![Complex::default(); n];
        let ok = codelet(
            Buffers::OutOfPlace {
                src: &input,
                dst: &mut dst,
            },
            plan.twiddles(),
            &mut scratch,
            table,
        );
        (ok, dst)
    };
    assert!(succeeded, "{} rejected size {n}", entry.signature);
    output
}

fn every_entry<T: FftFloat>(registry: &Registry<T>) -> impl Iterator<Item = &CodeletEntry<T>> {
    registry
        .sizes()
        .into_iter()
        .take_while(|&n| n <= MAX_TESTED)
        .flat_map(move |n| registry.candidates(n).iter())
}

fn every_codelet_round_trips<T: FftFloat + FftNum + SampleUniform>() {
    let registry = Registry::<T>::builtin(SimdLevelSet::all());
    for entry in every_entry(&registry) {
        let n = entry.size;
        let plan = Plan::from_entry(*entry).unwrap();
        let input = gen_random_complex::<T>(n);
        let tol = tolerance::<T>(n);

        let spectrum = call_codelet(entry, &plan, &input, plan.bitrev(), false, false);
        assert_complex_closeness(&spectrum, &reference(&input), tol);

        let restored = call_codelet(entry, &plan, &spectrum, plan.bitrev(), true, false);
        assert_complex_closeness(&restored, &input, tol);
    }
}

fn every_codelet_is_alias_safe<T: FftFloat + SampleUniform>() {
    let registry = Registry::<T>::builtin(SimdLevelSet::all());
    for entry in every_entry(&registry) {
        let n = entry.size;
        let plan = Plan::from_entry(*entry).unwrap();
        let input = gen_random_complex::<T>(n);
        let tight = tolerance::<T>(n) / T::cast(100.0);

        for inverse in [false, true] {
            let separate = call_codelet(entry, &plan, &input, plan.bitrev(), inverse, false);
            let aliased = call_codelet(entry, &plan, &input, plan.bitrev(), inverse, true);
            assert_complex_closeness(&aliased, &separate, tight);
        }
    }
}

fn every_codelet_reads_its_table<T: FftFloat>() {
    let registry = Registry::<T>::builtin(SimdLevelSet::all());
    let mut cores = Vec::new();
    for entry in every_entry(&registry) {
        let n = entry.size;
        if n < 2 || entry.bitrev.is_none() {
            continue;
        }
        let plan = Plan::from_entry(*entry).unwrap();
        let input = ramp::<T>(n);

        let correct = call_codelet(entry, &plan, &input, plan.bitrev(), false, false);
        if n <= 64 {
            let tol = tolerance::<T>(n) * T::cast(n as f64);
            assert_complex_closeness(&correct, &naive_dft(&input, false), tol);
        }

        let mut scrambled = plan.bitrev().to_vec();
        scrambled.swap(0, 1);
        let wrong = call_codelet(entry, &plan, &input, &scrambled, false, false);
        let deviation = correct
            .iter()
            .zip(&wrong)
            .map(|(a, b)| (a - b).norm())
            .fold(T::zero(), T::max);
        assert!(
            deviation > T::cast(0.5),
            "{} (size {n}) ignored a scrambled table",
            entry.signature
        );
        if entry.kind == KernelKind::Core {
            cores.push(entry.signature);
        }
    }
    for signature in ["radix2_core_avx2", "radix4_core_avx2", "radix2_core_neon", "radix4_core_sse2"] {
        assert!(cores.contains(&signature), "{signature} was not checked");
    }
}

fn linearity<T: FftFloat + SampleUniform>() {
    let a = Complex::new(T::cast(0.5), T::cast(-1.5));
    let b = Complex::new(T::cast(2.0), T::cast(0.25));
    for n in [8, 60, 384, 1024, 4096] {
        let x = gen_random_complex::<T>(n);
        let y = gen_random_complex::<T>(n);
        let mut combined: Vec<_> = x.iter().zip(&y).map(|(&x, &y)| a * x + b * y).collect();
        let (mut fx, mut fy) = (x, y);
        fft_forward(&mut combined).unwrap();
        fft_forward(&mut fx).unwrap();
        fft_forward(&mut fy).unwrap();
        let expected: Vec<_> = fx.iter().zip(&fy).map(|(&x, &y)| a * x + b * y).collect();
        assert_complex_closeness(&combined, &expected, tolerance::<T>(n) * T::cast(4.0));
    }
}

fn impulse_and_dc<T: FftFloat>() {
    for n in [2, 8, 48, 243, 512, 8192] {
        let tol = tolerance::<T>(n);
        let mut impulse = vec![Complex::default(); n];
        impulse[0] = Complex::new(T::one(), T::zero());
        fft_forward(&mut impulse).unwrap();
        assert_complex_closeness(&impulse, &vec![Complex::new(T::one(), T::zero()); n], tol);

        let k = n / 2 + 1;
        let mut shifted = vec![Complex::default(); n];
        shifted[k % n] = Complex::new(T::one(), T::zero());
        fft_forward(&mut shifted).unwrap();
        let expected: Vec<Complex<T>> = (0..n)
            .map(|bin| {
                let angle = -2.0 * std::f64::consts::PI * ((k % n * bin) % n) as f64 / n as f64;
                Complex::new(T::cast(angle.cos()), T::cast(angle.sin()))
            })
            .collect();
        assert_complex_closeness(&shifted, &expected, tol);

        let mut ones = vec![Complex::new(T::one(), T::zero()); n];
        fft_forward(&mut ones).unwrap();
        let mut expected = vec![Complex::default(); n];
        expected[0] = Complex::new(T::cast(n as f64), T::zero());
        assert_complex_closeness(&ones, &expected, tol * T::cast(n as f64).sqrt());
    }
}

fn eight_point_scenario<T: FftFloat>() {
    let source: Vec<Complex<T>> = (0..8)
        .map(|i| Complex::new(T::cast(i as f64), T::zero()))
        .collect();
    let expected = naive_dft(&source, false);
    let epsilon = T::cast(1e-5);

    let mut data = source.clone();
    fft_forward(&mut data).unwrap();
    assert_complex_closeness(&data, &expected, epsilon);
    fft_inverse(&mut data).unwrap();
    assert_complex_closeness(&data, &source, epsilon);

    // Every size-8 codelet, not just the one the planner prefers.
    let registry = Registry::<T>::builtin(SimdLevelSet::all());
    for entry in registry.candidates(8) {
        let plan = Plan::from_entry(*entry).unwrap();
        let spectrum = call_codelet(entry, &plan, &source, plan.bitrev(), false, true);
        assert_complex_closeness(&spectrum, &expected, epsilon);
        let restored = call_codelet(entry, &plan, &spectrum, plan.bitrev(), true, true);
        assert_complex_closeness(&restored, &source, epsilon);
    }
}

fn planner_is_deterministic<T: FftFloat>() {
    let registry = Registry::<T>::builtin(SimdLevelSet::all());
    let all = SimdLevelSet::all();
    for n in registry.sizes() {
        let first = registry.resolve(n, all).unwrap().entry().signature;
        for _ in 0..3 {
            assert_eq!(registry.resolve(n, all).unwrap().entry().signature, first);
        }

        for removed in SimdLevel::ALL.into_iter().filter(|&l| l != SimdLevel::None) {
            let lowered = all.without(removed);
            let entry = registry.resolve(n, lowered).unwrap().entry();
            assert_ne!(entry.level, removed, "size {n} kept {}", entry.signature);
            assert!(lowered.contains(entry.level));
        }
        let scalar = registry.resolve(n, SimdLevelSet::scalar()).unwrap().entry();
        assert_eq!(scalar.level, SimdLevel::None);
    }

    let a = Planner::new(&registry, all, PlanOptions::default());
    let b = Planner::new(&registry, all, PlanOptions::default());
    for n in [1, 2, 8, 96, 1000, 4096, 1 << 13, 1 << 20] {
        assert_eq!(a.plan(n).unwrap().signature(), b.plan(n).unwrap().signature());
    }
}

macro_rules! properties_for {
    ($module:ident, $precision:ty) => {
        mod $module {
            use super::*;

            #[test]
            fn round_trip() {
                every_codelet_round_trips::<$precision>();
            }

            #[test]
            fn in_place_matches_out_of_place() {
                every_codelet_is_alias_safe::<$precision>();
            }

            #[test]
            fn scrambled_tables_change_the_output() {
                every_codelet_reads_its_table::<$precision>();
            }

            #[test]
            fn forward_is_linear() {
                linearity::<$precision>();
            }

            #[test]
            fn impulse_and_dc_spectra() {
                impulse_and_dc::<$precision>();
            }

            #[test]
            fn eight_point_ramp() {
                eight_point_scenario::<$precision>();
            }

            #[test]
            fn resolution_is_deterministic() {
                planner_is_deterministic::<$precision>();
            }
        }
    };
}

properties_for!(single, f32);
properties_for!(double, f64);

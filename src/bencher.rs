//! Times candidate codelets on the current hardware and returns the fastest one.
use std::time::Instant;

use num_complex::Complex;

use crate::planner::Plan;
use crate::precision::FftFloat;
use crate::registry::CodeletEntry;

/// A deterministic test signal, so repeated measurements see the same data.
fn test_signal<T: FftFloat>(n: usize) -> Vec<Complex<T>> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            Complex::new(T::cast((x * 0.37).sin()), T::cast((x * 0.11).cos()))
        })
        .collect()
}

/// Nanoseconds spent on `iterations` forward transforms after `warm_up` untimed ones, or `None`
/// if the candidate cannot run at all.
fn time_candidate<T: FftFloat>(
    entry: &CodeletEntry<T>,
    test_data: &[Complex<T>],
    warm_up: usize,
    iterations: usize,
) -> Option<u128> {
    let plan = Plan::from_entry(*entry).ok()?;
    let mut data = test_data.to_vec();
    let mut scratch = plan.make_scratch();

    for _ in 0..warm_up {
        data.copy_from_slice(test_data);
        plan.forward_in_place(&mut data, &mut scratch).ok()?;
    }

    let start = Instant::now();
    for _ in 0..iterations {
        data.copy_from_slice(test_data);
        plan.forward_in_place(&mut data, &mut scratch).ok()?;
    }
    Some(start.elapsed().as_nanos())
}

/// Benchmarks every candidate and returns the fastest, with its total time in nanoseconds.
///
/// Candidates that fail to run are skipped. Equal times go to the earlier candidate.
pub fn find_fastest_codelet<'a, T: FftFloat>(
    candidates: impl IntoIterator<Item = &'a CodeletEntry<T>>,
    warm_up: usize,
    iterations: usize,
) -> Option<(&'a CodeletEntry<T>, u128)> {
    let mut fastest: Option<(&'a CodeletEntry<T>, u128)> = None;
    let mut test_data = Vec::new();

    for entry in candidates {
        if test_data.len() != entry.size {
            test_data = test_signal(entry.size);
        }
        let Some(elapsed) = time_candidate(entry, &test_data, warm_up, iterations) else {
            log::warn!("skipping {} for size {}: it failed to run", entry.signature, entry.size);
            continue;
        };
        log::trace!(
            "{} for size {}: {} ns over {} iterations",
            entry.signature,
            entry.size,
            elapsed,
            iterations
        );
        if fastest.map_or(true, |(_, best)| elapsed < best) {
            fastest = Some((entry, elapsed));
        }
    }
    fastest
}

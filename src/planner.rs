//! The planner module provides a convenient interface for planning and executing
//! a Fast Fourier Transform (FFT). The planner decides which codelet transforms a given
//! length, and a [`Plan`] holds everything that codelet needs at run time: the twiddle
//! factors and the bit-reversal table of its scheme.
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use num_complex::Complex;

use crate::aliasing::Buffers;
use crate::bencher::find_fastest_codelet;
use crate::cpu::{SimdLevel, SimdLevelSet};
use crate::error::{FftError, FftResult};
use crate::kernels::common::permute;
use crate::options::{PlanOptions, Strategy};
use crate::precision::FftFloat;
use crate::registry::{is_supported_size, CodeletEntry, KernelKind, Registry, MAX_SIZE};
use crate::twiddles::generate_twiddles;
use crate::wisdom::{Wisdom, WisdomKey};

/// Reverse is for running the Inverse Fast Fourier Transform (IFFT)
/// Forward is for running the regular FFT
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Leave the exponent term in the twiddle factor alone
    Forward = 1,
    /// Multiply the exponent term in the twiddle factor by -1
    Reverse = -1,
}

/// A codelet bound to its precomputed tables.
///
/// Plans are immutable and shared through `Arc`, so one plan can serve any number of threads as
/// long as each brings its own scratch.
#[derive(Debug)]
pub struct Plan<T: FftFloat> {
    entry: CodeletEntry<T>,
    twiddles: Vec<Complex<T>>,
    bitrev: Vec<usize>,
}

impl<T: FftFloat> Plan<T> {
    /// Precomputes the tables `entry` reads.
    pub fn from_entry(entry: CodeletEntry<T>) -> FftResult<Self> {
        let bitrev = match entry.bitrev {
            Some(scheme) => scheme.build(entry.size).ok_or(FftError::InvalidLength {
                len: entry.size,
                max: MAX_SIZE,
            })?,
            None => Vec::new(),
        };
        Ok(Self {
            entry,
            twiddles: generate_twiddles(entry.size),
            bitrev,
        })
    }

    pub fn size(&self) -> usize {
        self.entry.size
    }

    pub fn entry(&self) -> &CodeletEntry<T> {
        &self.entry
    }

    pub fn signature(&self) -> &'static str {
        self.entry.signature
    }

    pub fn twiddles(&self) -> &[Complex<T>] {
        &self.twiddles
    }

    pub fn bitrev(&self) -> &[usize] {
        &self.bitrev
    }

    /// Scratch elements every call needs.
    pub fn scratch_len(&self) -> usize {
        self.entry.size
    }

    pub fn make_scratch(&self) -> Vec<Complex<T>> {
        vec![Complex::default(); self.scratch_len()]
    }

    pub fn forward(
        &self,
        buffers: Buffers<'_, Complex<T>>,
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        self.process(Direction::Forward, buffers, scratch)
    }

    /// The inverse transform, scaled by `1/N`.
    pub fn inverse(
        &self,
        buffers: Buffers<'_, Complex<T>>,
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        self.process(Direction::Reverse, buffers, scratch)
    }

    pub fn forward_in_place(
        &self,
        data: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        self.forward(Buffers::InPlace(data), scratch)
    }

    pub fn inverse_in_place(
        &self,
        data: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        self.inverse(Buffers::InPlace(data), scratch)
    }

    /// Transforms the first [`size`](Self::size) elements of the source.
    ///
    /// Longer buffers are allowed; shorter ones are reported as [`FftError::BufferTooShort`]
    /// before anything is written.
    pub fn process(
        &self,
        direction: Direction,
        buffers: Buffers<'_, Complex<T>>,
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        let n = self.size();
        let too_short = |buffer, actual| FftError::BufferTooShort {
            buffer,
            required: n,
            actual,
        };
        if buffers.len() < n {
            return Err(too_short("source", buffers.len()));
        }
        if buffers.dst_len() < n {
            return Err(too_short("destination", buffers.dst_len()));
        }
        if scratch.len() < n {
            return Err(too_short("scratch", scratch.len()));
        }

        let buffers = match buffers {
            Buffers::InPlace(buf) => Buffers::InPlace(&mut buf[..n]),
            Buffers::OutOfPlace { src, dst } => Buffers::OutOfPlace {
                src: &src[..n],
                dst: &mut dst[..n],
            },
        };
        let codelet = match direction {
            Direction::Forward => self.entry.forward,
            Direction::Reverse => self.entry.inverse,
        };

        let succeeded = match self.entry.kind {
            KernelKind::Complete => codelet(buffers, &self.twiddles, scratch, &self.bitrev),
            KernelKind::Core => {
                if self.bitrev.len() < n {
                    return Err(self.failed());
                }
                let data = match buffers {
                    Buffers::InPlace(buf) => {
                        let staged = &mut scratch[..n];
                        permute(&*buf, staged, &self.bitrev);
                        buf.copy_from_slice(staged);
                        buf
                    }
                    Buffers::OutOfPlace { src, dst } => {
                        permute(src, dst, &self.bitrev);
                        dst
                    }
                };
                codelet(Buffers::InPlace(data), &self.twiddles, scratch, &[])
            }
        };

        if succeeded {
            Ok(())
        } else {
            Err(self.failed())
        }
    }

    /// Scratch elements a strided call needs: one contiguous line plus the plan's own scratch.
    pub fn strided_scratch_len(&self) -> usize {
        2 * self.entry.size
    }

    pub fn forward_strided(
        &self,
        buffers: Buffers<'_, Complex<T>>,
        stride: usize,
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        self.process_strided(Direction::Forward, buffers, stride, scratch)
    }

    pub fn inverse_strided(
        &self,
        buffers: Buffers<'_, Complex<T>>,
        stride: usize,
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        self.process_strided(Direction::Reverse, buffers, stride, scratch)
    }

    /// Transforms elements `0, stride, 2 * stride, ...` of the source into the same positions
    /// of the destination, e.g. one column of a row-major matrix.
    ///
    /// The line is gathered into the front half of `scratch`, transformed there, then scattered
    /// back. Elements between the strided positions are left untouched.
    pub fn process_strided(
        &self,
        direction: Direction,
        buffers: Buffers<'_, Complex<T>>,
        stride: usize,
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        let n = self.size();
        let required = (n - 1)
            .checked_mul(stride)
            .and_then(|span| span.checked_add(1))
            .filter(|_| stride > 0)
            .ok_or(FftError::InvalidStride { stride })?;
        let too_short = |buffer, required, actual| FftError::BufferTooShort {
            buffer,
            required,
            actual,
        };
        if buffers.len() < required {
            return Err(too_short("source", required, buffers.len()));
        }
        if buffers.dst_len() < required {
            return Err(too_short("destination", required, buffers.dst_len()));
        }
        if scratch.len() < self.strided_scratch_len() {
            return Err(too_short("scratch", self.strided_scratch_len(), scratch.len()));
        }

        let (line, scratch) = scratch.split_at_mut(n);
        let dst = match buffers {
            Buffers::InPlace(buf) => {
                gather(&*buf, stride, line);
                buf
            }
            Buffers::OutOfPlace { src, dst } => {
                gather(src, stride, line);
                dst
            }
        };
        self.process(direction, Buffers::InPlace(&mut *line), scratch)?;
        scatter(line, dst, stride);
        Ok(())
    }

    fn failed(&self) -> FftError {
        FftError::KernelFailed {
            signature: self.entry.signature,
            size: self.entry.size,
        }
    }
}

fn gather<T: Copy>(src: &[T], stride: usize, line: &mut [T]) {
    for (slot, &value) in line.iter_mut().zip(src.iter().step_by(stride)) {
        *slot = value;
    }
}

fn scatter<T: Copy>(line: &[T], dst: &mut [T], stride: usize) {
    for (slot, &value) in dst.iter_mut().step_by(stride).zip(line) {
        *slot = value;
    }
}

/// Chooses codelets for a registry and caches the resulting plans.
///
/// Planning the same length twice returns the same [`Arc<Plan>`](Plan). Lookups and wisdom are
/// guarded by mutexes, so one planner can be shared across threads.
pub struct Planner<'r, T: FftFloat> {
    registry: &'r Registry<T>,
    levels: SimdLevelSet,
    options: PlanOptions,
    cache: Mutex<HashMap<usize, Arc<Plan<T>>>>,
    wisdom: Mutex<Wisdom>,
}

impl<T: FftFloat> Planner<'static, T> {
    /// The process-wide planner for `T`, using the builtin registry and the detected CPU levels.
    pub fn global() -> &'static Self {
        T::planner()
    }
}

impl<'r, T: FftFloat> Planner<'r, T> {
    /// Create a `Planner` that resolves against `registry` on a CPU supporting `levels`.
    pub fn new(registry: &'r Registry<T>, levels: SimdLevelSet, options: PlanOptions) -> Self {
        let levels = if options.force_generic {
            SimdLevelSet::scalar()
        } else {
            levels
        };
        Self {
            registry,
            levels,
            options,
            cache: Mutex::new(HashMap::new()),
            wisdom: Mutex::new(Wisdom::new()),
        }
    }

    pub fn registry(&self) -> &'r Registry<T> {
        self.registry
    }

    pub fn levels(&self) -> SimdLevelSet {
        self.levels
    }

    pub fn options(&self) -> PlanOptions {
        self.options
    }

    /// Returns the cached plan for `n`, creating it on first request.
    ///
    /// # Panics
    ///
    /// Panics if the registry has no eligible entry for a supported `n`, which means a fallback
    /// was never registered.
    pub fn plan(&self, n: usize) -> FftResult<Arc<Plan<T>>> {
        if !is_supported_size(n) {
            return Err(FftError::InvalidLength {
                len: n,
                max: MAX_SIZE,
            });
        }
        if let Some(plan) = self.cache().get(&n) {
            return Ok(Arc::clone(plan));
        }

        let entry = self.select(n);
        let plan = Arc::new(Plan::from_entry(*entry)?);
        log::debug!(
            "planned size {n}: {} ({:?}, level {})",
            entry.signature,
            entry.algorithm,
            entry.level
        );

        let mut cache = self.cache();
        Ok(Arc::clone(cache.entry(n).or_insert(plan)))
    }

    fn select(&self, n: usize) -> &'r CodeletEntry<T> {
        let registry: &'r Registry<T> = self.registry;
        let strategy = self.options.strategy;

        if strategy != Strategy::Auto {
            if let Some(entry) =
                registry.best_matching(n, self.levels, |entry| strategy.accepts(entry.algorithm))
            {
                return entry;
            }
            log::warn!("no {strategy:?} codelet for size {n}, using normal resolution");
        }

        let key = self.wisdom_key(n);
        if self.options.use_wisdom {
            let remembered = self.wisdom().lookup(&key).map(str::to_owned);
            if let Some(signature) = remembered {
                match registry.find(n, &signature, self.levels) {
                    Some(entry) => {
                        log::trace!("wisdom hit for size {n}: {signature}");
                        return entry;
                    }
                    None => log::warn!(
                        "ignoring wisdom for size {n}: {signature} is not an eligible codelet"
                    ),
                }
            }
        }

        if let Some((warm_up, iterations)) = self.options.mode.benchmark_effort() {
            let eligible = registry.eligible(n, self.levels);
            if let Some((winner, elapsed)) = find_fastest_codelet(eligible, warm_up, iterations) {
                log::info!(
                    "measured {} as fastest for size {n} ({} ns per call)",
                    winner.signature,
                    elapsed / iterations.max(1) as u128
                );
                self.wisdom().record(key, winner.signature);
                return winner;
            }
        }

        match registry.resolve(n, self.levels) {
            Ok(resolution) => resolution.entry(),
            Err(err) => panic!("codelet registry is incomplete: {err}"),
        }
    }

    fn wisdom_key(&self, size: usize) -> WisdomKey {
        WisdomKey {
            size,
            precision: T::PRECISION,
            levels: self.levels.mask(),
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<usize, Arc<Plan<T>>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wisdom(&self) -> MutexGuard<'_, Wisdom> {
        self.wisdom.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    /// Number of plans currently cached.
    pub fn cached_plans(&self) -> usize {
        self.cache().len()
    }

    pub fn export_wisdom(&self) -> String {
        self.wisdom().export()
    }

    /// Merges wisdom text into this planner. Cached plans are not re-planned.
    pub fn import_wisdom(&self, text: &str) -> FftResult<usize> {
        self.wisdom().import(text)
    }

    /// Writes this planner's wisdom to `path`.
    pub fn save_wisdom(&self, path: impl AsRef<Path>) -> FftResult<()> {
        self.wisdom().save(path)
    }

    /// Merges the wisdom stored at `path`. Cached plans are not re-planned.
    pub fn load_wisdom(&self, path: impl AsRef<Path>) -> FftResult<usize> {
        self.wisdom().load(path)
    }

    pub fn record_wisdom(&self, size: usize, signature: impl Into<String>) {
        let key = self.wisdom_key(size);
        self.wisdom().record(key, signature);
    }

    pub fn clear_wisdom(&self) {
        self.wisdom().clear();
    }

    pub fn wisdom_len(&self) -> usize {
        self.wisdom().len()
    }

    /// Whether this planner may choose codelets for `level`.
    pub fn supports(&self, level: SimdLevel) -> bool {
        self.levels.contains(level)
    }
}

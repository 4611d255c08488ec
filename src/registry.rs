//! The per-precision codelet catalog.
//!
//! A [`Registry`] maps each size to the candidate [`CodeletEntry`] values registered for it.
//! Resolution picks the highest-priority candidate whose instruction-set level is supported;
//! equal priorities go to whichever was registered first. [`Registry::builtin`] registers every
//! compiled-in codelet whose level is available, plus a generic fallback for every supported
//! size, and is built once per precision at first use.
use std::collections::HashMap;
use std::fmt;

use num_complex::Complex;

use crate::aliasing::Buffers;
use crate::algorithms::bit_reversal::BitRevScheme;
use crate::algorithms::composite::{composite_forward, composite_inverse, COMPOSITE_SHAPES};
use crate::algorithms::dit::{dit_forward, dit_inverse};
use crate::algorithms::mixed_radix::{
    mixed24_forward, mixed24_inverse, radix3_forward, radix3_inverse, radix4_forward,
    radix4_inverse, radix5_forward, radix5_inverse, radix8_forward, radix8_inverse,
    smooth_forward, smooth_inverse,
};
use crate::algorithms::six_step::{
    eight_step_forward, eight_step_inverse, six_step_forward, six_step_inverse,
};
use crate::algorithms::stockham::{stockham_forward, stockham_inverse};
use crate::cpu::{SimdLevel, SimdLevelSet};
use crate::error::FftError;
use crate::kernels::simd;
use crate::kernels::unrolled::{
    fft2_forward, fft2_inverse, fft4_forward, fft4_inverse, fft8_forward, fft8_inverse,
};
use crate::precision::FftFloat;

/// Largest length the builtin registry covers.
pub const MAX_SIZE: usize = 1 << 24;

pub const DIT_GENERIC: &str = "dit_generic";
pub const MIXED_RADIX_GENERIC: &str = "mixed_radix_generic";

/// The codelet call contract: `(buffers, twiddles, scratch, bitrev) -> success`.
pub type CodeletFn<T> =
    fn(Buffers<'_, Complex<T>>, &[Complex<T>], &mut [Complex<T>], &[usize]) -> bool;

/// Whether a codelet applies its bit-reversal table itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// Permutes through the table and computes the whole transform.
    Complete,
    /// Butterflies only; the caller must permute first and invoke it in place.
    Core,
}

/// The engine family a codelet belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Unrolled,
    Dit,
    Stockham,
    MixedRadix,
    Composite,
    SixStep,
    EightStep,
}

/// One concrete implementation of a size-`size` transform.
pub struct CodeletEntry<T> {
    pub size: usize,
    pub forward: CodeletFn<T>,
    pub inverse: CodeletFn<T>,
    pub algorithm: Algorithm,
    /// Instruction-set level the codelet requires.
    pub level: SimdLevel,
    /// Stable name used by wisdom and logs.
    pub signature: &'static str,
    /// Higher wins.
    pub priority: i32,
    /// The table this codelet reads, or `None` if it self-permutes.
    pub bitrev: Option<BitRevScheme>,
    pub kind: KernelKind,
}

impl<T> CodeletEntry<T> {
    /// The always-present generic engine for this size.
    pub fn is_fallback(&self) -> bool {
        self.level == SimdLevel::None
            && (self.signature == DIT_GENERIC || self.signature == MIXED_RADIX_GENERIC)
    }
}

impl<T> Clone for CodeletEntry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CodeletEntry<T> {}

impl<T> fmt::Debug for CodeletEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeletEntry")
            .field("size", &self.size)
            .field("signature", &self.signature)
            .field("algorithm", &self.algorithm)
            .field("level", &self.level)
            .field("priority", &self.priority)
            .field("bitrev", &self.bitrev)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Outcome of a successful resolution.
#[derive(Debug)]
pub enum Resolution<'a, T> {
    /// A specialized codelet won.
    Codelet(&'a CodeletEntry<T>),
    /// Nothing specialized qualified; the generic engine was chosen.
    Fallback(&'a CodeletEntry<T>),
}

impl<'a, T> Resolution<'a, T> {
    pub fn entry(&self) -> &'a CodeletEntry<T> {
        match self {
            Resolution::Codelet(entry) | Resolution::Fallback(entry) => entry,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback(_))
    }
}

pub struct Registry<T> {
    entries: HashMap<usize, Vec<CodeletEntry<T>>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("sizes", &self.entries.len())
            .field("codelets", &self.len())
            .finish()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate for `entry.size`. Registration order breaks priority ties.
    pub fn register(&mut self, entry: CodeletEntry<T>) {
        self.entries.entry(entry.size).or_default().push(entry);
    }

    /// All candidates for `size`, in registration order.
    pub fn candidates(&self, size: usize) -> &[CodeletEntry<T>] {
        self.entries.get(&size).map_or(&[], Vec::as_slice)
    }

    /// Candidates for `size` whose level is in `levels`, in registration order.
    pub fn eligible(
        &self,
        size: usize,
        levels: SimdLevelSet,
    ) -> impl Iterator<Item = &CodeletEntry<T>> {
        self.candidates(size)
            .iter()
            .filter(move |entry| levels.contains(entry.level))
    }

    /// The highest-priority eligible candidate accepted by `filter`.
    pub fn best_matching(
        &self,
        size: usize,
        levels: SimdLevelSet,
        filter: impl Fn(&CodeletEntry<T>) -> bool,
    ) -> Option<&CodeletEntry<T>> {
        let mut best: Option<&CodeletEntry<T>> = None;
        for entry in self.eligible(size, levels).filter(|entry| filter(entry)) {
            if best.map_or(true, |current| entry.priority > current.priority) {
                best = Some(entry);
            }
        }
        best
    }

    /// Picks the codelet for `size` on a CPU supporting `levels`.
    ///
    /// Fails with [`FftError::Unregistered`] when no eligible entry exists, which can only
    /// happen if the fallback for `size` was never registered.
    pub fn resolve(
        &self,
        size: usize,
        levels: SimdLevelSet,
    ) -> Result<Resolution<'_, T>, FftError> {
        let entry = self
            .best_matching(size, levels, |_| true)
            .ok_or(FftError::Unregistered { size })?;
        log::trace!(
            "resolved size {size} to {} (priority {}, level {})",
            entry.signature,
            entry.priority,
            entry.level
        );
        Ok(if entry.is_fallback() {
            Resolution::Fallback(entry)
        } else {
            Resolution::Codelet(entry)
        })
    }

    /// The entry registered for `size` under `signature`, if it is eligible.
    pub fn find(
        &self,
        size: usize,
        signature: &str,
        levels: SimdLevelSet,
    ) -> Option<&CodeletEntry<T>> {
        self.eligible(size, levels)
            .find(|entry| entry.signature == signature)
    }

    /// Registered sizes in ascending order.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.entries.keys().copied().collect();
        sizes.sort_unstable();
        sizes
    }

    /// Total number of registered codelets.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True for non-zero 2/3/5-smooth lengths up to [`MAX_SIZE`].
pub fn is_supported_size(n: usize) -> bool {
    if n == 0 || n > MAX_SIZE {
        return false;
    }
    let mut rest = n;
    for factor in [2, 3, 5] {
        while rest % factor == 0 {
            rest /= factor;
        }
    }
    rest == 1
}

fn powers(base: usize, from: usize, to: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(1usize), move |&n| n.checked_mul(base))
        .take_while(move |&n| n <= to)
        .filter(move |&n| n >= from)
}

fn smooth_sizes(max: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    for p2 in powers(2, 1, max) {
        for p3 in powers(3, 1, max / p2) {
            for p5 in powers(5, 1, max / (p2 * p3)) {
                sizes.push(p2 * p3 * p5);
            }
        }
    }
    sizes.sort_unstable();
    sizes
}

impl<T: FftFloat> Registry<T> {
    /// Registers every compiled-in codelet whose level is in `levels`, plus the generic
    /// fallbacks.
    pub fn builtin(levels: SimdLevelSet) -> Self {
        let mut registry = Self::new();
        registry.register_fallbacks();
        registry.register_scalar_codelets();
        registry.register_simd_codelets(levels);
        log::debug!(
            "built {} registry: {} codelets over {} sizes",
            T::PRECISION,
            registry.len(),
            registry.entries.len()
        );
        registry
    }

    fn register_fallbacks(&mut self) {
        for n in smooth_sizes(MAX_SIZE) {
            let entry = if n.is_power_of_two() {
                CodeletEntry {
                    size: n,
                    forward: dit_forward::<T>,
                    inverse: dit_inverse::<T>,
                    algorithm: Algorithm::Dit,
                    level: SimdLevel::None,
                    signature: DIT_GENERIC,
                    priority: 0,
                    bitrev: Some(BitRevScheme::Radix2),
                    kind: KernelKind::Complete,
                }
            } else {
                CodeletEntry {
                    size: n,
                    forward: smooth_forward::<T>,
                    inverse: smooth_inverse::<T>,
                    algorithm: Algorithm::MixedRadix,
                    level: SimdLevel::None,
                    signature: MIXED_RADIX_GENERIC,
                    priority: 0,
                    bitrev: Some(BitRevScheme::Smooth),
                    kind: KernelKind::Complete,
                }
            };
            self.register(entry);
        }
    }

    fn register_complete(
        &mut self,
        sizes: impl Iterator<Item = usize>,
        (forward, inverse): (CodeletFn<T>, CodeletFn<T>),
        algorithm: Algorithm,
        signature: &'static str,
        priority: i32,
        bitrev: Option<BitRevScheme>,
    ) {
        for size in sizes {
            self.register(CodeletEntry {
                size,
                forward,
                inverse,
                algorithm,
                level: SimdLevel::None,
                signature,
                priority,
                bitrev,
                kind: KernelKind::Complete,
            });
        }
    }

    fn register_scalar_codelets(&mut self) {
        let unrolled: [(usize, CodeletFn<T>, CodeletFn<T>, &'static str); 3] = [
            (2, fft2_forward::<T>, fft2_inverse::<T>, "unrolled_size2"),
            (4, fft4_forward::<T>, fft4_inverse::<T>, "unrolled_size4"),
            (8, fft8_forward::<T>, fft8_inverse::<T>, "unrolled_size8"),
        ];
        for (size, forward, inverse, signature) in unrolled {
            self.register_complete(
                std::iter::once(size),
                (forward, inverse),
                Algorithm::Unrolled,
                signature,
                30,
                None,
            );
        }

        self.register_complete(
            powers(2, 16, 1 << 16),
            (stockham_forward::<T>, stockham_inverse::<T>),
            Algorithm::Stockham,
            "stockham_radix2",
            5,
            Some(BitRevScheme::Identity),
        );
        self.register_complete(
            powers(4, 16, MAX_SIZE),
            (radix4_forward::<T>, radix4_inverse::<T>),
            Algorithm::MixedRadix,
            "radix4",
            10,
            Some(BitRevScheme::Radix4),
        );
        self.register_complete(
            powers(2, 32, MAX_SIZE),
            (mixed24_forward::<T>, mixed24_inverse::<T>),
            Algorithm::MixedRadix,
            "mixed24",
            11,
            Some(BitRevScheme::Mixed24),
        );
        self.register_complete(
            powers(8, 64, MAX_SIZE),
            (radix8_forward::<T>, radix8_inverse::<T>),
            Algorithm::MixedRadix,
            "radix8",
            12,
            Some(BitRevScheme::Radix8),
        );
        self.register_complete(
            powers(3, 3, MAX_SIZE),
            (radix3_forward::<T>, radix3_inverse::<T>),
            Algorithm::MixedRadix,
            "radix3",
            10,
            Some(BitRevScheme::Radix3),
        );
        self.register_complete(
            powers(5, 5, MAX_SIZE),
            (radix5_forward::<T>, radix5_inverse::<T>),
            Algorithm::MixedRadix,
            "radix5",
            10,
            Some(BitRevScheme::Radix5),
        );

        for &(p, q, signature) in COMPOSITE_SHAPES {
            self.register_complete(
                std::iter::once(p * q),
                (composite_forward::<T>, composite_inverse::<T>),
                Algorithm::Composite,
                signature,
                15,
                Some(BitRevScheme::Identity),
            );
        }

        self.register_complete(
            powers(4, 4096, MAX_SIZE),
            (six_step_forward::<T>, six_step_inverse::<T>),
            Algorithm::SixStep,
            "six_step",
            20,
            Some(BitRevScheme::SixStep),
        );
        self.register_complete(
            powers(4, 4096, MAX_SIZE / 2).map(|n| 2 * n),
            (eight_step_forward::<T>, eight_step_inverse::<T>),
            Algorithm::EightStep,
            "eight_step",
            20,
            Some(BitRevScheme::EightStep),
        );
    }

    fn register_simd_codelets(&mut self, levels: SimdLevelSet) {
        type CoreSet<T> = (CodeletFn<T>, CodeletFn<T>, CodeletFn<T>, CodeletFn<T>);
        let variants: [(SimdLevel, CoreSet<T>, [&'static str; 2], i32); 4] = [
            (
                SimdLevel::Sse2,
                (
                    simd::sse2::radix2_forward::<T>,
                    simd::sse2::radix2_inverse::<T>,
                    simd::sse2::radix4_forward::<T>,
                    simd::sse2::radix4_inverse::<T>,
                ),
                ["radix2_core_sse2", "radix4_core_sse2"],
                25,
            ),
            (
                SimdLevel::Avx2,
                (
                    simd::avx2::radix2_forward::<T>,
                    simd::avx2::radix2_inverse::<T>,
                    simd::avx2::radix4_forward::<T>,
                    simd::avx2::radix4_inverse::<T>,
                ),
                ["radix2_core_avx2", "radix4_core_avx2"],
                26,
            ),
            (
                SimdLevel::Avx512,
                (
                    simd::avx512::radix2_forward::<T>,
                    simd::avx512::radix2_inverse::<T>,
                    simd::avx512::radix4_forward::<T>,
                    simd::avx512::radix4_inverse::<T>,
                ),
                ["radix2_core_avx512", "radix4_core_avx512"],
                27,
            ),
            (
                SimdLevel::Neon,
                (
                    simd::neon::radix2_forward::<T>,
                    simd::neon::radix2_inverse::<T>,
                    simd::neon::radix4_forward::<T>,
                    simd::neon::radix4_inverse::<T>,
                ),
                ["radix2_core_neon", "radix4_core_neon"],
                25,
            ),
        ];

        for (level, (r2_forward, r2_inverse, r4_forward, r4_inverse), [r2_sig, r4_sig], priority) in
            variants
        {
            if !levels.contains(level) {
                continue;
            }
            for size in powers(2, 64, 1 << 16) {
                self.register(CodeletEntry {
                    size,
                    forward: r2_forward,
                    inverse: r2_inverse,
                    algorithm: Algorithm::Dit,
                    level,
                    signature: r2_sig,
                    priority,
                    bitrev: Some(BitRevScheme::Radix2),
                    kind: KernelKind::Core,
                });
            }
            for size in powers(4, 64, 1 << 16) {
                self.register(CodeletEntry {
                    size,
                    forward: r4_forward,
                    inverse: r4_inverse,
                    algorithm: Algorithm::MixedRadix,
                    level,
                    signature: r4_sig,
                    priority: priority + 1,
                    bitrev: Some(BitRevScheme::Radix4),
                    kind: KernelKind::Core,
                });
            }
        }
    }
}

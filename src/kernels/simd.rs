//! Instruction-set-specialized "core" codelets.
//!
//! Each level compiles the radix-2 and radix-4 stage loops with `multiversion` for that level's
//! targets. They are butterfly-only kernels: the plan applies the bit-reversal table first and
//! calls them in place. A level is only registered when the CPU reports it, and `multiversion`
//! still falls back to the portable body if a target is missing at runtime.

macro_rules! simd_core_codelets {
    ($level:ident, [$($target:tt),+]) => {
        pub(crate) mod $level {
            use num_complex::Complex;

            use crate::aliasing::Buffers;
            use crate::algorithms::bit_reversal::{radix_schedule, BitRevScheme};
            use crate::algorithms::dit::radix2_stages;
            use crate::algorithms::{core_codelet, is_power_of_four};
            use crate::kernels::stages::run_stages;
            use crate::precision::FftFloat;

            #[multiversion::multiversion(targets($($target),+))]
            fn radix2<T: FftFloat>(data: &mut [Complex<T>], twiddles: &[Complex<T>], inverse: bool) {
                radix2_stages(data, twiddles, 1, inverse);
            }

            #[multiversion::multiversion(targets($($target),+))]
            fn radix4<T: FftFloat>(data: &mut [Complex<T>], twiddles: &[Complex<T>], inverse: bool) {
                if let Some(schedule) = radix_schedule(data.len(), BitRevScheme::Radix4) {
                    run_stages(data, &schedule, twiddles, 1, inverse);
                }
            }

            pub(crate) fn radix2_forward<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                _bitrev: &[usize],
            ) -> bool {
                core_codelet(buffers, twiddles, scratch, false, usize::is_power_of_two, |data| {
                    radix2(data, twiddles, false)
                })
            }

            pub(crate) fn radix2_inverse<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                _bitrev: &[usize],
            ) -> bool {
                core_codelet(buffers, twiddles, scratch, true, usize::is_power_of_two, |data| {
                    radix2(data, twiddles, true)
                })
            }

            pub(crate) fn radix4_forward<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                _bitrev: &[usize],
            ) -> bool {
                core_codelet(buffers, twiddles, scratch, false, is_power_of_four, |data| {
                    radix4(data, twiddles, false)
                })
            }

            pub(crate) fn radix4_inverse<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                _bitrev: &[usize],
            ) -> bool {
                core_codelet(buffers, twiddles, scratch, true, is_power_of_four, |data| {
                    radix4(data, twiddles, true)
                })
            }
        }
    };
}

simd_core_codelets!(sse2, ["x86_64+sse4.2", "x86+sse4.2", "x86+sse2"]);
simd_core_codelets!(avx2, ["x86_64+avx2+fma", "x86+avx2+fma"]);
simd_core_codelets!(
    avx512,
    [
        "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
        "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl"
    ]
);
simd_core_codelets!(neon, ["aarch64+neon"]);

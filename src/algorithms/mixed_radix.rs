//! Schedule-driven mixed-radix engines.
//!
//! The radix-2 stage structure generalized to radix 3, 4, 5 and 8: each engine permutes its input
//! through the table for its [`BitRevScheme`] and then runs the stages of that scheme's radix
//! schedule. The mixed-24 engine alternates radix-4 and radix-2 stages and therefore needs the
//! [`BitRevScheme::Mixed24`] table, not the radix-4 one. The smooth engine handles any
//! 2/3/5-smooth length and is the registry fallback for lengths that are not powers of two.
use num_complex::Complex;

use crate::aliasing::Buffers;
use crate::algorithms::bit_reversal::{radix_schedule, BitRevScheme};
use crate::algorithms::prepare;
use crate::kernels::common::{permute, scale_by_len};
use crate::kernels::stages::run_stages;
use crate::precision::FftFloat;

fn schedule_engine<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
    inverse: bool,
    scheme: BitRevScheme,
) -> bool {
    let workspace = match prepare(buffers, twiddles, scratch, bitrev) {
        Ok(workspace) => workspace,
        Err(done) => return done,
    };
    let Some(schedule) = radix_schedule(workspace.len(), scheme) else {
        return false;
    };

    workspace.run(|src, work| {
        permute(src, work, bitrev);
        run_stages(work, &schedule, twiddles, 1, inverse);
        if inverse {
            scale_by_len(work);
        }
    });
    true
}

macro_rules! schedule_codelets {
    ($($(#[$doc:meta])* $forward:ident, $inverse:ident => $scheme:expr;)+) => {
        $(
            $(#[$doc])*
            pub fn $forward<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                bitrev: &[usize],
            ) -> bool {
                schedule_engine(buffers, twiddles, scratch, bitrev, false, $scheme)
            }

            $(#[$doc])*
            pub fn $inverse<T: FftFloat>(
                buffers: Buffers<'_, Complex<T>>,
                twiddles: &[Complex<T>],
                scratch: &mut [Complex<T>],
                bitrev: &[usize],
            ) -> bool {
                schedule_engine(buffers, twiddles, scratch, bitrev, true, $scheme)
            }
        )+
    };
}

schedule_codelets! {
    /// Powers of 4 with the radix-4 table.
    radix4_forward, radix4_inverse => BitRevScheme::Radix4;
    /// Powers of 8 with the radix-8 table.
    radix8_forward, radix8_inverse => BitRevScheme::Radix8;
    /// Powers of two with the mixed-24 table.
    mixed24_forward, mixed24_inverse => BitRevScheme::Mixed24;
    /// Powers of 3 with the radix-3 table.
    radix3_forward, radix3_inverse => BitRevScheme::Radix3;
    /// Powers of 5 with the radix-5 table.
    radix5_forward, radix5_inverse => BitRevScheme::Radix5;
    /// Any 2/3/5-smooth length with the smooth table.
    smooth_forward, smooth_inverse => BitRevScheme::Smooth;
}

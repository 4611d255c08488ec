//! Two-level composite decompositions, `N = P × Q`.
//!
//! With `n = q + Q·a` and `k = P·k1 + k2`:
//!
//! 1. column pass: for every `q`, a `P`-point transform over `a` of `x[q + Q·a]`
//! 2. inter-stage twiddle: multiply column output `k2` by `W_N^{q·k2}`
//! 3. row pass: for every `k2`, a `Q`-point transform over `q`
//! 4. interleave: `X[P·k1 + k2]` is read from row `k2`, position `k1`
//!
//! The column pass writes each row in the row schedule's digit-reversed order, so the row pass
//! runs its stages directly. Input is read through an identity table.
use num_complex::Complex;

use crate::aliasing::Buffers;
use crate::algorithms::bit_reversal::{reverse_digits, smooth_schedule, Schedule};
use crate::algorithms::prepare;
use crate::kernels::common::scale_by_len;
use crate::kernels::stages::run_stages;
use crate::precision::FftFloat;
use crate::twiddles::twiddle_at;

/// Largest column transform a composite shape may use.
pub const MAX_COLUMN: usize = 32;

/// `(P, Q, signature)` for every registered composite size.
pub const COMPOSITE_SHAPES: &[(usize, usize, &str)] = &[
    (3, 32, "composite_3x32"),
    (5, 32, "composite_5x32"),
    (3, 64, "composite_3x64"),
    (16, 16, "composite_16x16"),
    (5, 64, "composite_5x64"),
    (3, 128, "composite_3x128"),
    (16, 32, "composite_16x32"),
    (5, 128, "composite_5x128"),
    (3, 256, "composite_3x256"),
    (32, 32, "composite_32x32"),
];

/// The `(P, Q)` split registered for `n`, if any.
pub fn composite_shape(n: usize) -> Option<(usize, usize)> {
    COMPOSITE_SHAPES
        .iter()
        .find(|(p, q, _)| p * q == n)
        .map(|&(p, q, _)| (p, q))
}

fn composite<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
    inverse: bool,
) -> bool {
    let workspace = match prepare(buffers, twiddles, scratch, bitrev) {
        Ok(workspace) => workspace,
        Err(done) => return done,
    };
    let n = workspace.len();
    let Some((p, q)) = composite_shape(n) else {
        return false;
    };
    let (Some(columns), Some(rows)) = (smooth_schedule(p), smooth_schedule(q)) else {
        return false;
    };

    workspace.gather(
        |src, scratch| column_pass(src, scratch, bitrev, twiddles, (p, &columns), (q, &rows), inverse),
        |dst, scratch| {
            for row in scratch.chunks_exact_mut(q) {
                run_stages(row, &rows, twiddles, n / q, inverse);
            }
            for (k2, row) in scratch.chunks_exact(q).enumerate() {
                for (k1, value) in row.iter().enumerate() {
                    dst[p * k1 + k2] = *value;
                }
            }
            if inverse {
                scale_by_len(dst);
            }
        },
    );
    true
}

fn column_pass<T: FftFloat>(
    src: &[Complex<T>],
    scratch: &mut [Complex<T>],
    table: &[usize],
    twiddles: &[Complex<T>],
    (p, columns): (usize, &Schedule),
    (q, rows): (usize, &Schedule),
    inverse: bool,
) {
    let n = p * q;
    let mut column_rev = [0usize; MAX_COLUMN];
    for (slot, pos) in column_rev[..p].iter_mut().zip(0..) {
        *slot = reverse_digits(pos, p, columns);
    }

    let mut column = [Complex::<T>::default(); MAX_COLUMN];
    let column = &mut column[..p];

    for j in 0..q {
        let q_index = reverse_digits(j, q, rows);
        for (slot, &a) in column.iter_mut().zip(&column_rev[..p]) {
            *slot = src[table[q_index + q * a]];
        }
        run_stages(column, columns, twiddles, n / p, inverse);
        for (k2, value) in column.iter().enumerate() {
            scratch[k2 * q + j] = *value * twiddle_at(twiddles, q_index * k2, inverse);
        }
    }
}

/// Forward transform for the sizes in [`COMPOSITE_SHAPES`]; `bitrev` is the identity table.
pub fn composite_forward<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    composite(buffers, twiddles, scratch, bitrev, false)
}

pub fn composite_inverse<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    composite(buffers, twiddles, scratch, bitrev, true)
}

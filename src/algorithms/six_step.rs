//! Six-step and eight-step engines for large power-of-two lengths.
//!
//! The length is split as `N = R × C` and the transform becomes two passes of short row
//! transforms separated by a twiddle multiply and transposes, all of which stay cache-resident for
//! large `N`. With `n = C·a + b` and `k = k1 + R·k2`:
//!
//! 1. gather column `b` of the input into row `b` of the working matrix, in radix-2 order
//!    (the fused six-step table does the permute and transpose in one pass)
//! 2. `C` row transforms of length `R`
//! 3. transpose back and multiply element `(b, k1)` by `W_N^{b·k1}`, writing each new row in
//!    radix-2 order
//! 4. `R` row transforms of length `C`
//! 5. final transpose into natural order
//!
//! Row transforms use the no-scale radix-2 engine; the inverse scales once at the very end.
//! The six-step split is square (`R = C`) and the final transpose runs in place; the eight-step
//! split is `C = 2R` and transposes through scratch.
use num_complex::Complex;

use crate::aliasing::Buffers;
use crate::algorithms::bit_reversal::{eight_step_shape, reverse_bits, six_step_shape};
use crate::algorithms::dit::radix2_stages;
use crate::algorithms::prepare;
use crate::kernels::common::{permute, scale_by_len};
use crate::precision::FftFloat;
use crate::twiddles::twiddle_at;

fn stepped<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
    inverse: bool,
    shape: fn(usize) -> Option<(usize, usize)>,
) -> bool {
    let workspace = match prepare(buffers, twiddles, scratch, bitrev) {
        Ok(workspace) => workspace,
        Err(done) => return done,
    };
    let n = workspace.len();
    let Some((rows, cols)) = shape(n) else {
        return false;
    };

    workspace.gather(
        |src, scratch| permute(src, scratch, bitrev),
        |dst, scratch| {
            for row in scratch.chunks_exact_mut(rows) {
                radix2_stages(row, twiddles, n / rows, inverse);
            }

            for (k1, out_row) in dst.chunks_exact_mut(cols).enumerate() {
                for (p, slot) in out_row.iter_mut().enumerate() {
                    let b = reverse_bits(p, cols);
                    *slot = scratch[b * rows + k1] * twiddle_at(twiddles, b * k1, inverse);
                }
            }

            for row in dst.chunks_exact_mut(cols) {
                radix2_stages(row, twiddles, n / cols, inverse);
            }

            if rows == cols {
                transpose_square_in_place(dst, rows);
            } else {
                scratch.copy_from_slice(dst);
                transpose(scratch, dst, rows, cols);
            }

            if inverse {
                scale_by_len(dst);
            }
        },
    );
    true
}

/// Swaps `(i, j)` with `(j, i)` in an `m × m` row-major matrix.
fn transpose_square_in_place<T: Copy>(data: &mut [T], m: usize) {
    for i in 0..m {
        for j in (i + 1)..m {
            data.swap(i * m + j, j * m + i);
        }
    }
}

/// `output` (`cols × rows`) is the transpose of `input` (`rows × cols`).
fn transpose<T: Copy>(input: &[T], output: &mut [T], rows: usize, cols: usize) {
    for (r, row) in input.chunks_exact(cols).enumerate() {
        for (c, value) in row.iter().enumerate() {
            output[c * rows + r] = *value;
        }
    }
}

/// Square split `N = m²`; `bitrev` must be the six-step table.
pub fn six_step_forward<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    stepped(buffers, twiddles, scratch, bitrev, false, six_step_shape)
}

pub fn six_step_inverse<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    stepped(buffers, twiddles, scratch, bitrev, true, six_step_shape)
}

/// Rectangular split `N = m · 2m`; `bitrev` must be the eight-step table.
pub fn eight_step_forward<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    stepped(buffers, twiddles, scratch, bitrev, false, eight_step_shape)
}

pub fn eight_step_inverse<T: FftFloat>(
    buffers: Buffers<'_, Complex<T>>,
    twiddles: &[Complex<T>],
    scratch: &mut [Complex<T>],
    bitrev: &[usize],
) -> bool {
    stepped(buffers, twiddles, scratch, bitrev, true, eight_step_shape)
}

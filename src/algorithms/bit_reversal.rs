//! Permutation tables for every decomposition scheme a codelet can expect.
//!
//! A table maps working position `i` to the source index the engine reads there
//! (`work[i] = src[table[i]]`). Digit-reversal schemes are described by a radix schedule listing
//! the stage radices in execution order, so the first entry is the innermost (smallest span)
//! stage. The fused six-step and eight-step tables also fold the matrix gather into the same
//! lookup.
//!
//! Tables built for one scheme are generally wrong for another. Each builder is named after its
//! scheme and returns `None` for a size the scheme cannot describe.

/// Upper bound on stage count; every radix is at least 2.
pub const MAX_STAGES: usize = usize::BITS as usize;

/// Stage radices in execution order, stored inline so engines can rebuild it per call.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    radices: [usize; MAX_STAGES],
    len: usize,
}

impl Schedule {
    pub const fn new() -> Self {
        Self {
            radices: [0; MAX_STAGES],
            len: 0,
        }
    }

    fn push(&mut self, radix: usize) {
        self.radices[self.len] = radix;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.radices[..self.len]
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for Schedule {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        self.as_slice()
    }
}

impl std::fmt::Debug for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Tags which permutation a codelet consumes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BitRevScheme {
    /// `[0, 1, ..., n - 1]` for engines that index their input in natural order.
    Identity,
    /// Plain binary reversal.
    Radix2,
    /// Base-4 digit reversal; `n` must be a power of 4.
    Radix4,
    /// Base-8 digit reversal; `n` must be a power of 8.
    Radix8,
    /// Alternating radix-4 / radix-2 stages. Not interchangeable with [`BitRevScheme::Radix4`]
    /// or [`BitRevScheme::Radix2`].
    Mixed24,
    /// Base-3 digit reversal; `n` must be a power of 3.
    Radix3,
    /// Base-5 digit reversal; `n` must be a power of 5.
    Radix5,
    /// Digit reversal for any 2/3/5-smooth `n` following [`smooth_schedule`].
    Smooth,
    /// Transposed gather for a square `m × m` split with radix-2 rows.
    SixStep,
    /// Transposed gather for an `m × 2m` split with radix-2 rows.
    EightStep,
}

impl BitRevScheme {
    pub fn name(self) -> &'static str {
        match self {
            BitRevScheme::Identity => "identity",
            BitRevScheme::Radix2 => "radix2",
            BitRevScheme::Radix4 => "radix4",
            BitRevScheme::Radix8 => "radix8",
            BitRevScheme::Mixed24 => "mixed24",
            BitRevScheme::Radix3 => "radix3",
            BitRevScheme::Radix5 => "radix5",
            BitRevScheme::Smooth => "smooth",
            BitRevScheme::SixStep => "six_step",
            BitRevScheme::EightStep => "eight_step",
        }
    }

    /// Builds the table for `n`, or `None` if `n` does not fit this scheme.
    pub fn build(self, n: usize) -> Option<Vec<usize>> {
        match self {
            BitRevScheme::Identity => Some(identity_indices(n)),
            BitRevScheme::SixStep => six_step_indices(n),
            BitRevScheme::EightStep => eight_step_indices(n),
            scheme => radix_schedule(n, scheme).map(|schedule| digit_reversal(n, &schedule)),
        }
    }
}

/// Stage radices in execution order for a digit-reversal scheme.
///
/// Returns `None` for the non-digit schemes and for sizes outside the scheme's shape.
pub fn radix_schedule(n: usize, scheme: BitRevScheme) -> Option<Schedule> {
    if n == 0 {
        return None;
    }
    match scheme {
        BitRevScheme::Radix2 => uniform_schedule(n, 2),
        BitRevScheme::Radix4 => uniform_schedule(n, 4),
        BitRevScheme::Radix8 => uniform_schedule(n, 8),
        BitRevScheme::Radix3 => uniform_schedule(n, 3),
        BitRevScheme::Radix5 => uniform_schedule(n, 5),
        BitRevScheme::Mixed24 => mixed24_schedule(n),
        BitRevScheme::Smooth => smooth_schedule(n),
        BitRevScheme::Identity | BitRevScheme::SixStep | BitRevScheme::EightStep => None,
    }
}

fn uniform_schedule(n: usize, radix: usize) -> Option<Schedule> {
    let mut schedule = Schedule::new();
    let mut rest = n;
    while rest > 1 {
        if rest % radix != 0 {
            return None;
        }
        rest /= radix;
        schedule.push(radix);
    }
    Some(schedule)
}

fn mixed24_schedule(n: usize) -> Option<Schedule> {
    if !n.is_power_of_two() {
        return None;
    }
    let mut bits = n.trailing_zeros();
    let mut schedule = Schedule::new();
    while bits >= 3 {
        schedule.push(4);
        schedule.push(2);
        bits -= 3;
    }
    match bits {
        2 => schedule.push(4),
        1 => schedule.push(2),
        _ => {}
    }
    Some(schedule)
}

/// Factors a 2/3/5-smooth `n` as radix-4 stages, at most one radix-2 stage, then radix-3 and
/// radix-5 stages.
pub fn smooth_schedule(n: usize) -> Option<Schedule> {
    if n == 0 {
        return None;
    }
    let mut rest = n;
    let mut schedule = Schedule::new();
    while rest % 4 == 0 {
        schedule.push(4);
        rest /= 4;
    }
    if rest % 2 == 0 {
        schedule.push(2);
        rest /= 2;
    }
    for radix in [3, 5] {
        while rest % radix == 0 {
            schedule.push(radix);
            rest /= radix;
        }
    }
    (rest == 1).then_some(schedule)
}

/// Source index read at working position `position` for a digit-reversal `schedule` of `n`.
#[inline]
pub fn reverse_digits(position: usize, n: usize, schedule: &[usize]) -> usize {
    let mut size = n;
    let mut rem = position;
    let mut index = 0;
    let mut mult = 1;
    for &radix in schedule.iter().rev() {
        size /= radix;
        let digit = rem / size;
        rem %= size;
        index += digit * mult;
        mult *= radix;
    }
    index
}

/// Plain binary reversal of `position` within `n`, a power of two.
#[inline(always)]
pub fn reverse_bits(position: usize, n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    position.reverse_bits() >> (n - 1).leading_zeros()
}

pub fn digit_reversal(n: usize, schedule: &[usize]) -> Vec<usize> {
    (0..n).map(|p| reverse_digits(p, n, schedule)).collect()
}

pub fn identity_indices(n: usize) -> Vec<usize> {
    (0..n).collect()
}

pub fn radix2_indices(n: usize) -> Option<Vec<usize>> {
    BitRevScheme::Radix2.build(n)
}

pub fn radix4_indices(n: usize) -> Option<Vec<usize>> {
    BitRevScheme::Radix4.build(n)
}

pub fn radix8_indices(n: usize) -> Option<Vec<usize>> {
    BitRevScheme::Radix8.build(n)
}

pub fn mixed24_indices(n: usize) -> Option<Vec<usize>> {
    BitRevScheme::Mixed24.build(n)
}

/// Rows × columns for the square six-step split: `n = m²` with `m` a power of two, `m ≥ 2`.
pub fn six_step_shape(n: usize) -> Option<(usize, usize)> {
    if n < 4 || !n.is_power_of_two() || n.trailing_zeros() % 2 != 0 {
        return None;
    }
    let m = 1 << (n.trailing_zeros() / 2);
    Some((m, m))
}

/// Rows × columns for the rectangular eight-step split: `n = m · 2m` with `m` a power of two,
/// `m ≥ 2`.
pub fn eight_step_shape(n: usize) -> Option<(usize, usize)> {
    if n < 8 || !n.is_power_of_two() || n.trailing_zeros() % 2 != 1 {
        return None;
    }
    let m = 1 << (n.trailing_zeros() / 2);
    Some((m, 2 * m))
}

/// `table[b * rows + p] = cols * rev_rows[p] + b`: column `b` of the natural-order input lands in
/// row `b` of the working matrix, already digit-reversed for a radix-2 row transform.
fn transposed_gather(rows: usize, cols: usize) -> Vec<usize> {
    let row_rev: Vec<usize> = (0..rows).map(|p| reverse_bits(p, rows)).collect();
    let mut table = Vec::with_capacity(rows * cols);
    for b in 0..cols {
        table.extend(row_rev.iter().map(|&p| cols * p + b));
    }
    table
}

pub fn six_step_indices(n: usize) -> Option<Vec<usize>> {
    six_step_shape(n).map(|(rows, cols)| transposed_gather(rows, cols))
}

pub fn eight_step_indices(n: usize) -> Option<Vec<usize>> {
    eight_step_shape(n).map(|(rows, cols)| transposed_gather(rows, cols))
}

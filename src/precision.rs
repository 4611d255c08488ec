//! The numeric capability every engine is written against.
//!
//! Algorithms are expressed once over `Complex<T>` with `T: FftFloat` and monomorphized for
//! `f32` and `f64`. Each precision also owns its process-wide registry and planner, built lazily
//! on first use and read-only afterwards.
use std::fmt::{Debug, Display};
use std::sync::OnceLock;

use num_traits::{Float, FloatConst};

use crate::cpu::detect_simd_levels;
use crate::options::PlanOptions;
use crate::planner::Planner;
use crate::registry::Registry;

/// Tags which floating-point width a plan, codelet or wisdom record belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
    /// `f32` / `Complex<f32>`
    Single,
    /// `f64` / `Complex<f64>`
    Double,
}

impl Precision {
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Single => "f32",
            Precision::Double => "f64",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "f32" => Some(Precision::Single),
            "f64" => Some(Precision::Double),
            _ => None,
        }
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floating-point types the engines can be instantiated for.
pub trait FftFloat:
    Float + FloatConst + Default + Debug + Display + bytemuck::Pod + Send + Sync + 'static
{
    const PRECISION: Precision;

    /// Narrows a constant computed in `f64`.
    fn cast(value: f64) -> Self;

    /// The process-wide registry for this precision, populated from the detected CPU levels.
    fn registry() -> &'static Registry<Self>;

    /// The process-wide planner for this precision.
    fn planner() -> &'static Planner<'static, Self>;
}

macro_rules! impl_fft_float_for {
    ($precision:ident, $tag:expr) => {
        impl FftFloat for $precision {
            const PRECISION: Precision = $tag;

            #[inline(always)]
            fn cast(value: f64) -> Self {
                value as $precision
            }

            fn registry() -> &'static Registry<Self> {
                static REGISTRY: OnceLock<Registry<$precision>> = OnceLock::new();
                REGISTRY.get_or_init(|| Registry::builtin(detect_simd_levels()))
            }

            fn planner() -> &'static Planner<'static, Self> {
                static PLANNER: OnceLock<Planner<'static, $precision>> = OnceLock::new();
                PLANNER.get_or_init(|| {
                    Planner::new(
                        Self::registry(),
                        detect_simd_levels(),
                        PlanOptions::default(),
                    )
                })
            }
        }
    };
}

impl_fft_float_for!(f32, Precision::Single);
impl_fft_float_for!(f64, Precision::Double);

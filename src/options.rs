//! Options that steer how a [`Planner`](crate::planner::Planner) picks codelets.
//!
//! Planning without options uses registry resolution only, which is deterministic and never
//! runs a transform. The measuring modes trade planning time for a choice made on the current
//! hardware, and record what they learn in [`Wisdom`](crate::wisdom::Wisdom).
use crate::registry::Algorithm;

/// How much work the planner does before committing to a codelet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum PlannerMode {
    /// Take the registry's highest-priority eligible codelet.
    #[default]
    Estimate,
    /// Time every eligible codelet briefly.
    Measure,
    /// Time every eligible codelet with more repetitions.
    Patient,
    /// Time every eligible codelet with the most repetitions.
    Exhaustive,
}

impl PlannerMode {
    /// `(warm_up, iterations)` for the measuring modes, `None` for [`PlannerMode::Estimate`].
    pub fn benchmark_effort(self) -> Option<(usize, usize)> {
        match self {
            PlannerMode::Estimate => None,
            PlannerMode::Measure => Some((3, 10)),
            PlannerMode::Patient => Some((5, 50)),
            PlannerMode::Exhaustive => Some((10, 100)),
        }
    }
}

/// Restricts planning to one engine family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    #[default]
    Auto,
    Unrolled,
    Dit,
    Stockham,
    MixedRadix,
    Composite,
    SixStep,
    EightStep,
}

impl Strategy {
    /// Whether a codelet of the given family satisfies this strategy.
    pub fn accepts(self, algorithm: Algorithm) -> bool {
        match self {
            Strategy::Auto => true,
            Strategy::Unrolled => algorithm == Algorithm::Unrolled,
            Strategy::Dit => algorithm == Algorithm::Dit,
            Strategy::Stockham => algorithm == Algorithm::Stockham,
            Strategy::MixedRadix => algorithm == Algorithm::MixedRadix,
            Strategy::Composite => algorithm == Algorithm::Composite,
            Strategy::SixStep => algorithm == Algorithm::SixStep,
            Strategy::EightStep => algorithm == Algorithm::EightStep,
        }
    }
}

/// Options to tune planning for a known hardware platform.
///
/// The defaults are what the global planners use: no measurement, no forced family, every
/// detected instruction-set level allowed, wisdom consulted.
#[non_exhaustive]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub mode: PlannerMode,
    pub strategy: Strategy,
    /// Restrict the planner to level-`None` codelets.
    pub force_generic: bool,
    pub use_wisdom: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            mode: PlannerMode::Estimate,
            strategy: Strategy::Auto,
            force_generic: false,
            use_wisdom: true,
        }
    }
}

impl PlanOptions {
    pub fn with_mode(mut self, mode: PlannerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_force_generic(mut self, force_generic: bool) -> Self {
        self.force_generic = force_generic;
        self
    }

    pub fn with_wisdom(mut self, use_wisdom: bool) -> Self {
        self.use_wisdom = use_wisdom;
        self
    }
}

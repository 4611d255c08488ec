//! The instruction-set vocabulary the planner compares codelets against.
//!
//! Detection only answers "is level X available"; finer-grained feature bits never reach the
//! registry.
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimdLevel {
    /// Plain scalar code, always available.
    None,
    Sse2,
    Avx2,
    Avx512,
    Neon,
}

impl SimdLevel {
    pub const ALL: [SimdLevel; 5] = [
        SimdLevel::None,
        SimdLevel::Sse2,
        SimdLevel::Avx2,
        SimdLevel::Avx512,
        SimdLevel::Neon,
    ];

    fn bit(self) -> u8 {
        match self {
            SimdLevel::None => 0,
            SimdLevel::Sse2 => 1 << 0,
            SimdLevel::Avx2 => 1 << 1,
            SimdLevel::Avx512 => 1 << 2,
            SimdLevel::Neon => 1 << 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SimdLevel::None => "none",
            SimdLevel::Sse2 => "sse2",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Avx512 => "avx512",
            SimdLevel::Neon => "neon",
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of supported levels. [`SimdLevel::None`] is a member of every set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct SimdLevelSet(u8);

impl SimdLevelSet {
    /// Only scalar code.
    pub const fn scalar() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b1111)
    }

    pub fn from_levels(levels: &[SimdLevel]) -> Self {
        let mut set = Self::scalar();
        for &level in levels {
            set.insert(level);
        }
        set
    }

    pub fn from_mask(mask: u8) -> Self {
        Self(mask & Self::all().0)
    }

    pub fn mask(self) -> u8 {
        self.0
    }

    pub fn contains(self, level: SimdLevel) -> bool {
        self.0 & level.bit() == level.bit()
    }

    pub fn insert(&mut self, level: SimdLevel) {
        self.0 |= level.bit();
    }

    pub fn remove(&mut self, level: SimdLevel) {
        self.0 &= !level.bit();
    }

    #[must_use]
    pub fn without(mut self, level: SimdLevel) -> Self {
        self.remove(level);
        self
    }

    pub fn iter(self) -> impl Iterator<Item = SimdLevel> {
        SimdLevel::ALL
            .into_iter()
            .filter(move |&level| self.contains(level))
    }
}

/// Queries the running CPU once per call.
pub fn detect_simd_levels() -> SimdLevelSet {
    let mut levels = SimdLevelSet::scalar();

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if std::arch::is_x86_feature_detected!("sse2") {
            levels.insert(SimdLevel::Sse2);
        }
        if std::arch::is_x86_feature_detected!("avx2") && std::arch::is_x86_feature_detected!("fma")
        {
            levels.insert(SimdLevel::Avx2);
        }
        if std::arch::is_x86_feature_detected!("avx512f")
            && std::arch::is_x86_feature_detected!("avx512bw")
            && std::arch::is_x86_feature_detected!("avx512cd")
            && std::arch::is_x86_feature_detected!("avx512dq")
            && std::arch::is_x86_feature_detected!("avx512vl")
        {
            levels.insert(SimdLevel::Avx512);
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") {
            levels.insert(SimdLevel::Neon);
        }
    }

    log::trace!("detected simd levels: {:?}", levels.iter().collect::<Vec<_>>());
    levels
}

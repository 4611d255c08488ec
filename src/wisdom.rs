//! Remembered planner decisions.
//!
//! A measuring planner records which codelet won for a size, precision and instruction-set
//! level mask. The store round-trips through a line-oriented text format so results can be
//! saved between runs:
//!
//! ```text
//! # fftforge wisdom
//! 1024 f64 3 radix4_core_avx2
//! ```
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{FftError, FftResult};
use crate::precision::Precision;

const HEADER: &str = "# fftforge wisdom";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WisdomKey {
    pub size: usize,
    pub precision: Precision,
    /// [`SimdLevelSet::mask`](crate::cpu::SimdLevelSet::mask) of the levels the decision was made under.
    pub levels: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wisdom {
    entries: BTreeMap<WisdomKey, String>,
}

impl Wisdom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `signature` for `key`, replacing any earlier decision.
    pub fn record(&mut self, key: WisdomKey, signature: impl Into<String>) {
        self.entries.insert(key, signature.into());
    }

    pub fn lookup(&self, key: &WisdomKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serializes every entry, sorted by key.
    pub fn export(&self) -> String {
        let mut text = String::from(HEADER);
        text.push('\n');
        for (key, signature) in &self.entries {
            text.push_str(&format!(
                "{} {} {} {}\n",
                key.size, key.precision, key.levels, signature
            ));
        }
        text
    }

    /// Merges entries parsed from `text` and returns how many were read.
    ///
    /// Blank lines and lines starting with `#` are skipped. Nothing is merged if any line is
    /// malformed.
    pub fn import(&mut self, text: &str) -> FftResult<usize> {
        let mut parsed = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            parsed.push(parse_line(index + 1, line)?);
        }

        let count = parsed.len();
        for (key, signature) in parsed {
            self.record(key, signature);
        }
        Ok(count)
    }

    /// Writes [`export`](Self::export) to `path`, replacing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> FftResult<()> {
        let path = path.as_ref();
        fs::write(path, self.export()).map_err(|err| FftError::wisdom_file(path, &err))?;
        log::debug!("saved {} wisdom entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Merges the entries stored at `path`, with the same rules as [`import`](Self::import).
    pub fn load(&mut self, path: impl AsRef<Path>) -> FftResult<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| FftError::wisdom_file(path, &err))?;
        let count = self.import(&text)?;
        log::debug!("loaded {count} wisdom entries from {}", path.display());
        Ok(count)
    }
}

fn parse_line(line_number: usize, line: &str) -> FftResult<(WisdomKey, String)> {
    let invalid = |reason: &str| FftError::InvalidWisdom {
        line: line_number,
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [size, precision, levels, signature] = fields.as_slice() else {
        return Err(invalid("expected `size precision mask signature`"));
    };

    let size = size
        .parse::<usize>()
        .map_err(|_| invalid("size is not an integer"))?;
    let precision =
        Precision::parse(precision).ok_or_else(|| invalid("precision must be f32 or f64"))?;
    let levels = levels
        .parse::<u8>()
        .map_err(|_| invalid("level mask is not an integer"))?;

    Ok((
        WisdomKey {
            size,
            precision,
            levels,
        },
        signature.to_string(),
    ))
}

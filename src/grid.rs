//! # Audiogram Grid
//!
//! The constant axes every audiogram is drawn on:
//! - a frequency axis of standard test frequencies, displayed on a log scale
//! - a hearing-level axis in dB HL, linear and inverted (louder is lower)
//!
//! A grid can only be built through [`AudiogramGrid::new`] (or deserialized,
//! which goes through the same checks), so every method can rely on both
//! sequences being non-trivial and strictly increasing.
//!
//! ## Example
//! ```rust
//! use audiology::AudiogramGrid;
//!
//! let grid = AudiogramGrid::default();
//! assert_eq!(grid.nearest_frequency(700.0), 500);
//! assert_eq!(grid.nearest_frequency(760.0), 1000);
//! assert_eq!(grid.min_level(), -10);
//! assert_eq!(grid.max_level(), 120);
//! ```

use crate::error::AudiologyError;
use serde::{Deserialize, Serialize};

/// Octave test frequencies, 125 Hz to 8 kHz.
pub const STANDARD_FREQUENCIES: [u32; 7] = [125, 250, 500, 1000, 2000, 4000, 8000];

const MIN_LEVEL_DB: i32 = -10;
const MAX_LEVEL_DB: i32 = 120;
const LEVEL_STEP_DB: i32 = 5;

/// Tolerance used when deciding whether a level sits on a rounding half-point.
const HALF_POINT_EPSILON: f64 = 1e-9;

/// Index of the value closest to `target`.
///
/// Distance is absolute difference; when two entries are equally close the
/// earlier one wins. A NaN target resolves to the first entry. Returns
/// `None` only for an empty slice.
pub fn nearest_index<T: Copy + Into<f64>>(values: &[T], target: f64) -> Option<usize> {
    if target.is_nan() {
        return if values.is_empty() { None } else { Some(0) };
    }
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in values.iter().enumerate() {
        let distance = ((*value).into() - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Round to the nearest multiple of `step`, halves going up.
pub(crate) fn round_half_up(value: f64, step: i32) -> i32 {
    let step = f64::from(step);
    ((value / step + 0.5 + HALF_POINT_EPSILON).floor() * step) as i32
}

/// Frequency and level axes of an audiogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid", rename_all = "kebab-case")]
pub struct AudiogramGrid {
    frequencies: Vec<u32>,
    levels: Vec<i32>,
    level_step: i32,
}

#[derive(Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawGrid {
    frequencies: Vec<u32>,
    levels: Vec<i32>,
    level_step: i32,
}

impl Default for RawGrid {
    fn default() -> Self {
        let grid = AudiogramGrid::default();
        Self {
            frequencies: grid.frequencies,
            levels: grid.levels,
            level_step: grid.level_step,
        }
    }
}

impl TryFrom<RawGrid> for AudiogramGrid {
    type Error = AudiologyError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        AudiogramGrid::new(raw.frequencies, raw.levels, raw.level_step)
    }
}

impl Default for AudiogramGrid {
    fn default() -> Self {
        Self {
            frequencies: STANDARD_FREQUENCIES.to_vec(),
            levels: (MIN_LEVEL_DB..=MAX_LEVEL_DB)
                .step_by(LEVEL_STEP_DB as usize)
                .collect(),
            level_step: LEVEL_STEP_DB,
        }
    }
}

impl AudiogramGrid {
    /// Build a grid, checking that both axes have at least two strictly
    /// increasing entries, frequencies are positive, the step is positive and
    /// both ends of the level axis sit on the step.
    pub fn new(
        frequencies: Vec<u32>,
        levels: Vec<i32>,
        level_step: i32,
    ) -> Result<Self, AudiologyError> {
        if frequencies.len() < 2 {
            return Err(AudiologyError::InvalidConfig(
                "grid needs at least two frequencies".to_string(),
            ));
        }
        if frequencies[0] == 0 {
            return Err(AudiologyError::InvalidConfig(
                "frequencies must be positive (log axis)".to_string(),
            ));
        }
        if !frequencies.windows(2).all(|w| w[0] < w[1]) {
            return Err(AudiologyError::InvalidConfig(
                "frequencies must be strictly increasing".to_string(),
            ));
        }
        if levels.len() < 2 {
            return Err(AudiologyError::InvalidConfig(
                "grid needs at least two levels".to_string(),
            ));
        }
        if !levels.windows(2).all(|w| w[0] < w[1]) {
            return Err(AudiologyError::InvalidConfig(
                "levels must be strictly increasing".to_string(),
            ));
        }
        if level_step <= 0 {
            return Err(AudiologyError::InvalidConfig(format!(
                "level step must be positive, got {}",
                level_step
            )));
        }
        let (first, last) = (levels[0], levels[levels.len() - 1]);
        if first.rem_euclid(level_step) != 0 || last.rem_euclid(level_step) != 0 {
            return Err(AudiologyError::InvalidConfig(format!(
                "level range {}..{} must start and end on a multiple of the {} dB step",
                first, last, level_step
            )));
        }

        Ok(Self {
            frequencies,
            levels,
            level_step,
        })
    }

    pub fn frequencies(&self) -> &[u32] {
        &self.frequencies
    }

    pub fn levels(&self) -> &[i32] {
        &self.levels
    }

    pub fn level_step(&self) -> i32 {
        self.level_step
    }

    pub fn min_frequency(&self) -> u32 {
        self.frequencies[0]
    }

    pub fn max_frequency(&self) -> u32 {
        self.frequencies[self.frequencies.len() - 1]
    }

    pub fn min_level(&self) -> i32 {
        self.levels[0]
    }

    pub fn max_level(&self) -> i32 {
        self.levels[self.levels.len() - 1]
    }

    pub fn is_standard_frequency(&self, hz: u32) -> bool {
        self.frequencies.binary_search(&hz).is_ok()
    }

    /// Position of the standard frequency closest to `hz`.
    pub fn nearest_frequency_index(&self, hz: f64) -> usize {
        nearest_index(&self.frequencies, hz).unwrap_or(0)
    }

    /// Standard frequency closest to `hz` (ties go to the lower one).
    pub fn nearest_frequency(&self, hz: f64) -> u32 {
        self.frequencies[self.nearest_frequency_index(hz)]
    }

    /// Frequency under a normalized X position, read off the log axis.
    ///
    /// `x` is expected in [0, 1]; callers clamp first.
    pub fn frequency_at(&self, x: f64) -> f64 {
        let lo = f64::from(self.min_frequency()).ln();
        let hi = f64::from(self.max_frequency()).ln();
        (lo + x * (hi - lo)).exp()
    }

    /// Level under a normalized Y position (0 = top = quietest).
    pub fn level_at(&self, y: f64) -> f64 {
        let lo = f64::from(self.min_level());
        let hi = f64::from(self.max_level());
        lo + y * (hi - lo)
    }

    pub fn clamp_level(&self, db: f64) -> f64 {
        db.clamp(f64::from(self.min_level()), f64::from(self.max_level()))
    }

    /// Snap a raw level to the grid step (round half up), then clamp to range.
    pub fn snap_level(&self, db: f64) -> i32 {
        round_half_up(db, self.level_step).clamp(self.min_level(), self.max_level())
    }

    /// Fractional index of `db` in the level sequence.
    ///
    /// Levels between two entries interpolate linearly between their indices.
    pub fn level_position(&self, db: f64) -> f64 {
        let db = self.clamp_level(db);
        for (i, pair) in self.levels.windows(2).enumerate() {
            let (lo, hi) = (f64::from(pair[0]), f64::from(pair[1]));
            if db <= hi {
                return i as f64 + (db - lo) / (hi - lo);
            }
        }
        (self.levels.len() - 1) as f64
    }
}

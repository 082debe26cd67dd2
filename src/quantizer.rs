//! # Coordinate Quantizer
//!
//! Maps between positions on the audiogram plot and clinically valid test
//! points.
//!
//! ## Forward: plot -> test point
//! - X is read off the log frequency axis, then snapped to the nearest
//!   standard frequency (by Hz, ties go to the lower frequency)
//! - Y is read off the linear level axis (0 = top = quietest), rounded half
//!   up to the grid step, then clamped to the level range
//! - Positions outside [0, 1] are clamped, never rejected
//!
//! ## Inverse: test point -> plot
//! - X is the frequency's *index* spread evenly over [0, 1], so markers land
//!   exactly on the drawn grid lines
//! - Y is the level's (fractional) index in the level sequence
//!
//! On an octave-spaced grid the index and log positions coincide, which is
//! what makes `quantize(project_to_plot(f, l)) == (f, l)` hold.
//!
//! ## Example
//! ```rust
//! use audiology::{project_to_plot, quantize, AudiogramGrid};
//!
//! let grid = AudiogramGrid::default();
//! let point = quantize(&grid, 0.5, 0.4);
//! assert_eq!(point.frequency, 1000);
//! assert_eq!(point.level, 40);
//!
//! let pos = project_to_plot(&grid, 1000.0, 40.0);
//! assert_eq!(quantize(&grid, pos.x, pos.y), point);
//! ```

use crate::grid::AudiogramGrid;
use crate::masking::{Conduction, Ear};
use serde::{Deserialize, Serialize};

/// A (frequency, level) pair that sits on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPoint {
    pub frequency: u32,
    pub level: i32,
}

/// Normalized position inside the plot rectangle, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPosition {
    pub x: f64,
    pub y: f64,
}

/// A recorded response (or no-response) on the audiogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdPoint {
    pub frequency: u32,
    pub level: i32,
    pub ear: Ear,
    pub conduction: Conduction,
    pub response_obtained: bool,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Nearest valid test point under a normalized plot position.
pub fn quantize(grid: &AudiogramGrid, x: f64, y: f64) -> TestPoint {
    let x = clamp_unit(x);
    let y = clamp_unit(y);

    let hz = grid.frequency_at(x);
    let frequency = grid.nearest_frequency(hz);
    let level = grid.snap_level(grid.level_at(y));

    tracing::trace!(x, y, hz, frequency, level, "quantized plot position");
    TestPoint { frequency, level }
}

/// Normalized plot position for drawing a marker at `frequency` / `level`.
///
/// Off-grid frequencies are first replaced by the nearest standard one and the
/// level is clamped to the grid range.
pub fn project_to_plot(grid: &AudiogramGrid, frequency: f64, level: f64) -> PlotPosition {
    let last_frequency = (grid.frequencies().len() - 1) as f64;
    let last_level = (grid.levels().len() - 1) as f64;

    let index = grid.nearest_frequency_index(frequency);
    let level = if level.is_nan() {
        f64::from(grid.min_level())
    } else {
        level
    };

    PlotPosition {
        x: index as f64 / last_frequency,
        y: grid.level_position(level) / last_level,
    }
}

/// Quantize a click and stamp it as a threshold for `ear` / `conduction`.
pub fn record_point(
    grid: &AudiogramGrid,
    x: f64,
    y: f64,
    ear: Ear,
    conduction: Conduction,
    response_obtained: bool,
) -> ThresholdPoint {
    let TestPoint { frequency, level } = quantize(grid, x, y);
    ThresholdPoint {
        frequency,
        level,
        ear,
        conduction,
        response_obtained,
    }
}

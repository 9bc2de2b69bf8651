//! Piecewise-Linear Rainfall Calibration
//!
//! ## Motivation
//!
//! The resistive rain board is anything but linear: surface wetting, droplet
//! bridging, and supply-voltage sag all bend the raw-value-to-rate curve.
//! Rather than model that, the node carries a small table of measured
//! breakpoints and interpolates between them: the same
//! memory-for-computation trade the rest of the pipeline makes.
//!
//! ## Table Design
//!
//! Breakpoints are ordered by **strictly decreasing raw value**: a dry board
//! reads high, a soaked one reads low, so the natural table order runs from
//! (3500, 0 mm/h) down to (500, 10 mm/h). Lookups scan consecutive pairs and
//! interpolate inside the first bracketing pair.
//!
//! Inputs outside the calibrated span return 0. That is policy, not an
//! error: readings drier than the driest breakpoint carry no rain signal,
//! and readings wetter than the wettest are already past the curve's
//! saturation point, where the regression estimate takes over as the
//! cross-check.
//!
//! ## Loading
//!
//! Deployments can replace the built-in curve with a line-delimited `x,y`
//! source (storage I/O happens outside this crate: the loader hands in a
//! `&str`). Malformed lines are skipped, and a source that yields nothing
//! degrades to an empty table whose lookups all return 0. Load problems are
//! logged, never fatal.

use heapless::Vec;

use crate::constants::{BUILTIN_CURVE, MAX_BREAKPOINTS};
use crate::units::round2;

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// One measured point on the calibration curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    /// Raw ADC value at which the rate was measured
    pub raw: f32,
    /// Reference rainfall rate in mm/h
    pub rate: f32,
}

/// Ordered breakpoint table with piecewise-linear lookup
///
/// Fixed capacity, read-only after load, shared by reference for the
/// process lifetime.
#[derive(Debug, Clone, Default)]
pub struct CalibrationTable {
    points: Vec<Breakpoint, MAX_BREAKPOINTS>,
}

impl CalibrationTable {
    /// Table with no breakpoints; every lookup returns 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in seven-point curve.
    pub fn builtin() -> Self {
        let mut points = Vec::new();
        for &(raw, rate) in BUILTIN_CURVE.iter() {
            // Capacity is checked against the curve length in tests
            let _ = points.push(Breakpoint { raw, rate });
        }
        Self { points }
    }

    /// Parse a line-delimited `x,y` calibration source.
    ///
    /// Lines that do not parse as two comma-separated reals are skipped.
    /// Points past the table capacity are dropped. Never fails: the worst
    /// input yields an empty table.
    pub fn from_csv(source: &str) -> Self {
        let mut points: Vec<Breakpoint, MAX_BREAKPOINTS> = Vec::new();
        let mut skipped = 0usize;

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_breakpoint(line) {
                Some(point) => {
                    if points.push(point).is_err() {
                        log_warn!("calibration source exceeds {} points; rest dropped", MAX_BREAKPOINTS);
                        break;
                    }
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log_warn!("calibration load: skipped {} malformed line(s)", skipped);
        }
        if points.is_empty() {
            log_warn!("calibration load: no usable points, interpolation disabled");
        }

        Self { points }
    }

    /// Interpolated rate for a raw sensor value.
    ///
    /// Scans consecutive pairs in table order (decreasing raw) and linearly
    /// interpolates inside the first pair that brackets `raw`, rounded to
    /// two decimals. Values outside the covered span (including every
    /// lookup against a table of fewer than two points) return 0.
    pub fn lookup(&self, raw: f32) -> f32 {
        for pair in self.points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            if p0.raw >= raw && raw >= p1.raw {
                let slope = (p1.rate - p0.rate) / (p1.raw - p0.raw);
                return round2(p0.rate + slope * (raw - p0.raw));
            }
        }
        0.0
    }

    /// Number of breakpoints loaded.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table holds no breakpoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The loaded breakpoints, in table order.
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }
}

fn parse_breakpoint(line: &str) -> Option<Breakpoint> {
    let (x, y) = line.split_once(',')?;
    let raw = x.trim().parse::<f32>().ok()?;
    let rate = y.trim().parse::<f32>().ok()?;
    Some(Breakpoint { raw, rate })
}

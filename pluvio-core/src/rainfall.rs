//! Rainfall Estimation from the Raw ADC Value
//!
//! Produces three views of the same reading:
//!
//! - a discrete [`RainClass`] for the dashboard,
//! - a closed-form **regression** rate fitted through the sensor's two
//!   anchor points,
//! - a table-driven **interpolation** rate from the calibration curve.
//!
//! The two rates are deliberately redundant. They are independent estimates
//! computed side by side every cycle, not a fallback chain: divergence
//! between them on the dashboard is the operator's cue that the board has
//! drifted off its calibration.
//!
//! Callers must validate the reading against the ADC domain first (the
//! acquisition cycle does); estimation itself never rejects input.

use crate::calibration::CalibrationTable;
use crate::constants::{
    LIGHT_RAIN_MIN_RAW, MODERATE_RAIN_MIN_RAW, NO_RAIN_MIN_RAW, REGRESSION_DRY_ANCHOR,
    REGRESSION_WET_ANCHOR,
};
use crate::units::round2;

/// Discrete rain intensity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RainClass {
    /// Dry board: raw value ≥ 3000
    NoRain,
    /// Raw value in [2000, 3000)
    LightRain,
    /// Raw value in [1000, 2000)
    ModerateRain,
    /// Raw value below 1000, down to the configured floor
    HeavyRain,
    /// Reading below the heavy-rain floor: electrically implausible
    SensorError,
}

impl RainClass {
    /// Dashboard label for this classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRain => "No Rain",
            Self::LightRain => "Light Rain",
            Self::ModerateRain => "Moderate Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::SensorError => "Sensor Error",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RainClass {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str());
    }
}

/// Lower bound of the heavy-rain band.
///
/// Field units disagree on whether a raw reading of 0 is the sensor pinned
/// by a downpour or a broken wire. This is a per-deployment judgment, so it
/// is a named configuration choice rather than a constant:
///
/// - [`One`](Self::One) (default): 0 is classified [`RainClass::SensorError`],
///   the strict reading; a healthy board never quite reaches 0.
/// - [`Zero`](Self::Zero): 0 is still [`RainClass::HeavyRain`]; the error
///   class is unreachable for in-domain input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeavyRainFloor {
    /// Heavy rain requires raw ≥ 1; raw 0 reads as a sensor error.
    #[default]
    One,
    /// Heavy rain extends down to raw 0.
    Zero,
}

impl HeavyRainFloor {
    fn min_raw(self) -> u16 {
        match self {
            Self::One => 1,
            Self::Zero => 0,
        }
    }
}

/// Paired rainfall estimates for one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RainEstimate {
    /// Discrete intensity class
    pub classification: RainClass,
    /// Closed-form regression rate, mm/h, never negative
    pub regression_mm_h: f32,
    /// Calibration-table interpolation rate, mm/h, never negative
    pub interpolation_mm_h: f32,
}

/// Rainfall estimator owning the calibration table.
#[derive(Debug, Clone)]
pub struct RainfallEstimator {
    table: CalibrationTable,
    heavy_floor: HeavyRainFloor,
}

impl RainfallEstimator {
    /// Build an estimator around a loaded calibration table.
    pub fn new(table: CalibrationTable, heavy_floor: HeavyRainFloor) -> Self {
        Self { table, heavy_floor }
    }

    /// Classify a validated raw reading, highest threshold first.
    pub fn classify(&self, raw: u16) -> RainClass {
        if raw >= NO_RAIN_MIN_RAW {
            RainClass::NoRain
        } else if raw >= LIGHT_RAIN_MIN_RAW {
            RainClass::LightRain
        } else if raw >= MODERATE_RAIN_MIN_RAW {
            RainClass::ModerateRain
        } else if raw >= self.heavy_floor.min_raw() {
            RainClass::HeavyRain
        } else {
            RainClass::SensorError
        }
    }

    /// Regression rate: the line through the wet and dry anchor points.
    ///
    /// Extrapolation past the dry anchor goes negative; the clamp to 0 is
    /// mandatory: a negative rate is nonphysical.
    pub fn regression_rate(&self, raw: u16) -> f32 {
        let (x1, y1) = REGRESSION_WET_ANCHOR;
        let (x2, y2) = REGRESSION_DRY_ANCHOR;
        let a = (y2 - y1) / (x2 - x1);
        let b = y1 - a * x1;
        round2(a * raw as f32 + b).max(0.0)
    }

    /// Interpolation rate from the calibration table.
    pub fn interpolation_rate(&self, raw: u16) -> f32 {
        self.table.lookup(raw as f32)
    }

    /// All three views of one validated reading.
    pub fn estimate(&self, raw: u16) -> RainEstimate {
        RainEstimate {
            classification: self.classify(raw),
            regression_mm_h: self.regression_rate(raw),
            interpolation_mm_h: self.interpolation_rate(raw),
        }
    }
}

impl Default for RainfallEstimator {
    fn default() -> Self {
        Self::new(CalibrationTable::builtin(), HeavyRainFloor::default())
    }
}

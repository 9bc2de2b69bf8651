//! Container Water Level from Measured Distance
//!
//! The ranger looks straight down at the water surface, so the remaining
//! level is the container height minus the measured distance. Height is a
//! per-installation calibration constant (19.5 cm and 30 cm in the two
//! deployments to date) and always comes in through configuration.
//!
//! A missing or out-of-geometry measurement yields `faulted = true` with the
//! level pinned at the 0.0 sentinel. The flag is authoritative: a genuine
//! brim-empty reading of 0.0 arrives with `faulted = false`.

use crate::errors::SensorError;
use crate::units::round2;

/// Resolved water level for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterLevelResult {
    /// Remaining water level in cm; 0.0 sentinel when faulted
    pub level_cm: f32,
    /// Whether the measurement failed or fell outside the container geometry
    pub faulted: bool,
}

/// Converts a distance measurement into a container water level.
#[derive(Debug, Clone, Copy)]
pub struct WaterLevelResolver {
    container_height_cm: f32,
}

impl WaterLevelResolver {
    /// Resolver for a container of the given height.
    pub fn new(container_height_cm: f32) -> Self {
        Self {
            container_height_cm,
        }
    }

    /// The configured container height in cm.
    pub fn container_height_cm(&self) -> f32 {
        self.container_height_cm
    }

    /// Resolve a measurement into a level, flagging geometry violations.
    ///
    /// A distance below 0 or beyond the container height cannot be a real
    /// surface inside the container, so it faults rather than producing a
    /// nonsense level.
    pub fn resolve(&self, distance_cm: Result<f32, SensorError>) -> WaterLevelResult {
        match distance_cm {
            Ok(d) if (0.0..=self.container_height_cm).contains(&d) => WaterLevelResult {
                level_cm: round2(self.container_height_cm - d),
                faulted: false,
            },
            _ => WaterLevelResult {
                level_cm: 0.0,
                faulted: true,
            },
        }
    }
}

//! Acquisition engine for the pluvio sensing node
//!
//! Samples a resistive rain sensor (12-bit ADC) and an HC-SR04-class
//! ultrasonic ranger, derives calibrated rainfall rates and a container
//! water level, and decides the adaptive sleep interval between cycles.
//!
//! Key constraints:
//! - Runs on ESP32-class hardware (battery powered, duty-cycled)
//! - No heap allocation in the sampling path
//! - Every fault is contained within the cycle that produced it
//!
//! ```
//! use pluvio_core::{CalibrationTable, RainClass, RainfallEstimator};
//!
//! let estimator = RainfallEstimator::new(CalibrationTable::builtin(), Default::default());
//!
//! let estimate = estimator.estimate(2600);
//! assert_eq!(estimate.classification, RainClass::LightRain);
//! assert!(estimate.regression_mm_h >= 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod calibration;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod errors;
pub mod level;
pub mod rainfall;
pub mod ranging;
pub mod time;
pub mod units;

// Public API
pub use calibration::{Breakpoint, CalibrationTable};
pub use config::NodeConfig;
pub use cycle::{
    AcquisitionCycle, CycleOutcome, CycleResult, CycleSink, DistanceSensor, FaultPolicy,
    RainSensor, SleepPolicy,
};
pub use errors::{SensorError, SensorResult};
pub use level::{WaterLevelResolver, WaterLevelResult};
pub use rainfall::{HeavyRainFloor, RainClass, RainEstimate, RainfallEstimator};
pub use ranging::PulseTimer;
pub use time::{Clock, Timestamp};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

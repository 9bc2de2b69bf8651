//! Tuning Constants for the Sensing Node
//!
//! Every number that describes the physical installation or the sensor
//! protocol lives here. Values that vary between deployments (container
//! height, sleep policy, classification floor) also have configuration
//! entry points in [`crate::config`]; the constants below are the defaults.

/// Upper bound of the rain sensor ADC domain (12-bit converter, 0-3.3 V).
pub const ADC_MAX: u16 = 4095;

/// Settle time with the trigger line held low before the pulse, in µs.
pub const TRIGGER_SETTLE_US: u32 = 2;

/// Trigger pulse width, in µs. The HC-SR04 datasheet minimum is 10 µs.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Poll budget for each echo transition, in µs.
///
/// 30 ms of one-way flight covers ~5 m of range, past the sensor's rated
/// maximum; exceeding it means the echo was lost, not that the target is far.
pub const ECHO_TIMEOUT_US: u32 = 30_000;

/// Round-trip echo time per centimeter of distance, in µs.
///
/// Speed of sound in air at ~20 °C is 343 m/s, i.e. 29.1 µs/cm one way;
/// the pulse width is halved before applying this divisor.
pub const ROUND_TRIP_US_PER_CM: f32 = 29.1;

/// Lowest raw value classified as "No Rain".
pub const NO_RAIN_MIN_RAW: u16 = 3000;

/// Lowest raw value classified as "Light Rain".
pub const LIGHT_RAIN_MIN_RAW: u16 = 2000;

/// Lowest raw value classified as "Moderate Rain".
pub const MODERATE_RAIN_MIN_RAW: u16 = 1000;

/// Wet anchor of the regression line: heavy rain saturates the sensor low.
pub const REGRESSION_WET_ANCHOR: (f32, f32) = (500.0, 10.0);

/// Dry anchor of the regression line: a dry board reads high.
pub const REGRESSION_DRY_ANCHOR: (f32, f32) = (3500.0, 0.0);

/// Built-in calibration curve, ordered by strictly decreasing raw value.
///
/// Measured against a reference tipping-bucket gauge; raw readings above
/// 3500 or below 500 fall outside the calibrated range and read as 0 mm/h.
pub const BUILTIN_CURVE: [(f32, f32); 7] = [
    (3500.0, 0.0),
    (3000.0, 1.0),
    (2500.0, 2.5),
    (2000.0, 4.0),
    (1500.0, 6.5),
    (1000.0, 8.0),
    (500.0, 10.0),
];

/// Maximum number of breakpoints a calibration table holds.
pub const MAX_BREAKPOINTS: usize = 16;

/// Raw values at or above this are "dry enough" for the long sleep.
pub const DRY_RAW_THRESHOLD: u16 = 3200;

/// Sleep between cycles when dry, in ms.
pub const DRY_SLEEP_MS: u32 = 10_000;

/// Sleep between cycles when wet or faulted, in ms.
pub const WET_SLEEP_MS: u32 = 5_000;

/// Default container height, in cm. Per-installation; see [`crate::config`].
pub const DEFAULT_CONTAINER_HEIGHT_CM: f32 = 19.5;

//! The Acquisition Cycle State Machine
//!
//! ## Overview
//!
//! One cycle runs Sampling → Estimating → Reporting → Sleeping and loops
//! forever; there is no terminal state, only external power-off. The cycle
//! owns its sensors exclusively and produces a fresh [`CycleResult`] each
//! round: nothing except the calibration table survives between rounds.
//!
//! ```text
//! ┌─> Sampling ─> Estimating ─> Reporting ─> Sleeping ─┐
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fault containment
//!
//! Every fault is absorbed within the cycle that produced it:
//!
//! - an invalid raw reading marks `rain_sensor_faulted` and skips
//!   estimation (the water level still resolves: the two sensors are
//!   independent);
//! - a ranging failure becomes a water-level fault, never a crash;
//! - the reporting seam ([`CycleSink`]) is infallible by design: sink
//!   implementations contain their own transport failures.
//!
//! ## Duty cycle
//!
//! The sleep between rounds adapts to what the sensor saw: a dry board
//! sleeps long, a wet or faulted one samples again sooner. That single
//! policy is the node's whole battery-vs-responsiveness trade.

use embedded_hal::delay::DelayNs;

use crate::calibration::CalibrationTable;
use crate::config::NodeConfig;
use crate::constants::{ADC_MAX, DRY_RAW_THRESHOLD, DRY_SLEEP_MS, WET_SLEEP_MS};
use crate::errors::{SensorError, SensorResult};
use crate::level::{WaterLevelResolver, WaterLevelResult};
use crate::rainfall::{RainEstimate, RainfallEstimator};
use crate::time::{Clock, Timestamp};

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Raw analog reading seam for the rain sensor.
///
/// `None` means the converter produced nothing at all; range validation
/// against the ADC domain happens in the cycle, not here.
pub trait RainSensor {
    /// Read one raw sample.
    fn read_raw(&mut self) -> Option<u16>;
}

/// Distance measurement seam, implemented by [`crate::PulseTimer`].
pub trait DistanceSensor {
    /// Measure the distance to the water surface, in cm.
    fn measure_distance(&mut self) -> SensorResult<f32>;
}

/// Receives each cycle's result.
///
/// Infallible at this seam: implementations catch and log their own
/// transport failures so a slow or dead sink can never stall sampling.
pub trait CycleSink {
    /// Consume one cycle result.
    fn report(&mut self, result: &CycleResult);
}

/// Discards every result. Useful for soak tests and dry runs.
impl CycleSink for () {
    fn report(&mut self, _result: &CycleResult) {}
}

/// What reporting does when the rain sensor faults.
///
/// The ultrasonic sensor never suppresses a report either way: its status
/// travels on a dedicated marker channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaultPolicy {
    /// Suppress the cycle's telemetry entirely (strict deployment behavior).
    #[default]
    SuppressCycle,
    /// Report anyway; sinks substitute explicit fault markers.
    MarkAndSend,
}

/// Adaptive duty-cycle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SleepPolicy {
    /// Valid readings at or above this are dry enough for the long sleep
    pub dry_raw_threshold: u16,
    /// Sleep when dry, in ms
    pub dry_ms: u32,
    /// Sleep when wet, invalid, or absent, in ms
    pub wet_ms: u32,
}

impl Default for SleepPolicy {
    fn default() -> Self {
        Self {
            dry_raw_threshold: DRY_RAW_THRESHOLD,
            dry_ms: DRY_SLEEP_MS,
            wet_ms: WET_SLEEP_MS,
        }
    }
}

impl SleepPolicy {
    /// Sleep duration after a cycle that saw `raw` (validated, or `None`
    /// when the reading was absent or out of range).
    pub fn next_sleep_ms(&self, raw: Option<u16>) -> u32 {
        match raw {
            Some(value) if value >= self.dry_raw_threshold => self.dry_ms,
            _ => self.wet_ms,
        }
    }
}

/// Everything one cycle produced. Built fresh, consumed, discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleResult {
    /// Cycle start timestamp, µs (wall clock when the node runs one)
    pub captured_at: Timestamp,
    /// Validated raw reading; `None` when absent or out of range
    pub raw_value: Option<u16>,
    /// Rainfall estimates; skipped when the rain sensor faulted
    pub estimate: Option<RainEstimate>,
    /// Resolved container water level
    pub water_level: WaterLevelResult,
    /// Raw reading was absent or outside the ADC domain
    pub rain_sensor_faulted: bool,
    /// Ranging timed out, faulted, or fell outside the container
    pub ultrasonic_faulted: bool,
}

/// One cycle's result plus the sleep that follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    /// The assembled result record
    pub result: CycleResult,
    /// Sleep before the next cycle, in ms
    pub next_sleep_ms: u32,
}

/// The acquisition loop: owns the sensors, runs the state machine.
pub struct AcquisitionCycle<R, D, C> {
    rain: R,
    ranger: D,
    clock: C,
    estimator: RainfallEstimator,
    resolver: WaterLevelResolver,
    sleep: SleepPolicy,
    fault_policy: FaultPolicy,
}

impl<R, D, C> AcquisitionCycle<R, D, C>
where
    R: RainSensor,
    D: DistanceSensor,
    C: Clock,
{
    /// Assemble a cycle from owned sensors, a clock, a loaded calibration
    /// table, and the deployment configuration.
    pub fn new(rain: R, ranger: D, clock: C, table: CalibrationTable, config: NodeConfig) -> Self {
        Self {
            rain,
            ranger,
            clock,
            estimator: RainfallEstimator::new(table, config.heavy_rain_floor),
            resolver: WaterLevelResolver::new(config.container_height_cm),
            sleep: config.sleep,
            fault_policy: config.fault_policy,
        }
    }

    /// Run Sampling and Estimating once; returns the result and the sleep
    /// that should follow. Does not report or sleep: [`step`](Self::step)
    /// wraps this with both.
    pub fn run_once(&mut self) -> CycleOutcome {
        let captured_at = self.clock.now_micros();

        // Sampling
        let raw = self.rain.read_raw();
        let validated = validate_raw(raw);
        let distance = self.ranger.measure_distance();

        if let Err(fault) = validated {
            log_warn!("rain sensor fault: {:?}", fault);
        }
        if let Err(fault) = distance {
            log_warn!("ultrasonic fault: {:?}", fault);
        }

        // Estimating: skipped entirely on a rain-sensor fault
        let estimate = validated.ok().map(|value| self.estimator.estimate(value));
        let water_level = self.resolver.resolve(distance);

        let result = CycleResult {
            captured_at,
            raw_value: validated.ok(),
            estimate,
            water_level,
            rain_sensor_faulted: validated.is_err(),
            ultrasonic_faulted: water_level.faulted,
        };

        log_debug!(
            "cycle: raw={:?} estimate={:?} level={:?}",
            result.raw_value,
            result.estimate,
            result.water_level
        );

        CycleOutcome {
            result,
            next_sleep_ms: self.sleep.next_sleep_ms(validated.ok()),
        }
    }

    /// Whether this result goes to the sink under the configured policy.
    pub fn should_report(&self, result: &CycleResult) -> bool {
        match self.fault_policy {
            FaultPolicy::SuppressCycle => !result.rain_sensor_faulted,
            FaultPolicy::MarkAndSend => true,
        }
    }

    /// One full iteration: sample, estimate, report, sleep.
    pub fn step<S: CycleSink, DL: DelayNs>(&mut self, sink: &mut S, delay: &mut DL) {
        let outcome = self.run_once();
        if self.should_report(&outcome.result) {
            sink.report(&outcome.result);
        } else {
            log_debug!("telemetry suppressed for faulted cycle");
        }
        delay.delay_ms(outcome.next_sleep_ms);
    }

    /// Run the loop forever. Termination is external power-off only.
    pub fn run<S: CycleSink, DL: DelayNs>(&mut self, sink: &mut S, delay: &mut DL) -> ! {
        loop {
            self.step(sink, delay);
        }
    }
}

/// Check a raw reading against the 12-bit ADC domain.
fn validate_raw(raw: Option<u16>) -> SensorResult<u16> {
    match raw {
        None => Err(SensorError::RawMissing),
        Some(value) if value > ADC_MAX => Err(SensorError::RawOutOfRange {
            value,
            min: 0,
            max: ADC_MAX,
        }),
        Some(value) => Ok(value),
    }
}

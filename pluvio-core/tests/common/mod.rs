//! Shared mocks for integration tests
//!
//! Scripted sensor doubles that replay a fixed sequence of readings, plus
//! recording doubles for the sink and delay seams. Everything here is
//! deterministic: no timers, no hardware.

#![allow(dead_code)]

use std::collections::VecDeque;

use pluvio_core::{CycleResult, CycleSink, DistanceSensor, RainSensor, SensorResult};

/// Rain ADC double replaying a scripted sequence; repeats the last entry.
pub struct ScriptedRain {
    readings: VecDeque<Option<u16>>,
    last: Option<u16>,
}

impl ScriptedRain {
    pub fn new(readings: impl IntoIterator<Item = Option<u16>>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            last: None,
        }
    }
}

impl RainSensor for ScriptedRain {
    fn read_raw(&mut self) -> Option<u16> {
        if let Some(next) = self.readings.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Ranger double replaying scripted measurements; repeats the last entry.
pub struct ScriptedRanger {
    measurements: VecDeque<SensorResult<f32>>,
    last: SensorResult<f32>,
}

impl ScriptedRanger {
    pub fn new(measurements: impl IntoIterator<Item = SensorResult<f32>>) -> Self {
        Self {
            measurements: measurements.into_iter().collect(),
            last: Ok(0.0),
        }
    }
}

impl DistanceSensor for ScriptedRanger {
    fn measure_distance(&mut self) -> SensorResult<f32> {
        if let Some(next) = self.measurements.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Sink double that keeps every reported result.
#[derive(Default)]
pub struct RecordingSink {
    pub reports: Vec<CycleResult>,
}

impl CycleSink for RecordingSink {
    fn report(&mut self, result: &CycleResult) {
        self.reports.push(*result);
    }
}

/// Delay double that records each requested sleep in ms.
///
/// `DelayNs` chunks long sleeps into multiple `delay_ns` calls, so the
/// double accumulates ns and closes an entry on `end_sleep`.
#[derive(Default)]
pub struct RecordingDelay {
    pending_ns: u64,
    pub sleeps_ms: Vec<u64>,
}

impl RecordingDelay {
    /// Close the current accumulation as one recorded sleep.
    pub fn end_sleep(&mut self) {
        self.sleeps_ms.push(self.pending_ns / 1_000_000);
        self.pending_ns = 0;
    }
}

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.pending_ns += ns as u64;
    }
}

//! Fault Reporting Policies
//!
//! Shows how the two named fault policies treat the same failing rain
//! sensor: `SuppressCycle` drops the cycle's telemetry entirely, while
//! `MarkAndSend` reports it so sinks can substitute fault markers.
//!
//! Run with: cargo run --example 02_fault_policies

use pluvio_core::time::FixedClock;
use pluvio_core::{
    AcquisitionCycle, CalibrationTable, CycleResult, CycleSink, DistanceSensor, FaultPolicy,
    NodeConfig, RainSensor, SensorResult,
};

/// A rain board whose wiring has come loose.
struct DeadRainBoard;

impl RainSensor for DeadRainBoard {
    fn read_raw(&mut self) -> Option<u16> {
        None
    }
}

/// A healthy ranger.
struct SimulatedRanger;

impl DistanceSensor for SimulatedRanger {
    fn measure_distance(&mut self) -> SensorResult<f32> {
        Ok(4.0)
    }
}

/// Prints what a real telemetry sink would transmit.
struct PrintingSink;

impl CycleSink for PrintingSink {
    fn report(&mut self, result: &CycleResult) {
        println!(
            "  -> reported: rain_faulted={} level={} cm",
            result.rain_sensor_faulted, result.water_level.level_cm
        );
    }
}

fn run_policy(policy: FaultPolicy) {
    println!("policy {:?}:", policy);

    let mut cycle = AcquisitionCycle::new(
        DeadRainBoard,
        SimulatedRanger,
        FixedClock::new(0),
        CalibrationTable::builtin(),
        NodeConfig::default().with_fault_policy(policy),
    );

    let outcome = cycle.run_once();
    if cycle.should_report(&outcome.result) {
        PrintingSink.report(&outcome.result);
    } else {
        println!("  -> telemetry suppressed for this cycle");
    }
    println!("  -> sleeping {} ms (fault means sample again soon)", outcome.next_sleep_ms);
}

fn main() {
    run_policy(FaultPolicy::SuppressCycle);
    run_policy(FaultPolicy::MarkAndSend);
}

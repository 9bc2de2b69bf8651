//! Single Acquisition Cycle
//!
//! Runs one cycle of the full pipeline over simulated sensors: a wet rain
//! board and a ranger seeing the water surface 10 cm below the rim sensor.
//!
//! Run with: cargo run --example 01_single_cycle

use pluvio_core::time::FixedClock;
use pluvio_core::{
    AcquisitionCycle, CalibrationTable, DistanceSensor, NodeConfig, RainSensor, SensorResult,
};

/// A rain board reading a steady, moderately wet value.
struct SimulatedRainBoard {
    raw: u16,
}

impl RainSensor for SimulatedRainBoard {
    fn read_raw(&mut self) -> Option<u16> {
        Some(self.raw)
    }
}

/// A ranger that always sees the surface at a fixed distance.
struct SimulatedRanger {
    distance_cm: f32,
}

impl DistanceSensor for SimulatedRanger {
    fn measure_distance(&mut self) -> SensorResult<f32> {
        Ok(self.distance_cm)
    }
}

fn main() {
    let mut cycle = AcquisitionCycle::new(
        SimulatedRainBoard { raw: 1500 },
        SimulatedRanger { distance_cm: 10.0 },
        FixedClock::new(0),
        CalibrationTable::builtin(),
        NodeConfig::default(),
    );

    let outcome = cycle.run_once();
    let result = outcome.result;

    println!("raw value:      {:?}", result.raw_value);
    if let Some(estimate) = result.estimate {
        println!("classification: {}", estimate.classification.as_str());
        println!("regression:     {} mm/h", estimate.regression_mm_h);
        println!("interpolation:  {} mm/h", estimate.interpolation_mm_h);
    }
    println!(
        "water level:    {} cm (faulted: {})",
        result.water_level.level_cm, result.water_level.faulted
    );
    println!("next sleep:     {} ms", outcome.next_sleep_ms);
}

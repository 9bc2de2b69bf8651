//! Deployment Configuration
//!
//! Everything that legitimately varies between physical installations:
//! container height, the heavy-rain classification floor, the fault
//! reporting policy, and the duty-cycle sleep policy. Pin assignments are
//! not configuration here: pins arrive as constructed objects (platform
//! HAL types on the device, simulated pins in tests), never as numbers the
//! core interprets.
//!
//! Builder-style setters consume and return the config so deployments read
//! as one expression:
//!
//! ```
//! use pluvio_core::{config::NodeConfig, cycle::FaultPolicy};
//!
//! let config = NodeConfig::default()
//!     .with_container_height_cm(30.0)
//!     .with_fault_policy(FaultPolicy::MarkAndSend);
//! assert_eq!(config.container_height_cm, 30.0);
//! ```

use crate::constants::DEFAULT_CONTAINER_HEIGHT_CM;
use crate::cycle::{FaultPolicy, SleepPolicy};
use crate::rainfall::HeavyRainFloor;

/// Per-installation settings for the acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConfig {
    /// Container height in cm (19.5 and 30 in the two deployments to date)
    pub container_height_cm: f32,
    /// Lower bound of the heavy-rain classification band
    pub heavy_rain_floor: HeavyRainFloor,
    /// What reporting does when the rain sensor faults
    pub fault_policy: FaultPolicy,
    /// Adaptive duty-cycle policy
    pub sleep: SleepPolicy,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            container_height_cm: DEFAULT_CONTAINER_HEIGHT_CM,
            heavy_rain_floor: HeavyRainFloor::default(),
            fault_policy: FaultPolicy::default(),
            sleep: SleepPolicy::default(),
        }
    }
}

impl NodeConfig {
    /// Set the container height for this installation.
    pub fn with_container_height_cm(mut self, height_cm: f32) -> Self {
        self.container_height_cm = height_cm;
        self
    }

    /// Set the heavy-rain classification floor.
    pub fn with_heavy_rain_floor(mut self, floor: HeavyRainFloor) -> Self {
        self.heavy_rain_floor = floor;
        self
    }

    /// Set the fault reporting policy.
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Replace the sleep policy.
    pub fn with_sleep_policy(mut self, sleep: SleepPolicy) -> Self {
        self.sleep = sleep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_strict_deployment() {
        let config = NodeConfig::default();

        assert_eq!(config.container_height_cm, 19.5);
        assert_eq!(config.heavy_rain_floor, HeavyRainFloor::One);
        assert_eq!(config.fault_policy, FaultPolicy::SuppressCycle);
        assert_eq!(config.sleep.dry_raw_threshold, 3200);
    }

    #[test]
    fn builder_overrides_compose() {
        let config = NodeConfig::default()
            .with_container_height_cm(30.0)
            .with_heavy_rain_floor(HeavyRainFloor::Zero)
            .with_fault_policy(FaultPolicy::MarkAndSend)
            .with_sleep_policy(SleepPolicy {
                dry_raw_threshold: 3000,
                dry_ms: 20_000,
                wet_ms: 2_000,
            });

        assert_eq!(config.container_height_cm, 30.0);
        assert_eq!(config.heavy_rain_floor, HeavyRainFloor::Zero);
        assert_eq!(config.fault_policy, FaultPolicy::MarkAndSend);
        assert_eq!(config.sleep.dry_ms, 20_000);
    }
}

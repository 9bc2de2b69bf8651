//! Dashboard Sink - One GET Per Metric Channel
//!
//! The dashboard service exposes a token-authenticated update endpoint
//! where each virtual channel is a query parameter:
//!
//! ```text
//! {base}/external/api/update?token={token}&V2=9.5
//! ```
//!
//! Six channels carry the cycle:
//!
//! | Channel | Metric                         |
//! |---------|--------------------------------|
//! | V0      | raw ADC value                  |
//! | V1      | classification label           |
//! | V2      | water level, cm                |
//! | V3      | regression rate, mm/h          |
//! | V4      | interpolation rate, mm/h       |
//! | V5      | ultrasonic status string       |
//!
//! Under the `MarkAndSend` fault policy a cycle can arrive without rain
//! metrics; those channels then carry the `"Error"` fault marker and V1
//! carries the error label, so the dashboard shows *why* the series has a
//! hole instead of silently skipping it. V2 always carries the resolved
//! level (0.0 sentinel when the ranger faulted) and V5 says whether to
//! trust it.

use std::time::Duration;

use pluvio_core::{CycleResult, RainClass};

use crate::{url_encode, ReportError, SinkStats};

/// Substituted for a numeric channel whose measurement failed.
pub const FAULT_MARKER: &str = "Error";

/// Ultrasonic status strings for the V5 channel.
const ULTRASONIC_OK: &str = "OK";
const ULTRASONIC_FAULT: &str = "Sensor Error";

/// Dashboard endpoint configuration
#[derive(Debug, Clone)]
pub struct BlynkConfig {
    /// Service base URL
    pub base_url: String,
    /// Device auth token
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl BlynkConfig {
    /// Configuration for the hosted service with a device token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: "https://blynk.cloud".into(),
            token: token.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Point at a different service instance.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// The per-channel updates one cycle produces, in send order.
///
/// Pure function of the result: the unit tests pin the channel mapping
/// and fault markers here, with no network involved.
pub fn channel_updates(result: &CycleResult) -> Vec<(&'static str, String)> {
    let mut updates = Vec::with_capacity(6);

    match result.raw_value {
        Some(raw) => updates.push(("V0", raw.to_string())),
        None => updates.push(("V0", FAULT_MARKER.into())),
    }

    match result.estimate {
        Some(estimate) => {
            updates.push(("V1", estimate.classification.as_str().into()));
            updates.push(("V2", result.water_level.level_cm.to_string()));
            updates.push(("V3", estimate.regression_mm_h.to_string()));
            updates.push(("V4", estimate.interpolation_mm_h.to_string()));
        }
        None => {
            updates.push(("V1", RainClass::SensorError.as_str().into()));
            updates.push(("V2", result.water_level.level_cm.to_string()));
            updates.push(("V3", FAULT_MARKER.into()));
            updates.push(("V4", FAULT_MARKER.into()));
        }
    }

    let status = if result.ultrasonic_faulted {
        ULTRASONIC_FAULT
    } else {
        ULTRASONIC_OK
    };
    updates.push(("V5", status.into()));

    updates
}

/// Dashboard sink over a blocking HTTP agent
pub struct BlynkSink {
    config: BlynkConfig,
    agent: ureq::Agent,
    stats: SinkStats,
}

impl BlynkSink {
    /// Build a sink, validating the endpoint configuration.
    pub fn new(config: BlynkConfig) -> Result<Self, ReportError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ReportError::Config(
                "Base URL must start with http:// or https://".into(),
            ));
        }
        if config.token.is_empty() {
            return Err(ReportError::Config("Auth token is empty".into()));
        }

        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();

        Ok(Self {
            config,
            agent,
            stats: SinkStats::default(),
        })
    }

    /// The update URL for one channel value.
    pub fn update_url(&self, channel: &str, value: &str) -> String {
        format!(
            "{}/external/api/update?token={}&{}={}",
            self.config.base_url,
            self.config.token,
            channel,
            url_encode(value)
        )
    }

    /// Send every channel of one cycle, sequentially and un-retried.
    ///
    /// A failed channel does not stop the rest: partial dashboards beat
    /// empty ones. The first error is returned after all channels have had
    /// their attempt.
    pub fn send_cycle(&mut self, result: &CycleResult) -> Result<(), ReportError> {
        let mut first_error = None;

        for (channel, value) in channel_updates(result) {
            match self.update(channel, &value) {
                Ok(()) => self.stats.record_success(),
                Err(err) => {
                    self.stats.record_failure(&err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Delivery counters for this sink.
    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }

    fn update(&self, channel: &str, value: &str) -> Result<(), ReportError> {
        let url = self.update_url(channel, value);
        self.agent.get(&url).call()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluvio_core::{RainClass, RainEstimate, WaterLevelResult};

    fn healthy_result() -> CycleResult {
        CycleResult {
            captured_at: 1_700_000_000_000_000,
            raw_value: Some(2600),
            estimate: Some(RainEstimate {
                classification: RainClass::LightRain,
                regression_mm_h: 3.0,
                interpolation_mm_h: 2.2,
            }),
            water_level: WaterLevelResult {
                level_cm: 9.5,
                faulted: false,
            },
            rain_sensor_faulted: false,
            ultrasonic_faulted: false,
        }
    }

    #[test]
    fn healthy_cycle_maps_all_six_channels() {
        let updates = channel_updates(&healthy_result());

        assert_eq!(
            updates,
            vec![
                ("V0", "2600".to_string()),
                ("V1", "Light Rain".to_string()),
                ("V2", "9.5".to_string()),
                ("V3", "3".to_string()),
                ("V4", "2.2".to_string()),
                ("V5", "OK".to_string()),
            ]
        );
    }

    #[test]
    fn rain_fault_substitutes_markers() {
        let mut result = healthy_result();
        result.raw_value = None;
        result.estimate = None;
        result.rain_sensor_faulted = true;

        let updates = channel_updates(&result);

        assert_eq!(updates[0], ("V0", FAULT_MARKER.to_string()));
        assert_eq!(updates[1], ("V1", "Sensor Error".to_string()));
        assert_eq!(updates[2], ("V2", "9.5".to_string()));
        assert_eq!(updates[3], ("V3", FAULT_MARKER.to_string()));
        assert_eq!(updates[4], ("V4", FAULT_MARKER.to_string()));
    }

    #[test]
    fn ultrasonic_fault_rides_the_status_channel() {
        let mut result = healthy_result();
        result.water_level = WaterLevelResult {
            level_cm: 0.0,
            faulted: true,
        };
        result.ultrasonic_faulted = true;

        let updates = channel_updates(&result);

        assert_eq!(updates[2], ("V2", "0".to_string()));
        assert_eq!(updates[5], ("V5", "Sensor Error".to_string()));
    }

    #[test]
    fn update_url_places_token_and_encodes_value() {
        let sink = BlynkSink::new(BlynkConfig::new("tok123")).unwrap();

        assert_eq!(
            sink.update_url("V1", "Light Rain"),
            "https://blynk.cloud/external/api/update?token=tok123&V1=Light%20Rain"
        );
    }

    #[test]
    fn config_validation_rejects_bad_endpoints() {
        assert!(BlynkSink::new(BlynkConfig::new("tok").base_url("not-a-url")).is_err());
        assert!(BlynkSink::new(BlynkConfig::new("")).is_err());
        assert!(BlynkSink::new(BlynkConfig::new("tok").base_url("http://localhost:8080")).is_ok());
    }
}

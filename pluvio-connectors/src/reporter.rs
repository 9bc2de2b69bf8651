//! The Reporter - Fan-Out and Fault Containment
//!
//! Implements the core's [`CycleSink`] seam over the two production sinks.
//! This is where the containment boundary sits: whatever a sink returns,
//! the reporter logs it and moves on. The acquisition loop never sees a
//! transport error, and a dead uplink can cost at most this cycle's
//! telemetry.
//!
//! Sends are sequential, dashboard first, then the sheet; a failure in one
//! sink does not skip the other.

use pluvio_core::{CycleResult, CycleSink};

use crate::blynk::BlynkSink;
use crate::sheets::SheetsSink;

/// Aggregate sink for both telemetry services.
///
/// Either sink is optional; a reporter with neither is a no-op, which is
/// exactly what a bench node without credentials wants.
#[derive(Default)]
pub struct TelemetryReporter {
    blynk: Option<BlynkSink>,
    sheets: Option<SheetsSink>,
}

impl TelemetryReporter {
    /// Reporter with no sinks attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the dashboard sink.
    pub fn with_blynk(mut self, sink: BlynkSink) -> Self {
        self.blynk = Some(sink);
        self
    }

    /// Attach the spreadsheet sink.
    pub fn with_sheets(mut self, sink: SheetsSink) -> Self {
        self.sheets = Some(sink);
        self
    }

    /// Delivery counters for the dashboard sink, if attached.
    pub fn blynk_stats(&self) -> Option<&crate::SinkStats> {
        self.blynk.as_ref().map(|s| s.stats())
    }

    /// Delivery counters for the spreadsheet sink, if attached.
    pub fn sheets_stats(&self) -> Option<&crate::SinkStats> {
        self.sheets.as_ref().map(|s| s.stats())
    }
}

impl CycleSink for TelemetryReporter {
    fn report(&mut self, result: &CycleResult) {
        if let Some(blynk) = &mut self.blynk {
            if let Err(err) = blynk.send_cycle(result) {
                log::warn!("dashboard send failed: {err}");
            }
        }
        if let Some(sheets) = &mut self.sheets {
            if let Err(err) = sheets.send_cycle(result) {
                log::warn!("spreadsheet send failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluvio_core::WaterLevelResult;

    #[test]
    fn empty_reporter_is_a_no_op() {
        let mut reporter = TelemetryReporter::new();
        let result = CycleResult {
            captured_at: 0,
            raw_value: Some(3600),
            estimate: None,
            water_level: WaterLevelResult {
                level_cm: 5.0,
                faulted: false,
            },
            rain_sensor_faulted: false,
            ultrasonic_faulted: false,
        };

        // Must never panic or block with no sinks attached
        reporter.report(&result);
        assert!(reporter.blynk_stats().is_none());
        assert!(reporter.sheets_stats().is_none());
    }
}

//! Telemetry Sinks for the Pluvio Sensing Node
//!
//! ## Overview
//!
//! The acquisition core hands each [`CycleResult`](pluvio_core::CycleResult)
//! to a [`CycleSink`](pluvio_core::CycleSink); this crate provides the two
//! production sinks and the reporter that fans a result out to both:
//!
//! - [`blynk::BlynkSink`]: time-series dashboard; one HTTP GET per metric
//!   channel per cycle.
//! - [`sheets::SheetsSink`]: spreadsheet webhook; one GET per cycle with
//!   the raw value and a timestamp.
//! - [`reporter::TelemetryReporter`]: aggregates both and implements the
//!   core's sink seam.
//!
//! ## Design
//!
//! Both sinks ride plain HTTP GET with query parameters: that is what the
//! upstream services accept, and it keeps the node's transport footprint to
//! a single blocking `ureq` agent. Sends are sequential and un-retried
//! within a cycle; the next cycle is always a fresh chance.
//!
//! ## Fault containment
//!
//! Transport failures stop at the reporter: they are logged, counted in the
//! per-sink [`SinkStats`], and never surfaced to the acquisition loop. A
//! dead uplink costs telemetry, not sampling.
//!
//! ## Testing
//!
//! Request construction is factored into pure URL-building functions so the
//! channel mapping, fault markers, and encoding are unit-testable without a
//! network in sight.

pub mod blynk;
pub mod reporter;
pub mod sheets;

pub use blynk::{BlynkConfig, BlynkSink};
pub use reporter::TelemetryReporter;
pub use sheets::SheetsSink;

use thiserror::Error;

/// Errors a sink can hit while sending
#[derive(Debug, Error)]
pub enum ReportError {
    /// Network-level failure (DNS, connect, TLS, I/O)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Sink returned HTTP {status}")]
    Status {
        /// HTTP status code from the service
        status: u16,
    },

    /// The sink was constructed with an unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ureq::Error> for ReportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => Self::Status { status },
            ureq::Error::Transport(t) => Self::Transport(t.to_string()),
        }
    }
}

/// Per-sink delivery counters
#[derive(Debug, Default, Clone)]
pub struct SinkStats {
    /// Requests that completed with a success status
    pub requests_sent: u64,
    /// Requests that failed at transport or status level
    pub requests_failed: u64,
    /// Most recent failure, for diagnostics
    pub last_error: Option<String>,
}

impl SinkStats {
    pub(crate) fn record_success(&mut self) {
        self.requests_sent += 1;
    }

    pub(crate) fn record_failure(&mut self, err: &ReportError) {
        self.requests_failed += 1;
        self.last_error = Some(err.to_string());
    }
}

/// Percent-encode the handful of values the sinks transmit.
///
/// Channel values are numbers and fixed labels; spaces (in labels like
/// "Light Rain") are the only character that needs escaping.
pub fn url_encode(value: &str) -> String {
    value.replace(' ', "%20")
}

//! Spreadsheet Sink - One GET Per Cycle
//!
//! A webhook (an Apps Script deployment in the field units) appends one row
//! per cycle with the raw rain value and a Unix timestamp:
//!
//! ```text
//! {webhook}?value=2600&time=1700000000
//! ```
//!
//! The sheet is the long-term record of the *rain sensor* only, so a cycle
//! without a valid raw value logs nothing: the dashboard's marker channels
//! carry the fault story.

use std::time::Duration;

use pluvio_core::CycleResult;

use crate::{ReportError, SinkStats};

/// Spreadsheet webhook sink over a blocking HTTP agent
pub struct SheetsSink {
    webhook_url: String,
    agent: ureq::Agent,
    stats: SinkStats,
}

impl SheetsSink {
    /// Build a sink for a webhook endpoint.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, ReportError> {
        let webhook_url = webhook_url.into();
        if !webhook_url.starts_with("http://") && !webhook_url.starts_with("https://") {
            return Err(ReportError::Config(
                "Webhook URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Ok(Self {
            webhook_url,
            agent,
            stats: SinkStats::default(),
        })
    }

    /// The append URL for one reading.
    pub fn log_url(&self, raw: u16, timestamp_secs: u64) -> String {
        format!(
            "{}?value={}&time={}",
            self.webhook_url, raw, timestamp_secs
        )
    }

    /// Append one cycle's reading, if it has a valid raw value.
    pub fn send_cycle(&mut self, result: &CycleResult) -> Result<(), ReportError> {
        let Some(raw) = result.raw_value else {
            return Ok(());
        };

        let timestamp_secs = result.captured_at / 1_000_000;
        let url = self.log_url(raw, timestamp_secs);

        match self.agent.get(&url).call() {
            Ok(_) => {
                self.stats.record_success();
                Ok(())
            }
            Err(err) => {
                let err = ReportError::from(err);
                self.stats.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Delivery counters for this sink.
    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }
}

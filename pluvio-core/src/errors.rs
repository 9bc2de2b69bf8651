//! Error Types for Sensor Acquisition Faults
//!
//! ## Design
//!
//! The error system follows the node's containment policy: every variant
//! describes a fault that is absorbed within the cycle that produced it.
//! Nothing here ever terminates the process.
//!
//! 1. **Small Size**: Variants carry only the fields needed to act on the
//!    fault; the whole enum stays pointer-sized and `Copy`.
//!
//! 2. **No Heap Allocation**: no `String` payloads; errors cross the
//!    `no_std` sampling path.
//!
//! 3. **Actionable Mapping**: Each variant maps onto exactly one downstream
//!    behavior: `RawMissing`/`RawOutOfRange` abort estimation for the cycle,
//!    `EchoTimeout`/`EchoPinFault` become a water-level fault.
//!
//! Transport errors live in the connectors crate; calibration-load problems
//! are not errors at all (the table degrades to whatever parsed).

use thiserror_no_std::Error;

/// Result type for acquisition operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Acquisition faults - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Rain sensor produced no reading at all
    #[error("Rain sensor reading unavailable")]
    RawMissing,

    /// Rain sensor reading outside the 12-bit ADC domain
    #[error("Raw value {value} outside range [{min}, {max}]")]
    RawOutOfRange {
        /// The reading that failed validation
        value: u16,
        /// Lower bound of the ADC domain
        min: u16,
        /// Upper bound of the ADC domain
        max: u16,
    },

    /// Echo line never made the awaited transition within the poll budget
    #[error("Echo timed out after {limit_us} us")]
    EchoTimeout {
        /// The poll budget that was exhausted, in microseconds
        limit_us: u32,
    },

    /// Reading or driving a trigger/echo pin failed at the HAL layer
    #[error("Trigger/echo pin access failed")]
    EchoPinFault,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::RawMissing => defmt::write!(fmt, "Rain sensor reading unavailable"),
            Self::RawOutOfRange { value, min, max } => {
                defmt::write!(fmt, "Raw value {} outside [{}, {}]", value, min, max)
            }
            Self::EchoTimeout { limit_us } => {
                defmt::write!(fmt, "Echo timed out after {} us", limit_us)
            }
            Self::EchoPinFault => defmt::write!(fmt, "Trigger/echo pin access failed"),
        }
    }
}

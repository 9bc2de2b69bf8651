//! Time Sources for the Sensing Node
//!
//! Echo timing needs microsecond resolution; the spreadsheet sink needs wall
//! clock seconds. Both come through the [`Clock`] trait so the acquisition
//! loop can be driven by a hardware timer on the device and by a scripted
//! clock in tests.
//!
//! Microsecond busy-waits (the trigger pulse) and the inter-cycle sleep go
//! through `embedded_hal::delay::DelayNs`, the same seam the pack's HC-SR04
//! drivers use: tests substitute a recording fake.

/// Timestamp in microseconds.
///
/// Monotonic sources count from boot; wall clock sources count from the
/// Unix epoch. At microsecond resolution a `u64` does not wrap within the
/// lifetime of any deployment.
pub type Timestamp = u64;

/// Source of time for the acquisition loop
///
/// Implementations might read a hardware timer, an RTC, or the host clock.
/// `now_micros` must be cheap: it is polled in the echo wait loops.
pub trait Clock {
    /// Current timestamp in microseconds.
    fn now_micros(&self) -> Timestamp;

    /// Whether this source provides wall clock time (vs monotonic).
    ///
    /// Telemetry timestamps are only meaningful from a wall clock source;
    /// echo timing works with either.
    fn is_wall_clock(&self) -> bool;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> Timestamp {
        (**self).now_micros()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }
}

/// Monotonic clock counting from construction (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Create a clock whose zero is "now".
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    fn now_micros(&self) -> Timestamp {
        self.origin.elapsed().as_micros() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Wall clock time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_micros(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Settable clock for deterministic tests
///
/// Interior mutability lets the wait loops observe time advancing through a
/// shared reference while the test script drives it.
#[derive(Debug)]
pub struct FixedClock {
    now_us: core::cell::Cell<Timestamp>,
}

impl FixedClock {
    /// Create a clock pinned at `start_us`.
    pub fn new(start_us: Timestamp) -> Self {
        Self {
            now_us: core::cell::Cell::new(start_us),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    /// Pin the clock to an absolute timestamp.
    pub fn set(&self, timestamp: Timestamp) {
        self.now_us.set(timestamp);
    }
}

impl Clock for FixedClock {
    fn now_micros(&self) -> Timestamp {
        self.now_us.get()
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Thread-sleeping delay provider for host builds (requires std)
///
/// Microsecond waits on a host OS are approximate; this exists for examples
/// and soak runs, not for driving real sensor hardware.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(1_000);
        assert_eq!(clock.now_micros(), 1_000);

        clock.advance(500);
        assert_eq!(clock.now_micros(), 1_500);

        clock.set(10_000);
        assert_eq!(clock.now_micros(), 10_000);
    }

    #[test]
    fn fixed_clock_is_not_wall_clock() {
        assert!(!FixedClock::new(0).is_wall_clock());
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_is_wall_clock() {
        assert!(SystemClock.is_wall_clock());
        assert!(SystemClock.now_micros() > 0);
    }
}

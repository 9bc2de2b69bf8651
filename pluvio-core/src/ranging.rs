//! Microsecond Pulse Timing for the Ultrasonic Ranger
//!
//! ## Protocol
//!
//! HC-SR04-class rangers measure distance by echo timing: drive the trigger
//! line low to settle, high for exactly 10 µs, low again, then time how long
//! the echo line stays high. The echo pulse width is the round-trip flight
//! time of the ultrasonic burst.
//!
//! ```text
//! trigger ___|‾‾10µs‾‾|________________________
//! echo    ______________|‾‾‾ width ‾‾‾|________
//!                       rise          fall
//! ```
//!
//! Both echo waits are bounded by the same 30 ms poll budget. A timeout on
//! either wait propagates as a single "no measurement" error, never as a
//! partial or zero distance.
//!
//! ## Seams
//!
//! The timer is generic over `embedded-hal` pins, a [`Clock`], and a
//! `DelayNs` provider, all owned resource objects moved in at construction.
//! On hardware those are the GPIO pair and a µs timer; in tests they are a
//! scripted bus that replays an echo schedule deterministically.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::constants::{
    ECHO_TIMEOUT_US, ROUND_TRIP_US_PER_CM, TRIGGER_PULSE_US, TRIGGER_SETTLE_US,
};
use crate::errors::{SensorError, SensorResult};
use crate::time::{Clock, Timestamp};
use crate::units::round2;

/// Trigger/echo pulse timer over a digital pin pair.
pub struct PulseTimer<TRIG, ECHO, CLOCK, DELAY> {
    trigger: TRIG,
    echo: ECHO,
    clock: CLOCK,
    delay: DELAY,
}

impl<TRIG, ECHO, CLOCK, DELAY> PulseTimer<TRIG, ECHO, CLOCK, DELAY>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLOCK: Clock,
    DELAY: DelayNs,
{
    /// Take ownership of the pin pair, clock, and delay provider.
    pub fn new(trigger: TRIG, echo: ECHO, clock: CLOCK, delay: DELAY) -> Self {
        Self {
            trigger,
            echo,
            clock,
            delay,
        }
    }

    /// Fire one trigger pulse and measure the echo, in cm.
    ///
    /// Returns [`SensorError::EchoTimeout`] if either echo transition fails
    /// to arrive within the poll budget, [`SensorError::EchoPinFault`] if
    /// the HAL rejects a pin access.
    pub fn measure_distance(&mut self) -> SensorResult<f32> {
        self.fire_trigger()?;

        let rise = self.wait_for_echo(true)?;
        let fall = self.wait_for_echo(false)?;

        let width_us = fall.saturating_sub(rise);
        Ok(round2((width_us as f32 / 2.0) / ROUND_TRIP_US_PER_CM))
    }

    fn fire_trigger(&mut self) -> SensorResult<()> {
        self.trigger
            .set_low()
            .map_err(|_| SensorError::EchoPinFault)?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.trigger
            .set_high()
            .map_err(|_| SensorError::EchoPinFault)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger
            .set_low()
            .map_err(|_| SensorError::EchoPinFault)
    }

    /// Poll the echo line until it reaches `level`, bounded by the budget.
    fn wait_for_echo(&mut self, level: bool) -> SensorResult<Timestamp> {
        let start = self.clock.now_micros();
        loop {
            let high = self
                .echo
                .is_high()
                .map_err(|_| SensorError::EchoPinFault)?;
            if high == level {
                return Ok(self.clock.now_micros());
            }
            if self.clock.now_micros().saturating_sub(start) > ECHO_TIMEOUT_US as u64 {
                return Err(SensorError::EchoTimeout {
                    limit_us: ECHO_TIMEOUT_US,
                });
            }
        }
    }
}

impl<TRIG, ECHO, CLOCK, DELAY> crate::cycle::DistanceSensor for PulseTimer<TRIG, ECHO, CLOCK, DELAY>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLOCK: Clock,
    DELAY: DelayNs,
{
    fn measure_distance(&mut self) -> SensorResult<f32> {
        PulseTimer::measure_distance(self)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::rc::Rc;

    /// Shared simulation of the pin pair and the µs timeline.
    ///
    /// Time advances 1 µs per echo-pin read (modelling the busy-wait poll)
    /// and by the requested amount per delay call; clock reads are free.
    struct SimBus {
        now_us: Cell<u64>,
        /// Absolute µs at which echo goes high, if ever
        rise_at: Option<u64>,
        /// Absolute µs at which echo returns low, if ever
        fall_at: Option<u64>,
        trig_high_at: Cell<Option<u64>>,
        trig_low_after_high_at: Cell<Option<u64>>,
    }

    impl SimBus {
        fn new(rise_at: Option<u64>, fall_at: Option<u64>) -> Rc<Self> {
            Rc::new(Self {
                now_us: Cell::new(0),
                rise_at,
                fall_at,
                trig_high_at: Cell::new(None),
                trig_low_after_high_at: Cell::new(None),
            })
        }

        fn echo_level(&self, t: u64) -> bool {
            match (self.rise_at, self.fall_at) {
                (Some(rise), Some(fall)) => t >= rise && t < fall,
                (Some(rise), None) => t >= rise,
                _ => false,
            }
        }
    }

    struct SimTrigger(Rc<SimBus>);

    impl embedded_hal::digital::ErrorType for SimTrigger {
        type Error = Infallible;
    }

    impl OutputPin for SimTrigger {
        fn set_low(&mut self) -> Result<(), Infallible> {
            if self.0.trig_high_at.get().is_some() && self.0.trig_low_after_high_at.get().is_none()
            {
                self.0.trig_low_after_high_at.set(Some(self.0.now_us.get()));
            }
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.trig_high_at.set(Some(self.0.now_us.get()));
            Ok(())
        }
    }

    struct SimEcho(Rc<SimBus>);

    impl embedded_hal::digital::ErrorType for SimEcho {
        type Error = Infallible;
    }

    impl InputPin for SimEcho {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let t = self.0.now_us.get();
            let level = self.0.echo_level(t);
            self.0.now_us.set(t + 1);
            Ok(level)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|h| !h)
        }
    }

    struct SimClock(Rc<SimBus>);

    impl Clock for SimClock {
        fn now_micros(&self) -> Timestamp {
            self.0.now_us.get()
        }

        fn is_wall_clock(&self) -> bool {
            false
        }
    }

    struct SimDelay(Rc<SimBus>);

    impl DelayNs for SimDelay {
        fn delay_ns(&mut self, ns: u32) {
            let bus = &self.0;
            bus.now_us.set(bus.now_us.get() + (ns as u64) / 1_000);
        }
    }

    fn timer_on(
        bus: &Rc<SimBus>,
    ) -> PulseTimer<SimTrigger, SimEcho, SimClock, SimDelay> {
        PulseTimer::new(
            SimTrigger(Rc::clone(bus)),
            SimEcho(Rc::clone(bus)),
            SimClock(Rc::clone(bus)),
            SimDelay(Rc::clone(bus)),
        )
    }

    // Trigger sequence consumes 2 µs settle + 10 µs pulse
    const TRIGGER_END_US: u64 = (TRIGGER_SETTLE_US + TRIGGER_PULSE_US) as u64;

    #[test]
    fn measures_echo_pulse_width() {
        // Echo rises 1000 µs after the trigger, falls 100 µs later
        let bus = SimBus::new(Some(TRIGGER_END_US + 1000), Some(TRIGGER_END_US + 1100));
        let mut timer = timer_on(&bus);

        let distance = timer.measure_distance().unwrap();
        // 100 µs width: (100 / 2) / 29.1 = 1.718… → 1.72 cm
        assert_eq!(distance, 1.72);
    }

    #[test]
    fn trigger_pulse_is_ten_micros() {
        let bus = SimBus::new(Some(TRIGGER_END_US + 50), Some(TRIGGER_END_US + 150));
        let mut timer = timer_on(&bus);
        timer.measure_distance().unwrap();

        let high = bus.trig_high_at.get().expect("trigger never went high");
        let low = bus.trig_low_after_high_at.get().expect("pulse never ended");
        assert_eq!(low - high, TRIGGER_PULSE_US as u64);
    }

    #[test]
    fn times_out_when_echo_never_rises() {
        let bus = SimBus::new(None, None);
        let mut timer = timer_on(&bus);

        assert_eq!(
            timer.measure_distance(),
            Err(SensorError::EchoTimeout {
                limit_us: ECHO_TIMEOUT_US
            })
        );
    }

    #[test]
    fn times_out_when_echo_never_falls() {
        // Rise arrives but the echo line sticks high: no partial result
        let bus = SimBus::new(Some(TRIGGER_END_US + 100), None);
        let mut timer = timer_on(&bus);

        assert_eq!(
            timer.measure_distance(),
            Err(SensorError::EchoTimeout {
                limit_us: ECHO_TIMEOUT_US
            })
        );
    }

    #[test]
    fn pin_fault_maps_to_echo_pin_fault() {
        struct BrokenEcho;
        struct PinError;

        impl embedded_hal::digital::Error for PinError {
            fn kind(&self) -> embedded_hal::digital::ErrorKind {
                embedded_hal::digital::ErrorKind::Other
            }
        }

        impl core::fmt::Debug for PinError {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("PinError")
            }
        }

        impl embedded_hal::digital::ErrorType for BrokenEcho {
            type Error = PinError;
        }

        impl InputPin for BrokenEcho {
            fn is_high(&mut self) -> Result<bool, PinError> {
                Err(PinError)
            }

            fn is_low(&mut self) -> Result<bool, PinError> {
                Err(PinError)
            }
        }

        let bus = SimBus::new(None, None);
        let mut timer = PulseTimer::new(
            SimTrigger(Rc::clone(&bus)),
            BrokenEcho,
            SimClock(Rc::clone(&bus)),
            SimDelay(Rc::clone(&bus)),
        );

        assert_eq!(timer.measure_distance(), Err(SensorError::EchoPinFault));
    }
}

//! Monotonic time sources and elapsed-time tracking.
//!
//! - [`Clock`] is the capability a control loop uses to read time and to wait.
//! - [`SystemClock`] reads the host's monotonic clock.
//! - [`ManualClock`] only moves when told to, which makes whole matches reproducible in tests.
//! - [`Stopwatch`] measures elapsed time from a clock reading and can be reset.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// A monotonic elapsed-time source.
///
/// Readings are durations since an arbitrary, fixed epoch. Two readings from the same clock can be
/// subtracted to get the time between them.
pub trait Clock {
    /// Returns the time elapsed since this clock's epoch.
    fn now(&self) -> Duration;

    /// Waits until `duration` has elapsed on this clock.
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// A [`Clock`] backed by [`std::time::Instant`].
///
/// The epoch is the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A [`Clock`] that only advances when asked to.
///
/// Clones share the same underlying time, so a test can hand one clone to a control loop and keep
/// another to move time forward. [`Clock::sleep`] advances the clock by the requested duration
/// and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock reading `now`.
    #[must_use]
    pub fn starting_at(now: Duration) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    /// Moves the clock to `now`.
    ///
    /// # Panics
    ///
    /// Panics if `now` is earlier than the current reading, since clocks are monotonic.
    pub fn set(&self, now: Duration) {
        assert!(now >= self.now.get(), "ManualClock cannot move backwards");
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Measures time elapsed since it was last started or reset.
///
/// A stopwatch does not hold a clock. It remembers the clock reading it was started at, and every
/// query takes the current reading. This keeps it `Copy` so it can live inside plain state
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopwatch {
    started_at: Duration,
}

impl Stopwatch {
    /// Starts a stopwatch at the clock reading `now`.
    #[must_use]
    pub const fn started_at(now: Duration) -> Self {
        Self { started_at: now }
    }

    /// Returns the clock reading this stopwatch was last started or reset at.
    #[must_use]
    pub const fn start_time(&self) -> Duration {
        self.started_at
    }

    /// Restarts the stopwatch from `now`.
    pub fn reset(&mut self, now: Duration) {
        self.started_at = now;
    }

    /// Returns the time elapsed between the start and `now`.
    ///
    /// Readings earlier than the start count as zero elapsed time.
    #[must_use]
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    /// Returns the elapsed time in fractional seconds.
    #[must_use]
    pub fn seconds(&self, now: Duration) -> f64 {
        self.elapsed(now).as_secs_f64()
    }

    /// Returns the elapsed time in fractional milliseconds.
    #[must_use]
    pub fn milliseconds(&self, now: Duration) -> f64 {
        self.elapsed(now).as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(250));

        clock.sleep(Duration::from_millis(750));
        assert_eq!(handle.now(), Duration::from_secs(1));
    }

    #[test]
    #[should_panic(expected = "cannot move backwards")]
    fn manual_clock_is_monotonic() {
        let clock = ManualClock::starting_at(Duration::from_secs(2));
        clock.set(Duration::from_secs(1));
    }

    #[test]
    fn stopwatch_measures_from_last_reset() {
        let mut watch = Stopwatch::started_at(Duration::from_secs(3));
        assert_eq!(watch.elapsed(Duration::from_secs(8)), Duration::from_secs(5));
        assert_eq!(watch.seconds(Duration::from_millis(4500)), 1.5);

        watch.reset(Duration::from_secs(10));
        assert_eq!(watch.start_time(), Duration::from_secs(10));
        assert_eq!(watch.milliseconds(Duration::from_millis(10_250)), 250.0);
    }

    #[test]
    fn stopwatch_saturates_before_start() {
        let watch = Stopwatch::started_at(Duration::from_secs(5));
        assert_eq!(watch.elapsed(Duration::from_secs(1)), Duration::ZERO);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}

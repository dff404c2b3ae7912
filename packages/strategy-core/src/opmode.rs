//! Op-mode lifecycle signals.
//!
//! The host runtime owns the lifecycle of a program: it initializes it, tells it when the match
//! starts, and may ask it to stop at any time (the driver station's stop button, or field
//! control ending the period early). [`OpModeHandle`] carries those signals between the host and
//! the control loop.

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use bitflags::bitflags;

bitflags! {
    /// The status bits shared through an [`OpModeHandle`].
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub struct OpModeStatus: u32 {
        /// The match has started and the program may drive the robot.
        const STARTED = 1 << 0;

        /// The host asked the program to stop.
        const STOP_REQUESTED = 1 << 1;
    }
}

/// A coarse phase derived from [`OpModeStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpModePhase {
    /// Initialized, waiting for the match to start.
    Init,

    /// The match is running.
    Active,

    /// A stop was requested, either before or after the start.
    Stopping,
}

impl OpModeStatus {
    /// Checks if the match has started.
    #[must_use]
    pub const fn started(&self) -> bool {
        self.contains(Self::STARTED)
    }

    /// Checks if a stop was requested.
    #[must_use]
    pub const fn stop_requested(&self) -> bool {
        self.contains(Self::STOP_REQUESTED)
    }

    /// Gets the current lifecycle phase from these status flags.
    #[must_use]
    pub const fn phase(&self) -> OpModePhase {
        if self.stop_requested() {
            OpModePhase::Stopping
        } else if self.started() {
            OpModePhase::Active
        } else {
            OpModePhase::Init
        }
    }
}

/// A shared, clonable handle to an op-mode's lifecycle status.
///
/// Every clone observes the same status. The handle is `Send + Sync`, so the host side may
/// live on another thread than the control loop.
#[derive(Debug, Clone, Default)]
pub struct OpModeHandle {
    bits: Arc<AtomicU32>,
}

impl OpModeHandle {
    /// How long [`wait_for_start`](Self::wait_for_start) sleeps between status checks.
    pub const START_POLL_INTERVAL: Duration = Duration::from_millis(5);

    /// Creates a handle in the [`OpModePhase::Init`] phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the current status flags.
    #[must_use]
    pub fn status(&self) -> OpModeStatus {
        OpModeStatus::from_bits_retain(self.bits.load(Ordering::Acquire))
    }

    /// Gets the current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> OpModePhase {
        self.status().phase()
    }

    /// Signals that the match has started.
    pub fn start(&self) {
        self.bits
            .fetch_or(OpModeStatus::STARTED.bits(), Ordering::AcqRel);
    }

    /// Asks the program to stop at its next opportunity.
    pub fn request_stop(&self) {
        self.bits
            .fetch_or(OpModeStatus::STOP_REQUESTED.bits(), Ordering::AcqRel);
    }

    /// Checks if the program should keep running: started and not asked to stop.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase() == OpModePhase::Active
    }

    /// Checks if a stop was requested.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.status().stop_requested()
    }

    /// Blocks until the match starts or a stop is requested.
    ///
    /// Returns `true` if the match started, `false` if the program was stopped while still
    /// waiting.
    pub fn wait_for_start(&self) -> bool {
        loop {
            match self.phase() {
                OpModePhase::Init => std::thread::sleep(Self::START_POLL_INTERVAL),
                OpModePhase::Active => return true,
                OpModePhase::Stopping => return false,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn phase_follows_status_bits() {
        assert_eq!(OpModeStatus::empty().phase(), OpModePhase::Init);
        assert_eq!(OpModeStatus::STARTED.phase(), OpModePhase::Active);
        assert_eq!(OpModeStatus::STOP_REQUESTED.phase(), OpModePhase::Stopping);
        assert_eq!(OpModeStatus::all().phase(), OpModePhase::Stopping);
    }

    #[test]
    fn clones_share_status() {
        let host = OpModeHandle::new();
        let program = host.clone();
        assert!(!program.is_active());

        host.start();
        assert!(program.is_active());
        assert!(program.wait_for_start());

        host.request_stop();
        assert!(program.stop_requested());
        assert!(!program.is_active());
    }

    #[test]
    fn stop_before_start_ends_the_wait() {
        let handle = OpModeHandle::new();
        handle.request_stop();
        assert!(!handle.wait_for_start());
    }

    #[test]
    fn start_from_another_thread() {
        let handle = OpModeHandle::new();
        let host = handle.clone();
        let starter = std::thread::spawn(move || host.start());

        assert!(handle.wait_for_start());
        starter.join().unwrap();
    }

    #[test]
    fn waiting_sleeps_between_checks() {
        let handle = OpModeHandle::new();
        let host = handle.clone();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            host.request_stop();
        });

        let waited = std::time::Instant::now();
        assert!(!handle.wait_for_start());
        let waited = waited.elapsed();
        stopper.join().unwrap();

        assert!(waited >= Duration::from_millis(50));
        assert!(waited < Duration::from_secs(1));
    }
}

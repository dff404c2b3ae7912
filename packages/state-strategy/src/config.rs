//! Tunable constants of the autonomous strategy.

use core::time::Duration;

use snafu::{ensure, Snafu};
use strategy_devices::motor::POWER_RANGE;

/// Named configuration values for the controller and its run loop.
///
/// [`StrategyConfig::DEFAULT`] holds the values the robot competes with; the `with_*` methods
/// override one value at a time.
///
/// ```
/// # use core::time::Duration;
/// # use state_strategy::config::StrategyConfig;
/// let config = StrategyConfig::DEFAULT
///     .with_drive_power(0.5)
///     .with_loop_period(Some(Duration::from_millis(20)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyConfig {
    /// How long the robot stays in a settled state before the timer moves it on.
    pub state_timeout: Duration,

    /// Power both sides are driven at while the robot is moving.
    pub drive_power: f64,

    /// Length of the autonomous period.
    pub match_duration: Duration,

    /// Each color channel must be strictly above this for a reading to count as the white line.
    pub white_line_threshold: u16,

    /// Time to wait between ticks. `None` polls as fast as the host allows.
    pub loop_period: Option<Duration>,
}

impl StrategyConfig {
    /// The values the robot competes with.
    pub const DEFAULT: Self = Self {
        state_timeout: Duration::from_secs(5),
        drive_power: 0.3,
        match_duration: Duration::from_secs(15),
        white_line_threshold: 200,
        loop_period: None,
    };

    /// Overrides [`state_timeout`](Self::state_timeout).
    #[must_use]
    pub const fn with_state_timeout(mut self, state_timeout: Duration) -> Self {
        self.state_timeout = state_timeout;
        self
    }

    /// Overrides [`drive_power`](Self::drive_power).
    #[must_use]
    pub const fn with_drive_power(mut self, drive_power: f64) -> Self {
        self.drive_power = drive_power;
        self
    }

    /// Overrides [`match_duration`](Self::match_duration).
    #[must_use]
    pub const fn with_match_duration(mut self, match_duration: Duration) -> Self {
        self.match_duration = match_duration;
        self
    }

    /// Overrides [`white_line_threshold`](Self::white_line_threshold).
    #[must_use]
    pub const fn with_white_line_threshold(mut self, white_line_threshold: u16) -> Self {
        self.white_line_threshold = white_line_threshold;
        self
    }

    /// Overrides [`loop_period`](Self::loop_period).
    #[must_use]
    pub const fn with_loop_period(mut self, loop_period: Option<Duration>) -> Self {
        self.loop_period = loop_period;
        self
    }

    /// Checks that the values describe a runnable strategy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the drive power is not a finite value in `-1.0..=1.0`, or if
    /// the state timeout or match duration is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            POWER_RANGE.contains(&self.drive_power),
            InvalidDrivePowerSnafu {
                power: self.drive_power
            }
        );
        ensure!(
            !self.state_timeout.is_zero(),
            ZeroDurationSnafu {
                name: "state_timeout"
            }
        );
        ensure!(
            !self.match_duration.is_zero(),
            ZeroDurationSnafu {
                name: "match_duration"
            }
        );

        Ok(())
    }
}

/// Parses a positive number of seconds, as given on a command line.
///
/// Returns `None` for anything that is not a finite, positive duration `Duration` can hold.
#[must_use]
pub fn parse_seconds(arg: &str) -> Option<Duration> {
    let secs = arg.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|duration| !duration.is_zero())
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors found by [`StrategyConfig::validate`].
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum ConfigError {
    /// The drive power cannot be sent to a motor.
    #[snafu(display("Drive power {power} is outside of -1.0..=1.0"))]
    InvalidDrivePower {
        /// The rejected power.
        power: f64,
    },

    /// A duration that must be positive is zero.
    #[snafu(display("{name} must be longer than zero"))]
    ZeroDuration {
        /// Name of the offending field.
        name: &'static str,
    },
}

//! Motors and the two-sided drivetrain.

use log::debug;
use snafu::{ensure, Snafu};

use crate::PortError;

/// A device that accepts a power level.
///
/// Power is a fraction of full output in `-1.0..=1.0`. Positive values drive the motor in its
/// forward direction.
pub trait Motor {
    /// Sets the motor's output power.
    ///
    /// # Errors
    ///
    /// Returns a [`MotorError`] if the power is outside `-1.0..=1.0` or the device cannot be
    /// reached.
    fn set_power(&mut self, power: f64) -> Result<(), MotorError>;
}

impl<M: Motor + ?Sized> Motor for &mut M {
    fn set_power(&mut self, power: f64) -> Result<(), MotorError> {
        (**self).set_power(power)
    }
}

impl<M: Motor + ?Sized> Motor for Box<M> {
    fn set_power(&mut self, power: f64) -> Result<(), MotorError> {
        (**self).set_power(power)
    }
}

/// The range of power a [`Motor`] accepts.
pub const POWER_RANGE: core::ops::RangeInclusive<f64> = -1.0..=1.0;

/// Checks that `power` is a finite value in [`POWER_RANGE`].
///
/// # Errors
///
/// Returns [`MotorError::PowerOutOfRange`] otherwise.
pub fn check_power(power: f64) -> Result<(), MotorError> {
    ensure!(POWER_RANGE.contains(&power), PowerOutOfRangeSnafu { power });
    Ok(())
}

/// Represents a possible direction that a motor can be mounted in.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    /// Positive power drives the robot forward.
    Forward,

    /// Positive power drives the robot backward, as on the mirrored side of a drivetrain.
    Reverse,
}

impl Direction {
    /// Maps a robot-relative power onto this mounting direction.
    #[must_use]
    pub fn apply(self, power: f64) -> f64 {
        match self {
            Self::Forward => power,
            Self::Reverse => -power,
        }
    }
}

/// A pair of robot-relative power levels for the left and right sides of a drivetrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorCommand {
    /// Power for the left side.
    pub left: f64,
    /// Power for the right side.
    pub right: f64,
}

impl MotorCommand {
    /// Both sides at zero power.
    pub const STOP: Self = Self::uniform(0.0);

    /// Creates a command with separate left and right power.
    #[must_use]
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Creates a command driving both sides at the same power.
    #[must_use]
    pub const fn uniform(power: f64) -> Self {
        Self {
            left: power,
            right: power,
        }
    }
}

/// Two independently powered sides of a robot.
///
/// Commands are robot-relative: `MotorCommand::uniform(0.3)` drives forward regardless of how
/// each motor is mounted.
#[derive(Debug)]
pub struct Drivetrain<L, R> {
    left: L,
    right: R,
    left_direction: Direction,
    right_direction: Direction,
    last_command: MotorCommand,
}

impl<L: Motor, R: Motor> Drivetrain<L, R> {
    /// Creates a drivetrain with both motors mounted [`Direction::Forward`].
    pub const fn new(left: L, right: R) -> Self {
        Self::with_directions(left, Direction::Forward, right, Direction::Forward)
    }

    /// Creates a drivetrain with explicit mounting directions.
    pub const fn with_directions(
        left: L,
        left_direction: Direction,
        right: R,
        right_direction: Direction,
    ) -> Self {
        Self {
            left,
            right,
            left_direction,
            right_direction,
            last_command: MotorCommand::STOP,
        }
    }

    /// Sends a power command to both sides.
    ///
    /// Both powers are checked before either motor is written to.
    ///
    /// # Errors
    ///
    /// Returns a [`MotorError`] if a power is out of range or a motor cannot be reached.
    pub fn apply(&mut self, command: MotorCommand) -> Result<(), MotorError> {
        check_power(command.left)?;
        check_power(command.right)?;

        debug!("drive left={:.2} right={:.2}", command.left, command.right);
        self.left.set_power(self.left_direction.apply(command.left))?;
        self.right
            .set_power(self.right_direction.apply(command.right))?;
        self.last_command = command;

        Ok(())
    }

    /// Commands both sides to zero power.
    ///
    /// Both motors are written to even if the first write fails; the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`MotorError`] if a motor cannot be reached.
    pub fn brake(&mut self) -> Result<(), MotorError> {
        let left = self.left.set_power(0.0);
        let right = self.right.set_power(0.0);
        self.last_command = MotorCommand::STOP;
        left.and(right)
    }

    /// Returns the last command that was fully applied.
    pub const fn last_command(&self) -> MotorCommand {
        self.last_command
    }
}

#[derive(Debug, Snafu)]
/// Errors that can occur when using a motor.
pub enum MotorError {
    /// The requested power is not a finite value in `-1.0..=1.0`.
    #[snafu(display("Motor power {power} is outside of -1.0..=1.0"))]
    PowerOutOfRange {
        /// The rejected power.
        power: f64,
    },

    /// Generic port related error.
    #[snafu(display("{source}"), context(false))]
    Port {
        /// The source of the error.
        source: PortError,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::SimMotor;

    #[test]
    fn direction_maps_power() {
        assert_eq!(Direction::Forward.apply(0.3), 0.3);
        assert_eq!(Direction::Reverse.apply(0.3), -0.3);
    }

    #[test]
    fn power_range_is_checked() {
        assert!(check_power(1.0).is_ok());
        assert!(check_power(-1.0).is_ok());
        assert!(matches!(
            check_power(1.5),
            Err(MotorError::PowerOutOfRange { .. })
        ));
        assert!(check_power(f64::NAN).is_err());
    }

    #[test]
    fn reversed_side_receives_negated_power() {
        let left = SimMotor::new("left_drive");
        let right = SimMotor::new("right_drive");
        let mut drive =
            Drivetrain::with_directions(left.clone(), Direction::Forward, right.clone(), Direction::Reverse);

        drive.apply(MotorCommand::uniform(0.3)).unwrap();
        assert_eq!(left.power(), 0.3);
        assert_eq!(right.power(), -0.3);
        assert_eq!(drive.last_command(), MotorCommand::uniform(0.3));
    }

    #[test]
    fn invalid_command_touches_no_motor() {
        let left = SimMotor::new("left_drive");
        let right = SimMotor::new("right_drive");
        let mut drive = Drivetrain::new(left.clone(), right.clone());

        assert!(drive.apply(MotorCommand::new(0.5, 2.0)).is_err());
        assert!(left.history().is_empty());
        assert!(right.history().is_empty());
    }

    #[test]
    fn brake_writes_both_sides_even_if_one_fails() {
        let left = SimMotor::new("left_drive");
        let right = SimMotor::new("right_drive");
        let mut drive = Drivetrain::new(left.clone(), right.clone());
        drive.apply(MotorCommand::uniform(0.3)).unwrap();

        left.disconnect();
        assert!(matches!(drive.brake(), Err(MotorError::Port { .. })));
        assert_eq!(right.power(), 0.0);
    }
}

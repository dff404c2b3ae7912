//! Sensor and actuator capabilities used by autonomous programs.
//!
//! # Overview
//!
//! A control loop never constructs or owns hardware directly. The host runtime maps named
//! devices (for example `"sensor_color"` or `"left_drive"`) to driver objects and hands them to
//! the program, which only sees two narrow capabilities:
//!
//! - [`ColorSensor`](sensor::ColorSensor): yields one [`ColorSample`](color::ColorSample) per
//!   read.
//! - [`Motor`](motor::Motor): accepts a power level.
//!
//! Two motors form a [`Drivetrain`](motor::Drivetrain). The [`sim`] module provides simulated
//! devices for host runs and tests.

pub mod color;
pub mod motor;
pub mod sensor;
pub mod sim;

use snafu::Snafu;

/// Errors that can occur when talking to a named device.
///
/// Most devices return this type, or something wrapping it, when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum PortError {
    /// No device was reachable under the given name, when one was expected.
    #[snafu(display("Expected a device named {device:?} to be connected"))]
    Disconnected {
        /// The name the device was configured under.
        device: String,
    },

    /// The device under the given name is not the kind that was expected.
    #[snafu(display("Device {device:?} is not a {expected}"))]
    IncorrectDevice {
        /// The name the device was configured under.
        device: String,
        /// The kind of device that was expected.
        expected: &'static str,
    },
}

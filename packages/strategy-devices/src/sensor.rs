//! Color sensing.

use crate::{color::ColorSample, PortError};

/// A device that reports one color sample per read.
pub trait ColorSensor {
    /// Gets the processed RGB reading from the sensor.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the sensor cannot be reached.
    fn rgb(&mut self) -> Result<ColorSample, PortError>;
}

impl<S: ColorSensor + ?Sized> ColorSensor for &mut S {
    fn rgb(&mut self) -> Result<ColorSample, PortError> {
        (**self).rgb()
    }
}

impl<S: ColorSensor + ?Sized> ColorSensor for Box<S> {
    fn rgb(&mut self) -> Result<ColorSample, PortError> {
        (**self).rgb()
    }
}

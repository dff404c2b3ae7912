//! Color types.
//!
//! This module re-exports [`Rgb`] from the [`rgb`] crate as the container for color sensor
//! readings.

pub use rgb::Rgb;

/// One color sensor reading: red, green and blue channel magnitudes.
///
/// The scale is defined by the sensor driver. Conventionally each channel is `0..=255`, but
/// sensors with longer integration times may report larger values.
pub type ColorSample = Rgb<u16>;

/// Helpers over [`ColorSample`].
pub trait ColorSampleExt {
    /// Unpacks a `0x00RRGGBB` word. The alpha byte, if any, is ignored.
    fn from_packed(packed: u32) -> Self;

    /// Checks if every channel is strictly above `threshold`.
    fn all_channels_above(&self, threshold: u16) -> bool;
}

impl ColorSampleExt for ColorSample {
    fn from_packed(packed: u32) -> Self {
        const BITMASK: u32 = 0b1111_1111;

        Self {
            r: ((packed >> 16) & BITMASK) as _,
            g: ((packed >> 8) & BITMASK) as _,
            b: (packed & BITMASK) as _,
        }
    }

    fn all_channels_above(&self, threshold: u16) -> bool {
        self.r > threshold && self.g > threshold && self.b > threshold
    }
}

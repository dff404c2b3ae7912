//! Driver station telemetry.
//!
//! Telemetry is presentation only: a program adds `caption: value` pairs to a frame and sends the
//! frame with [`Telemetry::update`]. Nothing in the control logic reads it back.

use core::fmt::Display;

use log::info;

/// A sink for key/value status frames.
pub trait Telemetry {
    /// Adds one `caption: value` pair to the pending frame.
    fn add_data(&mut self, caption: &str, value: &dyn Display);

    /// Sends the pending frame and starts a new one.
    fn update(&mut self);
}

impl<T: Telemetry + ?Sized> Telemetry for &mut T {
    fn add_data(&mut self, caption: &str, value: &dyn Display) {
        (**self).add_data(caption, value);
    }

    fn update(&mut self) {
        (**self).update();
    }
}

/// Sends each frame through the [`log`] facade, one `info` record per line.
#[derive(Debug, Default)]
pub struct LogTelemetry {
    pending: Vec<String>,
}

impl LogTelemetry {
    /// Creates a sink with an empty frame.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl Telemetry for LogTelemetry {
    fn add_data(&mut self, caption: &str, value: &dyn Display) {
        self.pending.push(format!("{caption}: {value}"));
    }

    fn update(&mut self) {
        for line in self.pending.drain(..) {
            info!(target: "telemetry", "{line}");
        }
    }
}

/// One sent telemetry frame.
pub type Frame = Vec<(String, String)>;

/// Keeps every sent frame in memory.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    pending: Frame,
    frames: Vec<Frame>,
}

impl RecordingTelemetry {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Returns every sent frame, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns every value sent under `caption`, oldest first.
    pub fn values<'a>(&'a self, caption: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.frames
            .iter()
            .flatten()
            .filter(move |(key, _)| key == caption)
            .map(|(_, value)| value.as_str())
    }
}

impl Telemetry for RecordingTelemetry {
    fn add_data(&mut self, caption: &str, value: &dyn Display) {
        self.pending.push((caption.to_owned(), value.to_string()));
    }

    fn update(&mut self) {
        self.frames.push(core::mem::take(&mut self.pending));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frames_are_split_on_update() {
        let mut telemetry = RecordingTelemetry::new();
        telemetry.add_data("Say", &"Hello Driver");
        telemetry.update();
        telemetry.add_data("Red  ", &12);
        telemetry.add_data("Say", &"STOPPING");
        telemetry.update();

        assert_eq!(telemetry.frames().len(), 2);
        assert_eq!(telemetry.frames()[1][0], ("Red  ".to_owned(), "12".to_owned()));
        assert_eq!(
            telemetry.values("Say").collect::<Vec<_>>(),
            ["Hello Driver", "STOPPING"]
        );
    }

    #[test]
    fn log_sink_clears_its_frame() {
        let mut telemetry = LogTelemetry::new();
        telemetry.add_data("Time", &1.5);
        telemetry.update();
        assert!(telemetry.pending.is_empty());
    }
}

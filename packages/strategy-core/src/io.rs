//! Serial console logging.
//!
//! Robot brains expose their console as a serial stream that the driver station or a tethered
//! laptop reads line by line. [`SerialLogger`] is a [`log`] backend that writes one line per
//! record to that stream (stdout on a host).

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A [`Log`] implementation writing `[LEVEL] target: message` lines to stdout.
#[derive(Debug)]
pub struct SerialLogger {
    level: LevelFilter,
}

impl SerialLogger {
    /// Creates a logger that keeps records at or above `level`.
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Installs a logger as the global [`log`] backend.
    ///
    /// # Errors
    ///
    /// Fails if another logger was already installed.
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    /// Formats a record the way it appears on the console.
    #[must_use]
    pub fn format(record: &Record<'_>) -> String {
        format!(
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut out = std::io::stdout().lock();
        // A console nobody is reading must not take the program down.
        writeln!(out, "{}", Self::format(record)).ok();
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

#[cfg(test)]
mod test {
    use log::Level;

    use super::*;

    #[test]
    fn formats_level_target_and_message() {
        let line = SerialLogger::format(
            &Record::builder()
                .level(Level::Warn)
                .target("state_strategy::opmode")
                .args(format_args!("turn is not implemented"))
                .build(),
        );
        assert_eq!(line, "[WARN ] state_strategy::opmode: turn is not implemented");
    }

    #[test]
    fn filters_below_level() {
        let logger = SerialLogger::new(LevelFilter::Info);
        assert!(logger.enabled(&Metadata::builder().level(Level::Info).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }
}

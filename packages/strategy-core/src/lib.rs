//! Core functionality for state-strategy.
//!
//! This crate provides the pieces of the host robot runtime that an autonomous program leans on
//! but does not own:
//!
//! - [`time`]: monotonic clocks and resettable [`Stopwatch`](time::Stopwatch) timers.
//! - [`opmode`]: the start/stop lifecycle signal shared between the host and a running program.
//! - [`io`]: a [`log`] backend that writes to the serial console.

pub mod io;
pub mod opmode;
pub mod time;

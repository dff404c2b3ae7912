//! # state-strategy
//!
//! A timer and color-sensor driven autonomous program for a two-motor competition robot.
//!
//! The robot drives forward, stops, waits and drives again on a fixed state timer, and stops
//! immediately whenever its downward-facing color sensor sees the white line. The program ends
//! when the autonomous period's match clock runs out or when the host stops it.
//!
//! - [`controller`] holds the state machine. It is a pure function of the previous state, one
//!   sensor sample and the current time, so it can be tested without any hardware.
//! - [`opmode`] runs the controller against injected devices, a clock and the host's start/stop
//!   signal, and guarantees the motors end at zero power.
//! - [`config`] names every tunable constant.
//!
//! ```
//! use state_strategy::prelude::*;
//!
//! let handle = OpModeHandle::new();
//! handle.start();
//!
//! let left = SimMotor::new("left_drive");
//! let mut op_mode = AutonomousOpMode::new(
//!     StateController::new(StrategyConfig::DEFAULT.with_loop_period(Some(Duration::from_millis(50)))),
//!     SimColorSensor::new("sensor_color", ColorSample::new(0, 0, 0)),
//!     Drivetrain::new(left.clone(), SimMotor::new("right_drive")),
//!     ManualClock::new(),
//!     RecordingTelemetry::new(),
//!     handle,
//! );
//!
//! let report = op_mode.run().unwrap();
//! assert_eq!(report.exit, ExitReason::MatchOver);
//! assert_eq!(left.power(), 0.0);
//! ```

pub mod config;
pub mod controller;
pub mod opmode;
pub mod state;
pub mod telemetry;

/// Commonly used types, re-exported from this crate and its device and core crates.
pub mod prelude {
    pub use core::time::Duration;

    pub use strategy_core::{
        opmode::{OpModeHandle, OpModePhase},
        time::{Clock, ManualClock, Stopwatch, SystemClock},
    };
    pub use strategy_devices::{
        color::{ColorSample, ColorSampleExt},
        motor::{Direction, Drivetrain, Motor, MotorCommand},
        sensor::ColorSensor,
        sim::{SensorFn, SimColorSensor, SimMotor},
    };

    pub use crate::{
        config::StrategyConfig,
        controller::{ControllerState, StateController, Tick, TickStatus},
        opmode::{AutonomousOpMode, ExitReason, RunError, RunReport},
        state::{Action, Color, State, Trigger, TurnDirection},
        telemetry::{LogTelemetry, RecordingTelemetry, Telemetry},
    };
}

//! The autonomous op mode: the control loop that ties the controller to real devices.
//!
//! [`AutonomousOpMode::run`] waits for the match to start, then ticks the
//! [`StateController`] once per loop iteration until the match clock runs out or the host asks
//! it to stop. Whichever way the loop ends, including a device error or a panic, both drive
//! motors are commanded to zero power before `run` returns.

use log::{debug, error, info, warn};
use snafu::{ResultExt, Snafu};
use strategy_core::{opmode::OpModeHandle, time::Clock};
use strategy_devices::{
    motor::{Drivetrain, Motor, MotorError},
    sensor::ColorSensor,
    PortError,
};

use crate::{
    controller::{ControllerState, StateController, TickStatus},
    telemetry::Telemetry,
};

/// Why [`AutonomousOpMode::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The match clock ran out.
    MatchOver,

    /// The host asked the program to stop during the match.
    Cancelled,

    /// The host asked the program to stop before the match started.
    StoppedBeforeStart,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Why the loop ended.
    pub exit: ExitReason,

    /// Ticks that ran to completion.
    pub ticks: u64,

    /// Ticks whose dispatched action had no implementation.
    pub unimplemented: u64,

    /// The controller state after the last completed tick, if the match started.
    pub final_state: Option<ControllerState>,
}

/// Errors that end a run early.
#[derive(Debug, Snafu)]
pub enum RunError {
    /// The color sensor could not be read.
    #[snafu(display("Failed to read the color sensor: {source}"))]
    Sensor {
        /// The source of the error.
        source: PortError,
    },

    /// A drive command could not be sent.
    #[snafu(display("Failed to command the drivetrain: {source}"))]
    Drive {
        /// The source of the error.
        source: MotorError,
    },
}

/// Commands zero power when dropped, unless released first.
struct BrakeGuard<'a, L: Motor, R: Motor> {
    drivetrain: &'a mut Drivetrain<L, R>,
    armed: bool,
}

impl<'a, L: Motor, R: Motor> BrakeGuard<'a, L, R> {
    fn new(drivetrain: &'a mut Drivetrain<L, R>) -> Self {
        Self {
            drivetrain,
            armed: true,
        }
    }

    /// Brakes now and reports the outcome instead of only logging it.
    fn release(mut self) -> Result<(), MotorError> {
        self.armed = false;
        self.drivetrain.brake()
    }
}

impl<L: Motor, R: Motor> Drop for BrakeGuard<'_, L, R> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.drivetrain.brake() {
                error!("failed to stop the drivetrain: {err}");
            }
        }
    }
}

/// An autonomous program: a controller plus the devices and host signals it runs against.
#[derive(Debug)]
pub struct AutonomousOpMode<S, L, R, C, T> {
    controller: StateController,
    sensor: S,
    drivetrain: Drivetrain<L, R>,
    clock: C,
    telemetry: T,
    handle: OpModeHandle,
}

impl<S, L, R, C, T> AutonomousOpMode<S, L, R, C, T>
where
    S: ColorSensor,
    L: Motor,
    R: Motor,
    C: Clock,
    T: Telemetry,
{
    /// Creates an op mode. Nothing is read or driven until [`run`](Self::run).
    pub const fn new(
        controller: StateController,
        sensor: S,
        drivetrain: Drivetrain<L, R>,
        clock: C,
        telemetry: T,
        handle: OpModeHandle,
    ) -> Self {
        Self {
            controller,
            sensor,
            drivetrain,
            clock,
            telemetry,
            handle,
        }
    }

    /// Returns a handle the host can use to start and stop this op mode.
    pub fn handle(&self) -> OpModeHandle {
        self.handle.clone()
    }

    /// Returns the telemetry sink.
    pub const fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Returns the drivetrain.
    pub const fn drivetrain(&self) -> &Drivetrain<L, R> {
        &self.drivetrain
    }

    /// Waits for the match to start and runs the control loop until it ends.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] if the sensor cannot be read or the drivetrain cannot be driven.
    /// The drivetrain has been commanded to zero power by the time this returns, on success and
    /// on error alike.
    pub fn run(&mut self) -> Result<RunReport, RunError> {
        say(&mut self.telemetry, "Hello Driver", None);
        info!("waiting for start");

        if !self.handle.wait_for_start() {
            info!("stopped before the match started");
            self.drivetrain.brake().context(DriveSnafu)?;
            return Ok(RunReport {
                exit: ExitReason::StoppedBeforeStart,
                ticks: 0,
                unimplemented: 0,
                final_state: None,
            });
        }

        let controller = self.controller;
        let loop_period = controller.config().loop_period;
        let drive = BrakeGuard::new(&mut self.drivetrain);

        let mut state = ControllerState::activate(self.clock.now());
        let mut ticks = 0;
        let mut unimplemented = 0;
        info!("match started in {}", state.state);

        let exit = loop {
            if self.handle.stop_requested() {
                break ExitReason::Cancelled;
            }

            let sample = self.sensor.rgb().context(SensorSnafu)?;
            let now = self.clock.now();
            let millis = state.match_timer.milliseconds(now);

            self.telemetry.add_data("State", &state.state);
            self.telemetry.add_data("Red  ", &sample.r);
            self.telemetry.add_data("Green", &sample.g);
            self.telemetry.add_data("Blue ", &sample.b);
            self.telemetry.add_data("Time: ", &millis);
            self.telemetry.update();

            let tick = controller.tick(state, sample, now);

            if let Some(trigger) = tick.trigger {
                debug!("{trigger:?}: {} -> {}", state.state, tick.next_state);
                say(&mut self.telemetry, trigger.announcement(), Some(millis));
            }

            match tick.status {
                TickStatus::MatchOver => break ExitReason::MatchOver,
                TickStatus::Executed => {
                    if let Some(action) = tick.action {
                        say(&mut self.telemetry, action.announcement(), Some(millis));
                    }
                }
                TickStatus::Unimplemented(action) => {
                    warn!("{action:?} is not implemented, holding {}", tick.state.state);
                    unimplemented += 1;
                }
            }

            if let Some(command) = tick.command {
                drive.drivetrain.apply(command).context(DriveSnafu)?;
            }

            state = tick.state;
            ticks += 1;

            if let Some(period) = loop_period {
                self.clock.sleep(period);
            }
        };

        info!("{exit:?} after {ticks} ticks in {}", state.state);
        drive.release().context(DriveSnafu)?;

        Ok(RunReport {
            exit,
            ticks,
            unimplemented,
            final_state: Some(state),
        })
    }
}

fn say<T: Telemetry>(telemetry: &mut T, message: &str, millis: Option<f64>) {
    telemetry.add_data("Say", &message);
    if let Some(millis) = millis {
        telemetry.add_data("Time: ", &millis);
    }
    telemetry.update();
}

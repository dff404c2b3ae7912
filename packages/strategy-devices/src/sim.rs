//! Simulated devices.
//!
//! These stand in for real hardware when running a program on a host machine. Clones of a
//! simulated device share state, so a test keeps one clone for inspection and hands the other to
//! the code under test.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    color::ColorSample,
    motor::{check_power, Motor, MotorError},
    sensor::ColorSensor,
    PortError,
};

#[derive(Debug)]
struct SimMotorState {
    name: String,
    connected: bool,
    history: Vec<f64>,
}

/// A simulated motor that records every power it is given.
#[derive(Debug, Clone)]
pub struct SimMotor {
    state: Rc<RefCell<SimMotorState>>,
}

impl SimMotor {
    /// Creates a connected motor under the given device name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimMotorState {
                name: name.into(),
                connected: true,
                history: Vec::new(),
            })),
        }
    }

    /// Simulates unplugging the motor. Later writes fail with [`PortError::Disconnected`].
    pub fn disconnect(&self) {
        self.state.borrow_mut().connected = false;
    }

    /// Returns the last power written, or `0.0` if nothing was written yet.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.state.borrow().history.last().copied().unwrap_or(0.0)
    }

    /// Returns every power written, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<f64> {
        self.state.borrow().history.clone()
    }
}

impl Motor for SimMotor {
    fn set_power(&mut self, power: f64) -> Result<(), MotorError> {
        check_power(power)?;

        let mut state = self.state.borrow_mut();
        if !state.connected {
            return Err(PortError::Disconnected {
                device: state.name.clone(),
            }
            .into());
        }
        state.history.push(power);

        Ok(())
    }
}

#[derive(Debug)]
struct SimColorSensorState {
    name: String,
    connected: bool,
    queued: VecDeque<ColorSample>,
    resting: ColorSample,
    reads: usize,
}

/// A simulated color sensor.
///
/// Reads return queued samples first, then the resting sample forever.
#[derive(Debug, Clone)]
pub struct SimColorSensor {
    state: Rc<RefCell<SimColorSensorState>>,
}

impl SimColorSensor {
    /// Creates a sensor that always reads `resting` until samples are queued.
    #[must_use]
    pub fn new(name: impl Into<String>, resting: ColorSample) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimColorSensorState {
                name: name.into(),
                connected: true,
                queued: VecDeque::new(),
                resting,
                reads: 0,
            })),
        }
    }

    /// Queues samples to be returned, in order, by the next reads.
    pub fn queue(&self, samples: impl IntoIterator<Item = ColorSample>) {
        self.state.borrow_mut().queued.extend(samples);
    }

    /// Changes the sample returned once the queue is empty.
    pub fn set_resting(&self, sample: ColorSample) {
        self.state.borrow_mut().resting = sample;
    }

    /// Simulates unplugging the sensor. Later reads fail with [`PortError::Disconnected`].
    pub fn disconnect(&self) {
        self.state.borrow_mut().connected = false;
    }

    /// Returns how many reads succeeded.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }
}

impl ColorSensor for SimColorSensor {
    fn rgb(&mut self) -> Result<ColorSample, PortError> {
        let mut state = self.state.borrow_mut();
        if !state.connected {
            return Err(PortError::Disconnected {
                device: state.name.clone(),
            });
        }

        state.reads += 1;
        let resting = state.resting;
        Ok(state.queued.pop_front().unwrap_or(resting))
    }
}

/// A color sensor whose readings come from a closure.
///
/// Useful for scripting readings against a simulated clock, e.g. "white from 7 s on".
pub struct SensorFn<F>(pub F);

impl<F: FnMut() -> ColorSample> ColorSensor for SensorFn<F> {
    fn rgb(&mut self) -> Result<ColorSample, PortError> {
        Ok((self.0)())
    }
}

impl<F> core::fmt::Debug for SensorFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorFn").finish_non_exhaustive()
    }
}

//! States, actions and transition triggers of the autonomous strategy.

use core::fmt;

/// The state the controller is in.
///
/// `Stop`, `Start` and `Turn` are action states: something runs on the tick they are seen.
/// `Stopped` and `Started` are settled states that only wait for the state timer to move them
/// on. `Press` is part of the field plan but nothing transitions into it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// Stop the drive motors.
    Stop,
    /// Motors are stopped; waiting for the state timer.
    Stopped,
    /// Start the drive motors.
    Start,
    /// Motors are running; waiting for the state timer.
    Started,
    /// Turn in place.
    Turn,
    /// Press a beacon button.
    Press,
}

impl State {
    /// The state a freshly activated controller starts in.
    pub const INITIAL: Self = Self::Start;

    /// Returns `true` for states that run an action when dispatched.
    #[must_use]
    pub const fn is_action(&self) -> bool {
        matches!(self, Self::Stop | Self::Start | Self::Turn)
    }

    /// Returns `true` for the states that are only left through the state timer.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Stopped | Self::Started)
    }

    /// The name shown on the driver station.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stop => "STOP",
            Self::Stopped => "STOPPED",
            Self::Start => "START",
            Self::Started => "STARTED",
            Self::Turn => "TURN",
            Self::Press => "PRESS",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Field colors the robot is expected to tell apart.
///
/// Nothing classifies readings into these yet; the controller's detected color stays `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Blue alliance marking.
    Blue,
    /// Red alliance marking.
    Red,
    /// White line.
    White,
}

/// Which way to turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnDirection {
    /// Counter-clockwise seen from above.
    Left,
    /// Clockwise seen from above.
    Right,
}

/// Something the controller runs when it dispatches an action state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Set both sides to zero power.
    StopMotors,
    /// Set both sides to the drive power.
    StartMotors,
    /// Turn in place. Not implemented.
    Turn(TurnDirection),
}

impl Action {
    /// The announcement shown on the driver station when the action runs.
    #[must_use]
    pub const fn announcement(&self) -> &'static str {
        match self {
            Self::StopMotors => "STOP MOTORS",
            Self::StartMotors => "START MOTORS",
            Self::Turn(TurnDirection::Left) => "TURN LEFT",
            Self::Turn(TurnDirection::Right) => "TURN RIGHT",
        }
    }
}

/// The rule that changed the controller's state on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trigger {
    /// Every color channel read above the white line threshold.
    WhiteLine,
    /// The robot has been driving for longer than the state timeout.
    StartedTimeout,
    /// The robot has been stopped for longer than the state timeout.
    StoppedTimeout,
}

impl Trigger {
    /// The announcement shown on the driver station when the rule fires.
    #[must_use]
    pub const fn announcement(&self) -> &'static str {
        match self {
            Self::WhiteLine => "FOUND WHITE LINE",
            Self::StartedTimeout => "STOPPING",
            Self::StoppedTimeout => "STARTING",
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_test {
    use super::*;

    #[test]
    fn states_survive_json() {
        for state in [
            State::Stop,
            State::Stopped,
            State::Start,
            State::Started,
            State::Turn,
            State::Press,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(serde_json::from_str::<State>(&json).unwrap(), state);
        }
    }

    #[test]
    fn actions_use_variant_names() {
        let turn = Action::Turn(TurnDirection::Left);
        let json = serde_json::to_string(&turn).unwrap();

        assert_eq!(json, r#"{"Turn":"Left"}"#);
        assert_eq!(serde_json::from_str::<Action>(&json).unwrap(), turn);
    }
}

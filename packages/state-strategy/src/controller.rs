//! The autonomous state machine.
//!
//! Each tick the [`StateController`] takes the previous [`ControllerState`], one color sample and
//! the current clock reading, and returns a [`Tick`] holding the new state and the motor command
//! to issue. Rules are applied in a fixed order:
//!
//! 1. If the match timer is past the match duration, nothing else happens: the tick reports
//!    [`TickStatus::MatchOver`] and carries no motor command.
//! 2. A white reading (every channel above the threshold) forces [`State::Stop`].
//! 3. [`State::Started`] past the state timeout becomes [`State::Stop`].
//! 4. [`State::Stopped`] past the state timeout becomes [`State::Start`].
//! 5. The resulting state is dispatched. `Stop` and `Start` set the motor power, restart the
//!    state timer and settle into `Stopped` and `Started`. `Turn` reports
//!    [`TickStatus::Unimplemented`].

use core::time::Duration;

use strategy_core::time::Stopwatch;
use strategy_devices::{
    color::{ColorSample, ColorSampleExt},
    motor::MotorCommand,
};

use crate::{
    config::StrategyConfig,
    state::{Action, Color, State, Trigger, TurnDirection},
};

/// Everything the controller remembers between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    /// The active state.
    pub state: State,

    /// Time since the controller last settled into `Stopped` or `Started`.
    pub state_timer: Stopwatch,

    /// Time since activation. Never reset.
    pub match_timer: Stopwatch,

    /// The power both sides are currently held at.
    pub power: MotorCommand,

    /// The field color under the robot, once something classifies readings.
    pub color: Option<Color>,
}

impl ControllerState {
    /// Creates the state for a match that starts at the clock reading `now`.
    #[must_use]
    pub const fn activate(now: Duration) -> Self {
        Self {
            state: State::INITIAL,
            state_timer: Stopwatch::started_at(now),
            match_timer: Stopwatch::started_at(now),
            power: MotorCommand::STOP,
            color: None,
        }
    }

    /// Replaces the active state without running any rule.
    #[must_use]
    pub const fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }
}

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Rules and dispatch ran.
    Executed,

    /// The dispatched action has no implementation. State and motor power are unchanged.
    Unimplemented(Action),

    /// The match is over. Nothing ran and the loop should end.
    MatchOver,
}

/// The result of one [`StateController::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// The state after the transition rules, before dispatch.
    pub next_state: State,

    /// The controller state after dispatch, to be passed to the next tick.
    pub state: ControllerState,

    /// The rule that changed the state, if any.
    pub trigger: Option<Trigger>,

    /// The action dispatch ran, if any.
    pub action: Option<Action>,

    /// Power to send to the drivetrain. `None` once the match is over.
    pub command: Option<MotorCommand>,

    /// How the tick ended.
    pub status: TickStatus,
}

impl Tick {
    /// Returns `true` if the loop should stop ticking.
    #[must_use]
    pub const fn is_match_over(&self) -> bool {
        matches!(self.status, TickStatus::MatchOver)
    }
}

/// Timer and color-sensor driven drive strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateController {
    config: StrategyConfig,
}

impl StateController {
    /// Creates a controller with the given tunables.
    #[must_use]
    pub const fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// Returns the tunables this controller runs with.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Checks if the match timer is past the match duration at `now`.
    #[must_use]
    pub fn match_over(&self, state: &ControllerState, now: Duration) -> bool {
        state.match_timer.elapsed(now) > self.config.match_duration
    }

    /// Runs one tick.
    #[must_use]
    pub fn tick(&self, mut state: ControllerState, sample: ColorSample, now: Duration) -> Tick {
        if self.match_over(&state, now) {
            return Tick {
                next_state: state.state,
                state,
                trigger: None,
                action: None,
                command: None,
                status: TickStatus::MatchOver,
            };
        }

        let trigger = self.transition(&mut state, sample, now);
        let next_state = state.state;
        let (action, status) = self.dispatch(&mut state, now);

        Tick {
            next_state,
            state,
            trigger,
            action,
            command: Some(state.power),
            status,
        }
    }

    fn transition(
        &self,
        state: &mut ControllerState,
        sample: ColorSample,
        now: Duration,
    ) -> Option<Trigger> {
        let mut trigger = None;

        if sample.all_channels_above(self.config.white_line_threshold) {
            state.state = State::Stop;
            trigger = Some(Trigger::WhiteLine);
        }

        let timed_out = state.state_timer.elapsed(now) > self.config.state_timeout;

        if state.state == State::Started && timed_out {
            state.state = State::Stop;
            state.state_timer.reset(now);
            trigger = Some(Trigger::StartedTimeout);
        }

        if state.state == State::Stopped && timed_out {
            state.state = State::Start;
            state.state_timer.reset(now);
            trigger = Some(Trigger::StoppedTimeout);
        }

        trigger
    }

    fn dispatch(&self, state: &mut ControllerState, now: Duration) -> (Option<Action>, TickStatus) {
        match state.state {
            State::Stop => {
                state.power = MotorCommand::STOP;
                state.state_timer.reset(now);
                state.state = State::Stopped;
                (Some(Action::StopMotors), TickStatus::Executed)
            }
            State::Start => {
                state.power = MotorCommand::uniform(self.config.drive_power);
                state.state_timer.reset(now);
                state.state = State::Started;
                (Some(Action::StartMotors), TickStatus::Executed)
            }
            State::Turn => {
                let action = Action::Turn(TurnDirection::Left);
                (Some(action), TickStatus::Unimplemented(action))
            }
            State::Stopped | State::Started | State::Press => (None, TickStatus::Executed),
        }
    }
}

impl Default for StateController {
    fn default() -> Self {
        Self::new(StrategyConfig::DEFAULT)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const BLACK: ColorSample = ColorSample { r: 0, g: 0, b: 0 };
    const WHITE: ColorSample = ColorSample {
        r: 210,
        g: 210,
        b: 210,
    };
    const ALL_STATES: [State; 6] = [
        State::Stop,
        State::Stopped,
        State::Start,
        State::Started,
        State::Turn,
        State::Press,
    ];

    fn secs(secs: f64) -> Duration {
        Duration::from_secs_f64(secs)
    }

    /// A state that entered `state` at `entered` and started the match at zero.
    fn seeded(state: State, entered: Duration) -> ControllerState {
        let mut seeded = ControllerState::activate(Duration::ZERO).with_state(state);
        seeded.state_timer.reset(entered);
        seeded
    }

    #[test]
    fn first_tick_starts_the_motors() {
        let tick = StateController::default().tick(
            ControllerState::activate(Duration::ZERO),
            BLACK,
            Duration::ZERO,
        );

        assert_eq!(tick.next_state, State::Start);
        assert_eq!(tick.action, Some(Action::StartMotors));
        assert_eq!(tick.command, Some(MotorCommand::uniform(0.3)));
        assert_eq!(tick.state.state, State::Started);
        assert_eq!(tick.status, TickStatus::Executed);
    }

    #[test]
    fn white_line_forces_stop_from_any_state() {
        let controller = StateController::default();

        for state in ALL_STATES {
            let tick = controller.tick(seeded(state, Duration::ZERO), WHITE, secs(1.0));

            assert_eq!(tick.next_state, State::Stop, "from {state}");
            assert_eq!(tick.trigger, Some(Trigger::WhiteLine));
            assert_eq!(tick.command, Some(MotorCommand::STOP));
            assert_eq!(tick.state.state, State::Stopped);
        }
    }

    #[test]
    fn threshold_is_strict() {
        let controller = StateController::default();
        let tick = controller.tick(
            seeded(State::Started, Duration::ZERO),
            ColorSample::new(200, 255, 255),
            secs(1.0),
        );

        assert_eq!(tick.trigger, None);
        assert_eq!(tick.state.state, State::Started);
    }

    #[test]
    fn started_times_out_into_stop() {
        let controller = StateController::default();
        let tick = controller.tick(seeded(State::Started, Duration::ZERO), BLACK, secs(6.0));

        assert_eq!(tick.next_state, State::Stop);
        assert_eq!(tick.trigger, Some(Trigger::StartedTimeout));
        assert_eq!(tick.command, Some(MotorCommand::new(0.0, 0.0)));
        assert_eq!(tick.state.state, State::Stopped);
        assert_eq!(tick.state.state_timer.elapsed(secs(6.0)), Duration::ZERO);
    }

    #[test]
    fn stopped_times_out_into_start() {
        let controller = StateController::default();
        let tick = controller.tick(seeded(State::Stopped, secs(2.0)), BLACK, secs(7.5));

        assert_eq!(tick.next_state, State::Start);
        assert_eq!(tick.trigger, Some(Trigger::StoppedTimeout));
        assert_eq!(tick.command, Some(MotorCommand::uniform(0.3)));
        assert_eq!(tick.state.state, State::Started);
    }

    #[test]
    fn timeout_is_strict() {
        let controller = StateController::default();
        let tick = controller.tick(seeded(State::Started, Duration::ZERO), BLACK, secs(5.0));

        assert_eq!(tick.trigger, None);
        assert_eq!(tick.action, None);
        assert_eq!(tick.state.state, State::Started);
    }

    #[test]
    fn settled_states_hold_power() {
        let controller = StateController::default();
        let started = controller
            .tick(ControllerState::activate(Duration::ZERO), BLACK, Duration::ZERO)
            .state;

        let tick = controller.tick(started, BLACK, secs(2.0));
        assert_eq!(tick.action, None);
        assert_eq!(tick.command, Some(MotorCommand::uniform(0.3)));
        assert_eq!(tick.state.state_timer, started.state_timer);
    }

    #[test]
    fn turn_is_reported_unimplemented() {
        let controller = StateController::default();
        let before = seeded(State::Turn, Duration::ZERO);
        let tick = controller.tick(before, BLACK, secs(1.0));

        let turn = Action::Turn(TurnDirection::Left);
        assert_eq!(tick.status, TickStatus::Unimplemented(turn));
        assert_eq!(tick.action, Some(turn));
        assert_eq!(tick.state, before);
    }

    #[test]
    fn press_does_nothing() {
        let controller = StateController::default();
        let before = seeded(State::Press, Duration::ZERO);
        let tick = controller.tick(before, BLACK, secs(10.0));

        assert_eq!(tick.status, TickStatus::Executed);
        assert_eq!(tick.action, None);
        assert_eq!(tick.state, before);
    }

    #[test]
    fn match_end_issues_no_command() {
        let controller = StateController::default();

        for state in ALL_STATES {
            let tick = controller.tick(seeded(state, Duration::ZERO), WHITE, secs(15.1));

            assert!(tick.is_match_over(), "from {state}");
            assert_eq!(tick.command, None);
            assert_eq!(tick.state.state, state);
        }
    }

    #[test]
    fn match_timer_is_measured_from_activation() {
        let controller = StateController::default();
        let state = ControllerState::activate(secs(100.0));

        assert!(!controller.match_over(&state, secs(115.0)));
        assert!(controller.match_over(&state, secs(115.1)));
    }

    #[test]
    fn tunables_are_honored() {
        let controller = StateController::new(
            StrategyConfig::DEFAULT
                .with_drive_power(0.5)
                .with_state_timeout(secs(1.0))
                .with_white_line_threshold(100),
        );

        let tick = controller.tick(ControllerState::activate(Duration::ZERO), BLACK, Duration::ZERO);
        assert_eq!(tick.command, Some(MotorCommand::uniform(0.5)));

        let tick = controller.tick(tick.state, BLACK, secs(1.5));
        assert_eq!(tick.trigger, Some(Trigger::StartedTimeout));

        let tick = controller.tick(tick.state, ColorSample::new(150, 150, 150), secs(1.6));
        assert_eq!(tick.trigger, Some(Trigger::WhiteLine));
    }
}

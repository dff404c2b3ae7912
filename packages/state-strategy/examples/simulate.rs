//! Runs the autonomous program against simulated devices in real time.
//!
//! ```sh
//! cargo run -p state-strategy --example simulate -- 15
//! ```
//!
//! The optional argument is the match length in seconds. The simulated robot crosses the white
//! line seven seconds after launch.

use std::{thread, time::Duration};

use log::LevelFilter;
use state_strategy::{config::parse_seconds, prelude::*};
use strategy_core::io::SerialLogger;

const LINE_AT: Duration = Duration::from_secs(7);
const LINE_WIDTH: Duration = Duration::from_millis(200);

fn main() {
    SerialLogger::init(LevelFilter::Info).expect("a logger was already installed");

    let match_duration = std::env::args()
        .nth(1)
        .and_then(|arg| parse_seconds(&arg))
        .unwrap_or(StrategyConfig::DEFAULT.match_duration);

    let config = StrategyConfig::DEFAULT
        .with_match_duration(match_duration)
        .with_loop_period(Some(Duration::from_millis(20)));
    if let Err(err) = config.validate() {
        log::error!("{err}");
        return;
    }

    let clock = SystemClock::new();
    let sensor = SensorFn(move || {
        let now = clock.now();
        if now >= LINE_AT && now < LINE_AT + LINE_WIDTH {
            ColorSample::from_packed(0x00F0_F0EB)
        } else {
            ColorSample::from_packed(0x0028_231E)
        }
    });

    let mut op_mode = AutonomousOpMode::new(
        StateController::new(config),
        sensor,
        Drivetrain::with_directions(
            SimMotor::new("left_drive"),
            Direction::Forward,
            SimMotor::new("right_drive"),
            Direction::Reverse,
        ),
        clock,
        LogTelemetry::new(),
        OpModeHandle::new(),
    );

    let driver_station = op_mode.handle();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(500));
        driver_station.start();
    });

    match op_mode.run() {
        Ok(report) => log::info!("{report:?}"),
        Err(err) => log::error!("{err}"),
    }
}

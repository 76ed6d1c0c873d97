use std::time::Duration;

use ev3dev_lang_rust::motors::MotorPort;
use fll_drive::error::Result;
use fll_drive::lego::{self, LegoMotor};
use fll_drive::movement::attachment;
use fll_drive::movement::config::DriveConfig;
use fll_drive::movement::motor::MotorController;
use fll_drive::movement::spec::RobotSpec;
use fll_drive::robot::{Direction, StopAction};
use fll_drive::time::SystemClock;
use fll_drive::types::{Degrees, DegreesPerSecond, Heading, Milimeters, Percent};

fn main() -> Result<()> {
    let spec = RobotSpec::new(
        Milimeters(56.0),
        Milimeters(80.0),
        360.0,
        DegreesPerSecond(1050.0),
    )?;

    let mut drive = lego::new_drive(
        (MotorPort::OutA, Direction::Counterclockwise),
        (MotorPort::OutC, Direction::Clockwise),
        Direction::Counterclockwise,
        spec,
        DriveConfig::default(),
    )?;
    let mut arm = MotorController::with_scale(
        LegoMotor::new(MotorPort::OutB)?,
        Direction::Clockwise,
        DegreesPerSecond(1000.0),
        360.0,
    );
    let clock = SystemClock::new();

    drive.reset();

    let timeout = Duration::from_secs(5);

    drive.drive_straight(Milimeters(62.0), Percent(40.0), timeout);
    drive.turn_to(Heading(90.0), Percent(40.0), timeout);
    drive.drive_straight(Milimeters(260.0), Percent(40.0), timeout);

    let pulled = attachment::run_angle(
        &mut arm,
        &clock,
        Degrees(450.0),
        Percent(30.0),
        StopAction::Hold,
        timeout,
    );
    if !pulled.is_success() {
        eprintln!("Arm jammed, skipping the rest of the mission");
        return Ok(());
    }

    drive.drive_straight(Milimeters(-125.0), Percent(30.0), timeout);
    drive.turn_relative(Heading(-90.0), Percent(40.0), timeout);
    drive.drive_straight(Milimeters(-600.0), Percent(80.0), timeout);

    Ok(())
}

mod common;

use std::time::Duration;

use common::{Call, SimClock, SimMotor, World, ARM};
use fll_drive::movement::attachment::{self, TOLERANCE};
use fll_drive::movement::controller::Outcome;
use fll_drive::movement::motor::MotorController;
use fll_drive::robot::{Direction, StopAction};
use fll_drive::types::{Degrees, DegreesPerSecond, Percent};

fn arm(world: &common::Shared) -> MotorController<SimMotor> {
    MotorController::with_scale(
        SimMotor::new(world, ARM, Direction::Clockwise),
        Direction::Clockwise,
        DegreesPerSecond(1000.0),
        360.0,
    )
}

#[test]
fn raises_arm_and_holds() {
    let world = World::new();
    let clock = SimClock::new(&world);
    let mut motor = arm(&world);

    let outcome = attachment::run_angle(
        &mut motor,
        &clock,
        Degrees(450.0),
        Percent(30.0),
        StopAction::Hold,
        Duration::from_secs(5),
    );
    assert_eq!(outcome, Outcome::Reached);

    let angle = motor.angle().0;
    assert!((angle - 450.0).abs() <= TOLERANCE + 5.0, "Arm at {angle}");

    let world = world.borrow();
    assert_eq!(world.motors[ARM].calls.last(), Some(&Call::Hold));
    assert!(world.motors[ARM].speeds().iter().all(|it| *it > 0.0 && *it <= 300.0));
}

#[test]
fn relative_to_current_position() {
    let world = World::new();
    let clock = SimClock::new(&world);
    let mut motor = arm(&world);
    motor.reset_angle(Degrees(100.0));

    let outcome = attachment::run_angle(
        &mut motor,
        &clock,
        Degrees(-425.0),
        Percent(30.0),
        StopAction::Coast,
        Duration::from_secs(5),
    );
    assert_eq!(outcome, Outcome::Reached);

    let angle = motor.angle().0;
    assert!((angle + 325.0).abs() <= TOLERANCE + 5.0, "Arm at {angle}");
    assert_eq!(world.borrow().motors[ARM].calls.last(), Some(&Call::Stop));
}

#[test]
fn jammed_arm_times_out() {
    let world = World::new();
    world.borrow_mut().stalled = true;
    let clock = SimClock::new(&world);
    let mut motor = arm(&world);

    let outcome = attachment::run_angle(
        &mut motor,
        &clock,
        Degrees(90.0),
        Percent(50.0),
        StopAction::Hold,
        Duration::from_millis(200),
    );
    assert_eq!(outcome, Outcome::TimedOut);

    let world = world.borrow();
    assert_eq!(world.time, Duration::from_millis(200));
    assert_eq!(world.motors[ARM].count(Call::Stop), 1);
    assert_eq!(world.motors[ARM].count(Call::Hold), 0);
}

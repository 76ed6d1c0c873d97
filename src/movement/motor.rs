use crate::movement::spec::RobotSpec;
use crate::robot::{Direction, MotorHardware, StopAction};
use crate::types::{Degrees, DegreesPerSecond, Percent, Ticks, UnitsExt};

/// Adapts one motor to the logical frame of the robot
///
/// Speeds are unitless commands from -100 to 100 where positive is forward. The mounting
/// `Direction` is only applied when talking to the hardware, everything this type reports or
/// accepts is already in the logical frame.
#[derive(Debug)]
pub struct MotorController<M> {
    motor: M,
    direction: Direction,

    max_speed: DegreesPerSecond,
    ticks_per_rev: f32,
}

impl<M: MotorHardware> MotorController<M> {
    /// A drive motor using the speed and encoder scale from `spec`
    pub fn new(motor: M, direction: Direction, spec: &RobotSpec) -> Self {
        Self::with_scale(motor, direction, spec.max_speed(), spec.ticks_per_rev())
    }

    pub fn with_scale(
        motor: M,
        direction: Direction,
        max_speed: DegreesPerSecond,
        ticks_per_rev: f32,
    ) -> Self {
        MotorController {
            motor,
            direction,
            max_speed,
            ticks_per_rev,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn max_speed(&self) -> DegreesPerSecond {
        self.max_speed
    }

    /// Spin at `speed` percent of the max speed until told otherwise
    pub fn run(&mut self, speed: Percent) {
        // Never turn a bad command into full power
        let speed = if speed.0.is_nan() { 0.0 } else { speed.clamped().0 };
        let dps = speed / 100.0 * self.max_speed.0 * self.direction.sign();

        self.motor.run(dps.dps());
    }

    pub fn angle(&self) -> Degrees {
        (self.motor.angle().0 * self.direction.sign()).deg()
    }

    pub fn reset_angle(&mut self, Degrees(angle): Degrees) {
        self.motor.reset_angle((angle * self.direction.sign()).deg());
    }

    pub fn ticks(&self) -> Ticks {
        (self.angle().0 / 360.0 * self.ticks_per_rev).ticks()
    }

    pub fn reset_ticks(&mut self, Ticks(ticks): Ticks) {
        self.reset_angle((ticks / self.ticks_per_rev * 360.0).deg());
    }

    /// Remove power, the motor may drift
    pub fn stop(&mut self) {
        self.motor.stop();
    }

    /// Actively hold position
    pub fn hold(&mut self) {
        self.motor.hold();
    }

    pub fn halt(&mut self, action: StopAction) {
        match action {
            StopAction::Coast => self.stop(),
            StopAction::Hold => self.hold(),
        }
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }

    pub fn into_inner(self) -> M {
        self.motor
    }
}

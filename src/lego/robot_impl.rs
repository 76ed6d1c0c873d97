use std::cell::Cell;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use ev3dev_lang_rust::motors::{MotorPort, TachoMotor};
use ev3dev_lang_rust::sensors::GyroSensor;
use log::warn;

use crate::error::Result;
use crate::movement::config::DriveConfig;
use crate::movement::controller::DriveController;
use crate::movement::motor::MotorController;
use crate::movement::spec::RobotSpec;
use crate::robot::{Direction, HeadingSensor, MotorHardware, StopAction};
use crate::time::SystemClock;
use crate::types::{Degrees, DegreesPerSecond, Heading};

pub type LegoDrive = DriveController<LegoMotor, LegoGyro, SystemClock>;

/// Builds a drive controller from the two drive motors and the first gyro found
pub fn new_drive(
    left: (MotorPort, Direction),
    right: (MotorPort, Direction),
    gyro_direction: Direction,
    spec: RobotSpec,
    config: DriveConfig,
) -> Result<LegoDrive> {
    let left_motor = LegoMotor::new(left.0).context("Left drive motor")?;
    let right_motor = LegoMotor::new(right.0).context("Right drive motor")?;
    let gyro = LegoGyro::find(gyro_direction)?;

    DriveController::new(
        MotorController::new(left_motor, left.1, &spec),
        MotorController::new(right_motor, right.1, &spec),
        gyro,
        SystemClock::new(),
        spec,
        config,
    )
}

/// A tacho motor
///
/// Device errors are logged and otherwise ignored, a failed read returns the last good value.
pub struct LegoMotor {
    motor: TachoMotor,
    port: MotorPort,

    // Angle resets are virtual, the hardware position is never rewritten
    offset: f32,
    last_position: Cell<i32>,

    stopping_action: Option<StopAction>,
    speed_sp: Option<i32>,
    running: bool,
}

impl LegoMotor {
    pub fn new(port: MotorPort) -> Result<Self> {
        let motor = TachoMotor::get(port)
            .with_context(|| format!("Couldn't find motor on port {port:?}"))?;
        let position = motor.get_position().context("Read motor position")?;

        Ok(LegoMotor {
            motor,
            port,
            offset: 0.0,
            last_position: Cell::new(position),
            stopping_action: None,
            speed_sp: None,
            running: false,
        })
    }

    fn position(&self) -> i32 {
        match self.motor.get_position() {
            Ok(position) => {
                self.last_position.set(position);
                position
            }
            Err(err) => {
                warn!("Couldn't read position of motor {:?}: {err:?}", self.port);
                self.last_position.get()
            }
        }
    }

    fn halt(&mut self, action: StopAction) {
        stop_motor(&self.motor, self.port, action, &mut self.stopping_action);
        self.running = false;
    }
}

/// The writes needed to stop a tacho motor
trait StopWrites {
    fn set_stop_action(&self, name: &str) -> Result<()>;
    fn stop(&self) -> Result<()>;
}

impl StopWrites for TachoMotor {
    fn set_stop_action(&self, name: &str) -> Result<()> {
        Ok(TachoMotor::set_stop_action(self, name)?)
    }

    fn stop(&self) -> Result<()> {
        Ok(TachoMotor::stop(self)?)
    }
}

/// Stops `motor`, switching its stop action first if it differs from `current`
///
/// The stop command is always sent. If the stop action can't be written the motor stops under
/// the previous one and `current` is left alone.
fn stop_motor(
    motor: &impl StopWrites,
    port: MotorPort,
    action: StopAction,
    current: &mut Option<StopAction>,
) {
    if Some(action) != *current {
        let name = match action {
            StopAction::Coast => TachoMotor::STOP_ACTION_COAST,
            StopAction::Hold => TachoMotor::STOP_ACTION_HOLD,
        };

        match motor.set_stop_action(name) {
            Ok(()) => *current = Some(action),
            Err(err) => warn!("Couldn't set stop action of motor {port:?}: {err:#}"),
        }
    }

    if let Err(err) = motor.stop() {
        warn!("Couldn't stop motor {port:?}: {err:#}");
    }
}

impl MotorHardware for LegoMotor {
    fn angle(&self) -> Degrees {
        Degrees(self.position() as f32 - self.offset)
    }

    fn reset_angle(&mut self, angle: Degrees) {
        self.offset = self.position() as f32 - angle.0;
    }

    fn run(&mut self, speed: DegreesPerSecond) {
        let speed = speed.0.round() as i32;

        if Some(speed) != self.speed_sp {
            if let Err(err) = self.motor.set_speed_sp(speed) {
                warn!("Couldn't set speed of motor {:?}: {err:?}", self.port);
                return;
            }
            self.speed_sp = Some(speed);
        }

        if !self.running {
            if let Err(err) = self.motor.run_forever() {
                warn!("Couldn't start motor {:?}: {err:?}", self.port);
                return;
            }
            self.running = true;
        }
    }

    fn stop(&mut self) {
        self.halt(StopAction::Coast);
    }

    fn hold(&mut self) {
        self.halt(StopAction::Hold);
    }
}

/// A gyro sensor in angle mode
///
/// The EV3 gyro counts clockwise rotation as positive when mounted upright, so an upright sensor
/// needs `Direction::Counterclockwise` to match the logical heading frame.
pub struct LegoGyro {
    gyro: GyroSensor,
    direction: Direction,

    offset: Cell<f32>,
    last_angle: Cell<i32>,
}

impl LegoGyro {
    /// Uses the first gyro sensor connected
    pub fn find(direction: Direction) -> Result<Self> {
        let gyro = GyroSensor::list()
            .context("Find gyro sensors")?
            .into_iter()
            .next()
            .context("No gyro sensor connected")?;

        Self::new(gyro, direction)
    }

    pub fn new(gyro: GyroSensor, direction: Direction) -> Result<Self> {
        gyro.set_mode_gyro_ang().context("Set gyro sensor mode")?;
        let angle = gyro.get_angle().context("Read gyro")?;

        Ok(LegoGyro {
            gyro,
            direction,
            offset: Cell::new(0.0),
            last_angle: Cell::new(angle),
        })
    }

    fn raw_angle(&self) -> f32 {
        let angle = match self.gyro.get_angle() {
            Ok(angle) => angle,
            Err(err) => {
                warn!("Couldn't read gyro, resetting its mode: {err:?}");

                match self.try_fix_sensor() {
                    Ok(angle) => angle,
                    Err(err) => {
                        warn!("Gyro still unreadable: {err:#}");
                        self.last_angle.get()
                    }
                }
            }
        };
        self.last_angle.set(angle);

        angle as f32 * self.direction.sign()
    }

    fn try_fix_sensor(&self) -> Result<i32> {
        self.gyro.set_mode_gyro_ang().context("Set gyro sensor mode")?;

        for _ in 0..50 {
            if self.gyro.is_mode_gyro_ang().context("Read gyro sensor mode")? {
                break;
            }
            thread::sleep(Duration::from_millis(2));
        }

        self.gyro.get_angle().context("Read gyro")
    }
}

impl HeadingSensor for LegoGyro {
    fn heading(&self) -> Heading {
        Heading(self.raw_angle() - self.offset.get())
    }

    fn reset_heading(&self, heading: Heading) {
        self.offset.set(self.raw_angle() - heading.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeTacho {
        reject_stop_action: bool,
        writes: RefCell<Vec<String>>,
    }

    impl StopWrites for FakeTacho {
        fn set_stop_action(&self, name: &str) -> Result<()> {
            if self.reject_stop_action {
                bail!("Write failed");
            }
            self.writes.borrow_mut().push(format!("stop_action={name}"));
            Ok(())
        }

        fn stop(&self) -> Result<()> {
            self.writes.borrow_mut().push("stop".to_owned());
            Ok(())
        }
    }

    #[test]
    fn stops_even_if_stop_action_write_fails() {
        let motor = FakeTacho {
            reject_stop_action: true,
            ..Default::default()
        };
        let mut current = Some(StopAction::Hold);

        stop_motor(&motor, MotorPort::OutA, StopAction::Coast, &mut current);

        assert_eq!(*motor.writes.borrow(), ["stop"]);
        assert_eq!(current, Some(StopAction::Hold));
    }

    #[test]
    fn stop_action_written_only_on_change() {
        let motor = FakeTacho::default();
        let mut current = None;

        stop_motor(&motor, MotorPort::OutA, StopAction::Hold, &mut current);
        stop_motor(&motor, MotorPort::OutA, StopAction::Hold, &mut current);

        assert_eq!(
            *motor.writes.borrow(),
            [
                format!("stop_action={}", TachoMotor::STOP_ACTION_HOLD),
                "stop".to_owned(),
                "stop".to_owned(),
            ]
        );
        assert_eq!(current, Some(StopAction::Hold));
    }
}

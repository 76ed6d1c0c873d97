//! A deterministic two wheel robot for driving the controllers in tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use fll_drive::movement::config::DriveConfig;
use fll_drive::movement::controller::DriveController;
use fll_drive::movement::motor::MotorController;
use fll_drive::movement::spec::RobotSpec;
use fll_drive::robot::{Direction, HeadingSensor, MotorHardware};
use fll_drive::time::Clock;
use fll_drive::types::{Degrees, DegreesPerSecond, Heading};

pub const LEFT: usize = 0;
pub const RIGHT: usize = 1;
pub const ARM: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Call {
    /// Logical wheel speed in degrees per second
    Run(f32),
    Stop,
    Hold,
}

#[derive(Debug)]
pub struct MotorState {
    /// Logical position in degrees
    pub position: f32,
    /// Logical speed in degrees per second
    pub speed: f32,
    /// Fraction of the commanded speed actually achieved
    pub efficiency: f32,
    pub calls: Vec<Call>,
}

impl MotorState {
    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|it| **it == call).count()
    }

    pub fn speeds(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|it| match it {
                Call::Run(speed) => Some(*speed),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct World {
    pub time: Duration,
    pub motors: Vec<MotorState>,
    pub stalled: bool,

    /// Unbounded heading in degrees, counterclockwise positive
    pub heading: f32,
    pub gyro_offset: f32,
    /// Readings returned instead of the real heading, one per read
    pub gyro_glitches: VecDeque<f32>,
    pub headings: Vec<f32>,

    pub spec: RobotSpec,
}

pub type Shared = Rc<RefCell<World>>;

impl World {
    pub fn new() -> Shared {
        let motor = || MotorState {
            position: 0.0,
            speed: 0.0,
            efficiency: 1.0,
            calls: Vec::new(),
        };

        Rc::new(RefCell::new(World {
            time: Duration::ZERO,
            motors: vec![motor(), motor(), motor()],
            stalled: false,
            heading: 0.0,
            gyro_offset: 0.0,
            gyro_glitches: VecDeque::new(),
            headings: Vec::new(),
            spec: RobotSpec::spike_prime(),
        }))
    }

    fn step(&mut self, dt: Duration) {
        self.time += dt;

        if self.stalled {
            return;
        }

        let seconds = dt.as_secs_f32();
        let mut moved = [0.0; 3];
        for (motor, moved) in self.motors.iter_mut().zip(moved.iter_mut()) {
            *moved = motor.speed * motor.efficiency * seconds;
            motor.position += *moved;
        }

        let circumference = self.spec.wheel_circumference().0;
        let left = moved[LEFT] / 360.0 * circumference;
        let right = moved[RIGHT] / 360.0 * circumference;
        self.heading += (right - left) / self.spec.wheelbase_diameter().0 * 180.0 / PI;
        self.headings.push(self.heading);
    }

    pub fn distance_mm(&self) -> f32 {
        let average = (self.motors[LEFT].position + self.motors[RIGHT].position) / 2.0;

        average / 360.0 * self.spec.wheel_circumference().0
    }
}

pub struct SimMotor {
    world: Shared,
    index: usize,
    mount: Direction,
}

impl SimMotor {
    pub fn new(world: &Shared, index: usize, mount: Direction) -> Self {
        SimMotor {
            world: world.clone(),
            index,
            mount,
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut MotorState) -> T) -> T {
        f(&mut self.world.borrow_mut().motors[self.index])
    }
}

impl MotorHardware for SimMotor {
    fn angle(&self) -> Degrees {
        let sign = self.mount.sign();
        self.with(|it| Degrees(it.position * sign))
    }

    fn reset_angle(&mut self, angle: Degrees) {
        let sign = self.mount.sign();
        self.with(|it| it.position = angle.0 * sign);
    }

    fn run(&mut self, speed: DegreesPerSecond) {
        let speed = speed.0 * self.mount.sign();
        self.with(|it| {
            it.speed = speed;
            it.calls.push(Call::Run(speed));
        });
    }

    fn stop(&mut self) {
        self.with(|it| {
            it.speed = 0.0;
            it.calls.push(Call::Stop);
        });
    }

    fn hold(&mut self) {
        self.with(|it| {
            it.speed = 0.0;
            it.calls.push(Call::Hold);
        });
    }
}

pub struct SimGyro {
    world: Shared,
}

impl HeadingSensor for SimGyro {
    fn heading(&self) -> Heading {
        let mut world = self.world.borrow_mut();

        match world.gyro_glitches.pop_front() {
            Some(glitch) => Heading(glitch),
            None => Heading(world.heading - world.gyro_offset),
        }
    }

    fn reset_heading(&self, heading: Heading) {
        let mut world = self.world.borrow_mut();
        world.gyro_offset = world.heading - heading.0;
    }
}

#[derive(Clone)]
pub struct SimClock {
    world: Shared,
}

impl SimClock {
    pub fn new(world: &Shared) -> Self {
        SimClock {
            world: world.clone(),
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        self.world.borrow().time
    }

    fn sleep(&self, duration: Duration) {
        self.world.borrow_mut().step(duration);
    }
}

pub type SimDrive = DriveController<SimMotor, SimGyro, SimClock>;

/// The left motor is mounted mirrored, like on the real robot
pub fn drive() -> (Shared, SimDrive) {
    let world = World::new();
    let spec = RobotSpec::spike_prime();

    let left = MotorController::new(
        SimMotor::new(&world, LEFT, Direction::Counterclockwise),
        Direction::Counterclockwise,
        &spec,
    );
    let right = MotorController::new(
        SimMotor::new(&world, RIGHT, Direction::Clockwise),
        Direction::Clockwise,
        &spec,
    );
    let gyro = SimGyro {
        world: world.clone(),
    };

    let drive = DriveController::new(
        left,
        right,
        gyro,
        SimClock::new(&world),
        spec,
        DriveConfig::default(),
    )
    .expect("Default config is valid");

    (world, drive)
}

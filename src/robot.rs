use crate::types::{Degrees, DegreesPerSecond, Heading};
use std::rc::Rc;

/// How a device is mounted relative to the robot's logical frame
///
/// `Clockwise` devices already read positive for logical forward (or logical left turns for a
/// heading sensor), `Counterclockwise` devices are mirrored and get their sign flipped.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub enum Direction {
    #[default]
    Clockwise,
    Counterclockwise,
}

impl Direction {
    /// The multiplier between the hardware and logical frames
    pub fn sign(self) -> f32 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::Counterclockwise => -1.0,
        }
    }
}

/// What a motor does once it is told to stop
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StopAction {
    /// Remove power and let the motor spin down
    Coast,

    /// Actively hold the current position
    Hold,
}

/// A single motor with an encoder
///
/// Values are in the hardware's own frame. Implementations should not fail, a binding that can
/// lose its device is expected to deal with that itself.
pub trait MotorHardware {
    /// Accumulated encoder angle
    fn angle(&self) -> Degrees;

    /// Redefine the current encoder angle
    fn reset_angle(&mut self, angle: Degrees);

    /// Spin forever at `speed`
    fn run(&mut self, speed: DegreesPerSecond);

    /// Remove power
    fn stop(&mut self);

    /// Resist external torque at the current position
    fn hold(&mut self);
}

/// A source of absolute heading
///
/// Headings grow when the robot rotates counterclockwise (right wheel forward, left wheel back).
pub trait HeadingSensor {
    fn heading(&self) -> Heading;

    fn reset_heading(&self, heading: Heading);
}

impl<T: MotorHardware + ?Sized> MotorHardware for Box<T> {
    fn angle(&self) -> Degrees {
        (**self).angle()
    }

    fn reset_angle(&mut self, angle: Degrees) {
        (**self).reset_angle(angle)
    }

    fn run(&mut self, speed: DegreesPerSecond) {
        (**self).run(speed)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn hold(&mut self) {
        (**self).hold()
    }
}

impl<T: HeadingSensor + ?Sized> HeadingSensor for &T {
    fn heading(&self) -> Heading {
        (**self).heading()
    }

    fn reset_heading(&self, heading: Heading) {
        (**self).reset_heading(heading)
    }
}

impl<T: HeadingSensor + ?Sized> HeadingSensor for Rc<T> {
    fn heading(&self) -> Heading {
        (**self).heading()
    }

    fn reset_heading(&self, heading: Heading) {
        (**self).reset_heading(heading)
    }
}

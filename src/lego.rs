//! ev3dev bindings for the hardware interfaces in [`crate::robot`]

mod robot_impl;

pub use robot_impl::{new_drive, LegoDrive, LegoGyro, LegoMotor};

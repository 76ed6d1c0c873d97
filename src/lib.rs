//! Closed loop movement for two wheel FLL robots.
//!
//! The core is hardware agnostic: a [`movement::controller::DriveController`] drives two
//! [`movement::motor::MotorController`]s and reads a [`robot::HeadingSensor`], pacing its
//! control loops with a [`time::Clock`]. The [`lego`] module binds these interfaces to ev3dev.

pub mod error;
pub mod lego;
pub mod math;
pub mod movement;
pub mod robot;
pub mod time;
pub mod types;

use std::f32::consts::PI;

use anyhow::ensure;

use crate::error::Result;
use crate::types::{Degrees, DegreesPerSecond, Milimeters, Ticks, UnitsExt};

/// The fixed geometry of the drive base
#[derive(Clone, Debug, PartialEq)]
pub struct RobotSpec {
    wheel_circumference: Milimeters,
    wheel_diameter: Milimeters,
    wheelbase_circumference: Milimeters,
    wheelbase_diameter: Milimeters,

    ticks_per_rev: f32,

    max_speed: DegreesPerSecond,
}

impl RobotSpec {
    pub fn new(
        wheel_diameter: Milimeters,
        wheelbase_diameter: Milimeters,
        ticks_per_rev: f32,
        max_speed: DegreesPerSecond,
    ) -> Result<Self> {
        ensure!(
            wheel_diameter.0.is_finite() && wheel_diameter.0 > 0.0,
            "Wheel diameter must be positive, got {wheel_diameter:?}"
        );
        ensure!(
            wheelbase_diameter.0.is_finite() && wheelbase_diameter.0 > 0.0,
            "Wheelbase must be positive, got {wheelbase_diameter:?}"
        );
        ensure!(
            ticks_per_rev.is_finite() && ticks_per_rev > 0.0,
            "Ticks per revolution must be positive, got {ticks_per_rev}"
        );
        ensure!(
            max_speed.0.is_finite() && max_speed.0 > 0.0,
            "Max speed must be positive, got {max_speed:?}"
        );

        Ok(RobotSpec {
            wheel_circumference: (PI * wheel_diameter.0).mm(),
            wheel_diameter,
            wheelbase_circumference: (PI * wheelbase_diameter.0).mm(),
            wheelbase_diameter,
            ticks_per_rev,
            max_speed,
        })
    }

    /// Spike Prime drive base: 56mm wheels 80mm apart on motors with 1 degree encoders
    pub fn spike_prime() -> Self {
        RobotSpec {
            wheel_circumference: (PI * 56.0).mm(),
            wheel_diameter: 56.0f32.mm(),
            wheelbase_circumference: (PI * 80.0).mm(),
            wheelbase_diameter: 80.0f32.mm(),
            ticks_per_rev: 360.0,
            max_speed: 1080.0f32.dps(),
        }
    }

    /// The circumference of the main wheels on the robot
    /// In millimeters
    pub fn wheel_circumference(&self) -> Milimeters {
        self.wheel_circumference
    }

    /// The diameter of the main wheels on the robot
    /// In millimeters
    pub fn wheel_diameter(&self) -> Milimeters {
        self.wheel_diameter
    }

    /// The circle the wheels trace when the robot turns in place
    /// In millimeters
    pub fn wheelbase_circumference(&self) -> Milimeters {
        self.wheelbase_circumference
    }

    /// The distance between the robot's 2 wheels
    /// In millimeters
    pub fn wheelbase_diameter(&self) -> Milimeters {
        self.wheelbase_diameter
    }

    /// Encoder resolution
    pub fn ticks_per_rev(&self) -> f32 {
        self.ticks_per_rev
    }

    /// The wheel speed commanded by a 100% speed command
    /// In degrees per second
    pub fn max_speed(&self) -> DegreesPerSecond {
        self.max_speed
    }

    /// How far the robot rolls per encoder tick
    pub fn mm_per_tick(&self) -> Milimeters {
        (self.wheel_circumference.0 / self.ticks_per_rev).mm()
    }

    pub fn mm_to_ticks(&self, Milimeters(mm): Milimeters) -> Ticks {
        (mm / self.wheel_circumference.0 * self.ticks_per_rev).ticks()
    }

    pub fn ticks_to_mm(&self, Ticks(ticks): Ticks) -> Milimeters {
        (ticks / self.ticks_per_rev * self.wheel_circumference.0).mm()
    }

    pub fn deg_to_ticks(&self, Degrees(deg): Degrees) -> Ticks {
        (deg / 360.0 * self.ticks_per_rev).ticks()
    }

    pub fn ticks_to_deg(&self, Ticks(ticks): Ticks) -> Degrees {
        (ticks / self.ticks_per_rev * 360.0).deg()
    }
}

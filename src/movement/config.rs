use std::time::Duration;

use anyhow::{ensure, Context};

use crate::error::Result;
use crate::movement::pid::PidConfig;
use crate::types::{Milimeters, Percent};

/// Tuning for the drive controller
#[derive(Clone, Debug, PartialEq)]
pub struct DriveConfig {
    /// Period of every control loop
    pub cycle: Duration,

    pub straight: StraightConfig,
    pub turn: TurnConfig,
}

/// Tuning for [`DriveController::drive_straight`](crate::movement::controller::DriveController::drive_straight)
#[derive(Clone, Debug, PartialEq)]
pub struct StraightConfig {
    /// Heading hold, the output is a differential speed correction
    pub pid: PidConfig,

    /// Distance from the target that counts as arrived
    pub tolerance: Milimeters,

    /// Fraction of the total distance, at the end, over which speed ramps down
    pub deceleration_fraction: f32,

    /// Slowest speed that still reliably moves the robot
    pub min_speed: Percent,
}

/// Tuning for [`DriveController::turn_to`](crate::movement::controller::DriveController::turn_to)
#[derive(Clone, Debug, PartialEq)]
pub struct TurnConfig {
    pub pid: PidConfig,

    /// Heading error, in degrees, that counts as arrived
    pub tolerance: f32,

    /// Consecutive in tolerance cycles required before the turn succeeds
    pub settle_cycles: u32,

    /// Below this heading error the output is scaled down linearly
    pub ramp_threshold: f32,

    /// Slowest speed used while outside the tolerance band
    pub min_speed: Percent,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            cycle: Duration::from_millis(20),
            straight: StraightConfig::default(),
            turn: TurnConfig::default(),
        }
    }
}

impl Default for StraightConfig {
    fn default() -> Self {
        StraightConfig {
            pid: PidConfig::new(1.5, 0.0, 0.006, 30.0),
            tolerance: Milimeters(5.0),
            deceleration_fraction: 0.3,
            min_speed: Percent(20.0),
        }
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        TurnConfig {
            pid: PidConfig::new(1.2, 0.0, 0.004, 50.0),
            tolerance: 2.0,
            settle_cycles: 5,
            ramp_threshold: 15.0,
            min_speed: Percent(5.0),
        }
    }
}

impl DriveConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.cycle.is_zero(), "Control cycle must be longer than 0");

        validate_pid(&self.straight.pid).context("Heading hold PID")?;
        validate_pid(&self.turn.pid).context("Turn PID")?;

        let straight = &self.straight;
        ensure!(
            straight.tolerance.0.is_finite() && straight.tolerance.0 > 0.0,
            "Straight tolerance must be positive, got {:?}",
            straight.tolerance
        );
        ensure!(
            straight.deceleration_fraction > 0.0 && straight.deceleration_fraction <= 1.0,
            "Deceleration fraction must be in (0, 1], got {}",
            straight.deceleration_fraction
        );
        ensure!(
            straight.min_speed.0 > 0.0 && straight.min_speed.0 <= 100.0,
            "Straight min speed must be in (0, 100], got {:?}",
            straight.min_speed
        );

        let turn = &self.turn;
        ensure!(
            turn.tolerance.is_finite() && turn.tolerance > 0.0,
            "Turn tolerance must be positive, got {}",
            turn.tolerance
        );
        ensure!(turn.settle_cycles > 0, "Settle window must be at least 1 cycle");
        ensure!(
            turn.ramp_threshold.is_finite() && turn.ramp_threshold >= turn.tolerance,
            "Ramp threshold must not be inside the tolerance band, got {}",
            turn.ramp_threshold
        );
        ensure!(
            turn.min_speed.0 >= 0.0 && turn.min_speed.0 <= 100.0,
            "Turn min speed must be in [0, 100], got {:?}",
            turn.min_speed
        );

        Ok(())
    }
}

fn validate_pid(pid: &PidConfig) -> Result<()> {
    ensure!(
        [pid.kp, pid.ki, pid.kd].iter().all(|gain| gain.is_finite()),
        "Gains must be finite: {pid:?}"
    );
    ensure!(
        pid.integral_limit >= 0.0,
        "Integral limit must not be negative, got {}",
        pid.integral_limit
    );
    ensure!(
        pid.derivative_alpha > 0.0 && pid.derivative_alpha <= 1.0,
        "Derivative filter weight must be in (0, 1], got {}",
        pid.derivative_alpha
    );
    ensure!(
        pid.output_min < pid.output_max,
        "Output bounds are empty: {} -> {}",
        pid.output_min,
        pid.output_max
    );

    Ok(())
}

use std::time::Duration;

use log::{debug, trace, warn};

use crate::error::Result;
use crate::math;
use crate::movement::config::DriveConfig;
use crate::movement::motor::MotorController;
use crate::movement::pid::PidController;
use crate::movement::spec::RobotSpec;
use crate::robot::{HeadingSensor, MotorHardware, StopAction};
use crate::time::{Clock, Ticker, Timer};
use crate::types::{Distance, Heading, Percent, Ticks};

/// How a maneuver ended
///
/// A timeout is an expected result, not an error. The caller decides whether to retry, carry on
/// or abort the mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The target was reached within tolerance
    Reached,

    /// The deadline passed first, or the request was malformed
    TimedOut,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Reached
    }
}

/// The standard implementation of movement
///
/// Owns both drive motors and runs one maneuver at a time. Every maneuver blocks until it
/// finishes and always leaves the motors held (on success) or stopped (otherwise).
pub struct DriveController<M, G, C> {
    left: MotorController<M>,
    right: MotorController<M>,
    gyro: G,
    clock: C,

    spec: RobotSpec,
    config: DriveConfig,

    heading_pid: PidController,
    turn_pid: PidController,
}

impl<M, G, C> DriveController<M, G, C>
where
    M: MotorHardware,
    G: HeadingSensor,
    C: Clock + Clone,
{
    pub fn new(
        left: MotorController<M>,
        right: MotorController<M>,
        gyro: G,
        clock: C,
        spec: RobotSpec,
        config: DriveConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(DriveController {
            left,
            right,
            gyro,
            clock,
            heading_pid: PidController::new(config.straight.pid),
            turn_pid: PidController::new(config.turn.pid),
            spec,
            config,
        })
    }

    pub fn spec(&self) -> &RobotSpec {
        &self.spec
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// The current normalized heading
    pub fn heading(&self) -> Heading {
        self.gyro.heading().normalized()
    }

    pub fn left(&self) -> &MotorController<M> {
        &self.left
    }

    pub fn right(&self) -> &MotorController<M> {
        &self.right
    }

    pub fn motors_mut(&mut self) -> (&mut MotorController<M>, &mut MotorController<M>) {
        (&mut self.left, &mut self.right)
    }

    pub fn into_parts(self) -> (MotorController<M>, MotorController<M>, G) {
        (self.left, self.right, self.gyro)
    }

    /// Zeroes both wheel encoders and the heading
    pub fn reset(&mut self) {
        self.left.reset_ticks(Ticks(0.0));
        self.right.reset_ticks(Ticks(0.0));
        self.gyro.reset_heading(Heading(0.0));

        self.heading_pid.reset();
        self.turn_pid.reset();
    }

    /// Drives `distance` while holding the heading the robot had when the call started
    ///
    /// Negative distances drive backwards. `base_speed` is the cruising speed, its sign is
    /// ignored. Speed ramps down over the last part of the distance but never below the configured
    /// minimum, so the robot can't stall short of the target.
    pub fn drive_straight(
        &mut self,
        distance: impl Into<Distance>,
        base_speed: Percent,
        timeout: Duration,
    ) -> Outcome {
        let distance = distance.into();
        let target = distance.to_ticks(&self.spec).0;

        if !target.is_finite() || !base_speed.0.is_finite() || timeout.is_zero() {
            warn!("Rejected drive of {distance:?} at {base_speed:?} within {timeout:?}");
            return self.finish(Outcome::TimedOut, Duration::ZERO);
        }

        let cfg = &self.config.straight;

        // Determine the requested direction
        let direction = math::sign(target);
        let target = target.abs();

        let speed = math::clampf(base_speed.0.abs(), 100.0, cfg.min_speed.0);
        let tolerance = self.spec.mm_to_ticks(cfg.tolerance).0;
        let ramp_length = target * cfg.deceleration_fraction;
        let min_speed = cfg.min_speed.0;

        let start_left = self.left.ticks().0;
        let start_right = self.right.ticks().0;
        let target_heading = self.heading();

        debug!("Driving {distance:?} ({target:.1} ticks) at {speed:.1}%, holding {target_heading:?}");

        self.heading_pid.reset();

        let timer = Timer::new(self.clock.clone());
        let mut ticker = Ticker::new(self.clock.clone(), self.config.cycle);
        let mut dt = ticker.period();

        let outcome = loop {
            // Averaging both wheels covers for one of them slipping
            let traveled = {
                let left = self.left.ticks().0 - start_left;
                let right = self.right.ticks().0 - start_right;

                (left + right) / 2.0 * direction
            };
            let remaining = target - traveled;

            // Overshooting counts as arriving
            if remaining <= tolerance {
                break Outcome::Reached;
            }
            if timer.elapsed() >= timeout {
                break Outcome::TimedOut;
            }

            let current_speed = if remaining < ramp_length {
                math::clampf(speed * remaining / ramp_length, speed, min_speed)
            } else {
                speed
            };

            let observed_heading = self.gyro.heading();
            let error = math::subtract_angles(target_heading.0, observed_heading.0);
            let correction = self.heading_pid.update(error, dt.as_secs_f32());

            let speed_left = Percent(direction * current_speed - correction).clamped();
            let speed_right = Percent(direction * current_speed + correction).clamped();

            trace!(
                "rem: {remaining:7.1}, spd: {current_speed:5.1}, err: {error:6.2}, cor: {correction:6.2}, l: {:6.1}, r: {:6.1}",
                speed_left.0,
                speed_right.0
            );

            self.left.run(speed_left);
            self.right.run(speed_right);

            dt = ticker.wait();
        };

        self.finish(outcome, timer.elapsed())
    }

    /// Rotates in place to the absolute heading `target`
    ///
    /// Succeeds once the heading error has stayed within tolerance for the whole settle window.
    /// Close to the target the output is scaled down with the error to avoid overshoot.
    pub fn turn_to(&mut self, target: Heading, max_speed: Percent, timeout: Duration) -> Outcome {
        if !target.0.is_finite() || !max_speed.0.is_finite() || timeout.is_zero() {
            warn!("Rejected turn to {target:?} at {max_speed:?} within {timeout:?}");
            return self.finish(Outcome::TimedOut, Duration::ZERO);
        }

        let cfg = &self.config.turn;

        let target = target.normalized();
        let max_speed = max_speed.0.abs().min(100.0);
        let min_speed = cfg.min_speed.0.min(max_speed);

        debug!("Turning to {target:?} at up to {max_speed:.1}%");

        self.turn_pid.reset();

        let timer = Timer::new(self.clock.clone());
        let mut ticker = Ticker::new(self.clock.clone(), self.config.cycle);
        let mut dt = ticker.period();
        let mut settled = 0;

        let outcome = loop {
            let observed_heading = self.gyro.heading();
            let error = math::subtract_angles(target.0, observed_heading.0);
            let magnitude = error.abs();

            if magnitude <= cfg.tolerance {
                settled += 1;

                if settled >= cfg.settle_cycles {
                    break Outcome::Reached;
                }
            } else {
                settled = 0;
            }
            if timer.elapsed() >= timeout {
                break Outcome::TimedOut;
            }

            let mut output = self.turn_pid.update(error, dt.as_secs_f32());

            if magnitude < cfg.ramp_threshold {
                output *= magnitude / cfg.ramp_threshold;
            }
            if magnitude > cfg.tolerance && output.abs() < min_speed {
                output = min_speed * math::sign(error);
            }

            let turn_speed = math::clampf(output, max_speed, -max_speed);

            trace!("err: {error:6.2}, settled: {settled}, out: {turn_speed:6.2}");

            self.left.run(Percent(-turn_speed));
            self.right.run(Percent(turn_speed));

            dt = ticker.wait();
        };

        self.finish(outcome, timer.elapsed())
    }

    /// Turns by `delta` degrees from the current heading, see [`DriveController::turn_to`]
    pub fn turn_relative(&mut self, delta: Heading, max_speed: Percent, timeout: Duration) -> Outcome {
        let target = math::add_angles(self.heading().0, delta.0);

        self.turn_to(Heading(target), max_speed, timeout)
    }

    fn finish(&mut self, outcome: Outcome, elapsed: Duration) -> Outcome {
        let action = match outcome {
            Outcome::Reached => StopAction::Hold,
            Outcome::TimedOut => StopAction::Coast,
        };

        self.left.halt(action);
        self.right.halt(action);

        match outcome {
            Outcome::Reached => debug!("Reached target after {elapsed:?}"),
            Outcome::TimedOut => warn!("Gave up after {elapsed:?}"),
        }

        outcome
    }
}

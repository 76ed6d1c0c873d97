use std::time::Duration;

use log::{debug, warn};

use crate::math;
use crate::movement::controller::Outcome;
use crate::movement::motor::MotorController;
use crate::robot::{MotorHardware, StopAction};
use crate::time::{Clock, Ticker, Timer};
use crate::types::{Degrees, Percent};

/// Error, in motor degrees, that counts as arrived
pub const TOLERANCE: f32 = 5.0;
/// Speed command per degree of remaining error
pub const GAIN: f32 = 0.5;
/// Slowest speed that still moves a loaded attachment
pub const MIN_SPEED: f32 = 10.0;

const CYCLE: Duration = Duration::from_millis(20);

/// Rotates a single motor by `angle` degrees from where it is now
///
/// Meant for attachments such as arms and gears. Speed is proportional to the remaining angle,
/// bounded by `speed`. On success the motor is stopped with `then`, on timeout it coasts.
pub fn run_angle<M: MotorHardware, C: Clock>(
    motor: &mut MotorController<M>,
    clock: &C,
    angle: Degrees,
    speed: Percent,
    then: StopAction,
    timeout: Duration,
) -> Outcome {
    if !angle.0.is_finite() || !speed.0.is_finite() || timeout.is_zero() {
        warn!("Rejected attachment move of {angle:?} at {speed:?} within {timeout:?}");
        motor.stop();
        return Outcome::TimedOut;
    }

    let limit = speed.0.abs().min(100.0);
    let min_speed = MIN_SPEED.min(limit);
    let target = motor.angle().0 + angle.0;

    debug!("Moving attachment {angle:?} at up to {limit:.1}%");

    let timer = Timer::new(clock);
    let mut ticker = Ticker::new(clock, CYCLE);

    let outcome = loop {
        let remaining = target - motor.angle().0;

        if remaining.abs() <= TOLERANCE {
            break Outcome::Reached;
        }
        if timer.elapsed() >= timeout {
            break Outcome::TimedOut;
        }

        let command = math::clampf(remaining * GAIN, limit, -limit);
        let command = if command.abs() < min_speed {
            min_speed * math::sign(remaining)
        } else {
            command
        };

        motor.run(Percent(command));

        ticker.wait();
    };

    match outcome {
        Outcome::Reached => motor.halt(then),
        Outcome::TimedOut => {
            warn!("Attachment move gave up after {:?}", timer.elapsed());
            motor.stop();
        }
    }

    outcome
}

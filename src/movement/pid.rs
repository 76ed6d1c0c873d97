use crate::math;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidConfig {
    /// how strongly to correct current error
    pub kp: f32,

    /// how strongly to correct to long term drift
    pub ki: f32,

    /// how strongly to correct to predicted error
    pub kd: f32,

    /// bounds of the accumulated `error * dt`, kept seperate from the output bounds so a
    /// saturated output doesn't silently cap the integral
    pub integral_limit: f32,

    /// weight of the newest sample in the derivative low pass filter, 1.0 disables filtering
    pub derivative_alpha: f32,

    pub output_min: f32,
    pub output_max: f32,
}

impl PidConfig {
    /// A config with symetric output bounds and the default integral limit and filter
    pub fn new(kp: f32, ki: f32, kd: f32, output_limit: f32) -> Self {
        PidConfig {
            kp,
            ki,
            kd,
            integral_limit: 1000.0,
            derivative_alpha: 0.5,
            output_min: -output_limit.abs(),
            output_max: output_limit.abs(),
        }
    }
}

/// Implementation of PID algorithm
///
/// Call [`PidController::reset`] before every new maneuver, otherwise integral and derivative
/// history from the previous one leaks into the first cycles of the next.
#[derive(Clone, Debug)]
pub struct PidController {
    pid: PidConfig,

    integral: f32,
    last_error: f32,
    derivative: f32,
    last_output: f32,
}

impl PidController {
    pub fn new(pid: PidConfig) -> Self {
        PidController {
            pid,
            integral: 0.0,
            last_error: 0.0,
            derivative: 0.0,
            last_output: 0.0,
        }
    }

    pub fn config(&self) -> &PidConfig {
        &self.pid
    }

    /// The accumulated `error * dt`
    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
        self.derivative = 0.0;
        self.last_output = 0.0;
    }

    /// Advances the controller by `dt` seconds
    ///
    /// A `dt` that is not positive leaves the state untouched and returns the previous output.
    pub fn update(&mut self, error: f32, dt: f32) -> f32 {
        if dt.is_nan() || dt <= 0.0 || !error.is_finite() {
            return self.last_output;
        }

        let cfg = &self.pid;

        let integral_limit = cfg.integral_limit.abs();
        self.integral = math::clampf(self.integral + error * dt, integral_limit, -integral_limit);

        let raw_derivative = (error - self.last_error) / dt;
        self.derivative =
            cfg.derivative_alpha * raw_derivative + (1.0 - cfg.derivative_alpha) * self.derivative;

        self.last_error = error;

        let proportional = cfg.kp * error;
        let integral = cfg.ki * self.integral;
        let derivative = cfg.kd * self.derivative;

        let output = math::clampf(
            proportional + integral + derivative,
            cfg.output_max,
            cfg.output_min,
        );
        self.last_output = output;

        output
    }
}

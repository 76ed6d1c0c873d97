use crate::math;
use crate::movement::spec::RobotSpec;

/// Repersents distance in milimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Milimeters(pub f32);

/// Repersents distance in wheel degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Degrees(pub f32);

/// Repersents distance in encoder ticks
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ticks(pub f32);

/// Repersents speed in wheel degrees per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DegreesPerSecond(pub f32);

/// Unitless speed command, repersented as a number from -100.0 -> 100.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(pub f32);

/// Repersent a heading, stored as degrees (-180 -> 180 when normalized)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Heading(pub f32);

impl Heading {
    pub fn normalized(self) -> Heading {
        Heading(math::normalize_angle(self.0))
    }
}

impl Percent {
    pub const MAX: Percent = Percent(100.0);

    /// Limits the command to the valid -100 -> 100 range
    pub fn clamped(self) -> Percent {
        Percent(math::clampf(self.0, 100.0, -100.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Distance {
    Milimeters(Milimeters),
    Degrees(Degrees),
    Ticks(Ticks),
}

impl Distance {
    pub fn to_ticks(self, spec: &RobotSpec) -> Ticks {
        match self {
            Distance::Milimeters(val) => spec.mm_to_ticks(val),
            Distance::Degrees(val) => spec.deg_to_ticks(val),
            Distance::Ticks(val) => val,
        }
    }

    pub fn to_mm(self, spec: &RobotSpec) -> Milimeters {
        match self {
            Distance::Milimeters(val) => val,
            Distance::Degrees(val) => spec.ticks_to_mm(spec.deg_to_ticks(val)),
            Distance::Ticks(val) => spec.ticks_to_mm(val),
        }
    }

    /// The raw number, whatever the unit
    pub fn value(self) -> f32 {
        match self {
            Distance::Milimeters(Milimeters(val))
            | Distance::Degrees(Degrees(val))
            | Distance::Ticks(Ticks(val)) => val,
        }
    }
}

impl From<Milimeters> for Distance {
    fn from(value: Milimeters) -> Self {
        Distance::Milimeters(value)
    }
}

impl From<Degrees> for Distance {
    fn from(value: Degrees) -> Self {
        Distance::Degrees(value)
    }
}

impl From<Ticks> for Distance {
    fn from(value: Ticks) -> Self {
        Distance::Ticks(value)
    }
}

pub trait UnitsExt {
    /// Converts this value to `Milimeters` (distance)
    fn mm(self) -> Milimeters;
    /// Converts this value to `Degrees` (distance)
    fn deg(self) -> Degrees;
    /// Converts this value to `Ticks` (distance)
    fn ticks(self) -> Ticks;

    /// Converts this value to `DegreesPerSecond` (speed)
    fn dps(self) -> DegreesPerSecond;
    /// Converts this value to `Percent` (speed command)
    fn pct(self) -> Percent;

    /// Converts this value to `Heading` (heading)
    fn ang(self) -> Heading;
}

impl UnitsExt for f32 {
    fn mm(self) -> Milimeters {
        Milimeters(self)
    }

    fn deg(self) -> Degrees {
        Degrees(self)
    }

    fn ticks(self) -> Ticks {
        Ticks(self)
    }

    fn dps(self) -> DegreesPerSecond {
        DegreesPerSecond(self)
    }

    fn pct(self) -> Percent {
        Percent(self)
    }

    fn ang(self) -> Heading {
        Heading(self)
    }
}

impl UnitsExt for i32 {
    fn mm(self) -> Milimeters {
        Milimeters(self as f32)
    }

    fn deg(self) -> Degrees {
        Degrees(self as f32)
    }

    fn ticks(self) -> Ticks {
        Ticks(self as f32)
    }

    fn dps(self) -> DegreesPerSecond {
        DegreesPerSecond(self as f32)
    }

    fn pct(self) -> Percent {
        Percent(self as f32)
    }

    fn ang(self) -> Heading {
        Heading(self as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_units() {
        let spec = RobotSpec::spike_prime();

        assert_eq!(Distance::from(90i32.ticks()).to_ticks(&spec), Ticks(90.0));
        assert_eq!(Distance::from(360i32.deg()).to_ticks(&spec), Ticks(360.0));

        let one_turn = Distance::from(360i32.deg()).to_mm(&spec).0;
        assert!((one_turn - spec.wheel_circumference().0).abs() < 1e-3);

        assert_eq!(Distance::from(12.5f32.mm()).value(), 12.5);
    }

    #[test]
    fn percent_clamp() {
        assert_eq!(150i32.pct().clamped(), Percent::MAX);
        assert_eq!((-150i32).pct().clamped(), Percent(-100.0));
        assert_eq!(Heading(190.0).normalized(), Heading(-170.0));
    }
}

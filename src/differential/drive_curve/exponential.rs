#[allow(unused_imports)]
use num_traits::Float;

use super::DriveCurve;
use crate::constants::drivetrain::{STICK_CURVE_INTENSITY, STICK_DEAD_ZONE};

/// Softens the low end of the stick for fine control while still reaching full
/// output at full deflection.
#[derive(Clone, Debug)]
pub struct ExponentialDriveCurve {
    pub dead_zone: f64,

    /// Output just outside the dead zone, to overcome static friction.
    pub min_output: f64,

    /// 1.0 is linear; the robot is tuned around 1.2.
    pub curve_intensity: f64,
}

impl ExponentialDriveCurve {
    pub fn new(dead_zone: f64, min_output: f64, curve_intensity: f64) -> Self {
        Self {
            dead_zone,
            min_output,
            curve_intensity,
        }
    }
}

impl Default for ExponentialDriveCurve {
    fn default() -> Self {
        Self::new(STICK_DEAD_ZONE, 0.0, STICK_CURVE_INTENSITY)
    }
}

impl DriveCurve for ExponentialDriveCurve {
    fn update(&self, input: f64) -> f64 {
        let input = input.clamp(-1.0, 1.0);
        if input.abs() <= self.dead_zone {
            return 0.0;
        }
        // Deflection past the dead zone, and its largest possible value.
        let travel = input.abs() - self.dead_zone;
        let span = 1.0 - self.dead_zone;
        let shaped = self.curve_intensity.powf(travel - span) * travel / span;
        input.signum() * (self.min_output + (1.0 - self.min_output) * shaped)
    }
}

#[allow(unused_imports)]
use num_traits::Float;

use super::DriveCurve;

/// Passes the input through, zeroing anything inside the dead zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearDriveCurve {
    pub dead_zone: f64,
}

impl LinearDriveCurve {
    pub fn new(dead_zone: f64) -> Self {
        Self { dead_zone }
    }
}

impl DriveCurve for LinearDriveCurve {
    fn update(&self, input: f64) -> f64 {
        let input = input.clamp(-1.0, 1.0);
        if input.abs() <= self.dead_zone {
            0.0
        } else {
            input
        }
    }
}

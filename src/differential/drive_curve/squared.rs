use super::DriveCurve;
use crate::utils::math::copy_sign_square;

/// Squares the input, keeping its sign, for finer control at low speed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredDriveCurve;

impl DriveCurve for SquaredDriveCurve {
    fn update(&self, input: f64) -> f64 {
        copy_sign_square(input.clamp(-1.0, 1.0))
    }
}

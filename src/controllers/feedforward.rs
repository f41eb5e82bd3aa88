use bon::Builder;
#[allow(unused_imports)]
use num_traits::Float;

fn static_sign(velocity: f64) -> f64 {
    if velocity == 0.0 {
        0.0
    } else {
        velocity.signum()
    }
}

/// Feedforward for an arm pivoting under gravity.
///
/// The gravity term peaks when the arm is level (`angle == 0`), so callers pass
/// the angle measured from horizontal, in radians.
#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct ArmFeedforward {
    #[builder(default = 0.0)]
    pub ks: f64,
    #[builder(default = 0.0)]
    pub kg: f64,
    #[builder(default = 0.0)]
    pub kv: f64,
}

impl ArmFeedforward {
    pub fn new(ks: f64, kg: f64, kv: f64) -> Self {
        Self { ks, kg, kv }
    }
    pub fn calculate(&self, angle: f64, velocity: f64) -> f64 {
        self.ks * static_sign(velocity) + self.kg * angle.cos() + self.kv * velocity
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn gravity_term_follows_cosine() {
        let ff = ArmFeedforward::builder().kg(0.3).build();
        assert_relative_eq!(ff.calculate(0.0, 0.0), 0.3);
        assert_relative_eq!(ff.calculate(FRAC_PI_2, 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(ff.calculate(core::f64::consts::PI, 0.0), -0.3);
    }
}

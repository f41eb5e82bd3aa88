use core::f64::consts::{PI, TAU};

#[allow(unused_imports)]
use num_traits::Float;

#[macro_export]
macro_rules! signed_mod {
    ($dividend:expr, $divisor:expr) => {
        (($dividend % $divisor) + $divisor) % $divisor
    };
}
#[macro_export]
macro_rules! lerp {
    ($value1:expr, $value2:expr, $t:expr) => {
        $value1 + ($value2 - $value1) * $t
    };
}

#[macro_export]
macro_rules! ilerp {
    ($value1:expr, $value2:expr, $inter:expr) => {
        ($inter - $value1) / ($value2 - $value1)
    };
}

#[macro_export]
macro_rules! avg_valid {
    ($vec:expr) => {{
        let (sum, count) = $vec
            .iter()
            .filter_map(|&x| x)
            .fold((0.0, 0), |(sum, count), x| (sum + x, count + 1));

        if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        }
    }};
}

pub use avg_valid;
pub use ilerp;
pub use lerp;
pub use signed_mod;

/// Wraps an angle in radians into `[-PI, PI)`.
pub fn wrap_angle(angle: f64) -> f64 {
    signed_mod!(angle + PI, TAU) - PI
}

/// Squares a value while keeping its sign.
pub fn copy_sign_square(value: f64) -> f64 {
    value * value.abs()
}

/// Scales both values down by the same factor so that neither exceeds
/// `maximum` in magnitude. Values already in range are returned untouched.
pub fn desaturate(a: f64, b: f64, maximum: f64) -> (f64, f64) {
    let greatest = a.abs().max(b.abs());
    if greatest > maximum {
        let scale = maximum / greatest;
        (a * scale, b * scale)
    } else {
        (a, b)
    }
}

/// Replaces a non-finite value with `fallback`.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn wraps_angles_into_half_open_range() {
        assert_relative_eq!(wrap_angle(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(PI), -PI, epsilon = 1e-12);
    }

    #[test]
    fn desaturate_keeps_ratio() {
        let (l, r) = desaturate(1.5, 0.5, 1.0);
        assert_relative_eq!(l, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r, 1.0 / 3.0, epsilon = 1e-12);

        let (l, r) = desaturate(0.4, -0.2, 1.0);
        assert_relative_eq!(l, 0.4);
        assert_relative_eq!(r, -0.2);
    }

    #[test]
    fn avg_valid_skips_missing_readings() {
        let readings = [Some(1.0), None, Some(3.0)];
        assert_eq!(avg_valid!(readings), Some(2.0));
        let empty: [Option<f64>; 2] = [None, None];
        assert_eq!(avg_valid!(empty), None);
    }

    #[test]
    fn lerp_and_ilerp_are_inverse() {
        let t = ilerp!(2.0, 6.0, 5.0);
        assert_relative_eq!(t, 0.75);
        assert_relative_eq!(lerp!(2.0, 6.0, t), 5.0);
    }
}

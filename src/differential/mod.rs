pub mod chassis;
pub mod drive_curve;
pub mod kinematics;

pub use kinematics::DifferentialKinematics;

/// Forward and turning speed of the chassis: m/s and rad/s, counter-clockwise
/// positive.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ChassisVelocity {
    pub linear: f64,
    pub angular: f64,
}

impl ChassisVelocity {
    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }
}

/// Per-side wheel surface speeds. Units follow whoever built them, usually m/s
/// or normalized duty.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

impl WheelSpeeds {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

pub mod pose {
    use core::ops::{Add, Sub};

    use nalgebra::Vector2;
    #[allow(unused_imports)]
    use num_traits::Float;
    use num_traits::{AsPrimitive, Num};

    use crate::utils::math::wrap_angle;

    /// Field-relative position in meters and heading in radians.
    #[derive(Clone, Copy, PartialEq, Debug, Default)]
    pub struct Pose {
        pub position: Vector2<f64>,
        pub orientation: f64,
    }

    impl Sub for Pose {
        type Output = Self;

        fn sub(self, rhs: Self) -> Self {
            Self {
                position: self.position - rhs.position,
                orientation: wrap_angle(self.orientation - rhs.orientation),
            }
        }
    }

    impl Add for Pose {
        type Output = Self;

        fn add(self, rhs: Self) -> Self {
            Self {
                position: self.position + rhs.position,
                orientation: wrap_angle(self.orientation + rhs.orientation),
            }
        }
    }

    impl Pose {
        pub fn new<T: Num + AsPrimitive<f64>, U: Num + AsPrimitive<f64>, V: Num + AsPrimitive<f64>>(
            x: T,
            y: U,
            orientation: V,
        ) -> Self {
            Self {
                position: Vector2::<f64>::new(x.as_(), y.as_()),
                orientation: orientation.as_(),
            }
        }
        pub fn x(&self) -> f64 {
            self.position.x
        }
        pub fn y(&self) -> f64 {
            self.position.y
        }
        pub fn distance_to(&self, pose: &Self) -> f64 {
            self.position.metric_distance(&pose.position)
        }

        /// Moves along a constant-curvature arc given in the robot frame: `dx`
        /// forward, then a heading change of `dtheta`.
        pub fn exp(&self, dx: f64, dtheta: f64) -> Self {
            // sin(x)/x and (1 - cos(x))/x, with their limits near zero.
            let (s, c) = if dtheta.abs() < 1e-9 {
                (1.0 - dtheta * dtheta / 6.0, dtheta / 2.0)
            } else {
                (dtheta.sin() / dtheta, (1.0 - dtheta.cos()) / dtheta)
            };
            let local = Vector2::new(dx * s, dx * c);
            let (sin, cos) = self.orientation.sin_cos();
            let global = Vector2::new(cos * local.x - sin * local.y, sin * local.x + cos * local.y);
            Self {
                position: self.position + global,
                orientation: wrap_angle(self.orientation + dtheta),
            }
        }
    }

}

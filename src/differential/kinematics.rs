#[allow(unused_imports)]
use num_traits::Float;

use super::{ChassisVelocity, WheelSpeeds};
use crate::utils::math::{copy_sign_square, desaturate};

/// Converts between chassis and wheel speeds for a two-sided drive.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DifferentialKinematics {
    /// Distance between the left and right wheels, in meters.
    pub track_width: f64,
}

impl DifferentialKinematics {
    pub fn new(track_width: f64) -> Self {
        Self { track_width }
    }

    pub fn to_wheel_speeds(&self, velocity: ChassisVelocity) -> WheelSpeeds {
        let turn = velocity.angular * self.track_width / 2.0;
        WheelSpeeds::new(velocity.linear - turn, velocity.linear + turn)
    }

    pub fn to_chassis_velocity(&self, speeds: WheelSpeeds) -> ChassisVelocity {
        ChassisVelocity::new(
            (speeds.left + speeds.right) / 2.0,
            (speeds.right - speeds.left) / self.track_width,
        )
    }
}

/// Mixes normalized throttle and rotation into side outputs in `[-1, 1]`.
///
/// Positive rotation turns the robot clockwise, matching a joystick pushed to
/// the right.
pub fn arcade_ik(throttle: f64, rotation: f64, square_inputs: bool) -> WheelSpeeds {
    let (throttle, rotation) = if square_inputs {
        (copy_sign_square(throttle), copy_sign_square(rotation))
    } else {
        (throttle, rotation)
    };
    let (left, right) = desaturate(throttle + rotation, throttle - rotation, 1.0);
    WheelSpeeds::new(left, right)
}

/// Car-like steering: `rotation` sets the path curvature, scaled by the
/// throttle, unless turning in place is allowed.
pub fn curvature_ik(throttle: f64, rotation: f64, allow_turn_in_place: bool) -> WheelSpeeds {
    let turn = if allow_turn_in_place {
        rotation
    } else {
        throttle.abs() * rotation
    };
    let (left, right) = desaturate(throttle + turn, throttle - turn, 1.0);
    WheelSpeeds::new(left, right)
}

pub fn tank_ik(left: f64, right: f64) -> WheelSpeeds {
    WheelSpeeds::new(left.clamp(-1.0, 1.0), right.clamp(-1.0, 1.0))
}

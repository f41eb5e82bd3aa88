#[allow(unused_imports)]
use num_traits::Float;

use super::Tracking;
use crate::{differential::pose::Pose, utils::math::wrap_angle};

/// Dead reckoning from two drive-side distances and a gyro.
///
/// Heading comes from the gyro alone; the wheels only supply distance. Each
/// update integrates the chassis motion since the previous one along an arc.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct DifferentialOdometry {
    pose: Pose,
    prev_left: Option<f64>,
    prev_right: Option<f64>,
    prev_heading: Option<f64>,

    /// Added to the raw gyro heading to get the field heading.
    gyro_offset: Option<f64>,
}

impl DifferentialOdometry {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            ..Default::default()
        }
    }

    /// Sets the pose and the readings it corresponds to in one step.
    pub fn reset(&mut self, pose: Pose, left: f64, right: f64, heading: f64) {
        self.pose = pose;
        self.prev_left = left.is_finite().then_some(left);
        self.prev_right = right.is_finite().then_some(right);
        self.prev_heading = heading.is_finite().then_some(heading);
        self.gyro_offset = self.prev_heading.map(|heading| pose.orientation - heading);
    }

    /// Integrates new readings: side distances in meters and the raw gyro
    /// heading in radians. Non-finite readings contribute no motion.
    pub fn update(&mut self, left: f64, right: f64, heading: f64) -> Pose {
        let delta_left = Self::delta(&mut self.prev_left, left);
        let delta_right = Self::delta(&mut self.prev_right, right);

        let mut delta_theta = 0.0;
        if heading.is_finite() {
            let offset = *self
                .gyro_offset
                .get_or_insert(self.pose.orientation - heading);
            delta_theta = wrap_angle(heading + offset - self.pose.orientation);
            self.prev_heading = Some(heading);
        }

        self.pose = self.pose.exp((delta_left + delta_right) / 2.0, delta_theta);
        self.pose
    }

    fn delta(prev: &mut Option<f64>, reading: f64) -> f64 {
        if !reading.is_finite() {
            return 0.0;
        }
        let delta = prev.map_or(0.0, |prev| reading - prev);
        *prev = Some(reading);
        delta
    }
}

impl Tracking for DifferentialOdometry {
    fn position(&self) -> Pose {
        self.pose
    }

    fn set_position(&mut self, position: Pose) {
        self.pose = position;
        self.gyro_offset = self.prev_heading.map(|heading| position.orientation - heading);
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn straight_line_keeps_heading() {
        let mut odometry = DifferentialOdometry::default();
        odometry.reset(Pose::new(0, 0, FRAC_PI_2), 0.0, 0.0, 0.3);
        for i in 1..=10 {
            let distance = 0.1 * i as f64;
            odometry.update(distance, distance, 0.3);
        }
        let pose = odometry.position();
        assert_relative_eq!(pose.orientation, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(pose.x(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pure_rotation_keeps_position() {
        let mut odometry = DifferentialOdometry::new(Pose::new(1.5, -2, 0));
        odometry.update(0.0, 0.0, 0.0);
        for i in 1..=20 {
            let arc = 0.02 * i as f64;
            odometry.update(-arc, arc, 0.1 * i as f64);
        }
        let pose = odometry.position();
        assert_relative_eq!(pose.x(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(pose.y(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(pose.orientation, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn first_gyro_reading_defines_the_offset() {
        let mut odometry = DifferentialOdometry::new(Pose::new(0, 0, PI / 4.0));
        odometry.update(0.0, 0.0, 1.0);
        assert_relative_eq!(odometry.position().orientation, PI / 4.0, epsilon = 1e-12);
        odometry.update(0.0, 0.0, 1.5);
        assert_relative_eq!(odometry.position().orientation, PI / 4.0 + 0.5, epsilon = 1e-12);
    }

    #[test]
    fn set_position_moves_the_reference() {
        let mut odometry = DifferentialOdometry::default();
        odometry.update(2.0, 2.0, 0.7);
        odometry.set_position(Pose::new(5, 5, 0));
        odometry.update(3.0, 3.0, 0.7);
        let pose = odometry.position();
        assert_relative_eq!(pose.x(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(pose.orientation, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn nan_readings_are_skipped() {
        let mut odometry = DifferentialOdometry::default();
        odometry.update(0.0, 0.0, 0.0);
        odometry.update(f64::NAN, f64::NAN, f64::NAN);
        odometry.update(1.0, 1.0, 0.0);
        assert_relative_eq!(odometry.position().x(), 1.0, epsilon = 1e-12);
        assert!(odometry.position().orientation.is_finite());
    }
}

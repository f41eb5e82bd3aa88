pub mod odometry;

pub use odometry::DifferentialOdometry;

use crate::differential::pose::Pose;

/// Anything that keeps a field-relative pose estimate.
pub trait Tracking {
    fn position(&self) -> Pose;

    /// Redefines the current pose. Later motion is measured from here.
    fn set_position(&mut self, position: Pose);
}

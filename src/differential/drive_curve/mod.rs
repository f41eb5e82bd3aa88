//! Shaping for joystick inputs before they are mixed into wheel outputs.

pub mod exponential;
pub mod linear;
pub mod squared;

pub use exponential::ExponentialDriveCurve;
pub use linear::LinearDriveCurve;
pub use squared::SquaredDriveCurve;

dyn_clone::clone_trait_object!(DriveCurve);

/// Maps a normalized input in `[-1, 1]` to a normalized output in `[-1, 1]`.
pub trait DriveCurve: dyn_clone::DynClone {
    fn update(&self, input: f64) -> f64;
}

//! Mechanisms that own their actuators and close their own loops.

pub mod arm;
pub mod intake;
pub mod shooter;

pub use arm::{Arm, ArmState};
pub use intake::Intake;
pub use shooter::Shooter;

use crate::devices::ConfigError;

/// Who is allowed to command a subsystem.
///
/// Switched between ticks by the robot; a subsystem never has two writers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Owner {
    Manual,
    Autonomous,
    #[default]
    Disabled,
}

pub trait Subsystem {
    /// Sends one round of actuator setup. Retrying is up to the caller.
    fn configure(&mut self) -> Result<(), ConfigError>;

    /// Zeroes the output. Any target is kept for when the subsystem is next
    /// commanded.
    fn disable(&mut self);
}

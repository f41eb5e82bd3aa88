//! Timed autonomous routines and the shot they are built around.

pub mod routines;
pub mod sequencer;
pub mod shoot;

pub use routines::{RoutineKind, RoutineParseError};
pub use sequencer::{DriveCommand, Phase, PhaseAction, Routine, Sequencer, ShotCommand};
pub use shoot::{ShootSequence, ShootStage, ShootTiming};

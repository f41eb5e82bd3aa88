#[macro_use]
pub mod math;
pub mod timer;

/// Which end of the field the robot starts on.
///
/// Only used to mirror turn directions in the autonomous routines.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum FieldSide {
    Left,
    Right,
}

impl FieldSide {
    /// `1.0` for a left-hand turn, `-1.0` for a right-hand turn.
    pub fn turn_sign(self) -> f64 {
        match self {
            FieldSide::Left => 1.0,
            FieldSide::Right => -1.0,
        }
    }
}

use bon::Builder;

use crate::{differential::chassis::DriveStyle, subsystems::ArmState};

/// One tick's worth of driver and operator input, already read from the
/// controllers. Sticks are normalized to `[-1, 1]` with forward positive.
#[derive(Clone, Copy, PartialEq, Debug, Default, Builder)]
pub struct OperatorIntent {
    #[builder(default)]
    pub drive_style: DriveStyle,

    /// Throttle, or the left side in tank.
    #[builder(default)]
    pub forward: f64,

    /// Steering, or the right side in tank. Positive turns clockwise.
    #[builder(default)]
    pub turn: f64,

    #[builder(default)]
    pub use_drive_curve: bool,

    /// Curvature drive only.
    #[builder(default)]
    pub quick_turn: bool,

    #[builder(default)]
    pub intake: bool,

    /// Reverse amount in `[0, 1]`.
    #[builder(default)]
    pub outtake: f64,

    /// Hold to keep the shooter at speed.
    #[builder(default)]
    pub shoot: bool,

    /// Hold to push the note in. Ignored until the shooter is ready.
    #[builder(default)]
    pub feed: bool,

    pub arm: Option<ArmState>,

    /// Manual arm volts, overriding any preset while set.
    pub arm_voltage: Option<f64>,
}

use core::time::Duration;

use super::FeedbackController;

/// Full output below the setpoint, nothing above it.
///
/// Useful for heavy flywheels that should only ever be driven forward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BangBang {
    /// Output applied while the error is above `tolerance`.
    pub high: f64,
    pub tolerance: f64,
}

impl BangBang {
    pub fn new(high: f64, tolerance: f64) -> Self {
        Self { high, tolerance }
    }
}

impl FeedbackController<f64> for BangBang {
    fn update(&mut self, error: f64, _dt: Duration) -> f64 {
        if error > self.tolerance {
            self.high
        } else {
            0.0
        }
    }

    fn reset(&mut self) {}
}

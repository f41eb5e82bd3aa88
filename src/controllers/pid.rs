use core::time::Duration;

use bon::Builder;
#[allow(unused_imports)]
use num_traits::Float;

use super::FeedbackController;

/// Fixed per-axis PID coefficients.
#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct PidGains {
    /// Proportional gain.
    #[builder(default = 0.0)]
    pub kp: f64,

    /// Integral gain.
    #[builder(default = 0.0)]
    pub ki: f64,

    /// Derivative gain.
    #[builder(default = 0.0)]
    pub kd: f64,

    /// Errors larger than this clear the integral. Zero disables the check.
    #[builder(default = 0.0)]
    pub windup_range: f64,

    /// Whether or not to reset the integral when the error's sign flips.
    #[builder(default = false)]
    pub reset_on_sign_flip: bool,

    /// Bound on the integral term's contribution (`ki * integral`).
    /// `None` leaves the integrator unclamped.
    pub integral_limit: Option<f64>,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self::builder().kp(kp).ki(ki).kd(kd).build()
    }
}

/// The history a PID loop carries between ticks.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PidState {
    /// Integral sum for the integral term.
    pub integral: f64,

    /// Previous error for the derivative term. `None` until the first update.
    pub prev_error: Option<f64>,
}

/// Advances a PID loop by one sample.
///
/// Returns the next state and the raw (unscaled, unclamped) output. `dt` is in
/// seconds; a non-positive `dt` contributes no integral or derivative.
pub fn step(gains: &PidGains, state: PidState, error: f64, dt: f64) -> (PidState, f64) {
    let mut integral = state.integral;
    let mut derivative = 0.0;
    if dt > 0.0 {
        integral += error * dt;
        if let Some(prev_error) = state.prev_error {
            derivative = (error - prev_error) / dt;
        }
    }

    let sign_flipped = state
        .prev_error
        .is_some_and(|prev| prev != 0.0 && error.signum() != prev.signum());
    if sign_flipped && gains.reset_on_sign_flip
        || gains.windup_range != 0.0 && error.abs() > gains.windup_range
    {
        integral = 0.0;
    }
    if let Some(limit) = gains.integral_limit {
        if gains.ki != 0.0 {
            let bound = (limit / gains.ki).abs();
            integral = integral.clamp(-bound, bound);
        }
    }

    let output = gains.kp * error + gains.ki * integral + gains.kd * derivative;
    (
        PidState {
            integral,
            prev_error: Some(error),
        },
        output,
    )
}

#[derive(Clone, Debug)]
pub struct Pid {
    gains: PidGains,
    state: PidState,
}

impl Pid {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            state: PidState::default(),
        }
    }
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }
    pub fn state(&self) -> PidState {
        self.state
    }
}

impl FeedbackController<f64> for Pid {
    fn update(&mut self, error: f64, dt: Duration) -> f64 {
        let (state, output) = step(&self.gains, self.state, error, dt.as_secs_f64());
        self.state = state;
        output
    }

    fn reset(&mut self) {
        self.state = PidState::default();
    }
}

use alloc::boxed::Box;
use core::time::Duration;

#[allow(unused_imports)]
use num_traits::Float;

use crate::{constants::PEAK_VOLTAGE, devices::SensorGuard};

pub mod bang_bang;
pub mod feedforward;
pub mod pid;

dyn_clone::clone_trait_object!(<T> FeedbackController<T>);

pub trait FeedbackController<T>: dyn_clone::DynClone {
    fn update(&mut self, error: T, dt: Duration) -> T;
    fn reset(&mut self);
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct OutputLimits {
    pub min: f64,
    pub max: f64,
}

impl OutputLimits {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
    pub fn symmetric(max: f64) -> Self {
        Self::new(-max.abs(), max.abs())
    }
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self::symmetric(PEAK_VOLTAGE)
    }
}

/// Whether a mechanism has reached a commanded, nonzero setpoint.
pub fn is_ready(setpoint: f64, measurement: f64, tolerance: f64) -> bool {
    setpoint != 0.0 && (measurement - setpoint).abs() <= tolerance
}

/// One closed-loop axis: a feedback controller, its setpoint and the last
/// measurement it saw.
///
/// Outputs are computed in duty (-1 to 1 for a well tuned loop), scaled to volts
/// and clamped to the output limits.
#[derive(Clone)]
pub struct ControlLoop {
    controller: Box<dyn FeedbackController<f64>>,
    setpoint: Option<f64>,
    measurement: Option<f64>,
    feedforward_gain: f64,
    output_scale: f64,
    limits: OutputLimits,
    tolerance: f64,
    zero_is_unset: bool,
    guard: SensorGuard,
}

impl ControlLoop {
    pub fn new<C: FeedbackController<f64> + 'static>(controller: C, tolerance: f64) -> Self {
        Self {
            controller: Box::new(controller),
            setpoint: None,
            measurement: None,
            feedforward_gain: 0.0,
            output_scale: PEAK_VOLTAGE,
            limits: OutputLimits::default(),
            tolerance,
            zero_is_unset: false,
            guard: SensorGuard::new(),
        }
    }

    /// Adds `kv * setpoint` to the raw output every cycle.
    pub fn with_feedforward(mut self, kv: f64) -> Self {
        self.feedforward_gain = kv;
        self
    }

    pub fn with_limits(mut self, limits: OutputLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_output_scale(mut self, scale: f64) -> Self {
        self.output_scale = scale;
        self
    }

    /// Treats a setpoint of exactly zero as "no target", for mechanisms where
    /// zero means off.
    pub fn zero_setpoint_is_unset(mut self) -> Self {
        self.zero_is_unset = true;
        self
    }

    /// Changes the target. Integral and derivative history carry over.
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = Some(setpoint);
    }

    pub fn setpoint(&self) -> Option<f64> {
        self.setpoint
    }

    /// The last finite measurement passed to [`Self::calculate`].
    pub fn measurement(&self) -> Option<f64> {
        self.measurement
    }

    pub fn error(&self) -> Option<f64> {
        Some(self.setpoint? - self.measurement?)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn rejected_readings(&self) -> u32 {
        self.guard.rejected_count()
    }

    pub fn calculate(&mut self, measurement: f64, dt: Duration) -> f64 {
        self.calculate_with_feedforward(measurement, dt, 0.0)
    }

    /// Like [`Self::calculate`], with an extra feedforward term in duty.
    pub fn calculate_with_feedforward(&mut self, measurement: f64, dt: Duration, feedforward: f64) -> f64 {
        self.measurement = self.guard.filter(measurement);
        let (Some(setpoint), Some(measurement)) = (self.setpoint, self.measurement) else {
            return 0.0;
        };
        let raw = self.controller.update(setpoint - measurement, dt);
        let duty = raw + self.feedforward_gain * setpoint + feedforward;
        self.limits.clamp(duty * self.output_scale)
    }

    pub fn at_setpoint(&self) -> bool {
        match (self.setpoint, self.measurement) {
            (Some(setpoint), _) if self.zero_is_unset && setpoint == 0.0 => false,
            (Some(setpoint), Some(measurement)) => (setpoint - measurement).abs() <= self.tolerance,
            _ => false,
        }
    }

    pub fn is_ready(&self) -> bool {
        match (self.setpoint, self.measurement) {
            (Some(setpoint), Some(measurement)) => is_ready(setpoint, measurement, self.tolerance),
            _ => false,
        }
    }

    /// Clears controller history and the last measurement. The setpoint stays.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.measurement = None;
        self.guard.reset();
    }
}

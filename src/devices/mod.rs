//! The read/write boundary between the control core and the robot's hardware.
//!
//! Subsystems only ever talk to an [`Actuator`] or a [`HeadingSensor`]. On the
//! robot those are V5 smart devices (see `motor_group`, behind the `vexide`
//! feature); on a bench they are the plants in [`sim`].

use alloc::string::String;

use bon::Builder;

#[cfg(feature = "vexide")]
pub mod motor_group;
pub mod sim;

#[cfg(feature = "vexide")]
pub use motor_group::InertialHeading;

/// What a motor does with zero output.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum IdleMode {
    #[default]
    Coast,
    Brake,
}

/// Setup applied to an actuator once at startup.
#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct ActuatorConfig {
    /// Smart current limit in amps. `None` keeps the device default.
    pub current_limit: Option<f64>,

    #[builder(default)]
    pub idle_mode: IdleMode,

    #[builder(default = false)]
    pub inverted: bool,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{setting} was rejected: {reason}")]
    Rejected {
        setting: &'static str,
        reason: String,
    },
    #[error("{0} is not supported by this actuator")]
    Unsupported(&'static str),
}

/// A motor, or a group of motors driven as one, with its encoder.
///
/// Readings are in the device's native units. A failed read is reported as a
/// non-finite value; see [`SensorGuard`].
pub trait Actuator {
    fn set_voltage(&mut self, volts: f64);

    /// Zeroes the output and lets the idle mode take over.
    fn stop(&mut self) {
        self.set_voltage(0.0);
    }

    fn position(&self) -> f64;
    fn velocity(&self) -> f64;

    /// Redefines the current encoder position.
    fn set_position(&mut self, position: f64);

    fn configure(&mut self, config: &ActuatorConfig) -> Result<(), ConfigError>;
}

/// A yaw sensor. Headings are in radians, counter-clockwise positive.
pub trait HeadingSensor {
    fn heading(&self) -> f64;
}

/// Runs `failable` until it succeeds or `attempts` tries have been made.
///
/// Returns the attempt that succeeded, or the last error. At least one attempt
/// is always made. Reporting is left to the caller.
pub fn retry_failable<F>(attempts: usize, mut failable: F) -> Result<usize, ConfigError>
where
    F: FnMut() -> Result<(), ConfigError>,
{
    let mut attempt = 1;
    loop {
        match failable() {
            Ok(()) => return Ok(attempt),
            Err(err) if attempt >= attempts => return Err(err),
            Err(_) => attempt += 1,
        }
    }
}

/// Holds the last finite reading so that a glitching sensor can't push NaN or
/// infinity into an integrator.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct SensorGuard {
    last: Option<f64>,
    rejected: u32,
}

impl SensorGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `raw` if it is finite, otherwise the last finite reading.
    /// `None` until a finite reading has been seen.
    pub fn filter(&mut self, raw: f64) -> Option<f64> {
        if raw.is_finite() {
            self.last = Some(raw);
        } else {
            self.rejected = self.rejected.saturating_add(1);
        }
        self.last
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }

    /// How many readings have been thrown away.
    pub fn rejected_count(&self) -> u32 {
        self.rejected
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn retry_stops_at_first_success() {
        let mut calls = 0;
        let result = retry_failable(5, || {
            calls += 1;
            if calls < 3 {
                Err(ConfigError::Rejected {
                    setting: "current limit",
                    reason: "timeout".to_string(),
                })
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Ok(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn retry_gives_up_after_the_last_attempt() {
        let mut calls = 0;
        let result = retry_failable(5, || {
            calls += 1;
            Err(ConfigError::Unsupported("idle mode"))
        });
        assert_eq!(result, Err(ConfigError::Unsupported("idle mode")));
        assert_eq!(calls, 5);
    }

    #[test]
    fn retry_always_tries_once() {
        let mut calls = 0;
        let _ = retry_failable(0, || {
            calls += 1;
            Err(ConfigError::Unsupported("idle mode"))
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn guard_holds_last_finite_value() {
        let mut guard = SensorGuard::new();
        assert_eq!(guard.filter(f64::NAN), None);
        assert_eq!(guard.filter(2.5), Some(2.5));
        assert_eq!(guard.filter(f64::INFINITY), Some(2.5));
        assert_eq!(guard.filter(f64::NEG_INFINITY), Some(2.5));
        assert_eq!(guard.filter(3.0), Some(3.0));
        assert_eq!(guard.rejected_count(), 3);
    }

    #[test]
    fn config_error_messages() {
        let err = ConfigError::Rejected {
            setting: "current limit",
            reason: "CAN timeout".to_string(),
        };
        assert_eq!(err.to_string(), "current limit was rejected: CAN timeout");
    }
}

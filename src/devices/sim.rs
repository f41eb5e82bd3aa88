//! Simulated actuators and sensors for bench testing the control core.
//!
//! Handles are cheap to clone and share their state, so a test can keep one
//! handle for inspection after moving another into a subsystem.

use alloc::{rc::Rc, vec::Vec};
use core::{cell::RefCell, time::Duration};

use super::{Actuator, ActuatorConfig, ConfigError, HeadingSensor};

/// One `set_voltage` call, as recorded in a [`Journal`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Command {
    pub device: &'static str,
    pub volts: f64,
}

/// A shared, append-only log of actuator writes across several devices.
pub type Journal = Rc<RefCell<Vec<Command>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Clone, Debug, Default)]
struct SimMotorState {
    volts: f64,
    position: f64,
    velocity: f64,
    config: Option<ActuatorConfig>,
    config_rejections: usize,
    configure_calls: usize,
}

/// A motor whose velocity follows its voltage through a first-order lag.
///
/// `free_speed` is the steady-state velocity at 12V in native units, and
/// `time_constant` is how quickly it gets there. With a zero time constant the
/// plant is static and readings only change through the setters.
#[derive(Clone, Debug)]
pub struct SimMotor {
    name: &'static str,
    free_speed: f64,
    time_constant: Duration,
    velocity_period: Duration,
    state: Rc<RefCell<SimMotorState>>,
    journal: Option<Journal>,
}

impl SimMotor {
    pub fn new(name: &'static str, free_speed: f64, time_constant: Duration) -> Self {
        Self {
            name,
            free_speed,
            time_constant,
            velocity_period: Duration::from_secs(1),
            state: Rc::new(RefCell::new(SimMotorState::default())),
            journal: None,
        }
    }

    /// A motor that never moves on its own.
    pub fn fixed(name: &'static str) -> Self {
        Self::new(name, 0.0, Duration::ZERO)
    }

    /// The time base of velocity readings, e.g. a minute for RPM. Defaults to
    /// one second.
    pub fn with_velocity_period(mut self, period: Duration) -> Self {
        self.velocity_period = period;
        self
    }

    /// Records every voltage write into `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// The next `count` configuration attempts will be rejected.
    pub fn reject_configs(&self, count: usize) {
        self.state.borrow_mut().config_rejections = count;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn volts(&self) -> f64 {
        self.state.borrow().volts
    }

    pub fn applied_config(&self) -> Option<ActuatorConfig> {
        self.state.borrow().config
    }

    pub fn configure_calls(&self) -> usize {
        self.state.borrow().configure_calls
    }

    /// Overrides the velocity reading.
    pub fn set_velocity(&self, velocity: f64) {
        self.state.borrow_mut().velocity = velocity;
    }

    /// Overrides the position reading.
    pub fn set_position_reading(&self, position: f64) {
        self.state.borrow_mut().position = position;
    }

    /// Advances the plant by `dt`.
    pub fn step(&self, dt: Duration) {
        let mut state = self.state.borrow_mut();
        let dt_s = dt.as_secs_f64();
        let tau = self.time_constant.as_secs_f64();
        if tau > 0.0 {
            let target = state.volts / 12.0 * self.free_speed;
            let alpha = (dt_s / tau).min(1.0);
            state.velocity += (target - state.velocity) * alpha;
        }
        state.position += state.velocity * dt_s / self.velocity_period.as_secs_f64();
    }
}

impl Actuator for SimMotor {
    fn set_voltage(&mut self, volts: f64) {
        self.state.borrow_mut().volts = volts;
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(Command {
                device: self.name,
                volts,
            });
        }
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn velocity(&self) -> f64 {
        self.state.borrow().velocity
    }

    fn set_position(&mut self, position: f64) {
        self.state.borrow_mut().position = position;
    }

    fn configure(&mut self, config: &ActuatorConfig) -> Result<(), ConfigError> {
        let mut state = self.state.borrow_mut();
        state.configure_calls += 1;
        if state.config_rejections > 0 {
            state.config_rejections -= 1;
            return Err(ConfigError::Rejected {
                setting: "current limit",
                reason: "no response".into(),
            });
        }
        state.config = Some(*config);
        Ok(())
    }
}

/// A gyro whose heading is set directly by the test.
#[derive(Clone, Debug, Default)]
pub struct SimGyro {
    heading: Rc<RefCell<f64>>,
}

impl SimGyro {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_heading(&self, heading: f64) {
        *self.heading.borrow_mut() = heading;
    }
}

impl HeadingSensor for SimGyro {
    fn heading(&self) -> f64 {
        *self.heading.borrow()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn first_order_plant_settles_at_free_speed() {
        let mut motor = SimMotor::new("flywheel", 6000.0, Duration::from_millis(100));
        let handle = motor.clone();
        motor.set_voltage(6.0);
        for _ in 0..200 {
            handle.step(Duration::from_millis(20));
        }
        assert_relative_eq!(handle.velocity(), 3000.0, epsilon = 1e-6);
        assert!(handle.position() > 0.0);
    }

    #[test]
    fn position_integrates_over_the_velocity_period() {
        let motor = SimMotor::fixed("shooter").with_velocity_period(Duration::from_secs(60));
        motor.set_velocity(600.0);
        motor.step(Duration::from_secs(2));
        assert_relative_eq!(motor.position(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn journal_is_shared() {
        let journal = journal();
        let mut a = SimMotor::fixed("a").with_journal(journal.clone());
        let mut b = SimMotor::fixed("b").with_journal(journal.clone());
        a.set_voltage(1.0);
        b.stop();
        assert_eq!(
            *journal.borrow(),
            alloc::vec![
                Command { device: "a", volts: 1.0 },
                Command { device: "b", volts: 0.0 },
            ]
        );
    }

    #[test]
    fn rejected_configs_are_counted() {
        let mut motor = SimMotor::fixed("arm");
        motor.reject_configs(1);
        let config = ActuatorConfig::builder().current_limit(30.0).build();
        assert!(motor.configure(&config).is_err());
        assert!(motor.configure(&config).is_ok());
        assert_eq!(motor.configure_calls(), 2);
        assert_eq!(motor.applied_config(), Some(config));
    }
}

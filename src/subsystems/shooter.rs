use core::time::Duration;

use log::debug;

use super::Subsystem;
use crate::{
    constants::shooter::*,
    controllers::{
        bang_bang::BangBang,
        pid::{Pid, PidGains},
        ControlLoop,
    },
    devices::{Actuator, ActuatorConfig, ConfigError, IdleMode},
};

/// A flywheel shooter under closed-loop velocity control, in RPM.
pub struct Shooter<A: Actuator> {
    motor: A,
    control: ControlLoop,
    enabled: bool,
    output: f64,
}

impl<A: Actuator> Shooter<A> {
    pub fn new(motor: A) -> Self {
        let control = ControlLoop::new(Pid::new(PidGains::new(KP, KI, KD)), TOLERANCE_RPM)
            .with_feedforward(KFF)
            .zero_setpoint_is_unset();
        Self::with_control(motor, control)
    }

    /// Full voltage below the setpoint and coasting above it.
    pub fn bang_bang(motor: A) -> Self {
        let control = ControlLoop::new(BangBang::new(1.0, 0.0), TOLERANCE_RPM).zero_setpoint_is_unset();
        Self::with_control(motor, control)
    }

    pub fn with_control(motor: A, control: ControlLoop) -> Self {
        Self {
            motor,
            control,
            enabled: false,
            output: 0.0,
        }
    }

    /// Spins up towards `rpm`.
    pub fn prepare(&mut self, rpm: f64) {
        debug!("shooter -> {rpm} rpm");
        self.control.set_setpoint(rpm);
        self.enabled = true;
    }

    /// Whether the flywheel is running at a nonzero target speed.
    pub fn is_ready(&self) -> bool {
        self.enabled && self.control.is_ready()
    }

    /// Actively slows the flywheel down to a standstill.
    pub fn stop(&mut self) {
        self.control.set_setpoint(0.0);
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn setpoint(&self) -> Option<f64> {
        self.control.setpoint()
    }

    pub fn rpm(&self) -> f64 {
        self.motor.velocity()
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn update(&mut self, dt: Duration) -> f64 {
        let rpm = self.rpm();
        if self.enabled {
            self.output = self.control.calculate(rpm, dt);
            self.motor.set_voltage(self.output);
        } else {
            self.output = 0.0;
            self.motor.stop();
        }
        self.output
    }
}

impl<A: Actuator> Subsystem for Shooter<A> {
    fn configure(&mut self) -> Result<(), ConfigError> {
        let config = ActuatorConfig::builder()
            .current_limit(CURRENT_LIMIT_AMPS)
            .idle_mode(IdleMode::Coast)
            .build();
        self.motor.configure(&config)
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

use super::Subsystem;
use crate::{
    constants::{intake::*, PEAK_VOLTAGE},
    devices::{Actuator, ActuatorConfig, ConfigError, IdleMode},
};

/// Open-loop roller that pulls notes in and pushes them into the shooter.
pub struct Intake<A: Actuator> {
    motor: A,
    duty: f64,
    output: f64,
}

impl<A: Actuator> Intake<A> {
    pub fn new(motor: A) -> Self {
        Self {
            motor,
            duty: 0.0,
            output: 0.0,
        }
    }

    pub fn intake(&mut self) {
        self.duty = INTAKE_SPEED;
    }

    /// Runs at full speed to push a held note into the flywheels.
    pub fn feed(&mut self) {
        self.duty = FEED_SPEED;
    }

    /// Reverses proportionally to `amount` in `[0, 1]`, typically a trigger.
    pub fn outtake(&mut self, amount: f64) {
        self.duty = lerp!(0.0, MAX_OUTTAKE_SPEED, amount.clamp(0.0, 1.0));
    }

    pub fn is_running(&self) -> bool {
        self.duty != 0.0
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn update(&mut self) -> f64 {
        self.output = self.duty * PEAK_VOLTAGE;
        if self.duty == 0.0 {
            self.motor.stop();
        } else {
            self.motor.set_voltage(self.output);
        }
        self.output
    }
}

impl<A: Actuator> Subsystem for Intake<A> {
    fn configure(&mut self) -> Result<(), ConfigError> {
        let config = ActuatorConfig::builder()
            .current_limit(CURRENT_LIMIT_AMPS)
            .idle_mode(IdleMode::Brake)
            .build();
        self.motor.configure(&config)
    }

    fn disable(&mut self) {
        self.duty = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::devices::sim::SimMotor;

    #[test]
    fn speeds() {
        let motor = SimMotor::fixed("intake");
        let mut intake = Intake::new(motor.clone());
        intake.intake();
        assert_relative_eq!(intake.update(), 6.0);
        intake.feed();
        assert_relative_eq!(intake.update(), 12.0);
        intake.disable();
        assert_eq!(intake.update(), 0.0);
        assert!(!intake.is_running());
        assert_eq!(motor.volts(), 0.0);
    }

    #[test]
    fn outtake_follows_the_trigger() {
        let mut intake = Intake::new(SimMotor::fixed("intake"));
        intake.outtake(0.0);
        assert_eq!(intake.update(), 0.0);
        intake.outtake(0.5);
        assert_relative_eq!(intake.update(), -1.5);
        intake.outtake(4.0);
        assert_relative_eq!(intake.update(), -3.0);
    }
}

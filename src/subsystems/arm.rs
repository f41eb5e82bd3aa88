use core::time::Duration;

use log::debug;
#[allow(unused_imports)]
use num_traits::Float;

use super::Subsystem;
use crate::{
    constants::arm::*,
    controllers::{
        feedforward::ArmFeedforward,
        pid::{Pid, PidGains},
        ControlLoop, OutputLimits,
    },
    devices::{Actuator, ActuatorConfig, ConfigError, IdleMode},
};

/// Preset arm positions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArmState {
    Intake,
    Amp,
    Speaker,

    /// Slightly steeper than `Speaker`, for shots from the starting line.
    SpeakerAuto,
}

impl ArmState {
    /// Target angle in degrees from the stowed position.
    pub fn target_angle(self) -> f64 {
        match self {
            ArmState::Intake => INTAKE_DEGREES,
            ArmState::Amp => AMP_DEGREES,
            ArmState::Speaker => SPEAKER_DEGREES,
            ArmState::SpeakerAuto => SPEAKER_AUTO_DEGREES,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum ArmMode {
    Off,
    Hold,
    Voltage(f64),
}

pub struct Arm<A: Actuator> {
    motor: A,
    control: ControlLoop,
    feedforward: ArmFeedforward,
    state: Option<ArmState>,
    mode: ArmMode,
    output: f64,
}

impl<A: Actuator> Arm<A> {
    pub fn new(motor: A) -> Self {
        let gains = PidGains::builder()
            .kp(KP)
            .ki(KI)
            .kd(KD)
            .integral_limit(INTEGRAL_LIMIT)
            .build();
        Self {
            motor,
            control: ControlLoop::new(Pid::new(gains), TOLERANCE_DEGREES)
                .with_limits(OutputLimits::symmetric(MAX_VOLTAGE)),
            feedforward: ArmFeedforward::new(KS, KG, KV),
            state: None,
            mode: ArmMode::Off,
            output: 0.0,
        }
    }

    /// Sends the arm to a preset. Returns immediately; poll
    /// [`Self::at_setpoint`] to know when it has arrived.
    pub fn select_state(&mut self, state: ArmState) {
        if self.state != Some(state) {
            debug!("arm -> {state:?}");
        }
        self.state = Some(state);
        self.control.set_setpoint(state.target_angle());
        self.mode = ArmMode::Hold;
    }

    /// Drives the motor open loop, bypassing the position loop until the next
    /// [`Self::select_state`] or [`Self::release_voltage_control`].
    pub fn voltage_control(&mut self, volts: f64) {
        self.mode = ArmMode::Voltage(volts.clamp(-MAX_VOLTAGE, MAX_VOLTAGE));
    }

    /// Ends a manual override. The arm is left unpowered; a held preset is
    /// unaffected.
    pub fn release_voltage_control(&mut self) {
        if let ArmMode::Voltage(_) = self.mode {
            self.mode = ArmMode::Off;
        }
    }

    pub fn state(&self) -> Option<ArmState> {
        self.state
    }

    /// Arm angle in degrees from the stowed position.
    pub fn angle(&self) -> f64 {
        self.motor.position() * POSITION_FACTOR
    }

    pub fn at_setpoint(&self) -> bool {
        self.mode == ArmMode::Hold && self.control.at_setpoint()
    }

    /// Last commanded voltage.
    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn motor(&self) -> &A {
        &self.motor
    }

    pub fn update(&mut self, dt: Duration) -> f64 {
        let angle = self.angle();
        self.output = match self.mode {
            ArmMode::Off => 0.0,
            ArmMode::Voltage(volts) => volts,
            ArmMode::Hold => {
                let from_horizontal = (angle - HORIZONTAL_OFFSET_DEGREES).to_radians();
                let gravity = if angle.is_finite() {
                    self.feedforward.calculate(from_horizontal, 0.0)
                } else {
                    0.0
                };
                self.control.calculate_with_feedforward(angle, dt, gravity)
            }
        };
        if self.mode == ArmMode::Off {
            self.motor.stop();
        } else {
            self.motor.set_voltage(self.output);
        }
        self.output
    }
}

impl<A: Actuator> Subsystem for Arm<A> {
    fn configure(&mut self) -> Result<(), ConfigError> {
        let config = ActuatorConfig::builder()
            .current_limit(CURRENT_LIMIT_AMPS)
            .idle_mode(IdleMode::Brake)
            .build();
        self.motor.configure(&config)
    }

    fn disable(&mut self) {
        self.mode = ArmMode::Off;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::devices::sim::SimMotor;

    const DT: Duration = Duration::from_millis(20);

    #[test]
    fn presets_have_fixed_angles() {
        assert_eq!(ArmState::Intake.target_angle(), 0.0);
        assert_eq!(ArmState::Speaker.target_angle(), 22.0);
        assert_eq!(ArmState::SpeakerAuto.target_angle(), 27.5);
        assert_eq!(ArmState::Amp.target_angle(), 96.0);
    }

    #[test]
    fn select_state_does_not_wait() {
        let motor = SimMotor::fixed("arm");
        let mut arm = Arm::new(motor.clone());
        arm.select_state(ArmState::Amp);
        assert_eq!(arm.state(), Some(ArmState::Amp));
        assert!(!arm.at_setpoint());
        let volts = arm.update(DT);
        assert!(volts > 0.0);
        assert_relative_eq!(motor.volts(), volts);
    }

    #[test]
    fn reaches_the_preset() {
        let motor = SimMotor::fixed("arm");
        let mut arm = Arm::new(motor.clone());
        arm.select_state(ArmState::Speaker);
        motor.set_position_reading(ArmState::Speaker.target_angle() / POSITION_FACTOR);
        arm.update(DT);
        assert!(arm.at_setpoint());
        assert_relative_eq!(arm.angle(), 22.0, epsilon = 1e-9);
    }

    #[test]
    fn disable_keeps_the_target() {
        let motor = SimMotor::fixed("arm");
        let mut arm = Arm::new(motor.clone());
        arm.select_state(ArmState::Amp);
        arm.update(DT);
        arm.disable();
        assert_eq!(arm.update(DT), 0.0);
        assert_eq!(motor.volts(), 0.0);
        assert_eq!(arm.state(), Some(ArmState::Amp));

        // Halfway up while unpowered. The loop still remembers the 96 degree
        // error, so the derivative term swamps the proportional one.
        motor.set_position_reading(48.0 / POSITION_FACTOR);
        arm.select_state(ArmState::Amp);
        assert_eq!(arm.update(DT), -MAX_VOLTAGE);
    }

    #[test]
    fn releasing_the_override_cuts_power() {
        let motor = SimMotor::fixed("arm");
        let mut arm = Arm::new(motor.clone());
        arm.voltage_control(4.0);
        assert_eq!(arm.update(DT), 4.0);
        arm.release_voltage_control();
        assert_eq!(arm.update(DT), 0.0);
        assert_eq!(motor.volts(), 0.0);
    }

    #[test]
    fn releasing_without_an_override_keeps_holding() {
        let motor = SimMotor::fixed("arm");
        let mut arm = Arm::new(motor.clone());
        arm.select_state(ArmState::Amp);
        arm.release_voltage_control();
        assert!(arm.update(DT) > 0.0);
    }

    #[test]
    fn voltage_override_is_clamped() {
        let motor = SimMotor::fixed("arm");
        let mut arm = Arm::new(motor.clone());
        arm.voltage_control(-10.0);
        assert_eq!(arm.update(DT), -MAX_VOLTAGE);
        assert!(!arm.at_setpoint());
    }

    #[test]
    fn nan_position_does_not_poison_the_loop() {
        let motor = SimMotor::fixed("arm");
        let mut arm = Arm::new(motor.clone());
        arm.select_state(ArmState::Amp);
        arm.update(DT);
        motor.set_position_reading(f64::NAN);
        assert!(arm.update(DT).is_finite());
    }
}

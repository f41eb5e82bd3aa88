use alloc::vec::Vec;

use vexide::prelude::{BrakeMode, Direction, InertialSensor, Motor, MotorControl, Position};

use super::{Actuator, ActuatorConfig, ConfigError, HeadingSensor, IdleMode};

/// Several V5 motors mechanically linked and driven as one [`Actuator`].
///
/// Readings are the mean over every motor that answered. Position is in motor
/// revolutions and velocity in RPM, each multiplied by the group's scale so
/// that callers can work in whatever native unit their constants expect.
pub struct MotorGroup {
    motors: Vec<Motor>,

    /// Each motor's direction as wired, before any inversion from a config.
    directions: Vec<Direction>,
    position_scale: f64,
    velocity_scale: f64,
}

impl MotorGroup {
    pub fn new(motors: Vec<Motor>) -> Self {
        let directions = motors
            .iter()
            .map(|motor| motor.direction().unwrap_or(Direction::Forward))
            .collect();
        Self {
            motors,
            directions,
            position_scale: 1.0,
            velocity_scale: 1.0,
        }
    }

    pub fn with_scale(mut self, position_scale: f64, velocity_scale: f64) -> Self {
        self.position_scale = position_scale;
        self.velocity_scale = velocity_scale;
        self
    }

    pub fn size(&self) -> usize {
        self.motors.len()
    }

    fn set_target_all(&mut self, target: MotorControl) {
        for motor in self.motors.iter_mut() {
            let _ = motor.set_target(target);
        }
    }
}

impl Actuator for MotorGroup {
    fn set_voltage(&mut self, volts: f64) {
        for motor in self.motors.iter_mut() {
            let max = motor.max_voltage();
            let _ = motor.set_voltage(volts.clamp(-max, max));
        }
    }

    fn stop(&mut self) {
        self.set_target_all(MotorControl::Brake(BrakeMode::Coast));
    }

    fn position(&self) -> f64 {
        let revolutions: Vec<Option<f64>> = self
            .motors
            .iter()
            .map(|motor| motor.position().ok().map(|position| position.as_revolutions()))
            .collect();
        avg_valid!(revolutions).map_or(f64::NAN, |revs| revs * self.position_scale)
    }

    fn velocity(&self) -> f64 {
        let rpm: Vec<Option<f64>> = self.motors.iter().map(|motor| motor.velocity().ok()).collect();
        avg_valid!(rpm).map_or(f64::NAN, |rpm| rpm * self.velocity_scale)
    }

    fn set_position(&mut self, position: f64) {
        let revolutions = position / self.position_scale;
        for motor in self.motors.iter_mut() {
            let _ = motor.set_position(Position::from_revolutions(revolutions));
        }
    }

    fn configure(&mut self, config: &ActuatorConfig) -> Result<(), ConfigError> {
        for (motor, &wired) in self.motors.iter_mut().zip(&self.directions) {
            let direction = match (wired, config.inverted) {
                (Direction::Forward, true) => Direction::Reverse,
                (Direction::Reverse, true) => Direction::Forward,
                (wired, false) => wired,
            };
            motor
                .set_direction(direction)
                .map_err(|err| ConfigError::Rejected {
                    setting: "direction",
                    reason: alloc::format!("{err:?}"),
                })?;
            if let Some(limit) = config.current_limit {
                motor
                    .set_current_limit(limit)
                    .map_err(|err| ConfigError::Rejected {
                        setting: "current limit",
                        reason: alloc::format!("{err:?}"),
                    })?;
            }
        }
        let brake = match config.idle_mode {
            IdleMode::Coast => BrakeMode::Coast,
            IdleMode::Brake => BrakeMode::Brake,
        };
        self.set_target_all(MotorControl::Brake(brake));
        Ok(())
    }
}

/// Yaw from a V5 inertial sensor, converted to counter-clockwise radians.
pub struct InertialHeading {
    imu: InertialSensor,
}

impl InertialHeading {
    pub fn new(imu: InertialSensor) -> Self {
        Self { imu }
    }
}

impl HeadingSensor for InertialHeading {
    fn heading(&self) -> f64 {
        // The IMU reports clockwise degrees.
        self.imu
            .rotation()
            .map_or(f64::NAN, |degrees| -degrees.to_radians())
    }
}

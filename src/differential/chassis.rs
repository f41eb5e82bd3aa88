use alloc::boxed::Box;
use core::time::Duration;

use super::{
    drive_curve::{DriveCurve, LinearDriveCurve},
    kinematics::{arcade_ik, curvature_ik, tank_ik},
    pose::Pose,
    ChassisVelocity, DifferentialKinematics, WheelSpeeds,
};
use crate::{
    constants::{drivetrain::*, PEAK_VOLTAGE},
    controllers::{
        pid::{Pid, PidGains},
        ControlLoop,
    },
    devices::{Actuator, ActuatorConfig, ConfigError, HeadingSensor, IdleMode},
    subsystems::Subsystem,
    tracking::{DifferentialOdometry, Tracking},
};

/// Open-loop input mappings for a driver.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DriveStyle {
    #[default]
    Arcade,
    Curvature,
    Tank,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum DriveDemand {
    Stopped,

    /// Normalized side outputs.
    Open(WheelSpeeds),

    /// Wheel speeds in m/s, held by the velocity loops.
    Velocity(WheelSpeeds),
}

pub struct Chassis<A: Actuator, G: HeadingSensor> {
    left: A,
    right: A,
    gyro: G,
    kinematics: DifferentialKinematics,
    odometry: DifferentialOdometry,
    throttle_curve: Box<dyn DriveCurve>,
    steer_curve: Box<dyn DriveCurve>,
    left_velocity: ControlLoop,
    right_velocity: ControlLoop,
    demand: DriveDemand,
    output: WheelSpeeds,
}

impl<A: Actuator, G: HeadingSensor> Chassis<A, G> {
    pub fn new(left: A, right: A, gyro: G) -> Self {
        let gains = PidGains::builder()
            .kp(VELOCITY_KP)
            .ki(VELOCITY_KI)
            .kd(VELOCITY_KD)
            .integral_limit(VELOCITY_INTEGRAL_LIMIT)
            .build();
        let velocity_loop =
            ControlLoop::new(Pid::new(gains), VELOCITY_TOLERANCE).with_feedforward(VELOCITY_KV);
        Self {
            left,
            right,
            gyro,
            kinematics: DifferentialKinematics::new(TRACK_WIDTH_METERS),
            odometry: DifferentialOdometry::default(),
            throttle_curve: Box::new(LinearDriveCurve::default()),
            steer_curve: Box::new(LinearDriveCurve::default()),
            left_velocity: velocity_loop.clone(),
            right_velocity: velocity_loop,
            demand: DriveDemand::Stopped,
            output: WheelSpeeds::default(),
        }
    }

    pub fn with_curves<T, S>(mut self, throttle_curve: T, steer_curve: S) -> Self
    where
        T: DriveCurve + 'static,
        S: DriveCurve + 'static,
    {
        self.throttle_curve = Box::new(throttle_curve);
        self.steer_curve = Box::new(steer_curve);
        self
    }

    pub fn kinematics(&self) -> &DifferentialKinematics {
        &self.kinematics
    }

    /// Positive `steer` turns clockwise.
    pub fn arcade(&mut self, mut throttle: f64, mut steer: f64, use_drive_curve: bool) {
        if use_drive_curve {
            throttle = self.throttle_curve.update(throttle);
            steer = self.steer_curve.update(steer);
        }
        self.demand = DriveDemand::Open(arcade_ik(throttle, steer, false));
    }

    pub fn curvature(&mut self, mut throttle: f64, mut steer: f64, allow_turn_in_place: bool, use_drive_curve: bool) {
        if use_drive_curve {
            throttle = self.throttle_curve.update(throttle);
            steer = self.steer_curve.update(steer);
        }
        self.demand = DriveDemand::Open(curvature_ik(throttle, steer, allow_turn_in_place));
    }

    pub fn tank(&mut self, mut left: f64, mut right: f64, use_drive_curve: bool) {
        if use_drive_curve {
            left = self.throttle_curve.update(left);
            right = self.throttle_curve.update(right);
        }
        self.demand = DriveDemand::Open(tank_ik(left, right));
    }

    /// Closed-loop drive at a chassis velocity in m/s and rad/s.
    pub fn drive_velocity(&mut self, velocity: ChassisVelocity) {
        let speeds = self.kinematics.to_wheel_speeds(velocity);
        self.left_velocity.set_setpoint(speeds.left);
        self.right_velocity.set_setpoint(speeds.right);
        self.demand = DriveDemand::Velocity(speeds);
    }

    pub fn stop(&mut self) {
        self.demand = DriveDemand::Stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.demand == DriveDemand::Stopped
    }

    pub fn set_pose(&mut self, pose: Pose) {
        let (left, right) = self.distances();
        self.odometry.reset(pose, left, right, self.gyro.heading());
    }

    pub fn pose(&self) -> Pose {
        self.odometry.position()
    }

    /// Chassis speed from the wheel encoders.
    pub fn measured_velocity(&self) -> ChassisVelocity {
        self.kinematics.to_chassis_velocity(self.wheel_velocities())
    }

    /// Last commanded side voltages.
    pub fn output(&self) -> WheelSpeeds {
        self.output
    }

    fn distances(&self) -> (f64, f64) {
        (
            self.left.position() * POSITION_FACTOR,
            self.right.position() * POSITION_FACTOR,
        )
    }

    fn wheel_velocities(&self) -> WheelSpeeds {
        WheelSpeeds::new(
            self.left.velocity() * VELOCITY_FACTOR,
            self.right.velocity() * VELOCITY_FACTOR,
        )
    }

    /// Reads the sensors, advances odometry, then writes the drive motors.
    pub fn update(&mut self, dt: Duration) -> WheelSpeeds {
        let (left, right) = self.distances();
        self.odometry.update(left, right, self.gyro.heading());

        self.output = match self.demand {
            DriveDemand::Stopped => WheelSpeeds::default(),
            DriveDemand::Open(duty) => WheelSpeeds::new(duty.left * PEAK_VOLTAGE, duty.right * PEAK_VOLTAGE),
            DriveDemand::Velocity(_) => {
                let measured = self.wheel_velocities();
                WheelSpeeds::new(
                    self.left_velocity.calculate(measured.left, dt),
                    self.right_velocity.calculate(measured.right, dt),
                )
            }
        };
        if self.demand == DriveDemand::Stopped {
            self.left.stop();
            self.right.stop();
        } else {
            self.left.set_voltage(self.output.left);
            self.right.set_voltage(self.output.right);
        }
        self.output
    }
}

impl<A: Actuator, G: HeadingSensor> Subsystem for Chassis<A, G> {
    fn configure(&mut self) -> Result<(), ConfigError> {
        let left = ActuatorConfig::builder()
            .current_limit(CURRENT_LIMIT_AMPS)
            .idle_mode(IdleMode::Brake)
            .build();
        let right = ActuatorConfig { inverted: true, ..left };
        self.left.configure(&left)?;
        self.right.configure(&right)
    }

    fn disable(&mut self) {
        self.stop();
    }
}

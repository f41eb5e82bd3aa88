#![no_main]
#![no_std]

extern crate alloc;

use alloc::vec;
use core::time::Duration;

use log::{info, LevelFilter};
use notelib_rs::{
    autonomous::RoutineKind,
    constants::{drivetrain::ENCODER_COUNTS_PER_REV, TICK_PERIOD},
    devices::{motor_group::MotorGroup, InertialHeading},
    differential::{chassis::Chassis, drive_curve::exponential::ExponentialDriveCurve, pose::Pose},
    logger::RobotLogger,
    opcontrol::OperatorIntent,
    robot::Robot,
    subsystems::{Arm, ArmState, Intake, Shooter},
};
use vexide::{
    devices::controller::ControllerState,
    prelude::*,
    time::{sleep, Instant},
};

static LOGGER: RobotLogger = RobotLogger::serial();

/// Routine run when the match starts autonomous.
const SELECTED_ROUTINE: &str = "left shoot then drive";

struct Competitor {
    controller: Controller,
    robot: Robot<MotorGroup, InertialHeading>,
    start: Instant,
}

impl Competitor {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn tick(&mut self, intent: &OperatorIntent) {
        let started = Instant::now();
        let now = self.now();
        self.robot.tick(now, intent);
        sleep(TICK_PERIOD.saturating_sub(started.elapsed())).await;
    }
}

fn read_intent(state: &ControllerState) -> OperatorIntent {
    let arm = if state.button_a.is_pressed() {
        Some(ArmState::Intake)
    } else if state.button_b.is_pressed() {
        Some(ArmState::Speaker)
    } else if state.button_x.is_pressed() {
        Some(ArmState::Amp)
    } else {
        None
    };
    let arm_voltage = if state.button_up.is_pressed() {
        Some(4.0)
    } else if state.button_down.is_pressed() {
        Some(-4.0)
    } else {
        None
    };

    OperatorIntent::builder()
        .forward(state.left_stick.y())
        .turn(state.right_stick.x())
        .use_drive_curve(true)
        .intake(state.button_l1.is_pressed())
        .outtake(if state.button_l2.is_pressed() { 1.0 } else { 0.0 })
        .shoot(state.button_r2.is_pressed())
        .feed(state.button_r1.is_pressed())
        .maybe_arm(arm)
        .maybe_arm_voltage(arm_voltage)
        .build()
}

impl Compete for Competitor {
    async fn autonomous(&mut self) {
        let kind = RoutineKind::from_name_or_default(SELECTED_ROUTINE);
        let now = self.now();
        self.robot.begin_autonomous(kind, now, Pose::default());
        loop {
            self.tick(&OperatorIntent::default()).await;
        }
    }

    async fn driver(&mut self) {
        self.robot.begin_teleop();
        loop {
            let state = self.controller.state().unwrap_or_default();
            self.tick(&read_intent(&state)).await;
        }
    }

    async fn disabled(&mut self) {
        self.robot.disable_all();
        loop {
            self.tick(&OperatorIntent::default()).await;
        }
    }
}

#[vexide::main]
async fn main(peripherals: Peripherals) {
    let _ = LOGGER.init(LevelFilter::Info);

    // Drive encoders are scaled to counts and counts per 100ms.
    let counts = ENCODER_COUNTS_PER_REV;
    let left = MotorGroup::new(vec![
        Motor::new(peripherals.port_1, Gearset::Blue, Direction::Forward),
        Motor::new(peripherals.port_2, Gearset::Blue, Direction::Forward),
    ])
    .with_scale(counts, counts / 600.0);
    let right = MotorGroup::new(vec![
        Motor::new(peripherals.port_9, Gearset::Blue, Direction::Forward),
        Motor::new(peripherals.port_10, Gearset::Blue, Direction::Forward),
    ])
    .with_scale(counts, counts / 600.0);

    let mut imu = InertialSensor::new(peripherals.port_13);
    if let Err(err) = imu.calibrate().await {
        log::warn!("imu calibration failed: {err:?}");
    }

    let chassis = Chassis::new(left, right, InertialHeading::new(imu))
        .with_curves(ExponentialDriveCurve::default(), ExponentialDriveCurve::default());
    let arm = Arm::new(MotorGroup::new(vec![
        Motor::new(peripherals.port_19, Gearset::Red, Direction::Forward),
        Motor::new(peripherals.port_20, Gearset::Red, Direction::Reverse),
    ]));
    let shooter = Shooter::new(MotorGroup::new(vec![
        Motor::new(peripherals.port_11, Gearset::Blue, Direction::Forward),
        Motor::new(peripherals.port_12, Gearset::Blue, Direction::Reverse),
    ]));
    let intake = Intake::new(MotorGroup::new(vec![Motor::new(
        peripherals.port_3,
        Gearset::Green,
        Direction::Forward,
    )]));

    let mut robot = Robot::new(chassis, arm, shooter, intake);
    let failures = robot.configure();
    info!("robot ready, {failures} subsystem(s) left unconfigured");

    Competitor {
        controller: peripherals.primary_controller,
        robot,
        start: Instant::now(),
    }
    .compete()
    .await;
}

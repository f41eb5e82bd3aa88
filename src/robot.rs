//! The whole robot, stepped once per control tick.

use core::time::Duration;

use log::{info, warn};

use crate::{
    autonomous::{DriveCommand, PhaseAction, RoutineKind, Sequencer, ShootSequence, ShootTiming, ShotCommand},
    constants::{shooter::SHOOT_RPM, CONFIG_ATTEMPTS, TICK_PERIOD},
    devices::{retry_failable, Actuator, HeadingSensor},
    differential::{
        chassis::{Chassis, DriveStyle},
        pose::Pose,
        WheelSpeeds,
    },
    opcontrol::OperatorIntent,
    subsystems::{Arm, Intake, Owner, Shooter, Subsystem},
};

/// Who commands each subsystem.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Ownership {
    pub chassis: Owner,
    pub arm: Owner,
    pub shooter: Owner,
    pub intake: Owner,
}

impl Ownership {
    pub fn all(owner: Owner) -> Self {
        Self {
            chassis: owner,
            arm: owner,
            shooter: owner,
            intake: owner,
        }
    }
}

/// Everything written to the actuators on one tick, in volts.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct RobotOutputs {
    pub drive: WheelSpeeds,
    pub arm: f64,
    pub shooter: f64,
    pub intake: f64,
    pub pose: Pose,
}

pub struct Robot<A: Actuator, G: HeadingSensor> {
    pub chassis: Chassis<A, G>,
    pub arm: Arm<A>,
    pub shooter: Shooter<A>,
    pub intake: Intake<A>,
    ownership: Ownership,
    sequencer: Sequencer,
    routine: Option<RoutineKind>,
    shot: Option<ShootSequence>,

    /// Whether the running shot waits for the arm to reach its preset.
    shot_needs_aim: bool,
    last_tick: Option<Duration>,
}

impl<A: Actuator, G: HeadingSensor> Robot<A, G> {
    pub fn new(chassis: Chassis<A, G>, arm: Arm<A>, shooter: Shooter<A>, intake: Intake<A>) -> Self {
        Self {
            chassis,
            arm,
            shooter,
            intake,
            ownership: Ownership::default(),
            sequencer: Sequencer::new(),
            routine: None,
            shot: None,
            shot_needs_aim: false,
            last_tick: None,
        }
    }

    /// Sends every subsystem its actuator setup, retrying rejected commands.
    /// Subsystems that never accept keep their defaults. Returns how many
    /// subsystems failed.
    pub fn configure(&mut self) -> usize {
        let results = [
            ("chassis", retry_failable(CONFIG_ATTEMPTS, || self.chassis.configure())),
            ("arm", retry_failable(CONFIG_ATTEMPTS, || self.arm.configure())),
            ("shooter", retry_failable(CONFIG_ATTEMPTS, || self.shooter.configure())),
            ("intake", retry_failable(CONFIG_ATTEMPTS, || self.intake.configure())),
        ];
        let mut failures = 0;
        for (name, result) in results {
            match result {
                Ok(1) => {}
                Ok(attempt) => info!("{name} configured on attempt {attempt}"),
                Err(err) => {
                    failures += 1;
                    warn!("{name} not configured after {CONFIG_ATTEMPTS} attempts ({err}), using defaults");
                }
            }
        }
        failures
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn routine(&self) -> Option<RoutineKind> {
        self.routine
    }

    pub fn shot(&self) -> Option<&ShootSequence> {
        self.shot.as_ref()
    }

    fn set_ownership(&mut self, ownership: Ownership) {
        if self.ownership != ownership {
            info!("ownership: {:?} -> {:?}", self.ownership, ownership);
        }
        self.ownership = ownership;
    }

    fn disable_subsystems(&mut self) {
        self.chassis.disable();
        self.arm.disable();
        self.shooter.disable();
        self.intake.disable();
        self.shot = None;
    }

    /// Hands every subsystem to `kind`'s routine, timed from `now`.
    pub fn begin_autonomous(&mut self, kind: RoutineKind, now: Duration, start_pose: Pose) {
        info!("autonomous: running \"{kind}\"");
        self.disable_subsystems();
        self.chassis.set_pose(start_pose);
        self.sequencer.start(kind.build(), now);
        self.routine = Some(kind);
        self.set_ownership(Ownership::all(Owner::Autonomous));
    }

    pub fn begin_teleop(&mut self) {
        self.sequencer.stop();
        self.routine = None;
        self.disable_subsystems();
        self.set_ownership(Ownership::all(Owner::Manual));
    }

    pub fn disable_all(&mut self) {
        self.sequencer.stop();
        self.routine = None;
        self.disable_subsystems();
        self.set_ownership(Ownership::all(Owner::Disabled));
    }

    /// One control cycle: apply commands from whoever owns each subsystem,
    /// then let every subsystem read its sensors and write its actuators.
    pub fn tick(&mut self, now: Duration, intent: &OperatorIntent) -> RobotOutputs {
        let dt = self
            .last_tick
            .map_or(TICK_PERIOD, |last| now.saturating_sub(last));
        self.last_tick = Some(now);

        self.run_autonomous(now);
        self.apply_intent(intent);

        RobotOutputs {
            drive: self.chassis.update(dt),
            arm: self.arm.update(dt),
            shooter: self.shooter.update(dt),
            intake: self.intake.update(),
            pose: self.chassis.pose(),
        }
    }

    fn run_autonomous(&mut self, now: Duration) {
        let entered = match self.sequencer.advance(now) {
            Some((phase, true)) => Some(phase.action),
            _ => None,
        };
        if let Some(action) = entered {
            self.enter_phase(action);
        }

        if let Some(shot) = &mut self.shot {
            let aimed = !self.shot_needs_aim || self.arm.at_setpoint();
            shot.step(now, &mut self.shooter, &mut self.intake, aimed);
            if shot.is_done() {
                self.shot = None;
            }
        }
    }

    fn enter_phase(&mut self, action: PhaseAction) {
        if self.ownership.chassis == Owner::Autonomous {
            match action.drive {
                DriveCommand::Stop => self.chassis.stop(),
                DriveCommand::Arcade { throttle, steer } => self.chassis.arcade(throttle, steer, false),
                DriveCommand::Tank { left, right } => self.chassis.tank(left, right, false),
                DriveCommand::Velocity(velocity) => self.chassis.drive_velocity(velocity),
            }
        }
        if self.ownership.arm == Owner::Autonomous {
            if let Some(state) = action.arm {
                self.arm.select_state(state);
            }
        }
        if self.ownership.shooter == Owner::Autonomous && self.ownership.intake == Owner::Autonomous {
            match action.shot {
                ShotCommand::Hold => {}
                ShotCommand::Shoot => {
                    self.shot = Some(ShootSequence::new(ShootTiming::default()));
                    self.shot_needs_aim = action.arm.is_some();
                }
                ShotCommand::Stop => {
                    self.shot = None;
                    self.shooter.disable();
                    self.intake.disable();
                }
            }
        }
    }

    fn apply_intent(&mut self, intent: &OperatorIntent) {
        if self.ownership.chassis == Owner::Manual {
            let curve = intent.use_drive_curve;
            match intent.drive_style {
                DriveStyle::Arcade => self.chassis.arcade(intent.forward, intent.turn, curve),
                DriveStyle::Curvature => {
                    self.chassis
                        .curvature(intent.forward, intent.turn, intent.quick_turn, curve)
                }
                DriveStyle::Tank => self.chassis.tank(intent.forward, intent.turn, curve),
            }
        }

        if self.ownership.arm == Owner::Manual {
            if let Some(volts) = intent.arm_voltage {
                self.arm.voltage_control(volts);
            } else if let Some(state) = intent.arm {
                self.arm.select_state(state);
            } else {
                self.arm.release_voltage_control();
            }
        }

        if self.ownership.shooter == Owner::Manual {
            if !intent.shoot {
                self.shooter.disable();
            } else if !self.shooter.is_enabled() || self.shooter.setpoint() != Some(SHOOT_RPM) {
                self.shooter.prepare(SHOOT_RPM);
            }
        }

        if self.ownership.intake == Owner::Manual {
            if intent.feed && self.shooter.is_ready() {
                self.intake.feed();
            } else if intent.intake {
                self.intake.intake();
            } else if intent.outtake > 0.0 {
                self.intake.outtake(intent.outtake);
            } else {
                self.intake.disable();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        devices::sim::{SimGyro, SimMotor},
        subsystems::ArmState,
    };

    fn robot() -> (Robot<SimMotor, SimGyro>, SimMotor) {
        let flywheel = SimMotor::fixed("shooter");
        let robot = Robot::new(
            Chassis::new(SimMotor::fixed("left"), SimMotor::fixed("right"), SimGyro::new()),
            Arm::new(SimMotor::fixed("arm")),
            Shooter::new(flywheel.clone()),
            Intake::new(SimMotor::fixed("intake")),
        );
        (robot, flywheel)
    }

    #[test]
    fn disabled_robot_writes_nothing() {
        let (mut robot, _) = robot();
        let intent = OperatorIntent::builder().forward(1.0).shoot(true).intake(true).build();
        let outputs = robot.tick(Duration::ZERO, &intent);
        assert_eq!(outputs.drive, WheelSpeeds::default());
        assert_eq!(outputs.shooter, 0.0);
        assert_eq!(outputs.intake, 0.0);
    }

    #[test]
    fn teleop_drives_and_gates_the_feed() {
        let (mut robot, flywheel) = robot();
        robot.begin_teleop();
        let intent = OperatorIntent::builder().forward(0.5).shoot(true).feed(true).build();

        let outputs = robot.tick(Duration::ZERO, &intent);
        assert_relative_eq!(outputs.drive.left, 6.0);
        assert!(outputs.shooter > 0.0);
        assert_eq!(outputs.intake, 0.0);

        flywheel.set_velocity(SHOOT_RPM);
        robot.tick(Duration::from_millis(20), &intent);
        let outputs = robot.tick(Duration::from_millis(40), &intent);
        assert_relative_eq!(outputs.intake, 12.0);
    }

    #[test]
    fn arm_override_ends_when_released() {
        let (mut robot, _) = robot();
        robot.begin_teleop();
        let nudge = OperatorIntent::builder().arm_voltage(4.0).build();
        let outputs = robot.tick(Duration::ZERO, &nudge);
        assert_relative_eq!(outputs.arm, 4.0);

        let outputs = (1..=50)
            .map(|tick| robot.tick(TICK_PERIOD * tick, &OperatorIntent::default()))
            .last()
            .unwrap();
        assert_eq!(outputs.arm, 0.0);
        assert_eq!(robot.arm.motor().volts(), 0.0);
    }

    #[test]
    fn released_override_leaves_a_preset_alone() {
        let (mut robot, _) = robot();
        robot.begin_teleop();
        robot.tick(Duration::ZERO, &OperatorIntent::builder().arm(ArmState::Amp).build());
        let outputs = robot.tick(TICK_PERIOD, &OperatorIntent::default());
        assert!(outputs.arm > 0.0);
        assert_eq!(robot.arm.state(), Some(ArmState::Amp));
    }

    #[test]
    fn autonomous_ignores_the_operator() {
        let (mut robot, _) = robot();
        robot.begin_autonomous(RoutineKind::NoAuto, Duration::ZERO, Pose::default());
        let intent = OperatorIntent::builder().forward(1.0).build();
        let outputs = robot.tick(Duration::ZERO, &intent);
        assert_eq!(outputs.drive, WheelSpeeds::default());
        assert_eq!(robot.ownership(), Ownership::all(Owner::Autonomous));
    }

    #[test]
    fn configure_retries_then_gives_up() {
        let arm = SimMotor::fixed("arm");
        let intake = SimMotor::fixed("intake");
        arm.reject_configs(2);
        intake.reject_configs(100);
        let mut robot = Robot::new(
            Chassis::new(SimMotor::fixed("left"), SimMotor::fixed("right"), SimGyro::new()),
            Arm::new(arm.clone()),
            Shooter::new(SimMotor::fixed("shooter")),
            Intake::new(intake.clone()),
        );
        assert_eq!(robot.configure(), 1);
        assert_eq!(arm.configure_calls(), 3);
        assert!(arm.applied_config().is_some());
        assert_eq!(intake.configure_calls(), CONFIG_ATTEMPTS);
        assert!(intake.applied_config().is_none());
    }
}

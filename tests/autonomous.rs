use core::time::Duration;

use notelib_rs::{
    autonomous::{RoutineKind, ShootStage},
    constants::{drivetrain, shooter::SHOOT_RPM, TICK_PERIOD},
    devices::{
        sim::{SimGyro, SimMotor},
        Actuator,
    },
    differential::{chassis::Chassis, pose::Pose},
    opcontrol::OperatorIntent,
    robot::{Ownership, Robot, RobotOutputs},
    subsystems::{Arm, Intake, Owner, Shooter},
};

struct Bench {
    robot: Robot<SimMotor, SimGyro>,
    plants: Vec<SimMotor>,
    flywheel: SimMotor,
    now: Duration,
}

impl Bench {
    fn new() -> Self {
        let per_100ms = Duration::from_millis(100);
        let drive_free_speed = drivetrain::MAX_LINEAR_VELOCITY / drivetrain::VELOCITY_FACTOR;
        let left = SimMotor::new("left", drive_free_speed, Duration::from_millis(80)).with_velocity_period(per_100ms);
        let right = SimMotor::new("right", drive_free_speed, Duration::from_millis(80)).with_velocity_period(per_100ms);
        let arm = SimMotor::new("arm", 6000.0, Duration::from_millis(50)).with_velocity_period(Duration::from_secs(60));
        let flywheel = SimMotor::new("shooter", 6000.0, Duration::from_millis(150));
        let intake = SimMotor::fixed("intake");

        let robot = Robot::new(
            Chassis::new(left.clone(), right.clone(), SimGyro::new()),
            Arm::new(arm.clone()),
            Shooter::new(flywheel.clone()),
            Intake::new(intake.clone()),
        );
        Self {
            robot,
            plants: vec![left, right, arm, flywheel.clone(), intake],
            flywheel,
            now: Duration::ZERO,
        }
    }

    fn tick(&mut self) -> RobotOutputs {
        let outputs = self.robot.tick(self.now, &OperatorIntent::default());
        for plant in &self.plants {
            plant.step(TICK_PERIOD);
        }
        self.now += TICK_PERIOD;
        outputs
    }

    fn run_until(&mut self, end: Duration) -> Vec<(Duration, f64, RobotOutputs)> {
        let mut trace = Vec::new();
        while self.now < end {
            let now = self.now;
            let rpm = self.flywheel.velocity();
            trace.push((now, rpm, self.tick()));
        }
        trace
    }
}

#[test]
fn shoot_note_feeds_only_at_speed() {
    let mut bench = Bench::new();
    bench
        .robot
        .begin_autonomous(RoutineKind::ShootNoteNoDrive, Duration::ZERO, Pose::default());
    let trace = bench.run_until(Duration::from_secs(6));

    let first_feed = trace
        .iter()
        .position(|(_, _, outputs)| outputs.intake > 0.0)
        .expect("the note was never fed");
    // The gate saw the previous tick's reading.
    let (_, rpm_before_feed, _) = trace[first_feed - 1];
    assert!((rpm_before_feed - SHOOT_RPM).abs() <= 300.0);
    assert!(trace[..first_feed].iter().all(|(_, _, outputs)| outputs.intake == 0.0));

    let (_, _, last) = trace.last().unwrap();
    assert_eq!(last.shooter, 0.0);
    assert_eq!(last.intake, 0.0);
    assert!(trace.iter().all(|(_, _, outputs)| outputs.drive.left == 0.0 && outputs.drive.right == 0.0));
}

#[test]
fn shoot_then_drive_follows_the_timeline() {
    let mut bench = Bench::new();
    bench
        .robot
        .begin_autonomous(RoutineKind::LeftShootThenDrive, Duration::ZERO, Pose::new(1, 2, 0));
    let trace = bench.run_until(Duration::from_secs(12));
    let at = |seconds: f64| {
        let t = Duration::from_secs_f64(seconds);
        trace
            .iter()
            .find(|(now, _, _)| *now >= t)
            .map(|(_, _, outputs)| *outputs)
            .unwrap()
    };

    assert_eq!(at(2.0).drive.left, 0.0);

    let backing = at(5.5).drive;
    assert!((backing.left - -6.0).abs() < 1e-9);
    assert!((backing.right - -6.0).abs() < 1e-9);
    assert_eq!(at(5.5).shooter, 0.0);

    // Turning left while backing up: the left side reverses harder.
    let turning = at(7.0).drive;
    assert!(turning.left < turning.right);

    let stopped = at(11.0);
    assert_eq!(stopped.drive.left, 0.0);
    assert_eq!(stopped.drive.right, 0.0);
    assert!(stopped.pose.x() < 1.0);
}

#[test]
fn pivot_abandons_a_shot_that_never_got_ready() {
    let mut bench = Bench::new();
    let dead = SimMotor::fixed("shooter");
    bench.robot.shooter = Shooter::new(dead);
    bench
        .robot
        .begin_autonomous(RoutineKind::TimedLeft, Duration::ZERO, Pose::default());
    let trace = bench.run_until(Duration::from_millis(3900));
    assert!(trace.iter().all(|(_, _, outputs)| outputs.intake == 0.0));
    assert_eq!(bench.robot.shot().map(|shot| shot.stage()), Some(ShootStage::WaitForReady));

    let trace = bench.run_until(Duration::from_secs(5));
    let (_, _, last) = trace.last().unwrap();
    assert_eq!(last.shooter, 0.0);
    assert!(bench.robot.shot().is_none());
}

#[test]
fn teleop_takes_over_from_autonomous() {
    let mut bench = Bench::new();
    let kind = RoutineKind::from_name_or_default("left shoot then drive");
    assert_eq!(kind, RoutineKind::LeftShootThenDrive);
    bench.robot.begin_autonomous(kind, Duration::ZERO, Pose::default());
    bench.run_until(Duration::from_secs(6));

    bench.robot.begin_teleop();
    assert_eq!(bench.robot.ownership(), Ownership::all(Owner::Manual));
    let outputs = bench.tick();
    assert_eq!(outputs.drive.left, 0.0);
    assert_eq!(outputs.shooter, 0.0);
    assert_eq!(outputs.intake, 0.0);

    bench.robot.disable_all();
    assert_eq!(bench.robot.ownership(), Ownership::all(Owner::Disabled));
    assert_eq!(bench.robot.routine(), None);
}

#[test]
fn unknown_routine_runs_the_default() {
    let kind = RoutineKind::from_name_or_default("two note center");
    assert_eq!(kind, RoutineKind::ShootNoteNoDrive);
}

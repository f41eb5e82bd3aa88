//! Tuned constants for the competition robot.
//!
//! Everything here is fixed at compile time. Runtime-adjustable settings are
//! built from these values in the subsystem constructors.

use core::time::Duration;

/// Nominal control tick.
pub const TICK_PERIOD: Duration = Duration::from_millis(20);

/// Battery voltage that normalized controller outputs are scaled against.
pub const PEAK_VOLTAGE: f64 = 12.0;

/// How many times a rejected configuration command is attempted.
pub const CONFIG_ATTEMPTS: usize = 5;

pub mod drivetrain {
    /// Lateral distance between the left and right wheel contact patches.
    pub const TRACK_WIDTH_METERS: f64 = 21.0 * 0.0254;

    pub const WHEEL_DIAMETER_METERS: f64 = 6.0 * 0.0254;

    /// Counts per revolution of the mag encoders on each gearbox output.
    pub const ENCODER_COUNTS_PER_REV: f64 = 4096.0;

    /// Encoder counts to meters travelled.
    pub const POSITION_FACTOR: f64 =
        WHEEL_DIAMETER_METERS * core::f64::consts::PI / ENCODER_COUNTS_PER_REV;

    /// Encoder counts per 100ms to meters per second.
    pub const VELOCITY_FACTOR: f64 = POSITION_FACTOR * 10.0;

    /// Top wheel speed, used to normalize the velocity loop's output.
    pub const MAX_LINEAR_VELOCITY: f64 = 3.0;

    pub const VELOCITY_KP: f64 = 0.1;
    pub const VELOCITY_KI: f64 = 0.0;
    pub const VELOCITY_KD: f64 = 0.0;

    /// Duty per meter per second of wheel speed setpoint.
    pub const VELOCITY_KV: f64 = 1.0 / MAX_LINEAR_VELOCITY;
    pub const VELOCITY_TOLERANCE: f64 = 0.05;

    /// Maximum integral contribution before clamping, in duty.
    pub const VELOCITY_INTEGRAL_LIMIT: f64 = 0.2;

    pub const CURRENT_LIMIT_AMPS: f64 = 40.0;

    /// Stick deflection ignored by the teleop drive curves.
    pub const STICK_DEAD_ZONE: f64 = 0.05;
    pub const STICK_CURVE_INTENSITY: f64 = 1.2;
}

pub mod arm {
    /// Motor rotations per arm rotation, gearbox times chain reduction.
    pub const GEAR_RATIO: f64 = 100.0 * (48.0 / 16.0);

    /// Motor rotations to arm degrees.
    pub const POSITION_FACTOR: f64 = 360.0 / GEAR_RATIO;

    /// Motor RPM to arm degrees per second.
    pub const VELOCITY_FACTOR: f64 = POSITION_FACTOR / 60.0;

    /// Arm angle, measured from the stowed position, at which the arm is level.
    pub const HORIZONTAL_OFFSET_DEGREES: f64 = 30.0;

    pub const KP: f64 = 0.02;
    pub const KI: f64 = 0.0;
    pub const KD: f64 = 0.001;

    /// Maximum integral contribution before clamping, in duty.
    pub const INTEGRAL_LIMIT: f64 = 0.2;

    pub const KS: f64 = 0.0;
    pub const KG: f64 = 0.03;
    pub const KV: f64 = 0.0;

    /// How close to the target angle counts as arrived, in degrees.
    pub const TOLERANCE_DEGREES: f64 = 2.0;

    pub const MAX_VOLTAGE: f64 = 6.0;

    pub const CURRENT_LIMIT_AMPS: f64 = 30.0;

    pub const INTAKE_DEGREES: f64 = 0.0;
    pub const SPEAKER_DEGREES: f64 = 22.0;
    pub const SPEAKER_AUTO_DEGREES: f64 = 27.5;
    pub const AMP_DEGREES: f64 = 96.0;
}

pub mod intake {
    pub const INTAKE_SPEED: f64 = 0.5;
    pub const FEED_SPEED: f64 = 1.0;
    pub const MAX_OUTTAKE_SPEED: f64 = -0.25;

    pub const CURRENT_LIMIT_AMPS: f64 = 30.0;
}

pub mod shooter {
    use core::time::Duration;

    pub const KP: f64 = 0.0004;
    pub const KI: f64 = 0.0;
    pub const KD: f64 = 0.0;

    /// Duty per RPM of setpoint.
    pub const KFF: f64 = 0.00017;

    pub const TOLERANCE_RPM: f64 = 300.0;

    pub const SHOOT_RPM: f64 = 5700.0;

    /// How long the intake pushes a note into the spinning flywheels.
    pub const FEED_DURATION: Duration = Duration::from_secs(1);

    /// Upper bound on a whole shot, spin-up included.
    pub const SHOOT_TIMEOUT: Duration = Duration::from_secs(5);

    pub const CURRENT_LIMIT_AMPS: f64 = 40.0;
}

pub mod autonomous {
    use core::time::Duration;

    /// Arcade throttle used for the backing-up legs of the shoot-then-drive routines.
    pub const BACKUP_SPEED: f64 = -0.5;
    pub const TURN_SPEED: f64 = 0.5;

    /// Tank output of the driven side during the timed routines' pivot.
    pub const PIVOT_SPEED: f64 = 0.5;

    /// Tank output of both sides on the timed routines' straight leg.
    pub const TIMED_DRIVE_SPEED: f64 = 0.5;

    /// Time spent pivoting in the timed routines.
    pub const PIVOT_DURATION: Duration = Duration::from_millis(1500);

    /// Time given to the shooter at the start of the timed routines.
    pub const TIMED_SHOOT_DURATION: Duration = Duration::from_secs(4);

    /// When the timed routines stop driving.
    pub const TIMED_STOP_OFFSET: Duration = Duration::from_secs(14);
}

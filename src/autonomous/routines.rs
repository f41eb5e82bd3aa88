use alloc::{string::String, vec, vec::Vec};
use core::{fmt, str::FromStr, time::Duration};

use log::warn;

use super::sequencer::{DriveCommand, Phase, PhaseAction, Routine, ShotCommand};
use crate::{
    constants::autonomous::*,
    subsystems::ArmState,
    utils::FieldSide,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoutineParseError {
    #[error("unknown autonomous routine \"{0}\"")]
    Unknown(String),
}

/// Every autonomous routine the robot can run.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RoutineKind {
    NoAuto,
    #[default]
    ShootNoteNoDrive,
    LeftShootThenDrive,
    RightShootThenDrive,
    TimedLeft,
    TimedRight,
}

impl RoutineKind {
    pub const ALL: [RoutineKind; 6] = [
        RoutineKind::NoAuto,
        RoutineKind::ShootNoteNoDrive,
        RoutineKind::LeftShootThenDrive,
        RoutineKind::RightShootThenDrive,
        RoutineKind::TimedLeft,
        RoutineKind::TimedRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RoutineKind::NoAuto => "No Auto",
            RoutineKind::ShootNoteNoDrive => "Shoot Note No Drive",
            RoutineKind::LeftShootThenDrive => "Left Shoot Then Drive",
            RoutineKind::RightShootThenDrive => "Right Shoot Then Drive",
            RoutineKind::TimedLeft => "Timed Left",
            RoutineKind::TimedRight => "Timed Right",
        }
    }

    /// Parses `name`, falling back to the default routine with a warning.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: RoutineParseError| {
            let fallback = RoutineKind::default();
            warn!("{err}, running \"{}\" instead", fallback.name());
            fallback
        })
    }

    pub fn build(self) -> Routine {
        match self {
            RoutineKind::NoAuto => Routine::new(vec![Phase::new("idle", Duration::ZERO, PhaseAction::default())]),
            RoutineKind::ShootNoteNoDrive => Routine::new(vec![
                Phase::new("score", Duration::ZERO, score()),
                Phase::new("done", Duration::from_secs(5), stop_shot(DriveCommand::Stop)),
            ]),
            RoutineKind::LeftShootThenDrive => shoot_then_drive(FieldSide::Left),
            RoutineKind::RightShootThenDrive => shoot_then_drive(FieldSide::Right),
            RoutineKind::TimedLeft => timed(FieldSide::Left),
            RoutineKind::TimedRight => timed(FieldSide::Right),
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoutineKind {
    type Err = RoutineParseError;

    /// Accepts the display name in any case, with or without spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: Vec<char> = normalize(s).collect();
        RoutineKind::ALL
            .into_iter()
            .find(|kind| normalize(kind.name()).eq(wanted.iter().copied()))
            .ok_or_else(|| RoutineParseError::Unknown(s.into()))
    }
}

fn normalize(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
}

fn score() -> PhaseAction {
    PhaseAction {
        drive: DriveCommand::Stop,
        arm: Some(ArmState::SpeakerAuto),
        shot: ShotCommand::Shoot,
    }
}

fn stop_shot(drive: DriveCommand) -> PhaseAction {
    PhaseAction {
        drive,
        arm: None,
        shot: ShotCommand::Stop,
    }
}

fn drive(drive: DriveCommand) -> PhaseAction {
    PhaseAction {
        drive,
        ..Default::default()
    }
}

fn shoot_then_drive(side: FieldSide) -> Routine {
    let back_up = DriveCommand::Arcade {
        throttle: BACKUP_SPEED,
        steer: 0.0,
    };
    // Positive arcade steer turns clockwise.
    let turn = DriveCommand::Arcade {
        throttle: BACKUP_SPEED,
        steer: -side.turn_sign() * TURN_SPEED,
    };
    Routine::new(vec![
        Phase::new("score", Duration::ZERO, score()),
        Phase::new("back up", Duration::from_secs(5), stop_shot(back_up)),
        Phase::new("turn", Duration::from_secs(6), drive(turn)),
        Phase::new("back up", Duration::from_secs(8), drive(back_up)),
        Phase::new("stop", Duration::from_secs(10), drive(DriveCommand::Stop)),
    ])
}

fn timed(side: FieldSide) -> Routine {
    let pivot = match side {
        FieldSide::Left => DriveCommand::Tank {
            left: PIVOT_SPEED,
            right: 0.0,
        },
        FieldSide::Right => DriveCommand::Tank {
            left: 0.0,
            right: PIVOT_SPEED,
        },
    };
    let straight = DriveCommand::Tank {
        left: TIMED_DRIVE_SPEED,
        right: TIMED_DRIVE_SPEED,
    };
    let shoot = PhaseAction {
        shot: ShotCommand::Shoot,
        ..Default::default()
    };
    Routine::new(vec![
        Phase::new("shoot", Duration::ZERO, shoot),
        Phase::new("pivot", TIMED_SHOOT_DURATION, stop_shot(pivot)),
        Phase::new("drive", TIMED_SHOOT_DURATION + PIVOT_DURATION, drive(straight)),
        Phase::new("stop", TIMED_STOP_OFFSET, drive(DriveCommand::Stop)),
    ])
}

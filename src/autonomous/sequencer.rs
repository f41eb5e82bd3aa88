use alloc::vec::Vec;
use core::time::Duration;

use log::info;

use crate::{
    differential::ChassisVelocity,
    subsystems::ArmState,
    utils::timer::Timer,
};

/// The one thing the drivetrain does during a phase.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum DriveCommand {
    #[default]
    Stop,
    Arcade {
        throttle: f64,
        steer: f64,
    },
    Tank {
        left: f64,
        right: f64,
    },
    Velocity(ChassisVelocity),
}

/// What the shooter and intake do during a phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ShotCommand {
    /// Leave them as the previous phase left them.
    #[default]
    Hold,

    /// Start a shot when the phase begins.
    Shoot,

    /// Abandon any shot and turn both off.
    Stop,
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PhaseAction {
    pub drive: DriveCommand,
    pub arm: Option<ArmState>,
    pub shot: ShotCommand,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Phase {
    pub label: &'static str,

    /// Time from the start of the routine at which this phase takes over.
    pub start_offset: Duration,
    pub action: PhaseAction,
}

impl Phase {
    pub fn new(label: &'static str, start_offset: Duration, action: PhaseAction) -> Self {
        Self {
            label,
            start_offset,
            action,
        }
    }
}

/// A fixed table of phases, ordered by start offset.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Routine {
    phases: Vec<Phase>,
}

impl Routine {
    pub fn new(mut phases: Vec<Phase>) -> Self {
        phases.sort_by_key(|phase| phase.start_offset);
        Self { phases }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Index of the last phase that has started by `elapsed`, or `None` before
    /// the first one. The final phase holds forever.
    pub fn phase_index(&self, elapsed: Duration) -> Option<usize> {
        self.phases
            .partition_point(|phase| phase.start_offset <= elapsed)
            .checked_sub(1)
    }

    pub fn phase(&self, elapsed: Duration) -> Option<&Phase> {
        self.phase_index(elapsed).map(|index| &self.phases[index])
    }
}

/// Runs one routine against the control-loop clock.
#[derive(Clone, Debug, Default)]
pub struct Sequencer {
    routine: Routine,
    timer: Option<Timer>,
    current: Option<usize>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, routine: Routine, now: Duration) {
        self.routine = routine;
        self.timer = Some(Timer::new(now, Duration::ZERO));
        self.current = None;
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        self.timer.map_or(Duration::ZERO, |timer| timer.elapsed_time(now))
    }

    /// The active phase at `now`. Selection only depends on the routine and
    /// `now`, so repeated calls agree.
    pub fn phase(&self, now: Duration) -> Option<&Phase> {
        self.timer?;
        self.routine.phase(self.elapsed(now))
    }

    /// Like [`Self::phase`], but also reports whether the phase just began.
    pub fn advance(&mut self, now: Duration) -> Option<(&Phase, bool)> {
        self.timer?;
        let index = self.routine.phase_index(self.elapsed(now))?;
        let entered = self.current != Some(index);
        if entered {
            self.current = Some(index);
            let phase = &self.routine.phases[index];
            info!("phase {} \"{}\" at {:?}", index, phase.label, phase.start_offset);
        }
        Some((&self.routine.phases[index], entered))
    }

    pub fn stop(&mut self) {
        self.timer = None;
        self.current = None;
    }
}

//! Spin up, feed, spin down.
//!
//! The sequence only ever moves forward. The intake never feeds before the
//! shooter reports ready, and a shot that cannot get ready is abandoned after
//! its timeout.

use core::time::Duration;

use bon::Builder;
use log::{info, warn};

use crate::{
    constants::shooter::{FEED_DURATION, SHOOT_RPM, SHOOT_TIMEOUT},
    devices::Actuator,
    subsystems::{Intake, Shooter, Subsystem},
    utils::timer::Timer,
};

#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct ShootTiming {
    #[builder(default = SHOOT_RPM)]
    pub rpm: f64,

    /// How long the intake feeds once the shooter is ready.
    #[builder(default = FEED_DURATION)]
    pub feed_duration: Duration,

    /// Upper bound on the whole shot, measured from the first step.
    #[builder(default = SHOOT_TIMEOUT)]
    pub timeout: Duration,
}

impl Default for ShootTiming {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum ShootStage {
    Prepare,
    WaitForReady,
    Feed,
    Disable,
    Done,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ShootSequence {
    timing: ShootTiming,
    stage: ShootStage,
    deadline: Option<Timer>,
    feed: Option<Timer>,
}

impl ShootSequence {
    pub fn new(timing: ShootTiming) -> Self {
        Self {
            timing,
            stage: ShootStage::Prepare,
            deadline: None,
            feed: None,
        }
    }

    pub fn stage(&self) -> ShootStage {
        self.stage
    }

    pub fn is_done(&self) -> bool {
        self.stage == ShootStage::Done
    }

    /// Advances the sequence. `aimed` additionally gates the feed, for shots
    /// that must wait on the arm.
    pub fn step<S: Actuator, I: Actuator>(
        &mut self,
        now: Duration,
        shooter: &mut Shooter<S>,
        intake: &mut Intake<I>,
        aimed: bool,
    ) -> ShootStage {
        let deadline = *self
            .deadline
            .get_or_insert(Timer::new(now, self.timing.timeout));
        if self.stage < ShootStage::Disable && deadline.is_done(now) {
            warn!("shot timed out during {:?}", self.stage);
            self.advance(ShootStage::Disable);
        }

        match self.stage {
            ShootStage::Prepare => {
                shooter.prepare(self.timing.rpm);
                self.advance(ShootStage::WaitForReady);
            }
            ShootStage::WaitForReady => {
                if aimed && shooter.is_ready() {
                    intake.feed();
                    self.feed = Some(Timer::new(now, self.timing.feed_duration));
                    self.advance(ShootStage::Feed);
                }
            }
            ShootStage::Feed => {
                if self.feed.map_or(true, |feed| feed.is_done(now)) {
                    self.advance(ShootStage::Disable);
                }
            }
            ShootStage::Disable | ShootStage::Done => {}
        }

        if self.stage == ShootStage::Disable {
            shooter.disable();
            intake.disable();
            self.advance(ShootStage::Done);
        }
        self.stage
    }

    fn advance(&mut self, stage: ShootStage) {
        info!("shoot: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

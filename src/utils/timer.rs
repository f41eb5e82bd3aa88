use core::time::Duration;

/// Tracks elapsed time against a fixed period.
///
/// The timer never reads a clock itself. Every query takes the current
/// control-loop time, so the same timestamps always give the same answers.
///
/// # Examples
/// ```
/// use core::time::Duration;
/// use notelib_rs::utils::timer::Timer;
///
/// let timer = Timer::new(Duration::from_secs(1), Duration::from_secs(3));
/// assert!(!timer.is_done(Duration::from_millis(3500)));
/// assert!(timer.is_done(Duration::from_secs(4)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    start: Duration,
    period: Duration,
}

impl Timer {
    /// Creates a timer that starts at `start` and expires `period` later.
    pub fn new(start: Duration, period: Duration) -> Self {
        Self { start, period }
    }

    /// Returns the timer's configured period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns the time the timer was started at.
    pub fn start(&self) -> Duration {
        self.start
    }

    /// Returns the elapsed time since the timer started.
    ///
    /// Timestamps from before the start count as zero.
    pub fn elapsed_time(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start)
    }

    /// Returns the remaining time until the timer expires.
    pub fn remaining_time(&self, now: Duration) -> Duration {
        self.period.saturating_sub(self.elapsed_time(now))
    }

    /// Checks if the timer has completed its period.
    pub fn is_done(&self, now: Duration) -> bool {
        self.remaining_time(now) == Duration::ZERO
    }

    /// Restarts the timer at `now`, keeping its period.
    pub fn reset(&mut self, now: Duration) {
        self.start = now;
    }

    /// Updates the timer's period and restarts it at `now`.
    pub fn set_period(&mut self, period: Duration, now: Duration) {
        self.period = period;
        self.reset(now);
    }
}

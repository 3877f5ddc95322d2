//! Per-session command timing.

use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::TimerState;
use crate::error::PromptRelayError;
use crate::Result;

/// Start and stop timestamps of the most recent command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerRecord {
    /// When the command started.
    pub start: Option<Instant>,
    /// When the command finished.
    pub stop: Option<Instant>,
}

impl TimerRecord {
    /// Elapsed time between start and stop.
    ///
    /// A stop earlier than start saturates to zero.
    pub fn elapsed(&self) -> Result<Duration> {
        let start = self.start.ok_or(PromptRelayError::TimerNotStarted)?;
        let stop = self.stop.ok_or(PromptRelayError::TimerNotStopped)?;
        Ok(stop.saturating_duration_since(start))
    }
}

/// Measures the wall-clock duration of the last command in one session.
#[derive(Debug, Clone, Default)]
pub struct CommandTimer {
    record: TimerRecord,
    state: TimerState,
}

impl CommandTimer {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing a command now.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start timing a command at the given instant, discarding any previous
    /// measurement.
    pub fn start_at(&mut self, at: Instant) {
        self.record = TimerRecord {
            start: Some(at),
            stop: None,
        };
        self.enter(TimerState::Timing);
        trace!("command timer started");
    }

    /// Stop timing the current command now.
    pub fn stop(&mut self) -> Result<()> {
        self.stop_at(Instant::now())
    }

    /// Stop timing the current command at the given instant.
    ///
    /// Fails with [`PromptRelayError::TimerNotStarted`] when no command is
    /// being timed; the record is left untouched in that case.
    pub fn stop_at(&mut self, at: Instant) -> Result<()> {
        if self.state != TimerState::Timing || self.record.start.is_none() {
            return Err(PromptRelayError::TimerNotStarted);
        }
        self.state.transition_to(TimerState::Stopped)?;
        self.record.stop = Some(at);
        trace!("command timer stopped");
        Ok(())
    }

    /// Duration of the last command in milliseconds, rounded to nearest.
    pub fn elapsed_millis(&self) -> Result<u64> {
        self.record.elapsed().map(round_millis)
    }

    /// Take the measurement for a prompt render and reset to idle.
    ///
    /// Returns 0 when there is no complete start/stop pair, such as the
    /// first prompt of a session or a command that never reported back.
    pub fn finish(&mut self) -> u64 {
        let millis = if self.state.has_measurement() {
            self.elapsed_millis().unwrap_or(0)
        } else {
            0
        };
        self.record = TimerRecord::default();
        self.enter(TimerState::Idle);
        millis
    }

    /// Move to a state the cycle always allows, logging if the table disagrees.
    fn enter(&mut self, target: TimerState) {
        if let Err(e) = self.state.transition_to(target) {
            warn!("forcing command timer state: {}", e);
            self.state = target;
        }
    }

    /// Current state in the command cycle.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// The raw timestamps.
    pub fn record(&self) -> &TimerRecord {
        &self.record
    }
}

/// Round a duration to whole milliseconds, halves rounding up.
pub fn round_millis(duration: Duration) -> u64 {
    let millis = (duration.as_nanos() + 500_000) / 1_000_000;
    u64::try_from(millis).unwrap_or(u64::MAX)
}

//! Command timer state machine.

/// Where a session is in its command cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// No command timed since the last prompt.
    #[default]
    Idle,
    /// A command is running.
    Timing,
    /// A command finished and its duration is waiting to be rendered.
    Stopped,
}

impl TimerState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Timing
    /// - Timing -> Stopped
    /// - Timing -> Timing (command restarted before it was stopped)
    /// - Stopped -> Timing
    /// - Stopped -> Idle
    /// - Timing -> Idle (prompt drawn for an aborted command)
    /// - Idle -> Idle (prompt redrawn without a command)
    pub fn can_transition_to(&self, target: TimerState) -> bool {
        use TimerState::*;
        matches!(
            (*self, target),
            (Idle, Timing)
                | (Timing, Stopped)
                | (Timing, Timing)
                | (Stopped, Timing)
                | (Stopped, Idle)
                | (Timing, Idle)
                | (Idle, Idle)
        )
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: TimerState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::PromptRelayError::InvalidTimerTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if a complete start/stop pair is available.
    pub fn has_measurement(&self) -> bool {
        matches!(self, TimerState::Stopped)
    }
}

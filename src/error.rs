//! Error types for prompt-relay.

use std::time::Duration;

use thiserror::Error;

/// Main error type for prompt-relay operations.
#[derive(Error, Debug)]
pub enum PromptRelayError {
    /// The renderer executable could not be located or started.
    #[error("prompt renderer not found: {program}")]
    RendererNotFound { program: String },

    /// The renderer exited unsuccessfully.
    #[error("prompt renderer {program} exited with {}", describe_code(.code))]
    RendererExited { program: String, code: Option<i32> },

    /// The renderer succeeded but printed nothing.
    #[error("prompt renderer {program} produced no output")]
    EmptyOutput { program: String },

    /// The renderer did not finish within the configured bound.
    #[error("prompt renderer {program} timed out after {}ms", .timeout.as_millis())]
    TimedOut { program: String, timeout: Duration },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command timer was stopped or read without being started.
    #[error("command timer was not started")]
    TimerNotStarted,

    /// The command timer was read while a command is still running.
    #[error("command timer is still running")]
    TimerNotStopped,

    /// Invalid timer state transition attempted.
    #[error("invalid timer transition from {from:?} to {to:?}")]
    InvalidTimerTransition {
        from: crate::session::TimerState,
        to: crate::session::TimerState,
    },

    /// The relay is already installed in this session.
    #[error("prompt relay already active in this session")]
    AlreadyActive,
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl PromptRelayError {
    /// Whether this error means the renderer program is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RendererNotFound { .. })
    }

    /// Whether this error came from running the renderer.
    pub fn is_renderer_failure(&self) -> bool {
        matches!(
            self,
            Self::RendererNotFound { .. }
                | Self::RendererExited { .. }
                | Self::EmptyOutput { .. }
                | Self::TimedOut { .. }
                | Self::Io(_)
        )
    }
}

/// Convenience Result type for prompt-relay operations.
pub type Result<T> = std::result::Result<T, PromptRelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = PromptRelayError::RendererNotFound {
            program: "starship".into(),
        };
        assert!(err.to_string().contains("starship"));
        assert!(err.to_string().contains("not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_exited_display() {
        let err = PromptRelayError::RendererExited {
            program: "starship".into(),
            code: Some(2),
        };
        assert!(err.to_string().contains("status 2"));
        assert!(!err.is_not_found());
        assert!(err.is_renderer_failure());

        let err = PromptRelayError::RendererExited {
            program: "starship".into(),
            code: None,
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_timeout_display() {
        let err = PromptRelayError::TimedOut {
            program: "starship".into(),
            timeout: Duration::from_millis(500),
        };
        assert!(err.to_string().contains("500ms"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: PromptRelayError = io_err.into();
        assert!(matches!(err, PromptRelayError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_timer_errors_are_not_renderer_failures() {
        assert!(!PromptRelayError::TimerNotStarted.is_renderer_failure());
        assert!(!PromptRelayError::TimerNotStopped.is_renderer_failure());
        assert!(!PromptRelayError::AlreadyActive.is_renderer_failure());
    }
}

//! Renderer process invocation.

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::context::InvocationContext;
use super::result::RendererOutput;
use super::DEFAULT_COMMAND;
use crate::error::PromptRelayError;
use crate::session::SessionKey;
use crate::Result;

/// Poll interval while waiting on a bounded renderer call.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Settings for the external prompt renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    program: String,
    term: String,
    config_path: PathBuf,
    timeout: Option<Duration>,
}

impl Renderer {
    /// Create renderer settings for the given program.
    ///
    /// Terminal type defaults to the inherited `$TERM` and the config path
    /// to `~/.config/starship.toml`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            term: default_term(),
            config_path: default_config_path(),
            timeout: None,
        }
    }

    /// Override the terminal type.
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Override the renderer configuration file.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Bound how long a render may take.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The terminal type passed as `TERM`.
    pub fn term_name(&self) -> &str {
        &self.term
    }

    /// The renderer configuration file.
    pub fn renderer_config(&self) -> &Path {
        &self.config_path
    }

    /// The render bound, if any.
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build the invocation context for one prompt draw.
    pub fn context(
        &self,
        session_key: &SessionKey,
        status: i32,
        width: u16,
        duration_ms: u64,
    ) -> InvocationContext {
        InvocationContext {
            program: self.program.clone(),
            term: self.term.clone(),
            config_path: self.config_path.clone(),
            session_key: session_key.clone(),
            status,
            width,
            duration_ms,
        }
    }

    /// Locate the renderer executable on the search path.
    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|_| PromptRelayError::RendererNotFound {
            program: self.program.clone(),
        })
    }

    /// Run the renderer and capture its output (blocking).
    ///
    /// Only a missing executable maps to
    /// [`PromptRelayError::RendererNotFound`]; exit status and empty output
    /// are left for the caller to judge.
    pub fn invoke(&self, ctx: &InvocationContext) -> Result<RendererOutput> {
        let start = Instant::now();
        let path = self.resolve()?;
        debug!(
            program = %path.display(),
            status = ctx.status,
            width = ctx.width,
            duration_ms = ctx.duration_ms,
            "invoking prompt renderer"
        );

        let mut cmd = std::process::Command::new(&path);
        cmd.args(ctx.args())
            .envs(ctx.envs())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        let output = match self.timeout {
            None => {
                let output = child.wait_with_output()?;
                RendererOutput::new(output.stdout, output.status.code(), start.elapsed())
            }
            Some(timeout) => self.wait_bounded(child, start, timeout)?,
        };

        trace!(
            bytes = output.raw.len(),
            exit_code = ?output.exit_code,
            elapsed_ms = output.duration.as_millis() as u64,
            "prompt renderer finished"
        );
        Ok(output)
    }

    /// Run the renderer on the tokio runtime.
    ///
    /// The child is killed if the call times out or the future is dropped.
    pub async fn invoke_async(&self, ctx: &InvocationContext) -> Result<RendererOutput> {
        let start = Instant::now();
        let path = self.resolve()?;
        debug!(program = %path.display(), "invoking prompt renderer (async)");

        let mut cmd = tokio::process::Command::new(&path);
        cmd.args(ctx.args())
            .envs(ctx.envs())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        let output = match self.timeout {
            None => child.wait_with_output().await?,
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| self.timed_out(timeout))??,
        };

        Ok(RendererOutput::new(
            output.stdout,
            output.status.code(),
            start.elapsed(),
        ))
    }

    /// Wait for the child, killing it once the bound is exceeded.
    fn wait_bounded(
        &self,
        mut child: Child,
        start: Instant,
        timeout: Duration,
    ) -> Result<RendererOutput> {
        // Drain stdout on a separate thread so a chatty renderer cannot
        // block on a full pipe while we poll.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("renderer stdout not captured"))?;
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() > timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timed_out(timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        // Background processes left by the renderer can hold the pipe open
        // after it exits, so the read shares the same deadline.
        let raw = match rx.recv_timeout(timeout.saturating_sub(start.elapsed())) {
            Ok(read) => read?,
            Err(RecvTimeoutError::Timeout) => {
                debug!(program = %self.program, "renderer output still open after exit");
                return Err(self.timed_out(timeout));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(std::io::Error::other("renderer output reader stopped").into());
            }
        };

        Ok(RendererOutput::new(raw, status.code(), start.elapsed()))
    }

    fn spawn_error(&self, err: std::io::Error) -> PromptRelayError {
        if err.kind() == ErrorKind::NotFound {
            PromptRelayError::RendererNotFound {
                program: self.program.clone(),
            }
        } else {
            PromptRelayError::Io(err)
        }
    }

    fn timed_out(&self, timeout: Duration) -> PromptRelayError {
        PromptRelayError::TimedOut {
            program: self.program.clone(),
            timeout,
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

/// Terminal type inherited from the environment.
pub fn default_term() -> String {
    std::env::var("TERM")
        .ok()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "dumb".to_string())
}

/// Default per-user renderer configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("starship.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renderer() {
        let renderer = Renderer::default();
        assert_eq!(renderer.program(), "starship");
        assert!(renderer.renderer_config().ends_with(".config/starship.toml"));
        assert!(renderer.timeout_duration().is_none());
        assert!(!renderer.term_name().is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let renderer = Renderer::new("/opt/bin/starship")
            .term("xterm-kitty")
            .config_path("/etc/starship.toml")
            .timeout(Duration::from_millis(750));

        assert_eq!(renderer.program(), "/opt/bin/starship");
        assert_eq!(renderer.term_name(), "xterm-kitty");
        assert_eq!(renderer.renderer_config(), Path::new("/etc/starship.toml"));
        assert_eq!(renderer.timeout_duration(), Some(Duration::from_millis(750)));
    }

    #[test]
    fn test_context_carries_settings() {
        let renderer = Renderer::new("starship")
            .term("xterm")
            .config_path("/tmp/s.toml");
        let key = SessionKey::derive("tty3");
        let ctx = renderer.context(&key, 1, 120, 250);

        assert_eq!(ctx.program, "starship");
        assert_eq!(ctx.term, "xterm");
        assert_eq!(ctx.config_path, PathBuf::from("/tmp/s.toml"));
        assert_eq!(ctx.session_key, key);
        assert_eq!(ctx.status, 1);
        assert_eq!(ctx.width, 120);
        assert_eq!(ctx.duration_ms, 250);
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let renderer = Renderer::new("prompt-relay-test-no-such-renderer");
        let ctx = renderer.context(&SessionKey::derive("x"), 0, 80, 0);

        let err = renderer.invoke(&ctx).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("prompt-relay-test-no-such-renderer"));
    }

    #[test]
    fn test_spawn_error_classification() {
        let renderer = Renderer::new("starship");
        let not_found = renderer.spawn_error(std::io::Error::from(ErrorKind::NotFound));
        assert!(not_found.is_not_found());

        let denied = renderer.spawn_error(std::io::Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(denied, PromptRelayError::Io(_)));
    }
}

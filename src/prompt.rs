//! Prompt rendering with fallback, and installation into a host shell.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::PromptRelayError;
use crate::host::{HostContext, Shell};
use crate::output::StyledText;
use crate::render::{InvocationContext, Renderer};
use crate::session::{Session, SessionHandle};
use crate::Result;

/// Produces prompt text by running the external renderer.
#[derive(Debug, Clone, Default)]
pub struct PromptRenderer {
    renderer: Renderer,
}

impl PromptRenderer {
    /// Create a prompt renderer with the given renderer settings.
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    /// The renderer settings.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Build the invocation context for the next draw.
    ///
    /// Consumes the session's timer measurement.
    pub fn invocation(&self, session: &mut Session, status: i32, width: u16) -> InvocationContext {
        let duration_ms = session.timer_mut().finish();
        self.renderer
            .context(session.key(), status, width, duration_ms)
    }

    /// Render the prompt, reporting any renderer failure to the caller.
    ///
    /// A nonzero exit or empty output counts as a failure, so the caller
    /// never receives a broken prompt.
    pub fn try_render(&self, session: &mut Session, status: i32, width: u16) -> Result<StyledText> {
        let ctx = self.invocation(session, status, width);
        self.render(&ctx)
    }

    /// Run the renderer for a prepared context and decode its output.
    ///
    /// Fails with [`PromptRelayError::RendererExited`] on a nonzero exit and
    /// [`PromptRelayError::EmptyOutput`] when nothing was printed.
    pub fn render(&self, ctx: &InvocationContext) -> Result<StyledText> {
        let output = self.renderer.invoke(ctx)?;

        if !output.success() {
            return Err(PromptRelayError::RendererExited {
                program: ctx.program.clone(),
                code: output.exit_code,
            });
        }
        if output.is_empty() {
            return Err(PromptRelayError::EmptyOutput {
                program: ctx.program.clone(),
            });
        }

        let styled = output.decode();
        debug!(
            chars = styled.char_count(),
            spans = styled.spans().len(),
            "prompt rendered"
        );
        Ok(styled)
    }

    /// Render the prompt for the host, falling back on failure.
    ///
    /// On failure exactly one warning naming the renderer goes to the host
    /// and the session's fallback provider produces the prompt.
    pub fn render_prompt(&self, session: &mut Session, host: &dyn HostContext) -> String {
        match self.try_render(session, host.last_status(), host.terminal_width()) {
            Ok(styled) => styled.to_ansi(),
            Err(err) => {
                host.warn(&self.warning(&err));
                session.fallback_prompt()
            }
        }
    }

    fn warning(&self, err: &PromptRelayError) -> String {
        let program = self.renderer.program();
        if err.is_not_found() {
            format!(
                "prompt renderer '{}' not found; using the previous prompt",
                program
            )
        } else {
            format!(
                "prompt renderer '{}' failed ({}); using the previous prompt",
                program, err
            )
        }
    }
}

/// Install the relay as the host's prompt.
///
/// Captures the host's current prompt as the session fallback, installs the
/// relay prompt, turns off the host's prompt styling, and times each command
/// through pre/post hooks. Activating an already-active session fails with
/// [`PromptRelayError::AlreadyActive`] and leaves the host untouched.
pub fn activate<S>(shell: &mut S, session: &SessionHandle, renderer: PromptRenderer) -> Result<()>
where
    S: Shell + ?Sized,
{
    if session.borrow().is_active() {
        return Err(PromptRelayError::AlreadyActive);
    }

    let host = shell.context();
    let prompt_session = Rc::clone(session);
    let previous = shell.replace_prompt(Box::new(move || {
        renderer.render_prompt(&mut prompt_session.borrow_mut(), host.as_ref())
    }));
    session.borrow_mut().activate(previous)?;

    shell.set_prompt_highlighting(false);

    let start_session = Rc::clone(session);
    shell.add_pre_command_hook(Box::new(move || {
        start_session.borrow_mut().timer_mut().start();
    }));

    let stop_session = Rc::clone(session);
    shell.add_post_command_hook(Box::new(move || {
        if let Err(e) = stop_session.borrow_mut().timer_mut().stop() {
            warn!("command finished without a running timer: {}", e);
        }
    }));

    debug!(session = %session.borrow().name(), "prompt relay activated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LineShell;
    use crate::session::TimerState;

    fn missing() -> PromptRenderer {
        PromptRenderer::new(Renderer::new("prompt-relay-test-missing-renderer"))
    }

    #[test]
    fn test_invocation_uses_timer() {
        let t0 = std::time::Instant::now();
        let mut session = Session::new("tty1");
        session.timer_mut().start_at(t0);
        session
            .timer_mut()
            .stop_at(t0 + std::time::Duration::from_millis(250))
            .unwrap();

        let ctx = missing().invocation(&mut session, 1, 120);
        assert_eq!(ctx.duration_ms, 250);
        assert_eq!(ctx.status, 1);
        assert_eq!(ctx.width, 120);
        assert_eq!(session.timer().state(), TimerState::Idle);
    }

    #[test]
    fn test_first_prompt_has_zero_duration() {
        let mut session = Session::new("tty1");
        let ctx = missing().invocation(&mut session, 0, 80);
        assert_eq!(ctx.duration_ms, 0);
    }

    #[test]
    fn test_missing_renderer_falls_back() {
        let shell = LineShell::new().with_width(80);
        let mut session = Session::new("tty1");
        session
            .activate(Some(Box::new(|| "fallback> ".to_string())))
            .unwrap();

        let prompt = missing().render_prompt(&mut session, shell.context().as_ref());

        assert_eq!(prompt, "fallback> ");
        let warnings = shell.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("prompt-relay-test-missing-renderer"));
    }

    #[test]
    fn test_activate_installs_relay() {
        let mut shell = LineShell::with_prompt(Box::new(|| "old> ".to_string())).with_width(80);
        let session = Session::shared("tty1");

        activate(&mut shell, &session, missing()).unwrap();

        assert!(session.borrow().is_active());
        assert!(session.borrow().has_fallback());
        assert!(!shell.prompt_highlighting());
        // Renderer is missing, so the captured prompt shows through
        assert_eq!(shell.prompt(), "old> ");
    }

    #[test]
    fn test_double_activation_rejected() {
        let mut shell = LineShell::with_prompt(Box::new(|| "old> ".to_string())).with_width(80);
        let session = Session::shared("tty1");

        activate(&mut shell, &session, missing()).unwrap();
        let err = activate(&mut shell, &session, missing()).unwrap_err();
        assert!(matches!(err, PromptRelayError::AlreadyActive));

        // Fallback still points at the original prompt, not the relay
        assert_eq!(shell.prompt(), "old> ");
        assert_eq!(shell.warnings().len(), 1);
    }

    #[test]
    fn test_hooks_drive_timer() {
        let mut shell = LineShell::new().with_width(80);
        let session = Session::shared("tty1");
        activate(&mut shell, &session, missing()).unwrap();

        shell.run_with(|| {
            assert_eq!(session.borrow().timer().state(), TimerState::Timing);
            0
        });
        assert_eq!(session.borrow().timer().state(), TimerState::Stopped);

        shell.prompt();
        assert_eq!(session.borrow().timer().state(), TimerState::Idle);
    }
}

//! Session management module.
//!
//! A [`Session`] is one interactive shell instance: its identity as seen by
//! the renderer, its command timer, and the prompt provider that was active
//! before the relay was installed.

mod id;
mod state;
mod timer;

pub use id::SessionKey;
pub use state::TimerState;
pub use timer::{round_millis, CommandTimer, TimerRecord};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::host::PromptFn;

/// Prompt used when the relay fails and the host had no prompt before it.
pub const DEFAULT_PROMPT: &str = "$ ";

/// A session shared between the host's hooks and the installed prompt.
pub type SessionHandle = Rc<RefCell<Session>>;

/// Per-session relay state.
pub struct Session {
    name: String,
    key: SessionKey,
    timer: CommandTimer,
    fallback: Option<PromptFn>,
    active: bool,
}

impl Session {
    /// Create a session for the given unique name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = SessionKey::derive(&name);
        Self {
            name,
            key,
            timer: CommandTimer::new(),
            fallback: None,
            active: false,
        }
    }

    /// Create a session wrapped for sharing with host callbacks.
    pub fn shared(name: impl Into<String>) -> SessionHandle {
        Rc::new(RefCell::new(Self::new(name)))
    }

    /// The session's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hashed identity passed to the renderer.
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// The command timer.
    pub fn timer(&self) -> &CommandTimer {
        &self.timer
    }

    /// Mutable access to the command timer.
    pub fn timer_mut(&mut self) -> &mut CommandTimer {
        &mut self.timer
    }

    /// Whether the relay has been installed for this session.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a fallback provider was captured at activation.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Mark the relay installed, capturing the host's previous prompt.
    ///
    /// The fallback is captured once; a second call fails with
    /// [`PromptRelayError::AlreadyActive`](crate::PromptRelayError::AlreadyActive)
    /// and keeps the original fallback.
    pub fn activate(&mut self, previous: Option<PromptFn>) -> crate::Result<()> {
        if self.active {
            return Err(crate::PromptRelayError::AlreadyActive);
        }
        self.fallback = previous;
        self.active = true;
        Ok(())
    }

    /// Produce the fallback prompt text.
    pub fn fallback_prompt(&mut self) -> String {
        match self.fallback.as_mut() {
            Some(provider) => provider(),
            None => DEFAULT_PROMPT.to_string(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("timer", &self.timer)
            .field("has_fallback", &self.fallback.is_some())
            .field("active", &self.active)
            .finish()
    }
}

//! Invocation context for one renderer call.

use std::ffi::OsString;
use std::path::PathBuf;

use super::{CONFIG_VAR, SESSION_KEY_VAR, SHELL_TAG, SHELL_TAG_VAR, TERM_VAR};
use crate::session::SessionKey;

/// Everything the renderer is told about one prompt draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Renderer executable name or path.
    pub program: String,
    /// Terminal type exported as `TERM`.
    pub term: String,
    /// Renderer configuration file.
    pub config_path: PathBuf,
    /// Hashed session identity.
    pub session_key: SessionKey,
    /// Exit status of the last command.
    pub status: i32,
    /// Terminal width in columns.
    pub width: u16,
    /// Duration of the last command in milliseconds.
    pub duration_ms: u64,
}

impl InvocationContext {
    /// Shell tag identifying the caller to the renderer.
    pub fn shell_tag(&self) -> &'static str {
        SHELL_TAG
    }

    /// Command-line arguments, excluding the program itself.
    pub fn args(&self) -> Vec<String> {
        vec![
            "prompt".to_string(),
            format!("--status={}", self.status),
            format!("--terminal-width={}", self.width),
            format!("--cmd-duration={}", self.duration_ms),
        ]
    }

    /// Environment variables added on top of the inherited environment.
    pub fn envs(&self) -> Vec<(&'static str, OsString)> {
        vec![
            (TERM_VAR, OsString::from(&self.term)),
            (CONFIG_VAR, self.config_path.clone().into_os_string()),
            (SESSION_KEY_VAR, OsString::from(self.session_key.as_str())),
            (SHELL_TAG_VAR, OsString::from(SHELL_TAG)),
        ]
    }
}

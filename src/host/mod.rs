//! Host shell surface.
//!
//! The relay does not own the interactive loop. A host shell hands it a
//! prompt slot, command hooks and a warning channel through the [`Shell`]
//! and [`HostContext`] traits. [`LineShell`] is a small line-oriented host
//! that implements both.

mod line;
mod terminal;

pub use line::LineShell;
pub use terminal::terminal_width;

use std::rc::Rc;

/// A zero-argument prompt provider.
pub type PromptFn = Box<dyn FnMut() -> String>;

/// A callback run around each command.
pub type CommandHook = Box<dyn FnMut()>;

/// Render-time information the host exposes to prompt providers.
pub trait HostContext {
    /// Exit status of the last command (0 = success).
    fn last_status(&self) -> i32;

    /// Current terminal width in columns.
    fn terminal_width(&self) -> u16;

    /// Surface a one-line warning to the user.
    fn warn(&self, message: &str);
}

/// What a host must offer for the relay to be installed.
pub trait Shell {
    /// Shared handle to the host's render-time information.
    fn context(&self) -> Rc<dyn HostContext>;

    /// Install a prompt provider, returning the one it replaces.
    fn replace_prompt(&mut self, provider: PromptFn) -> Option<PromptFn>;

    /// Enable or disable the host's own prompt styling.
    fn set_prompt_highlighting(&mut self, enabled: bool);

    /// Register a hook run just before each command.
    fn add_pre_command_hook(&mut self, hook: CommandHook);

    /// Register a hook run just after each command.
    fn add_post_command_hook(&mut self, hook: CommandHook);
}

//! Minimal line-oriented host shell.

use std::cell::{Cell, RefCell};
use std::io::{BufRead, Write};
use std::process::Stdio;
use std::rc::Rc;

use tracing::{debug, warn};

use super::{terminal_width, CommandHook, HostContext, PromptFn, Shell};
use crate::session::DEFAULT_PROMPT;

/// Status reported when a command could not be run at all.
const SPAWN_FAILURE_STATUS: i32 = 127;

/// Render-time state shared with installed prompt providers.
#[derive(Debug, Default)]
struct LineState {
    last_status: Cell<i32>,
    width: Cell<Option<u16>>,
    warnings: RefCell<Vec<String>>,
}

impl HostContext for LineState {
    fn last_status(&self) -> i32 {
        self.last_status.get()
    }

    fn terminal_width(&self) -> u16 {
        self.width.get().unwrap_or_else(terminal_width)
    }

    fn warn(&self, message: &str) {
        warn!(target: "prompt_relay::host", "{}", message);
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// A line-oriented shell that runs each line through the system shell.
///
/// It keeps a prompt slot, pre/post command hooks and the last exit status,
/// which is all the relay needs from a host.
pub struct LineShell {
    state: Rc<LineState>,
    prompt: Option<PromptFn>,
    highlight_prompt: bool,
    pre_command: Vec<CommandHook>,
    post_command: Vec<CommandHook>,
}

impl LineShell {
    /// Create a shell with no prompt provider installed.
    pub fn new() -> Self {
        Self {
            state: Rc::new(LineState::default()),
            prompt: None,
            highlight_prompt: true,
            pre_command: Vec::new(),
            post_command: Vec::new(),
        }
    }

    /// Create a shell with an initial prompt provider.
    pub fn with_prompt(provider: PromptFn) -> Self {
        let mut shell = Self::new();
        shell.prompt = Some(provider);
        shell
    }

    /// Pin the reported terminal width instead of querying the terminal.
    pub fn with_width(self, cols: u16) -> Self {
        self.state.width.set(Some(cols));
        self
    }

    /// Produce the prompt text from the installed provider.
    pub fn prompt(&mut self) -> String {
        match self.prompt.as_mut() {
            Some(provider) => provider(),
            None => DEFAULT_PROMPT.to_string(),
        }
    }

    /// Run a command body between the pre/post hooks.
    ///
    /// The closure returns the command's exit status.
    pub fn run_with<F>(&mut self, command: F) -> i32
    where
        F: FnOnce() -> i32,
    {
        for hook in &mut self.pre_command {
            hook();
        }
        let status = command();
        self.state.last_status.set(status);
        for hook in &mut self.post_command {
            hook();
        }
        status
    }

    /// Run one line of input through the system shell.
    pub fn run_line(&mut self, line: &str) -> i32 {
        let line = line.to_string();
        self.run_with(move || {
            match system_shell(&line).status() {
                Ok(status) => status.code().unwrap_or(SPAWN_FAILURE_STATUS),
                Err(e) => {
                    debug!("failed to run {:?}: {}", line, e);
                    SPAWN_FAILURE_STATUS
                }
            }
        })
    }

    /// Read-eval-print loop until end of input or `exit`.
    pub fn repl<R, W>(&mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            let prompt = self.prompt();
            output.write_all(prompt.as_bytes())?;
            output.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let trimmed = line.trim();
            match trimmed {
                "" => continue,
                "exit" => break,
                _ => {
                    self.run_line(trimmed);
                }
            }
        }
        Ok(())
    }

    /// Exit status of the last command.
    pub fn last_status(&self) -> i32 {
        self.state.last_status.get()
    }

    /// Whether the host's own prompt styling is on.
    pub fn prompt_highlighting(&self) -> bool {
        self.highlight_prompt
    }

    /// Warnings surfaced so far.
    pub fn warnings(&self) -> Vec<String> {
        self.state.warnings.borrow().clone()
    }
}

impl Default for LineShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell for LineShell {
    fn context(&self) -> Rc<dyn HostContext> {
        self.state.clone()
    }

    fn replace_prompt(&mut self, provider: PromptFn) -> Option<PromptFn> {
        self.prompt.replace(provider)
    }

    fn set_prompt_highlighting(&mut self, enabled: bool) {
        self.highlight_prompt = enabled;
    }

    fn add_pre_command_hook(&mut self, hook: CommandHook) {
        self.pre_command.push(hook);
    }

    fn add_post_command_hook(&mut self, hook: CommandHook) {
        self.post_command.push(hook);
    }
}

#[cfg(unix)]
fn system_shell(line: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("/bin/sh");
    cmd.arg("-c").arg(line).stdin(Stdio::inherit());
    cmd
}

#[cfg(windows)]
fn system_shell(line: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("cmd.exe");
    cmd.arg("/C").arg(line).stdin(Stdio::inherit());
    cmd
}

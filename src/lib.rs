//! # prompt-relay
//!
//! Shell prompt bridge that delegates rendering to an external prompt
//! program such as `starship`.
//!
//! The relay times each command, runs the renderer with the last exit
//! status, command duration and terminal width, decodes the escape codes it
//! prints into styled text, and falls back to the host's previous prompt
//! whenever the renderer is missing or fails.
//!
//! ## Features
//!
//! - **Command timing**: per-session start/stop timer driven by host hooks
//! - **Renderer invocation**: blocking or async, with an optional bound
//! - **ANSI decoding**: escape codes become styled spans in the host
//! - **Fallback**: the previous prompt keeps working without the renderer
//!
//! ## Quick Start
//!
//! ```no_run
//! use prompt_relay::{activate, LineShell, PromptRenderer, Renderer, Session};
//!
//! fn main() -> prompt_relay::Result<()> {
//!     // Initialize logging
//!     prompt_relay::logging::try_init().ok();
//!
//!     // A host shell with its own prompt
//!     let mut shell = LineShell::with_prompt(Box::new(|| "$ ".to_string()));
//!
//!     // Install the relay for this session
//!     let session = Session::shared("tty1");
//!     activate(&mut shell, &session, PromptRenderer::new(Renderer::default()))?;
//!
//!     shell.run_line("sleep 1");
//!     print!("{}", shell.prompt());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use error::{PromptRelayError, Result};
pub use host::{HostContext, LineShell, PromptFn, Shell};
pub use output::{AnsiDecoder, StyledText};
pub use prompt::{activate, PromptRenderer};
pub use render::{InvocationContext, Renderer, RendererOutput};
pub use session::{CommandTimer, Session, SessionHandle, SessionKey, TimerState};

//! External prompt renderer invocation.
//!
//! This module runs the prompt program:
//! - Invocation context (arguments and environment)
//! - Blocking invocation with an optional bound
//! - Async invocation on tokio
//!
//! # Example
//!
//! ```no_run
//! use prompt_relay::render::Renderer;
//! use prompt_relay::session::SessionKey;
//!
//! let renderer = Renderer::new("starship");
//! let ctx = renderer.context(&SessionKey::derive("tty1"), 0, 80, 120);
//! let output = renderer.invoke(&ctx).unwrap();
//! println!("{}", output.decode().to_ansi());
//! ```

mod context;
mod renderer;
mod result;

pub use context::InvocationContext;
pub use renderer::{default_config_path, default_term, Renderer};
pub use result::RendererOutput;

/// Renderer looked up on `PATH` when none is configured.
pub const DEFAULT_COMMAND: &str = "starship";

/// Fixed tag telling the renderer which shell is calling.
pub const SHELL_TAG: &str = "prompt-relay";

/// Environment variable carrying the terminal type.
pub const TERM_VAR: &str = "TERM";

/// Environment variable carrying the renderer config path.
pub const CONFIG_VAR: &str = "STARSHIP_CONFIG";

/// Environment variable carrying the hashed session identity.
pub const SESSION_KEY_VAR: &str = "STARSHIP_SESSION_KEY";

/// Environment variable carrying the shell tag.
pub const SHELL_TAG_VAR: &str = "STARSHIP_SHELL";

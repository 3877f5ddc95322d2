//! Command-line interface for prompt-relay.
//!
//! Uses lexopt for minimal binary size overhead (~34KB).

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Renderer executable (overrides config file).
    pub command: Option<String>,
    /// Terminal type passed to the renderer.
    pub term: Option<String>,
    /// Renderer configuration file.
    pub renderer_config: Option<PathBuf>,
    /// Upper bound on one render in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Session name used to derive the session key.
    pub session: Option<String>,
    /// Render a single prompt and exit.
    pub once: bool,
    /// Exit status reported with `--once`.
    pub status: i32,
    /// Terminal width reported with `--once` (default: detected).
    pub width: Option<u16>,
    /// Command duration reported with `--once`.
    pub duration_ms: u64,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Long("command") => {
                result.command = Some(parser.value()?.parse()?);
            }
            Long("term") => {
                result.term = Some(parser.value()?.parse()?);
            }
            Long("renderer-config") => {
                result.renderer_config = Some(parser.value()?.parse()?);
            }
            Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout_ms = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("session") => {
                result.session = Some(parser.value()?.parse()?);
            }
            Long("once") => {
                result.once = true;
            }
            Long("status") => {
                let value: String = parser.value()?.parse()?;
                result.status = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidValue("status", value))?;
            }
            Long("width") => {
                let value: String = parser.value()?.parse()?;
                result.width = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("width", value))?,
                );
            }
            Long("duration") => {
                let value: String = parser.value()?.parse()?;
                result.duration_ms = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidValue("duration", value))?;
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"prompt-relay {version}
Shell prompt bridge that delegates rendering to an external prompt program

USAGE:
    prompt-relay [OPTIONS]

OPTIONS:
    -c, --config <FILE>            Path to configuration file (JSON)
        --command <PROGRAM>        Renderer executable [default: starship]
        --term <TERM>              Terminal type for the renderer [default: $TERM]
        --renderer-config <FILE>   Renderer config [default: ~/.config/starship.toml]
        --timeout <MS>             Fall back if a render takes longer than this
    -s, --session <NAME>           Session name [default: prompt-relay-<pid>]
    -l, --log-level <LVL>          Log level (error, warn, info, debug, trace)
        --once                     Render one prompt to stdout and exit
        --status <N>               Exit status to report with --once [default: 0]
        --width <COLS>             Terminal width to report with --once
        --duration <MS>            Command duration to report with --once [default: 0]
    -h, --help                     Print help
    -V, --version                  Print version

ENVIRONMENT VARIABLES:
    PROMPT_RELAY_COMMAND           Renderer executable (overrides config)
    PROMPT_RELAY_TERM              Terminal type (overrides config)
    PROMPT_RELAY_RENDERER_CONFIG   Renderer config file (overrides config)
    PROMPT_RELAY_TIMEOUT_MS        Render bound in milliseconds (overrides config)
    PROMPT_RELAY_LOG_LEVEL         Log level (overrides config)
    RUST_LOG                       Alternative log level setting

EXAMPLES:
    # Interactive shell with the starship prompt
    prompt-relay

    # Check what the renderer prints after a failed 2.5s command
    prompt-relay --once --status 1 --duration 2500

    # Use a custom renderer with a render bound
    prompt-relay --command ~/bin/my-prompt --timeout 200
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("prompt-relay {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

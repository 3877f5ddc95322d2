//! Configuration management for prompt-relay.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::render::{Renderer, DEFAULT_COMMAND};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Renderer configuration.
    pub renderer: RendererSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Renderer configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSection {
    /// Renderer executable name or path.
    pub command: String,
    /// Terminal type override (default: inherited `$TERM`).
    pub term: Option<String>,
    /// Renderer config file (default: `~/.config/starship.toml`).
    pub config_path: Option<PathBuf>,
    /// Upper bound on one render in milliseconds (default: unbounded).
    pub timeout_ms: Option<u64>,
}

impl Default for RendererSection {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            term: None,
            config_path: None,
            timeout_ms: None,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    fn apply_vars<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(command) = var("PROMPT_RELAY_COMMAND").filter(|c| !c.is_empty()) {
            self.renderer.command = command;
        }

        if let Some(term) = var("PROMPT_RELAY_TERM").filter(|t| !t.is_empty()) {
            self.renderer.term = Some(term);
        }

        if let Some(path) = var("PROMPT_RELAY_RENDERER_CONFIG").filter(|p| !p.is_empty()) {
            self.renderer.config_path = Some(PathBuf::from(path));
        }

        if let Some(timeout) = var("PROMPT_RELAY_TIMEOUT_MS") {
            let ms = timeout
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PROMPT_RELAY_TIMEOUT_MS", timeout))?;
            self.renderer.timeout_ms = Some(ms);
        }

        if let Some(level) = var("PROMPT_RELAY_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref command) = args.command {
            self.renderer.command = command.clone();
        }

        if let Some(ref term) = args.term {
            self.renderer.term = Some(term.clone());
        }

        if let Some(ref path) = args.renderer_config {
            self.renderer.config_path = Some(path.clone());
        }

        if let Some(ms) = args.timeout_ms {
            self.renderer.timeout_ms = Some(ms);
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Config::default();

        // Load from config file if specified
        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        // Apply environment variable overrides
        config.apply_env()?;

        // Apply CLI argument overrides (highest priority)
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to renderer settings.
    pub fn to_renderer(&self) -> Result<Renderer, ConfigError> {
        if self.renderer.command.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "renderer.command",
                self.renderer.command.clone(),
            ));
        }

        let mut renderer = Renderer::new(self.renderer.command.clone());

        if let Some(ref term) = self.renderer.term {
            renderer = renderer.term(term.clone());
        }

        if let Some(ref path) = self.renderer.config_path {
            renderer = renderer.config_path(expand_home(path));
        }

        if let Some(ms) = self.renderer.timeout_ms {
            renderer = renderer.timeout(Duration::from_millis(ms));
        }

        Ok(renderer)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid setting value.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.renderer.command, "starship");
        assert!(config.renderer.term.is_none());
        assert!(config.renderer.config_path.is_none());
        assert!(config.renderer.timeout_ms.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "renderer": {
                "command": "/usr/local/bin/starship",
                "term": "xterm-256color",
                "config_path": "/etc/starship.toml",
                "timeout_ms": 500
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.renderer.command, "/usr/local/bin/starship");
        assert_eq!(config.renderer.term.as_deref(), Some("xterm-256color"));
        assert_eq!(
            config.renderer.config_path,
            Some(PathBuf::from("/etc/starship.toml"))
        );
        assert_eq!(config.renderer.timeout_ms, Some(500));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{
            "renderer": {
                "term": "screen"
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.renderer.command, "starship"); // Default
        assert_eq!(config.renderer.term.as_deref(), Some("screen"));
    }

    #[test]
    fn test_config_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/prompt-relay.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_apply_vars() {
        let mut config = Config::default();
        config
            .apply_vars(vars(&[
                ("PROMPT_RELAY_COMMAND", "/opt/starship"),
                ("PROMPT_RELAY_TERM", "xterm"),
                ("PROMPT_RELAY_RENDERER_CONFIG", "/tmp/s.toml"),
                ("PROMPT_RELAY_TIMEOUT_MS", "250"),
                ("PROMPT_RELAY_LOG_LEVEL", "trace"),
                ("RUST_LOG", "error"),
            ]))
            .unwrap();

        assert_eq!(config.renderer.command, "/opt/starship");
        assert_eq!(config.renderer.term.as_deref(), Some("xterm"));
        assert_eq!(config.renderer.config_path, Some(PathBuf::from("/tmp/s.toml")));
        assert_eq!(config.renderer.timeout_ms, Some(250));
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_apply_vars_rust_log_fallback() {
        let mut config = Config::default();
        config.apply_vars(vars(&[("RUST_LOG", "warn")])).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_apply_vars_invalid_timeout() {
        let mut config = Config::default();
        let result = config.apply_vars(vars(&[("PROMPT_RELAY_TIMEOUT_MS", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("PROMPT_RELAY_TIMEOUT_MS", _))
        ));
    }

    #[test]
    fn test_apply_vars_ignores_empty() {
        let mut config = Config::default();
        config
            .apply_vars(vars(&[("PROMPT_RELAY_COMMAND", "")]))
            .unwrap();
        assert_eq!(config.renderer.command, "starship");
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        let args = Args {
            command: Some("my-prompt".to_string()),
            term: Some("vt100".to_string()),
            renderer_config: Some(PathBuf::from("/x/y.toml")),
            timeout_ms: Some(100),
            log_level: Some("debug".to_string()),
            ..Args::default()
        };

        config.apply_args(&args);

        assert_eq!(config.renderer.command, "my-prompt");
        assert_eq!(config.renderer.term.as_deref(), Some("vt100"));
        assert_eq!(config.renderer.config_path, Some(PathBuf::from("/x/y.toml")));
        assert_eq!(config.renderer.timeout_ms, Some(100));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_to_renderer() {
        let mut config = Config::default();
        config.renderer.term = Some("xterm".to_string());
        config.renderer.config_path = Some(PathBuf::from("/etc/starship.toml"));
        config.renderer.timeout_ms = Some(300);

        let renderer = config.to_renderer().unwrap();
        assert_eq!(renderer.program(), "starship");
        assert_eq!(renderer.term_name(), "xterm");
        assert_eq!(renderer.renderer_config(), Path::new("/etc/starship.toml"));
        assert_eq!(renderer.timeout_duration(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn test_to_renderer_empty_command() {
        let mut config = Config::default();
        config.renderer.command = "  ".to_string();
        assert!(config.to_renderer().is_err());
    }

    #[test]
    fn test_expand_home() {
        let absolute = Path::new("/etc/starship.toml");
        assert_eq!(expand_home(absolute), absolute);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(Path::new("~/.config/starship.toml")),
                home.join(".config/starship.toml")
            );
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"command\""));
        assert!(json.contains("\"timeout_ms\""));
    }
}

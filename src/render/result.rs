//! Renderer result types.

use std::time::Duration;

use crate::output::{AnsiDecoder, StyledText};

/// Captured output of one renderer call.
#[derive(Debug, Clone, Default)]
pub struct RendererOutput {
    /// Raw stdout bytes.
    pub raw: Vec<u8>,
    /// Exit code (if the process exited normally).
    pub exit_code: Option<i32>,
    /// Wall time of the call.
    pub duration: Duration,
}

impl RendererOutput {
    /// Create a new renderer output.
    pub fn new(raw: Vec<u8>, exit_code: Option<i32>, duration: Duration) -> Self {
        Self {
            raw,
            exit_code,
            duration,
        }
    }

    /// Check if the renderer exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Check if nothing was printed.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Decode the output into styled text.
    pub fn decode(&self) -> StyledText {
        AnsiDecoder::decode(&self.raw)
    }

    /// Output as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let output = RendererOutput::new(b"> ".to_vec(), Some(0), Duration::from_millis(5));
        assert!(output.success());
        assert!(!output.is_empty());
        assert_eq!(output.text(), "> ");
    }

    #[test]
    fn test_failure_codes() {
        assert!(!RendererOutput::new(vec![], Some(1), Duration::ZERO).success());
        assert!(!RendererOutput::new(vec![], None, Duration::ZERO).success());
    }

    #[test]
    fn test_decode() {
        let output = RendererOutput::new(b"\x1b[32mok\x1b[0m".to_vec(), Some(0), Duration::ZERO);
        assert_eq!(output.decode().plain(), "ok");
    }

    #[test]
    fn test_default_is_empty() {
        let output = RendererOutput::default();
        assert!(output.is_empty());
        assert!(output.exit_code.is_none());
    }
}

//! Terminal size detection.

/// Width used when nothing better is known.
pub const DEFAULT_WIDTH: u16 = 80;

/// Get the width of the controlling terminal in columns.
///
/// Asks the controlling terminal first, then `$COLUMNS`, then falls
/// back to [`DEFAULT_WIDTH`].
pub fn terminal_width() -> u16 {
    tty_width()
        .or_else(|| columns_from_env(std::env::var("COLUMNS").ok().as_deref()))
        .unwrap_or(DEFAULT_WIDTH)
}

fn tty_width() -> Option<u16> {
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| cols)
        .filter(|&cols| cols > 0)
}

fn columns_from_env(value: Option<&str>) -> Option<u16> {
    value
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|&cols| cols > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_from_env() {
        assert_eq!(columns_from_env(Some("120")), Some(120));
        assert_eq!(columns_from_env(Some(" 100\n")), Some(100));
        assert_eq!(columns_from_env(Some("0")), None);
        assert_eq!(columns_from_env(Some("wide")), None);
        assert_eq!(columns_from_env(None), None);
    }

    #[test]
    fn test_tty_width_never_zero() {
        // No terminal in CI is fine, a zero-column answer is not
        assert_ne!(tty_width(), Some(0));
    }

    #[test]
    fn test_terminal_width_positive() {
        assert!(terminal_width() > 0);
    }
}

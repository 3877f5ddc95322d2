//! Styled text: the host-side form of decoded prompt output.

use std::fmt::Write as _;

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Palette index: 0-7 normal, 8-15 bright, 16-255 extended.
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

/// Text attributes of a run of characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

impl Style {
    /// Check if this is the terminal's default rendition.
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    /// SGR parameters that reproduce this style from a reset state.
    fn sgr_params(&self) -> String {
        let mut params = String::from("0");
        let flags = [
            (self.bold, 1),
            (self.dim, 2),
            (self.italic, 3),
            (self.underline, 4),
            (self.blink, 5),
            (self.inverse, 7),
            (self.hidden, 8),
            (self.strikethrough, 9),
        ];
        for (on, code) in flags {
            if on {
                let _ = write!(params, ";{}", code);
            }
        }
        if let Some(fg) = self.fg {
            push_color(&mut params, fg, 30, 90, 38);
        }
        if let Some(bg) = self.bg {
            push_color(&mut params, bg, 40, 100, 48);
        }
        params
    }
}

fn push_color(params: &mut String, color: Color, base: u8, bright: u8, extended: u8) {
    let _ = match color {
        Color::Indexed(idx @ 0..=7) => write!(params, ";{}", base + idx),
        Color::Indexed(idx @ 8..=15) => write!(params, ";{}", bright + idx - 8),
        Color::Indexed(idx) => write!(params, ";{};5;{}", extended, idx),
        Color::Rgb(r, g, b) => write!(params, ";{};2;{};{};{}", extended, r, g, b),
    };
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// Decoded prompt text as a sequence of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    /// Create empty styled text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one character, merging it into the last span if the style
    /// matches.
    pub fn push(&mut self, c: char, style: Style) {
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push(c),
            _ => self.spans.push(Span {
                text: c.to_string(),
                style,
            }),
        }
    }

    /// Append a string in one style.
    pub fn push_str(&mut self, text: &str, style: Style) {
        for c in text.chars() {
            self.push(c, style);
        }
    }

    /// The spans in display order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Check if there is no text at all.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The text without any styling.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Number of characters shown.
    pub fn char_count(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Style of each displayed character, in order.
    pub fn char_styles(&self) -> impl Iterator<Item = (char, Style)> + '_ {
        self.spans
            .iter()
            .flat_map(|span| span.text.chars().map(move |c| (c, span.style)))
    }

    /// Encode as normalized SGR sequences for an ANSI terminal.
    ///
    /// Every style change is emitted from a reset, and output that used any
    /// styling ends with a reset so the prompt does not bleed into input.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        let mut current = Style::default();
        for span in &self.spans {
            if span.style != current {
                if span.style.is_plain() {
                    out.push_str("\x1b[0m");
                } else {
                    let _ = write!(out, "\x1b[{}m", span.style.sgr_params());
                }
                current = span.style;
            }
            out.push_str(&span.text);
        }
        if !current.is_plain() {
            out.push_str("\x1b[0m");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Style {
        Style {
            fg: Some(Color::Indexed(1)),
            ..Style::default()
        }
    }

    #[test]
    fn test_push_merges_same_style() {
        let mut text = StyledText::new();
        text.push_str("ab", red());
        text.push('c', red());
        text.push('d', Style::default());

        assert_eq!(text.spans().len(), 2);
        assert_eq!(text.spans()[0].text, "abc");
        assert_eq!(text.plain(), "abcd");
        assert_eq!(text.char_count(), 4);
    }

    #[test]
    fn test_plain_text_has_no_escapes() {
        let mut text = StyledText::new();
        text.push_str("$ ", Style::default());
        assert_eq!(text.to_ansi(), "$ ");
    }

    #[test]
    fn test_to_ansi_basic_colors() {
        let mut text = StyledText::new();
        text.push_str("err", red());
        text.push_str(" ok", Style::default());
        assert_eq!(text.to_ansi(), "\x1b[0;31merr\x1b[0m ok");
    }

    #[test]
    fn test_to_ansi_extended_colors() {
        let style = Style {
            fg: Some(Color::Indexed(12)),
            bg: Some(Color::Rgb(10, 20, 30)),
            bold: true,
            ..Style::default()
        };
        let mut text = StyledText::new();
        text.push('x', style);
        assert_eq!(text.to_ansi(), "\x1b[0;1;94;48;2;10;20;30mx\x1b[0m");

        let style = Style {
            fg: Some(Color::Indexed(208)),
            ..Style::default()
        };
        let mut text = StyledText::new();
        text.push('y', style);
        assert_eq!(text.to_ansi(), "\x1b[0;38;5;208my\x1b[0m");
    }

    #[test]
    fn test_char_styles() {
        let mut text = StyledText::new();
        text.push('a', red());
        text.push('b', Style::default());
        let styles: Vec<_> = text.char_styles().collect();
        assert_eq!(styles, vec![('a', red()), ('b', Style::default())]);
    }

    #[test]
    fn test_empty() {
        let text = StyledText::new();
        assert!(text.is_empty());
        assert_eq!(text.to_ansi(), "");
    }
}

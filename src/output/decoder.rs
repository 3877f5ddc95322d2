//! ANSI decoding of renderer output using the VTE parser.

use vte::{Params, Parser, Perform};

use super::styled::{Color, Style, StyledText};

/// Decoder from raw terminal output to [`StyledText`].
pub struct AnsiDecoder;

impl AnsiDecoder {
    /// Decode raw bytes into styled text.
    ///
    /// SGR sequences become span styles. Other control sequences (cursor
    /// movement, OSC titles and hyperlinks, DCS) are dropped, as are the
    /// readline `\x01`/`\x02` non-printing markers. Newlines and tabs are
    /// kept.
    pub fn decode(input: &[u8]) -> StyledText {
        let mut performer = StyleTracker::new();
        let mut parser = Parser::new();

        parser.advance(&mut performer, input);

        performer.output
    }

    /// Decode a string.
    pub fn decode_str(input: &str) -> StyledText {
        Self::decode(input.as_bytes())
    }

    /// Strip all escape codes, keeping only the displayed text.
    pub fn strip(input: &[u8]) -> String {
        Self::decode(input).plain()
    }
}

/// VTE performer that tracks the current SGR rendition.
struct StyleTracker {
    output: StyledText,
    style: Style,
}

impl StyleTracker {
    fn new() -> Self {
        Self {
            output: StyledText::new(),
            style: Style::default(),
        }
    }

    fn apply_sgr(&mut self, params: &Params) {
        let mut iter = params.iter();
        let mut any = false;

        while let Some(param) = iter.next() {
            any = true;
            match param {
                // Colon form carries the extended color in one parameter
                [38, rest @ ..] if !rest.is_empty() => {
                    self.style.fg = extended_color(rest.iter().copied());
                }
                [48, rest @ ..] if !rest.is_empty() => {
                    self.style.bg = extended_color(rest.iter().copied());
                }
                [38] => {
                    self.style.fg = extended_color(iter.by_ref().map(first));
                }
                [48] => {
                    self.style.bg = extended_color(iter.by_ref().map(first));
                }
                [code, ..] => self.apply_code(*code),
                [] => {}
            }
        }

        if !any {
            self.style = Style::default();
        }
    }

    fn apply_code(&mut self, code: u16) {
        let style = &mut self.style;
        match code {
            0 => *style = Style::default(),
            1 => style.bold = true,
            2 => style.dim = true,
            3 => style.italic = true,
            4 => style.underline = true,
            5 | 6 => style.blink = true,
            7 => style.inverse = true,
            8 => style.hidden = true,
            9 => style.strikethrough = true,
            21 => style.underline = true,
            22 => {
                style.bold = false;
                style.dim = false;
            }
            23 => style.italic = false,
            24 => style.underline = false,
            25 => style.blink = false,
            27 => style.inverse = false,
            28 => style.hidden = false,
            29 => style.strikethrough = false,
            30..=37 => style.fg = Some(Color::Indexed((code - 30) as u8)),
            39 => style.fg = None,
            40..=47 => style.bg = Some(Color::Indexed((code - 40) as u8)),
            49 => style.bg = None,
            90..=97 => style.fg = Some(Color::Indexed((code - 90 + 8) as u8)),
            100..=107 => style.bg = Some(Color::Indexed((code - 100 + 8) as u8)),
            _ => {}
        }
    }
}

fn first(param: &[u16]) -> u16 {
    param.first().copied().unwrap_or(0)
}

/// Parse the tail of a 38/48 sequence: `5;n` or `2;r;g;b`.
fn extended_color<I>(mut values: I) -> Option<Color>
where
    I: Iterator<Item = u16>,
{
    match values.next()? {
        5 => values.next().map(|idx| Color::Indexed(clamp(idx))),
        2 => {
            let r = values.next()?;
            let g = values.next()?;
            let b = values.next()?;
            Some(Color::Rgb(clamp(r), clamp(g), clamp(b)))
        }
        _ => None,
    }
}

fn clamp(value: u16) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

impl Perform for StyleTracker {
    fn print(&mut self, c: char) {
        self.output.push(c, self.style);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            // Newline, tab
            0x0A | 0x09 => self.output.push(byte as char, self.style),
            // Readline markers and other control characters
            _ => {}
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {
        // Titles, hyperlinks and semantic prompt marks carry no visible text
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if action == 'm' && intermediates.is_empty() && !ignore {
            self.apply_sgr(params);
        }
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}

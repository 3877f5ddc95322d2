//! Output processing for renderer output.
//!
//! This module turns the renderer's raw bytes into the host's display form:
//! - ANSI decoding into styled spans
//! - Re-encoding as normalized SGR for ANSI terminals
//!
//! # Example
//!
//! ```
//! use prompt_relay::output::{AnsiDecoder, Color};
//!
//! let raw = b"\x1b[31mRed text\x1b[0m";
//! let styled = AnsiDecoder::decode(raw);
//! assert_eq!(styled.plain(), "Red text");
//! assert_eq!(styled.spans()[0].style.fg, Some(Color::Indexed(1)));
//! ```

mod decoder;
mod styled;

pub use decoder::AnsiDecoder;
pub use styled::{Color, Span, Style, StyledText};

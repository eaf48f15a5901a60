//! Virtual piano sheet to Standard MIDI File translator.
//!
//! A sheet is plain text typed on a 61-key computer-keyboard piano layout:
//!
//! - `t y u` - three notes in a row
//! - `[tuo]` - a chord
//! - `|` and `'` - long and short rests
//! - `TEMPO:120` - change tempo
//!
//! `-` separates tokens like a space does. Characters that are not keys are ignored.
//!
//! # Example
//!
//! ```
//! let midi = vpiano::translate("TEMPO:120 t-y-u [tuo] |");
//! assert_eq!(&midi[0..4], b"MThd");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod keymap;
pub mod lexer;
pub mod midi;
pub mod parser;
pub mod writer;

pub use ast::{Event, Sheet};
pub use config::TranslateOptions;
pub use error::{TempoError, VpError};
pub use keymap::KeyMap;
pub use lexer::{tokenize, Token};
pub use midi::{encode, to_midi, MidiParams};
pub use parser::{parse, ParseResult, ParserOptions};
pub use writer::write_file;

/// Output of [`translate_with`]
#[derive(Debug)]
pub struct Translation {
    pub bytes: Vec<u8>,
    pub sheet: Sheet,
    /// Tokens that were skipped, e.g. `TEMPO:0`.
    pub warnings: Vec<VpError>,
}

/// Translate a sheet to MIDI bytes with the default options.
/// This is the main entry point for the library.
///
/// Never fails: unusable tokens are skipped, and an empty sheet still gives a
/// valid file holding only a tempo and the end of the track.
pub fn translate(text: &str) -> Vec<u8> {
    translate_with(text, &TranslateOptions::default()).bytes
}

/// Translate a sheet, keeping the parsed events and any warnings.
pub fn translate_with(text: &str, options: &TranslateOptions) -> Translation {
    let ParseResult { sheet, warnings } = parse_sheet_with(text, options);
    let bytes = to_midi(&sheet, &options.midi_params());
    Translation {
        bytes,
        sheet,
        warnings,
    }
}

/// Tokenize and parse a sheet without encoding it.
pub fn parse_sheet(text: &str) -> ParseResult {
    parse_sheet_with(text, &TranslateOptions::default())
}

fn parse_sheet_with(text: &str, options: &TranslateOptions) -> ParseResult {
    let tokens = tokenize(text);
    tracing::debug!(tokens = tokens.len(), "tokenized sheet");
    parser::parse_with(&tokens, KeyMap::standard(), options.parser_options())
}

use crate::ast::*;
use crate::error::{TempoError, VpError};
use crate::keymap::KeyMap;
use crate::lexer::Token;
use std::num::IntErrorKind;
use tracing::{debug, warn};

const TEMPO_PREFIX: &str = "TEMPO:";

/// Options for the event parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Tempo in effect before the first `TEMPO:` token.
    pub initial_bpm: u32,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { initial_bpm: 100 }
    }
}

/// Events of a sheet plus the tokens that were skipped along the way.
#[derive(Debug)]
pub struct ParseResult {
    pub sheet: Sheet,
    pub warnings: Vec<VpError>,
}

/// Single-pass state machine turning tokens into events
pub struct Parser<'k> {
    keymap: &'k KeyMap,
    current_bpm: u32,
    initial_tempo: u32,
    events: Vec<Event>,
    warnings: Vec<VpError>,
}

impl<'k> Parser<'k> {
    /// An `initial_bpm` with no encodable tempo falls back to 100 BPM.
    pub fn new(keymap: &'k KeyMap, options: ParserOptions) -> Self {
        let (current_bpm, initial_tempo) = match bpm_to_tempo(options.initial_bpm) {
            Some(tempo) => (options.initial_bpm, tempo),
            None => {
                warn!(bpm = options.initial_bpm, "initial BPM out of range, using 100");
                (ParserOptions::default().initial_bpm, DEFAULT_TEMPO)
            }
        };
        Self {
            keymap,
            current_bpm,
            initial_tempo,
            events: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Tempo in BPM after the tokens consumed so far.
    pub fn current_bpm(&self) -> u32 {
        self.current_bpm
    }

    /// Consume one token, emitting at most one event.
    pub fn feed(&mut self, token: &Token<'_>) {
        let text = token.text;

        if let Some(arg) = text.strip_prefix(TEMPO_PREFIX) {
            match parse_bpm(arg) {
                Ok((bpm, tempo)) => {
                    self.current_bpm = bpm;
                    self.events.push(Event::tempo_change(tempo));
                }
                Err(reason) => {
                    warn!(
                        token = text,
                        line = token.line,
                        column = token.column,
                        %reason,
                        "skipping tempo token"
                    );
                    self.warnings.push(VpError::MalformedTempo {
                        token: text.to_string(),
                        line: token.line,
                        column: token.column,
                        reason,
                    });
                }
            }
            return;
        }

        match text {
            "|" => self.events.push(Event::rest(LONG_REST_TICKS)),
            "'" => self.events.push(Event::rest(SHORT_REST_TICKS)),
            _ if is_chord(text) => {
                let chord = self.map_keys(&text[1..text.len() - 1]);
                self.events.push(Event::note_group(chord, NOTE_TICKS));
            }
            _ => {
                let notes = self.map_keys(text);
                if !notes.is_empty() {
                    self.events.push(Event::note_group(notes, NOTE_TICKS));
                }
            }
        }
    }

    fn map_keys(&self, keys: &str) -> Vec<u8> {
        keys.chars().filter_map(|c| self.keymap.lookup(c)).collect()
    }

    pub fn finish(self) -> ParseResult {
        debug!(
            events = self.events.len(),
            warnings = self.warnings.len(),
            "parsed sheet"
        );
        ParseResult {
            sheet: Sheet::from_parts(self.events, self.initial_tempo),
            warnings: self.warnings,
        }
    }
}

fn is_chord(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('[') && text.ends_with(']')
}

/// Parse the argument of a `TEMPO:` token into BPM and microseconds per quarter.
///
/// Only the text up to a second `:` counts, so `TEMPO:120:x` is 120 BPM.
fn parse_bpm(arg: &str) -> Result<(u32, u32), TempoError> {
    let digits = arg.split(':').next().unwrap_or_default();
    let digits = strip_digit_separators(digits).ok_or(TempoError::NotANumber)?;
    let bpm: i64 = digits.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::Empty => TempoError::Missing,
        IntErrorKind::PosOverflow => TempoError::OutOfRange,
        IntErrorKind::NegOverflow => TempoError::NonPositive,
        _ => TempoError::NotANumber,
    })?;
    if bpm <= 0 {
        return Err(TempoError::NonPositive);
    }
    let bpm = u32::try_from(bpm).map_err(|_| TempoError::OutOfRange)?;
    let tempo = bpm_to_tempo(bpm).ok_or(TempoError::OutOfRange)?;
    Ok((bpm, tempo))
}

/// Remove `_` separators, allowed singly between digits as in `1_20`.
fn strip_digit_separators(text: &str) -> Option<String> {
    let unsigned = text.strip_prefix(|c| c == '+' || c == '-').unwrap_or(text);
    if unsigned.starts_with('_') || unsigned.ends_with('_') || unsigned.contains("__") {
        return None;
    }
    Some(text.replace('_', ""))
}

/// Parse tokens with the standard key map and default options.
pub fn parse(tokens: &[Token<'_>]) -> ParseResult {
    parse_with(tokens, KeyMap::standard(), ParserOptions::default())
}

pub fn parse_with(tokens: &[Token<'_>], keymap: &KeyMap, options: ParserOptions) -> ParseResult {
    let mut parser = Parser::new(keymap, options);
    for token in tokens {
        parser.feed(token);
    }
    parser.finish()
}

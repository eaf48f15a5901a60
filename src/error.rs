//! # Error Types
//!
//! This module defines all error types for the vpiano translator.
//!
//! ## Error Types
//! - `EncodingInvariant` - an event handed to the encoder cannot be written as MIDI
//! - `Io` - a file could not be read or written
//! - `Config` - an options file is invalid
//!
//! `MalformedTempo` is recoverable. The parser records it as a warning and keeps
//! going, so it shows up in [`ParseResult::warnings`](crate::parser::ParseResult)
//! rather than as an `Err`. Unrecognized characters are not errors at all.
//!
//! ## Usage
//! ```rust
//! use vpiano::{translate_with, TranslateOptions};
//!
//! let out = translate_with("TEMPO:abc t y u", &TranslateOptions::default());
//! for warning in &out.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! assert_eq!(out.warnings.len(), 1);
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VpError {
    /// A `TEMPO:` token whose argument could not be used.
    ///
    /// # Example
    /// ```
    /// # use vpiano::{VpError, TempoError};
    /// let err = VpError::MalformedTempo {
    ///     token: "TEMPO:0".to_string(),
    ///     line: 1,
    ///     column: 5,
    ///     reason: TempoError::NonPositive,
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Malformed tempo 'TEMPO:0' at line 1, column 5: BPM must be positive"
    /// );
    /// ```
    #[error("Malformed tempo '{token}' at line {line}, column {column}: {reason}")]
    MalformedTempo {
        token: String,
        line: usize,
        column: usize,
        reason: TempoError,
    },

    /// An event that cannot be represented in a conformant MIDI file.
    #[error("Encoding invariant violated: {0}")]
    EncodingInvariant(String),

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid translation options.
    #[error("Invalid config: {0}")]
    Config(String),
}

/// Why a `TEMPO:` token was skipped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempoError {
    #[error("missing BPM value")]
    Missing,
    #[error("BPM is not an integer")]
    NotANumber,
    #[error("BPM must be positive")]
    NonPositive,
    #[error("BPM gives a tempo outside the Set-Tempo range")]
    OutOfRange,
}

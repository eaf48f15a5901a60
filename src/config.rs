//! # Translation Options
//!
//! Options can come from a YAML file, for example:
//!
//! ```yaml
//! initial-bpm: 90
//! velocity: 80
//! output: waltz.mid
//! ```
//!
//! Every key is optional. Unknown keys are an error, so a typo does not silently
//! fall back to a default.

use crate::ast::check_bpm;
use crate::error::VpError;
use crate::midi::MidiParams;
use crate::parser::ParserOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "song.mid";

/// Options file as written by the user, before validation.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub initial_bpm: Option<u32>,
    pub velocity: Option<u8>,
    pub output: Option<PathBuf>,
}

/// Validated translation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    pub initial_bpm: u32,
    pub velocity: u8,
    pub output: PathBuf,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            initial_bpm: ParserOptions::default().initial_bpm,
            velocity: MidiParams::default().velocity,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl TranslateOptions {
    /// Parse and validate a YAML options document.
    pub fn from_yaml(content: &str) -> Result<Self, VpError> {
        // an empty document is a valid, all-default config
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| VpError::Config(e.to_string()))?
        };
        Self::from_raw(raw)
    }

    /// Read options from a YAML file.
    pub fn load(path: &Path) -> Result<Self, VpError> {
        let content = std::fs::read_to_string(path).map_err(|source| VpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, VpError> {
        let defaults = Self::default();

        let initial_bpm = raw.initial_bpm.unwrap_or(defaults.initial_bpm);
        check_bpm(initial_bpm).map_err(|msg| VpError::Config(format!("initial-bpm {}", msg)))?;

        let velocity = raw.velocity.unwrap_or(defaults.velocity);
        if !(1..=127).contains(&velocity) {
            return Err(VpError::Config(format!(
                "velocity must be between 1 and 127, got {}",
                velocity
            )));
        }

        Ok(Self {
            initial_bpm,
            velocity,
            output: raw.output.unwrap_or(defaults.output),
        })
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            initial_bpm: self.initial_bpm,
        }
    }

    pub fn midi_params(&self) -> MidiParams {
        MidiParams {
            velocity: self.velocity,
        }
    }
}

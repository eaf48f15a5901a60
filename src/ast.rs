//! # Event Types
//!
//! The hardware-independent form of a sheet, between the parser and the MIDI encoder.
//!
//! ## Type Hierarchy
//! ```text
//! Sheet
//!   ├── initial_tempo: u32 (microseconds per quarter note)
//!   └── Vec<Event>
//!         ├── TempoChange { micros_per_quarter }
//!         └── NoteGroup { notes, hold_ticks }
//! ```
//!
//! ## Key Concepts
//!
//! ### Note groups
//! Every note in a group starts together and stops together after `hold_ticks`.
//! A group with no notes is a rest: it advances the clock and makes no sound.
//!
//! ### Timing
//! Events never overlap. Each one finishes before the next begins, so the only
//! time a `Sheet` carries is the hold of each group. Tempo changes affect
//! playback speed, never hold lengths.
//!
//! ### Validity
//! A [`Sheet`] always holds encodable values. [`Sheet::new`] checks them, which is
//! what lets [`to_midi`](crate::midi::to_midi) be infallible.

use crate::error::VpError;
use serde::{Deserialize, Serialize};

/// Microseconds per quarter note at 100 BPM.
pub const DEFAULT_TEMPO: u32 = 600_000;

/// Largest value a Set-Tempo meta event can carry (24 bits).
pub const MAX_TEMPO: u32 = 0x00FF_FFFF;

const MICROS_PER_MINUTE: u32 = 60_000_000;

/// Slowest BPM whose tempo still fits in [`MAX_TEMPO`].
pub const MIN_BPM: u32 = MICROS_PER_MINUTE.div_ceil(MAX_TEMPO);

/// Fastest BPM with a nonzero tempo.
pub const MAX_BPM: u32 = MICROS_PER_MINUTE;

/// Largest delta-time a 4-byte variable-length quantity can carry.
pub const MAX_TICKS: u32 = 0x0FFF_FFFF;

/// Highest MIDI note number.
pub const MAX_NOTE: u8 = 127;

/// Hold of a note, chord, or chord-shaped rest.
pub const NOTE_TICKS: u32 = 200;

/// Hold of `'`.
pub const SHORT_REST_TICKS: u32 = 120;

/// Hold of `|`.
pub const LONG_REST_TICKS: u32 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    TempoChange {
        #[serde(rename = "micros-per-quarter")]
        micros_per_quarter: u32,
    },
    NoteGroup {
        notes: Vec<u8>,
        #[serde(rename = "hold-ticks")]
        hold_ticks: u32,
    },
}

impl Event {
    pub fn tempo_change(micros_per_quarter: u32) -> Self {
        Event::TempoChange { micros_per_quarter }
    }

    pub fn note_group(notes: Vec<u8>, hold_ticks: u32) -> Self {
        Event::NoteGroup { notes, hold_ticks }
    }

    pub fn rest(hold_ticks: u32) -> Self {
        Event::NoteGroup {
            notes: Vec::new(),
            hold_ticks,
        }
    }

    /// Ticks this event moves the clock forward.
    pub fn ticks(&self) -> u32 {
        match self {
            Event::TempoChange { .. } => 0,
            Event::NoteGroup { hold_ticks, .. } => *hold_ticks,
        }
    }

    fn check(&self, index: usize) -> Result<(), VpError> {
        match self {
            Event::TempoChange { micros_per_quarter } => check_tempo(*micros_per_quarter)
                .map_err(|msg| VpError::EncodingInvariant(format!("event {}: {}", index, msg))),
            Event::NoteGroup { notes, hold_ticks } => {
                if let Some(note) = notes.iter().find(|&&n| n > MAX_NOTE) {
                    return Err(VpError::EncodingInvariant(format!(
                        "event {}: note {} is outside 0..=127",
                        index, note
                    )));
                }
                if *hold_ticks > MAX_TICKS {
                    return Err(VpError::EncodingInvariant(format!(
                        "event {}: hold of {} ticks exceeds {}",
                        index, hold_ticks, MAX_TICKS
                    )));
                }
                Ok(())
            }
        }
    }
}

fn check_tempo(micros_per_quarter: u32) -> Result<(), String> {
    if micros_per_quarter == 0 {
        Err("tempo must be positive".to_string())
    } else if micros_per_quarter > MAX_TEMPO {
        Err(format!(
            "tempo of {} microseconds does not fit in 24 bits",
            micros_per_quarter
        ))
    } else {
        Ok(())
    }
}

/// A validated event sequence ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Sheet {
    initial_tempo: u32,
    events: Vec<Event>,
}

impl Sheet {
    /// Check every event and the initial tempo against what MIDI can encode.
    pub fn new(events: Vec<Event>, initial_tempo: u32) -> Result<Self, VpError> {
        check_tempo(initial_tempo)
            .map_err(|msg| VpError::EncodingInvariant(format!("initial {}", msg)))?;
        for (i, event) in events.iter().enumerate() {
            event.check(i)?;
        }
        Ok(Self {
            initial_tempo,
            events,
        })
    }

    /// Build a sheet from values the parser has already constrained.
    pub(crate) fn from_parts(events: Vec<Event>, initial_tempo: u32) -> Self {
        debug_assert!(Sheet::new(events.clone(), initial_tempo).is_ok());
        Self {
            initial_tempo,
            events,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn initial_tempo(&self) -> u32 {
        self.initial_tempo
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Total length in ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.events.iter().map(|e| u64::from(e.ticks())).sum()
    }

    pub fn note_count(&self) -> usize {
        self.events
            .iter()
            .map(|e| match e {
                Event::NoteGroup { notes, .. } => notes.len(),
                Event::TempoChange { .. } => 0,
            })
            .sum()
    }
}

/// Microseconds per quarter note for `bpm`, if it fits a Set-Tempo event.
pub fn bpm_to_tempo(bpm: u32) -> Option<u32> {
    (MIN_BPM..=MAX_BPM)
        .contains(&bpm)
        .then(|| MICROS_PER_MINUTE / bpm)
}

/// Like [`bpm_to_tempo`], with an error naming the accepted range.
pub fn check_bpm(bpm: u32) -> Result<u32, String> {
    bpm_to_tempo(bpm)
        .ok_or_else(|| format!("must be between {} and {}, got {}", MIN_BPM, MAX_BPM, bpm))
}

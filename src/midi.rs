//! MIDI generation from a parsed sheet.
//!
//! Generates Standard MIDI File (SMF) format 0: one `MThd` header and one `MTrk`
//! track on channel 0. Hold values from the sheet are written directly as ticks
//! at [`TICKS_PER_QUARTER`].

use crate::ast::{Event, Sheet};
use crate::error::VpError;
use tracing::debug;

/// Division written into the header.
pub const TICKS_PER_QUARTER: u16 = 480;

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;
const META: u8 = 0xFF;
const META_TRACK_NAME: u8 = 0x03;
const META_END_OF_TRACK: u8 = 0x2F;
const META_SET_TEMPO: u8 = 0x51;

/// Parameters for MIDI generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiParams {
    /// Velocity for Note-On and Note-Off (0-127)
    pub velocity: u8,
}

impl Default for MidiParams {
    fn default() -> Self {
        MidiParams { velocity: 64 }
    }
}

/// Validate `events` and encode them with the default parameters.
pub fn encode(events: &[Event], initial_tempo: u32) -> Result<Vec<u8>, VpError> {
    let sheet = Sheet::new(events.to_vec(), initial_tempo)?;
    Ok(to_midi(&sheet, &MidiParams::default()))
}

/// Convert a sheet to MIDI bytes (SMF format 0)
pub fn to_midi(sheet: &Sheet, params: &MidiParams) -> Vec<u8> {
    let mut writer = MidiWriter::new(params.velocity);
    writer.tempo(sheet.initial_tempo());

    for event in sheet.events() {
        match event {
            Event::TempoChange { micros_per_quarter } => writer.tempo(*micros_per_quarter),
            Event::NoteGroup { notes, hold_ticks } => match notes.split_first() {
                Some((first, rest)) => {
                    for &note in notes {
                        writer.note_on(note);
                    }
                    writer.advance(*hold_ticks);
                    writer.note_off(*first);
                    for &note in rest {
                        writer.note_off(note);
                    }
                }
                None => {
                    writer.advance(*hold_ticks);
                    // an empty track name carries the delta without sounding
                    writer.meta_event(META_TRACK_NAME, &[]);
                }
            },
        }
    }

    let bytes = writer.finish();
    debug!(
        events = sheet.events().len(),
        bytes = bytes.len(),
        "encoded MIDI"
    );
    bytes
}

struct MidiWriter {
    velocity: u8,
    track: Vec<u8>,
    pending_ticks: u32,
}

impl MidiWriter {
    fn new(velocity: u8) -> Self {
        MidiWriter {
            velocity: velocity.min(0x7F),
            track: Vec::new(),
            pending_ticks: 0,
        }
    }

    fn tempo(&mut self, micros_per_quarter: u32) {
        let [_, hi, mid, lo] = micros_per_quarter.to_be_bytes();
        self.meta_event(META_SET_TEMPO, &[hi, mid, lo]);
    }

    fn note_on(&mut self, pitch: u8) {
        self.channel_event([NOTE_ON, pitch & 0x7F, self.velocity]);
    }

    fn note_off(&mut self, pitch: u8) {
        self.channel_event([NOTE_OFF, pitch & 0x7F, self.velocity]);
    }

    /// The next event lands this many ticks later.
    fn advance(&mut self, ticks: u32) {
        self.pending_ticks += ticks;
    }

    fn delta(&mut self) {
        let ticks = std::mem::take(&mut self.pending_ticks);
        self.track.extend(encode_variable_length(ticks));
    }

    fn meta_event(&mut self, event_type: u8, data: &[u8]) {
        self.delta();
        self.track.push(META);
        self.track.push(event_type);
        self.track.extend(encode_variable_length(data.len() as u32));
        self.track.extend_from_slice(data);
    }

    fn channel_event(&mut self, data: [u8; 3]) {
        self.delta();
        self.track.extend_from_slice(&data);
    }

    fn finish(mut self) -> Vec<u8> {
        self.meta_event(META_END_OF_TRACK, &[]);

        let mut out = Vec::with_capacity(22 + self.track.len());

        // Header chunk: MThd
        out.extend_from_slice(b"MThd");
        out.extend_from_slice(&6u32.to_be_bytes()); // chunk length
        out.extend_from_slice(&0u16.to_be_bytes()); // format 0
        out.extend_from_slice(&1u16.to_be_bytes()); // 1 track
        out.extend_from_slice(&TICKS_PER_QUARTER.to_be_bytes());

        // Track chunk: MTrk
        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(self.track.len() as u32).to_be_bytes());
        out.extend(self.track);

        out
    }
}

/// Encode a value as MIDI variable-length quantity
pub fn encode_variable_length(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;

    while value > 0 {
        bytes.push(((value & 0x7F) | 0x80) as u8);
        value >>= 7;
    }

    bytes.reverse();
    bytes
}

/// Decode a variable-length quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes it used, or `None` if the input ends
/// mid-quantity or runs past four bytes.
pub fn decode_variable_length(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &byte) in bytes.iter().take(4).enumerate() {
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

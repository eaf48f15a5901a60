//! Integration tests for the vpiano translator
//!
//! Tests the full pipeline from sheet text to MIDI bytes.

use pretty_assertions::assert_eq;
use midly::{Format, MetaMessage, MidiMessage, Smf, TrackEventKind};
use vpiano::{parse_sheet, translate, translate_with, write_file, Event, TranslateOptions, VpError};

#[derive(Debug, Clone, PartialEq)]
enum Ev {
    Tempo(u32),
    On(u8, u8),
    Off(u8, u8),
    Rest,
    End,
}

fn events(midi: &[u8]) -> Vec<(u32, Ev)> {
    let smf = Smf::parse(midi).expect("generated MIDI should be valid");
    assert_eq!(smf.header.format, Format::SingleTrack);
    assert_eq!(smf.tracks.len(), 1);

    smf.tracks[0]
        .iter()
        .map(|event| {
            let kind = match event.kind {
                TrackEventKind::Midi { channel, message } => {
                    assert_eq!(channel.as_int(), 0);
                    match message {
                        MidiMessage::NoteOn { key, vel } => Ev::On(key.as_int(), vel.as_int()),
                        MidiMessage::NoteOff { key, vel } => Ev::Off(key.as_int(), vel.as_int()),
                        other => panic!("unexpected message {:?}", other),
                    }
                }
                TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => Ev::Tempo(tempo.as_int()),
                TrackEventKind::Meta(MetaMessage::TrackName(name)) if name.is_empty() => Ev::Rest,
                TrackEventKind::Meta(MetaMessage::EndOfTrack) => Ev::End,
                other => panic!("unexpected event {:?}", other),
            };
            (event.delta.as_int(), kind)
        })
        .collect()
}

fn track(text: &str) -> Vec<(u32, Ev)> {
    events(&translate(text))
}

#[test]
fn test_header_chunk() {
    let midi = translate("t");
    assert_eq!(&midi[0..4], b"MThd");
    assert_eq!(&midi[4..8], &[0u8, 0, 0, 6]);
    assert_eq!(&midi[8..10], &[0u8, 0]); // format 0
    assert_eq!(&midi[10..12], &[0u8, 1]); // one track
    assert_eq!(&midi[12..14], &480u16.to_be_bytes());
    assert_eq!(&midi[14..18], b"MTrk");
}

#[test]
fn test_empty_input_is_still_a_file() {
    assert_eq!(
        track(""),
        vec![(0, Ev::Tempo(600_000)), (0, Ev::End)]
    );
}

#[test]
fn test_unmapped_text_has_no_notes() {
    for text in ["#&)", "?? ~~ ,,", "ÄÖÜ", "||", "TEMPO:abc", "]["] {
        assert_eq!(
            track(text),
            vec![(0, Ev::Tempo(600_000)), (0, Ev::End)],
            "input {:?}",
            text
        );
    }
}

#[test]
fn test_dashed_melody() {
    assert_eq!(
        parse_sheet("t-y-u").sheet.into_events(),
        vec![
            Event::note_group(vec![60], 200),
            Event::note_group(vec![62], 200),
            Event::note_group(vec![64], 200),
        ]
    );
    assert_eq!(
        track("t-y-u"),
        vec![
            (0, Ev::Tempo(600_000)),
            (0, Ev::On(60, 64)),
            (200, Ev::Off(60, 64)),
            (0, Ev::On(62, 64)),
            (200, Ev::Off(62, 64)),
            (0, Ev::On(64, 64)),
            (200, Ev::Off(64, 64)),
            (0, Ev::End),
        ]
    );
}

#[test]
fn test_dashed_melody_bytes() {
    let midi = translate("t-y-u");
    let body: &[u8] = &[
        0x00, 0xFF, 0x51, 0x03, 0x09, 0x27, 0xC0, //
        0x00, 0x90, 60, 64, 0x81, 0x48, 0x80, 60, 64, //
        0x00, 0x90, 62, 64, 0x81, 0x48, 0x80, 62, 64, //
        0x00, 0x90, 64, 64, 0x81, 0x48, 0x80, 64, 64, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    assert_eq!(&midi[18..22], &(body.len() as u32).to_be_bytes());
    assert_eq!(&midi[22..], body);
}

#[test]
fn test_chord() {
    assert_eq!(
        track("[as]"),
        vec![
            (0, Ev::Tempo(600_000)),
            (0, Ev::On(71, 64)),
            (0, Ev::On(72, 64)),
            (200, Ev::Off(71, 64)),
            (0, Ev::Off(72, 64)),
            (0, Ev::End),
        ]
    );
}

#[test]
fn test_tempo_token() {
    assert_eq!(
        track("TEMPO:120"),
        vec![
            (0, Ev::Tempo(600_000)),
            (0, Ev::Tempo(500_000)),
            (0, Ev::End),
        ]
    );
}

#[test]
fn test_bad_tempo_does_not_stop_parsing() {
    let out = translate_with("TEMPO:0 t TEMPO:abc y", &TranslateOptions::default());
    assert_eq!(
        out.sheet.events(),
        &[
            Event::note_group(vec![60], 200),
            Event::note_group(vec![62], 200),
        ][..]
    );
    assert_eq!(out.warnings.len(), 2);
    assert!(matches!(
        &out.warnings[0],
        VpError::MalformedTempo { token, line: 1, column: 1, .. } if token == "TEMPO:0"
    ));
}

#[test]
fn test_rests() {
    assert_eq!(
        track("| '"),
        vec![
            (0, Ev::Tempo(600_000)),
            (600, Ev::Rest),
            (120, Ev::Rest),
            (0, Ev::End),
        ]
    );
}

#[test]
fn test_mixed_sheet() {
    assert_eq!(
        parse_sheet("TEMPO:150 [sd] | a").sheet.into_events(),
        vec![
            Event::tempo_change(400_000),
            Event::note_group(vec![72, 74], 200),
            Event::rest(600),
            Event::note_group(vec![71], 200),
        ]
    );
}

#[test]
fn test_sheet_totals() {
    let sheet = parse_sheet("TEMPO:150 [sd] | a ' [#]").sheet;
    assert_eq!(sheet.note_count(), 3);
    assert_eq!(sheet.duration_ticks(), 200 + 600 + 200 + 120 + 200);
}

#[test]
fn test_empty_chord_keeps_time() {
    // the rest before `t` pushes its Note-On 200 ticks later
    assert_eq!(
        track("[#] t")[1..3].to_vec(),
        vec![(200, Ev::Rest), (0, Ev::On(60, 64))]
    );
}

#[test]
fn test_translate_is_deterministic() {
    let sheet = "TEMPO:90 [tuo]-[yip] ' | q w e r t y u i o p";
    assert_eq!(translate(sheet), translate(sheet));
}

#[test]
fn test_options() {
    let options = TranslateOptions::from_yaml("initial-bpm: 120\nvelocity: 90\n").unwrap();
    let out = translate_with("t", &options);
    let track = events(&out.bytes);
    assert_eq!(track[0], (0, Ev::Tempo(500_000)));
    assert_eq!(track[1], (0, Ev::On(60, 90)));
}

#[test]
fn test_write_translation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.mid");
    let midi = translate("[tuo] | t");

    write_file(&midi, &path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), midi);
}

#[test]
fn test_dump_events_yaml() {
    let sheet = parse_sheet("TEMPO:120 [as] '").sheet;
    let yaml = serde_yaml::to_string(&sheet).unwrap();
    assert!(yaml.contains("initial-tempo: 600000"));
    assert!(yaml.contains("type: tempo-change"));
    assert!(yaml.contains("micros-per-quarter: 500000"));
    assert!(yaml.contains("hold-ticks: 120"));
}

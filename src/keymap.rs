//! # Key Map
//!
//! The 61-key virtual piano layout: four keyboard rows, each split into a white-key
//! table and a black-key table. Shifted characters sit one semitone above the
//! white key they share a physical key with.
//!
//! ```text
//! row 1   1 2 3 4 5 6 7 8 9 0      C2 .. E3
//! row 2   q w e r t y u i o p      F3 .. A4   (t = middle C)
//! row 3   a s d f g h j k l        B4 .. C6
//! row 4   z x c v b n m            D6 .. C7
//! ```
//!
//! Several shifted keys have no entry (`#`, `&`, `R`, `U`, `F`, `K`, ...). Those
//! fall on E-F and B-C, where there is no black key, and must stay unmapped.
//! The jump from `l` (C6) to `z` (D6) leaves C#6 without a key, so the layout
//! holds 60 distinct notes across its 61-semitone span.

use std::collections::HashMap;
use std::sync::OnceLock;

const ROW1_WHITE: &[(char, u8)] = &[
    ('1', 36), // C2
    ('2', 38),
    ('3', 40),
    ('4', 41),
    ('5', 43),
    ('6', 45),
    ('7', 47),
    ('8', 48), // C3
    ('9', 50),
    ('0', 52),
];

const ROW1_BLACK: &[(char, u8)] = &[
    ('!', 37),
    ('@', 39),
    ('$', 42),
    ('%', 44),
    ('^', 46),
    ('*', 49),
    ('(', 51),
];

const ROW2_WHITE: &[(char, u8)] = &[
    ('q', 53),
    ('w', 55),
    ('e', 57),
    ('r', 59),
    ('t', 60), // C4
    ('y', 62),
    ('u', 64),
    ('i', 65),
    ('o', 67),
    ('p', 69),
];

const ROW2_BLACK: &[(char, u8)] = &[
    ('Q', 54),
    ('W', 56),
    ('E', 58),
    ('T', 61),
    ('Y', 63),
    ('I', 66),
    ('O', 68),
    ('P', 70),
];

const ROW3_WHITE: &[(char, u8)] = &[
    ('a', 71),
    ('s', 72), // C5
    ('d', 74),
    ('f', 76),
    ('g', 77),
    ('h', 79),
    ('j', 81),
    ('k', 83),
    ('l', 84), // C6
];

const ROW3_BLACK: &[(char, u8)] = &[('S', 73), ('D', 75), ('G', 78), ('H', 80), ('J', 82)];

const ROW4_WHITE: &[(char, u8)] = &[
    ('z', 86),
    ('x', 88),
    ('c', 89),
    ('v', 91),
    ('b', 93),
    ('n', 95),
    ('m', 96), // C7
];

const ROW4_BLACK: &[(char, u8)] = &[('Z', 87), ('C', 90), ('V', 92), ('B', 94)];

const ROWS: [&[(char, u8)]; 8] = [
    ROW1_WHITE, ROW1_BLACK, ROW2_WHITE, ROW2_BLACK, ROW3_WHITE, ROW3_BLACK, ROW4_WHITE,
    ROW4_BLACK,
];

/// Immutable character to MIDI note lookup.
#[derive(Debug, Clone)]
pub struct KeyMap {
    keys: HashMap<char, u8>,
}

impl KeyMap {
    /// Build the standard layout from the row tables.
    pub fn build() -> Self {
        let keys = ROWS
            .iter()
            .flat_map(|row| row.iter().copied())
            .collect();
        Self { keys }
    }

    /// The process-wide standard layout, built on first use.
    pub fn standard() -> &'static KeyMap {
        static STANDARD: OnceLock<KeyMap> = OnceLock::new();
        STANDARD.get_or_init(KeyMap::build)
    }

    /// MIDI note for `c`, or `None` if the character is not a key.
    pub fn lookup(&self, c: char) -> Option<u8> {
        self.keys.get(&c).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All `(character, note)` pairs, lowest note first.
    pub fn iter(&self) -> impl Iterator<Item = (char, u8)> {
        let mut pairs: Vec<(char, u8)> = self.keys.iter().map(|(&c, &n)| (c, n)).collect();
        pairs.sort_by_key(|&(_, note)| note);
        pairs.into_iter()
    }
}

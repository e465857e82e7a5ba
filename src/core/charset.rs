//! Character set handling for terminal emulation
//!
//! Supports DEC Special Graphics (line drawing) and a small set of
//! National Replacement Character Sets. The NRCS tables are sparse: any
//! code point without an entry passes through unchanged.

use serde::{Deserialize, Serialize};

/// Character set designations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharsetId {
    /// ASCII (US) - default
    #[default]
    UsAscii,
    /// DEC Special Graphics (line drawing characters)
    DecSpecial,
    /// DEC UK NRCS
    DecUk,
    /// DEC French NRCS
    DecFrench,
    /// DEC German NRCS
    DecGerman,
}

/// Translate a character through a specific charset
pub fn translate(c: char, charset: CharsetId) -> char {
    let table: &[(char, char)] = match charset {
        CharsetId::UsAscii => return c,
        CharsetId::DecSpecial => DEC_SPECIAL,
        CharsetId::DecUk => DEC_UK,
        CharsetId::DecFrench => DEC_FRENCH,
        CharsetId::DecGerman => DEC_GERMAN,
    };
    table
        .iter()
        .find(|&&(from, _)| from == c)
        .map_or(c, |&(_, to)| to)
}

/// Map a designator final byte (as in `ESC ( 0`) to a charset
pub fn resolve_charset(designator: u8) -> CharsetId {
    match designator {
        b'0' => CharsetId::DecSpecial,
        b'A' => CharsetId::DecUk,
        b'R' => CharsetId::DecFrench,
        b'K' => CharsetId::DecGerman,
        _ => CharsetId::UsAscii,
    }
}

/// DEC Special Graphics, backtick through tilde
const DEC_SPECIAL: &[(char, char)] = &[
    ('`', '◆'),
    ('a', '▒'),
    ('b', '␉'),
    ('c', '␌'),
    ('d', '␍'),
    ('e', '␊'),
    ('f', '°'),
    ('g', '±'),
    ('h', '␤'),
    ('i', '␋'),
    ('j', '┘'),
    ('k', '┐'),
    ('l', '┌'),
    ('m', '└'),
    ('n', '┼'),
    ('o', '⎺'),
    ('p', '⎻'),
    ('q', '─'),
    ('r', '⎼'),
    ('s', '⎽'),
    ('t', '├'),
    ('u', '┤'),
    ('v', '┴'),
    ('w', '┬'),
    ('x', '│'),
    ('y', '≤'),
    ('z', '≥'),
    ('{', 'π'),
    ('|', '≠'),
    ('}', '£'),
    ('~', '·'),
];

const DEC_UK: &[(char, char)] = &[('#', '£')];

const DEC_FRENCH: &[(char, char)] = &[
    ('#', '£'),
    ('@', 'à'),
    ('[', '°'),
    ('\\', 'ç'),
    (']', '§'),
    ('{', 'é'),
    ('|', 'ù'),
    ('}', 'è'),
    ('~', '¨'),
];

const DEC_GERMAN: &[(char, char)] = &[
    ('@', '§'),
    ('[', 'Ä'),
    ('\\', 'Ö'),
    (']', 'Ü'),
    ('{', 'ä'),
    ('|', 'ö'),
    ('}', 'ü'),
    ('~', 'ß'),
];

/// Character set state for the G0-G3 slots
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharsetState {
    /// Designated sets, G0 through G3
    pub slots: [CharsetId; 4],
    /// Slot invoked into GL (0 after SI, 1 after SO)
    pub active: u8,
    /// Slot used for the next character only (SS2/SS3)
    pub single_shift: Option<u8>,
}

impl CharsetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to default state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get the currently active charset
    pub fn current(&self) -> CharsetId {
        let slot = self.single_shift.unwrap_or(self.active);
        self.slots.get(usize::from(slot)).copied().unwrap_or_default()
    }

    /// Designate a charset into slot 0-3; other slots are ignored
    pub fn designate(&mut self, slot: u8, charset: CharsetId) {
        if let Some(target) = self.slots.get_mut(usize::from(slot)) {
            *target = charset;
        }
    }

    /// Shift In (SI) - select G0 into GL
    pub fn shift_in(&mut self) {
        self.active = 0;
        self.single_shift = None;
    }

    /// Shift Out (SO) - select G1 into GL
    pub fn shift_out(&mut self) {
        self.active = 1;
        self.single_shift = None;
    }

    /// Single Shift 2 (SS2) - use G2 for next character only
    pub fn single_shift_2(&mut self) {
        self.single_shift = Some(2);
    }

    /// Single Shift 3 (SS3) - use G3 for next character only
    pub fn single_shift_3(&mut self) {
        self.single_shift = Some(3);
    }

    /// Translate one printed character, consuming any pending single shift
    pub fn translate(&mut self, c: char) -> char {
        let out = translate(c, self.current());
        self.single_shift = None;
        out
    }
}

//! Incremental UTF-8 decoding for ground-state text.
//!
//! Bytes arrive one at a time and may be split across writes. Malformed
//! input decodes to U+FFFD.

pub const REPLACEMENT: char = '\u{FFFD}';

#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    buf: [u8; 4],
    len: u8,
    needed: u8,
}

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Step {
    /// More continuation bytes are expected
    Pending,
    /// A full character was decoded
    Char(char),
    /// The byte cannot start or continue a sequence
    Invalid,
}

impl Utf8Decoder {
    pub fn is_pending(&self) -> bool {
        self.needed > 0
    }

    pub fn reset(&mut self) {
        self.len = 0;
        self.needed = 0;
    }

    /// Begin a sequence with a lead byte (>= 0x80)
    pub fn start(&mut self, byte: u8) -> Utf8Step {
        let needed = match byte {
            0xC2..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF4 => 3,
            _ => return Utf8Step::Invalid,
        };
        self.buf[0] = byte;
        self.len = 1;
        self.needed = needed;
        Utf8Step::Pending
    }

    /// Feed a continuation byte. Returns `Invalid` without consuming the
    /// byte if it is not 0x80-0xBF; the caller must reprocess it.
    pub fn push(&mut self, byte: u8) -> Utf8Step {
        if !(0x80..=0xBF).contains(&byte) {
            self.reset();
            return Utf8Step::Invalid;
        }

        self.buf[self.len as usize] = byte;
        self.len += 1;
        self.needed -= 1;
        if self.needed > 0 {
            return Utf8Step::Pending;
        }

        let c = std::str::from_utf8(&self.buf[..self.len as usize])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(REPLACEMENT);
        self.reset();
        Utf8Step::Char(c)
    }
}

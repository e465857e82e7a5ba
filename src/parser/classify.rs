//! Byte Classification
//!
//! Maps every byte to the structural flags the parser dispatches on.
//! The table follows the VT500-series byte ranges:
//!
//! | Range       | Flags                                   |
//! |-------------|-----------------------------------------|
//! | 0x00-0x1F   | CONTROL (0x1B also ESCAPE, 0x07 also ST) |
//! | 0x20-0x2F   | INTERMEDIATE, PRINTABLE                 |
//! | 0x30-0x3F   | PARAMETER, PRINTABLE                    |
//! | 0x40-0x7E   | FINAL, PRINTABLE                        |
//! | 0x7F        | DELETE                                  |
//! | 0x80-0x9F   | CONTROL (0x9C also ST)                  |
//! | 0xA0-0xFF   | PRINTABLE                               |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Structural flags of a single byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ByteClass: u8 {
        /// C0 (0x00-0x1F) or C1 (0x80-0x9F) control
        const CONTROL = 1 << 0;
        /// Graphic byte that prints in ground state
        const PRINTABLE = 1 << 1;
        /// ESC (0x1B)
        const ESCAPE = 1 << 2;
        /// Parameter byte (0x30-0x3F)
        const PARAMETER = 1 << 3;
        /// Intermediate byte (0x20-0x2F)
        const INTERMEDIATE = 1 << 4;
        /// Final byte (0x40-0x7E)
        const FINAL = 1 << 5;
        /// DEL (0x7F)
        const DELETE = 1 << 6;
        /// BEL (0x07) or 8-bit ST (0x9C)
        const STRING_TERMINATOR = 1 << 7;
    }
}

/// Classify a byte. Total over `0..=255`.
pub const fn classify(byte: u8) -> ByteClass {
    let bits = match byte {
        0x07 => ByteClass::CONTROL.bits() | ByteClass::STRING_TERMINATOR.bits(),
        0x1B => ByteClass::CONTROL.bits() | ByteClass::ESCAPE.bits(),
        0x00..=0x1F => ByteClass::CONTROL.bits(),
        0x20..=0x2F => ByteClass::INTERMEDIATE.bits() | ByteClass::PRINTABLE.bits(),
        0x30..=0x3F => ByteClass::PARAMETER.bits() | ByteClass::PRINTABLE.bits(),
        0x40..=0x7E => ByteClass::FINAL.bits() | ByteClass::PRINTABLE.bits(),
        0x7F => ByteClass::DELETE.bits(),
        0x9C => ByteClass::CONTROL.bits() | ByteClass::STRING_TERMINATOR.bits(),
        0x80..=0x9F => ByteClass::CONTROL.bits(),
        _ => ByteClass::PRINTABLE.bits(),
    };
    ByteClass::from_bits_truncate(bits)
}

/// True for the C1 control range 0x80-0x9F
pub const fn is_c1(byte: u8) -> bool {
    matches!(byte, 0x80..=0x9F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_is_control() {
        let class = classify(0x1B);
        assert!(class.contains(ByteClass::CONTROL | ByteClass::ESCAPE));
        assert!(!class.contains(ByteClass::PRINTABLE));
    }

    #[test]
    fn test_delete_is_not_printable() {
        assert_eq!(classify(0x7F), ByteClass::DELETE);
    }

    #[test]
    fn test_final_bytes_also_print() {
        let class = classify(b'm');
        assert!(class.contains(ByteClass::FINAL));
        assert!(class.contains(ByteClass::PRINTABLE));
    }

    #[test]
    fn test_string_terminators() {
        assert!(classify(0x07).contains(ByteClass::STRING_TERMINATOR));
        assert!(classify(0x9C).contains(ByteClass::STRING_TERMINATOR));
        assert!(!classify(b'\\').contains(ByteClass::STRING_TERMINATOR));
    }

    #[test]
    fn test_high_bytes_default_to_printable() {
        assert_eq!(classify(0xA0), ByteClass::PRINTABLE);
        assert_eq!(classify(0xFF), ByteClass::PRINTABLE);
        assert!(is_c1(0x9B));
        assert!(!is_c1(0xA0));
    }
}

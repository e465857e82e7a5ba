//! Host-bound response encoding
//!
//! Responses are composed in 7-bit form. Under 8-bit C1 transmission the
//! `ESC [` introducer is rewritten to the single byte CSI (0x9B); string
//! controls keep their 7-bit form.

use crate::config::C1Transmission;

/// 8-bit Control Sequence Introducer
pub const CSI_8BIT: u8 = 0x9B;

/// Encode a 7-bit response for transmission. Every character becomes one
/// byte; code points above U+00FF are sent as `?`.
pub fn encode_response_payload(sequence: &str, mode: C1Transmission) -> Vec<u8> {
    let mut out = Vec::with_capacity(sequence.len());
    let mut chars = sequence.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && mode == C1Transmission::EightBit && chars.peek() == Some(&'[') {
            chars.next();
            out.push(CSI_8BIT);
            continue;
        }
        out.push(u8::try_from(u32::from(c)).unwrap_or(b'?'));
    }
    out
}

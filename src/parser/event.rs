//! Parser events
//!
//! The ordered, immutable records the parser hands to the interpreter.
//! These are the only channel between the two; the parser never touches
//! terminal state.

use serde::{Deserialize, Serialize};

/// Header of a CSI sequence: `CSI [private] params [intermediates] final`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsiDispatch {
    /// Private marker byte (`<`, `=`, `>` or `?`) if the sequence opened with one
    pub private_marker: Option<u8>,
    /// Numeric parameters; empty slots are 0
    pub params: Vec<u16>,
    /// Intermediate bytes (0x20-0x2F)
    pub intermediates: Vec<u8>,
    /// Final byte (0x40-0x7E)
    pub final_byte: u8,
}

impl CsiDispatch {
    pub fn new(final_byte: u8) -> Self {
        Self {
            private_marker: None,
            params: Vec::new(),
            intermediates: Vec::new(),
            final_byte,
        }
    }

    /// Get parameter at index, or default value if not present
    pub fn param(&self, index: usize, default: u16) -> u16 {
        self.params.get(index).copied().unwrap_or(default)
    }

    /// Get parameter at index, treating 0 as default
    pub fn param_or_default(&self, index: usize, default: u16) -> u16 {
        match self.params.get(index) {
            Some(&0) | None => default,
            Some(&v) => v,
        }
    }
}

/// DCS headers share the CSI shape
pub type DcsHeader = CsiDispatch;

/// Which string class an SOS/PM/APC payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringKind {
    /// Start of String (ESC X)
    Sos,
    /// Privacy Message (ESC ^)
    Pm,
    /// Application Program Command (ESC _)
    Apc,
}

/// Events produced by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParserEvent {
    /// Print a glyph at the cursor
    Print(char),

    /// Execute a C0 or C1 control byte
    Execute(u8),

    /// Two-character escape: `ESC [intermediates] final`
    EscDispatch {
        /// Intermediate bytes (0x20-0x2F)
        intermediates: Vec<u8>,
        /// Final byte (0x30-0x7E)
        final_byte: u8,
    },

    /// Complete control sequence
    CsiDispatch(CsiDispatch),

    /// Complete OSC payload, without introducer or terminator
    OscDispatch(Vec<u8>),

    /// DCS header parsed; payload follows as `DcsPut`
    DcsHook(DcsHeader),

    /// One DCS payload byte
    DcsPut(u8),

    /// DCS terminated within its length limit
    DcsUnhook,

    /// Complete SOS/PM/APC payload
    SosPmApcDispatch {
        kind: StringKind,
        payload: Vec<u8>,
    },

    /// A malformed, truncated, or cancelled sequence was dropped
    Ignore,
}

impl ParserEvent {
    /// Check if this is a print event
    pub fn is_print(&self) -> bool {
        matches!(self, ParserEvent::Print(_))
    }

    /// Check if this is a CSI dispatch
    pub fn is_csi(&self) -> bool {
        matches!(self, ParserEvent::CsiDispatch(_))
    }

    /// Check if this event belongs to a DCS session
    pub fn is_dcs(&self) -> bool {
        matches!(
            self,
            ParserEvent::DcsHook(_) | ParserEvent::DcsPut(_) | ParserEvent::DcsUnhook
        )
    }
}

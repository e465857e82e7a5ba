//! Parser State Machine
//!
//! Implements a VT500-series compatible parser state machine.
//! The parser handles arbitrary chunk boundaries and emits
//! [`ParserEvent`]s for the interpreter.
//!
//! # State Machine
//!
//! The parser follows the state machine model described in:
//! - "A parser for DEC's ANSI-compatible video terminals" by Paul Williams
//! - https://vt100.net/emu/dec_ansi_parser
//!
//! States:
//! - Ground: Normal text processing
//! - Escape / EscapeIntermediate: After ESC, collecting an escape sequence
//! - CsiEntry / CsiParam / CsiIntermediate: Collecting a control sequence
//! - CsiIgnore: Discarding a malformed control sequence up to its final byte
//! - OscString: Collecting OSC payload
//! - DcsEntry / DcsParam / DcsIntermediate: Collecting a DCS header
//! - DcsPassthrough: Streaming DCS payload
//! - DcsIgnore: Discarding a malformed or truncated DCS up to its terminator
//! - SosPmApcString: SOS/PM/APC string collection
//!
//! # String limits
//!
//! OSC and SOS/PM/APC payloads are buffered up to their configured limit.
//! One byte more cancels the string: the buffer is dropped and no dispatch
//! happens when the terminator arrives. DCS payloads are streamed byte by
//! byte; once the limit is reached the parser falls into `DcsIgnore`, which
//! swallows the rest and never emits `DcsUnhook`.

use serde::{Deserialize, Serialize};

use super::classify::{classify, is_c1, ByteClass};
use super::event::{CsiDispatch, ParserEvent, StringKind};
use super::params::{ParamsBuilder, MAX_INTERMEDIATES};
use super::utf8::{Utf8Decoder, Utf8Step, REPLACEMENT};
use crate::config::ParserOptions;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserState {
    #[default]
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    OscString,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,
    SosPmApcString,
}

impl ParserState {
    /// States that end on ST or BEL
    fn is_string(self) -> bool {
        matches!(
            self,
            ParserState::OscString
                | ParserState::SosPmApcString
                | ParserState::DcsEntry
                | ParserState::DcsParam
                | ParserState::DcsIntermediate
                | ParserState::DcsPassthrough
                | ParserState::DcsIgnore
        )
    }
}

/// Length-bounded payload buffer for one string channel
#[derive(Debug, Clone, Default)]
struct StringBuffer {
    payload: Vec<u8>,
    limit: usize,
    cancelled: bool,
}

impl StringBuffer {
    fn with_limit(limit: usize) -> Self {
        Self {
            payload: Vec::new(),
            limit,
            cancelled: false,
        }
    }

    fn clear(&mut self) {
        self.payload.clear();
        self.cancelled = false;
    }

    /// Append a byte. Returns false the first time the limit is exceeded.
    fn push(&mut self, byte: u8) -> bool {
        if self.cancelled {
            return true;
        }
        if self.payload.len() >= self.limit {
            self.payload = Vec::new();
            self.cancelled = true;
            return false;
        }
        self.payload.push(byte);
        true
    }

    /// Finished payload, or `None` if the channel was cancelled
    fn finish(&mut self) -> Option<Vec<u8>> {
        let result = if self.cancelled {
            None
        } else {
            Some(std::mem::take(&mut self.payload))
        };
        self.clear();
        result
    }
}

/// The terminal parser
#[derive(Debug, Clone)]
pub struct Parser {
    options: ParserOptions,
    state: ParserState,
    /// Parameters for CSI and DCS headers
    params: ParamsBuilder,
    /// Intermediate bytes collected during parsing
    intermediates: Vec<u8>,
    /// Set when more intermediates arrived than we keep
    intermediates_overflow: bool,
    /// Private marker (`<`, `=`, `>`, `?`)
    private_marker: Option<u8>,
    osc: StringBuffer,
    sos_pm_apc: StringBuffer,
    sos_pm_apc_kind: StringKind,
    /// DCS bytes emitted so far in the current passthrough
    dcs_len: usize,
    utf8: Utf8Decoder,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl Parser {
    /// Create a new parser in the ground state
    pub fn new(options: ParserOptions) -> Self {
        let limits = options.string_limits;
        Self {
            options,
            state: ParserState::Ground,
            params: ParamsBuilder::new(),
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            intermediates_overflow: false,
            private_marker: None,
            osc: StringBuffer::with_limit(limits.osc),
            sos_pm_apc: StringBuffer::with_limit(limits.sos_pm_apc),
            sos_pm_apc_kind: StringKind::Sos,
            dcs_len: 0,
            utf8: Utf8Decoder::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Reset the parser to its initial state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = ParserState::Ground;
        self.clear_sequence();
        self.osc.clear();
        self.sos_pm_apc.clear();
        self.sos_pm_apc_kind = StringKind::Sos;
        self.dcs_len = 0;
        self.utf8.reset();
    }

    /// Feed bytes, delivering every resulting event to `sink` in order
    pub fn write<F>(&mut self, data: &[u8], mut sink: F)
    where
        F: FnMut(ParserEvent),
    {
        for &byte in data {
            self.advance(byte, &mut sink);
        }
    }

    /// Feed text. Code points below U+00A0 take the byte path; others print
    /// directly in ground state or join the open string payload.
    pub fn write_str<F>(&mut self, text: &str, mut sink: F)
    where
        F: FnMut(ParserEvent),
    {
        for c in text.chars() {
            if (c as u32) < 0xA0 {
                self.advance(c as u8, &mut sink);
            } else {
                self.advance_char(c, &mut sink);
            }
        }
    }

    /// Feed bytes and collect the events
    pub fn parse(&mut self, data: &[u8]) -> Vec<ParserEvent> {
        let mut events = Vec::new();
        self.write(data, |event| events.push(event));
        events
    }

    /// Clear header accumulation (params, intermediates, private marker)
    fn clear_sequence(&mut self) {
        self.params.clear();
        self.intermediates.clear();
        self.intermediates_overflow = false;
        self.private_marker = None;
    }

    /// Process a single byte
    fn advance<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        // UTF-8 continuation in ground state
        if self.state == ParserState::Ground && self.utf8.is_pending() {
            match self.utf8.push(byte) {
                Utf8Step::Pending => return,
                Utf8Step::Char(c) => {
                    sink(ParserEvent::Print(c));
                    return;
                }
                // Broken sequence: emit a replacement, then reprocess the byte
                Utf8Step::Invalid => sink(ParserEvent::Print(REPLACEMENT)),
            }
        }

        let class = classify(byte);

        // CAN and SUB abort any sequence
        if byte == 0x18 || byte == 0x1A {
            if self.state == ParserState::Ground {
                sink(ParserEvent::Execute(byte));
            } else {
                tracing::trace!(state = ?self.state, "sequence cancelled by CAN/SUB");
                self.abort();
                sink(ParserEvent::Ignore);
            }
            return;
        }

        if class.contains(ByteClass::ESCAPE) {
            if self.state.is_string() {
                self.terminate_string(sink);
            }
            self.enter(ParserState::Escape);
            return;
        }

        if class.contains(ByteClass::DELETE) {
            return;
        }

        if is_c1(byte) {
            let in_string = self.state.is_string();
            if self.options.accept_c1_controls && !in_string {
                self.process_c1(byte, sink);
                return;
            }
            if self.options.accept_c1_controls && byte == 0x9C && !self.options.utf8 {
                self.terminate_string(sink);
                return;
            }
            if self.state == ParserState::Ground {
                sink(ParserEvent::Execute(byte));
                return;
            }
            // Otherwise a data byte for the current state
        } else if class.contains(ByteClass::CONTROL) {
            self.process_c0(byte, class, sink);
            return;
        }

        match self.state {
            ParserState::Ground => self.process_ground(byte, sink),
            ParserState::Escape => self.process_escape(byte, sink),
            ParserState::EscapeIntermediate => self.process_escape_intermediate(byte, sink),
            ParserState::CsiEntry => self.process_csi_entry(byte, sink),
            ParserState::CsiParam => self.process_csi_param(byte, sink),
            ParserState::CsiIntermediate => self.process_csi_intermediate(byte, sink),
            ParserState::CsiIgnore => self.process_csi_ignore(byte, sink),
            ParserState::OscString => self.put_osc(byte),
            ParserState::DcsEntry => self.process_dcs_entry(byte, sink),
            ParserState::DcsParam => self.process_dcs_param(byte, sink),
            ParserState::DcsIntermediate => self.process_dcs_intermediate(byte, sink),
            ParserState::DcsPassthrough => self.put_dcs(byte, sink),
            ParserState::DcsIgnore => {}
            ParserState::SosPmApcString => self.put_sos_pm_apc(byte),
        }
    }

    /// Process a non-ASCII code point from text input
    fn advance_char<F: FnMut(ParserEvent)>(&mut self, c: char, sink: &mut F) {
        let mut buf = [0u8; 4];
        match self.state {
            ParserState::Ground => {
                if self.utf8.is_pending() {
                    self.utf8.reset();
                    sink(ParserEvent::Print(REPLACEMENT));
                }
                sink(ParserEvent::Print(c));
            }
            ParserState::OscString => {
                for &b in c.encode_utf8(&mut buf).as_bytes() {
                    self.put_osc(b);
                }
            }
            ParserState::SosPmApcString => {
                for &b in c.encode_utf8(&mut buf).as_bytes() {
                    self.put_sos_pm_apc(b);
                }
            }
            ParserState::DcsPassthrough => {
                for &b in c.encode_utf8(&mut buf).as_bytes() {
                    self.put_dcs(b, sink);
                }
            }
            ParserState::Escape | ParserState::EscapeIntermediate => {
                self.state = ParserState::Ground;
            }
            ParserState::CsiEntry | ParserState::CsiParam | ParserState::CsiIntermediate => {
                self.state = ParserState::CsiIgnore;
            }
            ParserState::DcsEntry | ParserState::DcsParam | ParserState::DcsIntermediate => {
                self.state = ParserState::DcsIgnore;
            }
            ParserState::CsiIgnore | ParserState::DcsIgnore => {}
        }
    }

    /// Enter a new state, resetting whatever it accumulates
    fn enter(&mut self, state: ParserState) {
        match state {
            ParserState::Escape
            | ParserState::CsiEntry
            | ParserState::DcsEntry => self.clear_sequence(),
            ParserState::OscString => self.osc.clear(),
            ParserState::SosPmApcString => self.sos_pm_apc.clear(),
            ParserState::DcsPassthrough => self.dcs_len = 0,
            _ => {}
        }
        self.state = state;
    }

    /// Drop the current sequence and return to ground
    fn abort(&mut self) {
        self.clear_sequence();
        self.osc.clear();
        self.sos_pm_apc.clear();
        self.dcs_len = 0;
        self.state = ParserState::Ground;
    }

    /// Process C0 control characters (0x00-0x1F) other than ESC, CAN, SUB
    fn process_c0<F: FnMut(ParserEvent)>(&mut self, byte: u8, class: ByteClass, sink: &mut F) {
        let terminator = class.contains(ByteClass::STRING_TERMINATOR);
        match self.state {
            ParserState::OscString
            | ParserState::SosPmApcString
            | ParserState::DcsEntry
            | ParserState::DcsParam
            | ParserState::DcsIntermediate
            | ParserState::DcsIgnore => {
                if terminator {
                    self.terminate_string_with_bell(byte, sink);
                }
            }
            ParserState::DcsPassthrough => {
                if terminator {
                    self.terminate_string_with_bell(byte, sink);
                } else {
                    self.put_dcs(byte, sink);
                }
            }
            // Ground, escape, and CSI states execute controls in place
            _ => sink(ParserEvent::Execute(byte)),
        }
    }

    /// Process 8-bit C1 controls outside string states
    fn process_c1<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            0x90 => self.enter(ParserState::DcsEntry),
            0x98 => self.enter_sos_pm_apc(StringKind::Sos),
            0x9B => self.enter(ParserState::CsiEntry),
            0x9D => self.enter(ParserState::OscString),
            0x9E => self.enter_sos_pm_apc(StringKind::Pm),
            0x9F => self.enter_sos_pm_apc(StringKind::Apc),
            _ => {
                if self.state != ParserState::Ground {
                    self.abort();
                }
                sink(ParserEvent::Execute(byte));
            }
        }
    }

    fn enter_sos_pm_apc(&mut self, kind: StringKind) {
        self.sos_pm_apc_kind = kind;
        self.enter(ParserState::SosPmApcString);
    }

    /// Process bytes in ground state (normal text)
    fn process_ground<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        if byte < 0x80 {
            sink(ParserEvent::Print(byte as char));
        } else if self.options.utf8 {
            if self.utf8.start(byte) == Utf8Step::Invalid {
                sink(ParserEvent::Print(REPLACEMENT));
            }
        } else {
            // Latin-1 upper half
            sink(ParserEvent::Print(char::from(byte)));
        }
    }

    /// Process bytes in escape state
    fn process_escape<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            0x20..=0x2F => {
                self.collect_intermediate(byte);
                self.state = ParserState::EscapeIntermediate;
            }
            b'[' => self.enter(ParserState::CsiEntry),
            b']' => self.enter(ParserState::OscString),
            b'P' => self.enter(ParserState::DcsEntry),
            b'X' => self.enter_sos_pm_apc(StringKind::Sos),
            b'^' => self.enter_sos_pm_apc(StringKind::Pm),
            b'_' => self.enter_sos_pm_apc(StringKind::Apc),
            // ST with nothing open
            b'\\' => self.state = ParserState::Ground,
            0x30..=0x7E => {
                self.state = ParserState::Ground;
                sink(ParserEvent::EscDispatch {
                    intermediates: Vec::new(),
                    final_byte: byte,
                });
            }
            _ => self.state = ParserState::Ground,
        }
    }

    /// Process bytes in escape intermediate state
    fn process_escape_intermediate<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            0x20..=0x2F => self.collect_intermediate(byte),
            0x30..=0x7E => {
                self.state = ParserState::Ground;
                if self.intermediates_overflow {
                    sink(ParserEvent::Ignore);
                } else {
                    sink(ParserEvent::EscDispatch {
                        intermediates: std::mem::take(&mut self.intermediates),
                        final_byte: byte,
                    });
                }
                self.clear_sequence();
            }
            _ => self.state = ParserState::Ground,
        }
    }

    /// Keep an intermediate byte if there is room
    fn collect_intermediate(&mut self, byte: u8) {
        if self.intermediates.len() < MAX_INTERMEDIATES {
            self.intermediates.push(byte);
        } else {
            self.intermediates_overflow = true;
        }
    }

    /// Process bytes in CSI entry state
    fn process_csi_entry<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            b'0'..=b'9' => {
                self.params.push_digit(byte);
                self.state = ParserState::CsiParam;
            }
            b';' => {
                self.params.separator();
                self.state = ParserState::CsiParam;
            }
            // Private marker
            b'<' | b'=' | b'>' | b'?' => {
                self.private_marker = Some(byte);
                self.state = ParserState::CsiParam;
            }
            0x20..=0x2F => {
                self.collect_intermediate(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => self.dispatch_csi(byte, sink),
            // Colon, or anything outside the CSI repertoire
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    /// Process bytes in CSI param state
    fn process_csi_param<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            b'0'..=b'9' => self.params.push_digit(byte),
            b';' => self.params.separator(),
            0x20..=0x2F => {
                self.collect_intermediate(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => self.dispatch_csi(byte, sink),
            // Colon, or a private marker in the wrong position
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    /// Process bytes in CSI intermediate state
    fn process_csi_intermediate<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            0x20..=0x2F => self.collect_intermediate(byte),
            0x40..=0x7E => self.dispatch_csi(byte, sink),
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    /// Process bytes in CSI ignore state
    fn process_csi_ignore<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        if (0x40..=0x7E).contains(&byte) {
            self.state = ParserState::Ground;
            self.clear_sequence();
            sink(ParserEvent::Ignore);
        }
    }

    /// Build the header shared by CSI and DCS from the accumulated state
    fn take_header(&mut self, final_byte: u8) -> CsiDispatch {
        let header = CsiDispatch {
            private_marker: self.private_marker,
            params: self.params.finish(),
            intermediates: std::mem::take(&mut self.intermediates),
            final_byte,
        };
        self.clear_sequence();
        header
    }

    /// Dispatch CSI sequence
    fn dispatch_csi<F: FnMut(ParserEvent)>(&mut self, final_byte: u8, sink: &mut F) {
        self.state = ParserState::Ground;
        if self.intermediates_overflow {
            self.clear_sequence();
            sink(ParserEvent::Ignore);
            return;
        }
        let csi = self.take_header(final_byte);
        sink(ParserEvent::CsiDispatch(csi));
    }

    fn put_osc(&mut self, byte: u8) {
        if !self.osc.push(byte) {
            tracing::trace!(limit = self.osc.limit, "OSC payload over limit, cancelled");
        }
    }

    fn put_sos_pm_apc(&mut self, byte: u8) {
        if !self.sos_pm_apc.push(byte) {
            tracing::trace!(
                kind = ?self.sos_pm_apc_kind,
                limit = self.sos_pm_apc.limit,
                "string payload over limit, cancelled"
            );
        }
    }

    /// Process bytes in DCS entry state
    fn process_dcs_entry<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            b'0'..=b'9' => {
                self.params.push_digit(byte);
                self.state = ParserState::DcsParam;
            }
            b';' => {
                self.params.separator();
                self.state = ParserState::DcsParam;
            }
            b'<' | b'=' | b'>' | b'?' => {
                self.private_marker = Some(byte);
                self.state = ParserState::DcsParam;
            }
            0x20..=0x2F => {
                self.collect_intermediate(byte);
                self.state = ParserState::DcsIntermediate;
            }
            0x40..=0x7E => self.hook_dcs(byte, sink),
            _ => self.state = ParserState::DcsIgnore,
        }
    }

    /// Process bytes in DCS param state
    fn process_dcs_param<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            b'0'..=b'9' => self.params.push_digit(byte),
            b';' => self.params.separator(),
            0x20..=0x2F => {
                self.collect_intermediate(byte);
                self.state = ParserState::DcsIntermediate;
            }
            0x40..=0x7E => self.hook_dcs(byte, sink),
            _ => self.state = ParserState::DcsIgnore,
        }
    }

    /// Process bytes in DCS intermediate state
    fn process_dcs_intermediate<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        match byte {
            0x20..=0x2F => self.collect_intermediate(byte),
            0x40..=0x7E => self.hook_dcs(byte, sink),
            _ => self.state = ParserState::DcsIgnore,
        }
    }

    fn hook_dcs<F: FnMut(ParserEvent)>(&mut self, final_byte: u8, sink: &mut F) {
        if self.intermediates_overflow {
            self.clear_sequence();
            self.state = ParserState::DcsIgnore;
            return;
        }
        let header = self.take_header(final_byte);
        self.enter(ParserState::DcsPassthrough);
        sink(ParserEvent::DcsHook(header));
    }

    /// Stream one DCS payload byte, or start swallowing once over the limit
    fn put_dcs<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        if self.dcs_len >= self.options.string_limits.dcs {
            tracing::trace!(
                limit = self.options.string_limits.dcs,
                "DCS payload over limit, truncated"
            );
            self.state = ParserState::DcsIgnore;
            return;
        }
        self.dcs_len += 1;
        sink(ParserEvent::DcsPut(byte));
    }

    /// BEL ends the string and still rings: the closing event comes first,
    /// then the BEL as an ordinary control
    fn terminate_string_with_bell<F: FnMut(ParserEvent)>(&mut self, byte: u8, sink: &mut F) {
        self.terminate_string(sink);
        sink(ParserEvent::Execute(byte));
    }

    /// Terminate string sequence (ST or BEL received)
    fn terminate_string<F: FnMut(ParserEvent)>(&mut self, sink: &mut F) {
        let event = match self.state {
            ParserState::OscString => match self.osc.finish() {
                Some(payload) => ParserEvent::OscDispatch(payload),
                None => ParserEvent::Ignore,
            },
            ParserState::SosPmApcString => match self.sos_pm_apc.finish() {
                Some(payload) => ParserEvent::SosPmApcDispatch {
                    kind: self.sos_pm_apc_kind,
                    payload,
                },
                None => ParserEvent::Ignore,
            },
            ParserState::DcsPassthrough => ParserEvent::DcsUnhook,
            // Malformed or truncated DCS, or a header cut short
            ParserState::DcsIgnore
            | ParserState::DcsEntry
            | ParserState::DcsParam
            | ParserState::DcsIntermediate => ParserEvent::Ignore,
            _ => return,
        };

        self.clear_sequence();
        self.dcs_len = 0;
        self.state = ParserState::Ground;
        sink(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StringLimits;

    fn parser_with_limits(osc: usize, dcs: usize, sos_pm_apc: usize) -> Parser {
        Parser::new(ParserOptions {
            string_limits: StringLimits {
                osc,
                dcs,
                sos_pm_apc,
            },
            ..ParserOptions::default()
        })
    }

    fn csi(events: &[ParserEvent]) -> &CsiDispatch {
        match events {
            [ParserEvent::CsiDispatch(csi)] => csi,
            other => panic!("Expected a single CsiDispatch, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_print() {
        let mut parser = Parser::default();
        let events = parser.parse(b"Hello");

        assert_eq!(events.len(), 5);
        assert_eq!(events[0], ParserEvent::Print('H'));
        assert_eq!(events[4], ParserEvent::Print('o'));
    }

    #[test]
    fn test_parser_c0_controls() {
        let mut parser = Parser::default();
        let events = parser.parse(b"A\nB\rC");

        assert_eq!(
            events,
            vec![
                ParserEvent::Print('A'),
                ParserEvent::Execute(b'\n'),
                ParserEvent::Print('B'),
                ParserEvent::Execute(b'\r'),
                ParserEvent::Print('C'),
            ]
        );
    }

    #[test]
    fn test_parser_csi_cursor_up() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[5A");

        let csi = csi(&events);
        assert_eq!(csi.params, vec![5]);
        assert_eq!(csi.final_byte, b'A');
        assert_eq!(csi.private_marker, None);
    }

    #[test]
    fn test_parser_csi_cup() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[10;20H");

        let csi = csi(&events);
        assert_eq!(csi.params, vec![10, 20]);
        assert_eq!(csi.final_byte, b'H');
    }

    #[test]
    fn test_parser_csi_private() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[?25h");

        let csi = csi(&events);
        assert_eq!(csi.params, vec![25]);
        assert_eq!(csi.final_byte, b'h');
        assert_eq!(csi.private_marker, Some(b'?'));
    }

    #[test]
    fn test_parser_csi_intermediates() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[!p");

        let csi = csi(&events);
        assert!(csi.params.is_empty());
        assert_eq!(csi.intermediates, vec![b'!']);
        assert_eq!(csi.final_byte, b'p');
    }

    #[test]
    fn test_parser_empty_params() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[H");
        assert!(csi(&events).params.is_empty());

        let events = parser.parse(b"\x1b[;H");
        assert_eq!(csi(&events).params, vec![0, 0]);
    }

    #[test]
    fn test_parser_c1_csi() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x9b2J");

        let csi = csi(&events);
        assert_eq!(csi.params, vec![2]);
        assert_eq!(csi.final_byte, b'J');
    }

    #[test]
    fn test_parser_c1_rejected_for_seven_bit_specs() {
        let mut parser = Parser::new(ParserOptions {
            accept_c1_controls: false,
            ..ParserOptions::default()
        });
        let events = parser.parse(b"\x9b2J");

        assert_eq!(
            events,
            vec![
                ParserEvent::Execute(0x9B),
                ParserEvent::Print('2'),
                ParserEvent::Print('J'),
            ]
        );
    }

    #[test]
    fn test_parser_malformed_csi_is_dropped() {
        let mut parser = Parser::default();
        // Private marker after a parameter
        let events = parser.parse(b"\x1b[1?5hX");

        assert_eq!(events, vec![ParserEvent::Ignore, ParserEvent::Print('X')]);
        assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn test_parser_colon_is_ignored() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[38:2:1:2:3m");
        assert_eq!(events, vec![ParserEvent::Ignore]);
    }

    #[test]
    fn test_parser_too_many_intermediates() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[1 !\"p");
        assert_eq!(events, vec![ParserEvent::Ignore]);
    }

    #[test]
    fn test_parser_c0_inside_csi_executes() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[2\rA");

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ParserEvent::Execute(b'\r'));
        assert_eq!(csi(&events[1..]).params, vec![2]);
    }

    #[test]
    fn test_parser_esc_dispatch() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b7\x1b8");

        assert_eq!(
            events,
            vec![
                ParserEvent::EscDispatch {
                    intermediates: vec![],
                    final_byte: b'7'
                },
                ParserEvent::EscDispatch {
                    intermediates: vec![],
                    final_byte: b'8'
                },
            ]
        );
    }

    #[test]
    fn test_parser_designate_charset() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b(B\x1b)0");

        assert_eq!(
            events,
            vec![
                ParserEvent::EscDispatch {
                    intermediates: vec![b'('],
                    final_byte: b'B'
                },
                ParserEvent::EscDispatch {
                    intermediates: vec![b')'],
                    final_byte: b'0'
                },
            ]
        );
    }

    #[test]
    fn test_parser_osc_bel() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b]0;My Title\x07");

        assert_eq!(
            events,
            vec![
                ParserEvent::OscDispatch(b"0;My Title".to_vec()),
                ParserEvent::Execute(0x07),
            ]
        );
    }

    #[test]
    fn test_parser_osc_st() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b]2;Title\x1b\\X");

        assert_eq!(
            events,
            vec![
                ParserEvent::OscDispatch(b"2;Title".to_vec()),
                ParserEvent::Print('X'),
            ]
        );
    }

    #[test]
    fn test_parser_osc_c1_st() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x9d1;icon\x9c");
        assert_eq!(events, vec![ParserEvent::OscDispatch(b"1;icon".to_vec())]);
    }

    #[test]
    fn test_parser_osc_at_limit_dispatches() {
        let mut parser = parser_with_limits(4, 16, 16);
        let events = parser.parse(b"\x1b]abcd\x1b\\");
        assert_eq!(events, vec![ParserEvent::OscDispatch(b"abcd".to_vec())]);
    }

    #[test]
    fn test_parser_osc_over_limit_cancelled() {
        let mut parser = parser_with_limits(4, 16, 16);
        let events = parser.parse(b"\x1b]abcdefgh");
        assert!(events.is_empty());
        assert_eq!(parser.state(), ParserState::OscString);

        let events = parser.parse(b"\x07Z");
        assert_eq!(
            events,
            vec![
                ParserEvent::Ignore,
                ParserEvent::Execute(0x07),
                ParserEvent::Print('Z'),
            ]
        );
        assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn test_parser_dcs_streams() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1bP1$qm\x1b\\");

        let mut header = CsiDispatch::new(b'q');
        header.params = vec![1];
        header.intermediates = vec![b'$'];

        assert_eq!(
            events,
            vec![
                ParserEvent::DcsHook(header),
                ParserEvent::DcsPut(b'm'),
                ParserEvent::DcsUnhook,
            ]
        );
    }

    #[test]
    fn test_parser_dcs_truncated_never_unhooks() {
        let mut parser = parser_with_limits(16, 3, 16);
        let events = parser.parse(b"\x1bPqabcdef\x1b\\Z");

        assert_eq!(
            events,
            vec![
                ParserEvent::DcsHook(CsiDispatch::new(b'q')),
                ParserEvent::DcsPut(b'a'),
                ParserEvent::DcsPut(b'b'),
                ParserEvent::DcsPut(b'c'),
                ParserEvent::Ignore,
                ParserEvent::Print('Z'),
            ]
        );
        assert!(!events.contains(&ParserEvent::DcsUnhook));
    }

    #[test]
    fn test_parser_dcs_bel_terminator_rings() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1bPqx\x07");
        assert_eq!(
            events,
            vec![
                ParserEvent::DcsHook(CsiDispatch::new(b'q')),
                ParserEvent::DcsPut(b'x'),
                ParserEvent::DcsUnhook,
                ParserEvent::Execute(0x07),
            ]
        );

        // Still no unhook once truncated
        let mut parser = parser_with_limits(16, 1, 16);
        let events = parser.parse(b"\x1bPqxy\x07");
        assert_eq!(
            events,
            vec![
                ParserEvent::DcsHook(CsiDispatch::new(b'q')),
                ParserEvent::DcsPut(b'x'),
                ParserEvent::Ignore,
                ParserEvent::Execute(0x07),
            ]
        );
        assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn test_parser_sos_pm_apc() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b_app\x1b\\\x1b^pm\x07");

        assert_eq!(
            events,
            vec![
                ParserEvent::SosPmApcDispatch {
                    kind: StringKind::Apc,
                    payload: b"app".to_vec()
                },
                ParserEvent::SosPmApcDispatch {
                    kind: StringKind::Pm,
                    payload: b"pm".to_vec()
                },
                ParserEvent::Execute(0x07),
            ]
        );
    }

    #[test]
    fn test_parser_sos_over_limit_cancelled() {
        let mut parser = parser_with_limits(16, 16, 2);
        let events = parser.parse(b"\x1bXabc\x1b\\");
        assert_eq!(events, vec![ParserEvent::Ignore]);
    }

    #[test]
    fn test_parser_chunk_boundary() {
        let mut parser = Parser::default();

        let events1 = parser.parse(b"\x1b[");
        let events2 = parser.parse(b"5");
        let events3 = parser.parse(b"A");

        assert!(events1.is_empty());
        assert!(events2.is_empty());
        assert_eq!(csi(&events3).params, vec![5]);
    }

    #[test]
    fn test_parser_cancel_sequence() {
        let mut parser = Parser::default();
        let events = parser.parse(b"\x1b[5\x18A");

        assert_eq!(events, vec![ParserEvent::Ignore, ParserEvent::Print('A')]);
    }

    #[test]
    fn test_parser_latin1_without_utf8() {
        let mut parser = Parser::default();
        let events = parser.parse(&[0xE9]);
        assert_eq!(events, vec![ParserEvent::Print('é')]);
    }

    #[test]
    fn test_parser_utf8() {
        let mut parser = Parser::new(ParserOptions {
            utf8: true,
            ..ParserOptions::default()
        });
        let events = parser.parse("Hello 世界".as_bytes());

        assert_eq!(events.len(), 8);
        assert_eq!(events[6], ParserEvent::Print('世'));
        assert_eq!(events[7], ParserEvent::Print('界'));
    }

    #[test]
    fn test_parser_utf8_chunk_boundary() {
        let mut parser = Parser::new(ParserOptions {
            utf8: true,
            ..ParserOptions::default()
        });

        // UTF-8 for '世' is E4 B8 96
        assert!(parser.parse(&[0xE4]).is_empty());
        assert!(parser.parse(&[0xB8]).is_empty());
        assert_eq!(parser.parse(&[0x96]), vec![ParserEvent::Print('世')]);
    }

    #[test]
    fn test_parser_utf8_broken_sequence_reprocesses_byte() {
        let mut parser = Parser::new(ParserOptions {
            utf8: true,
            ..ParserOptions::default()
        });
        let events = parser.parse(&[0xE4, b'A']);
        assert_eq!(
            events,
            vec![ParserEvent::Print(REPLACEMENT), ParserEvent::Print('A')]
        );
    }

    #[test]
    fn test_parser_write_str() {
        let mut parser = Parser::default();
        let mut events = Vec::new();
        parser.write_str("ü\x1b]0;π\x07", |e| events.push(e));

        assert_eq!(
            events,
            vec![
                ParserEvent::Print('ü'),
                ParserEvent::OscDispatch("0;π".as_bytes().to_vec()),
                ParserEvent::Execute(0x07),
            ]
        );
    }

    #[test]
    fn test_parser_reset_mid_sequence() {
        let mut parser = Parser::default();
        assert!(parser.parse(b"\x1b[12;").is_empty());
        parser.reset();

        assert_eq!(parser.state(), ParserState::Ground);
        assert_eq!(parser.parse(b"m"), vec![ParserEvent::Print('m')]);
    }

    #[test]
    fn test_parser_delete_ignored() {
        let mut parser = Parser::default();
        assert_eq!(parser.parse(b"a\x7fb").len(), 2);
    }
}

//! Terminal escape sequence parser
//!
//! A stateful parser that converts bytes into [`ParserEvent`]s.
//! Based on the VT500-series parser model from <https://vt100.net/emu/dec_ansi_parser>

pub mod classify;
mod event;
mod params;
mod state;
mod utf8;

pub use classify::{classify, is_c1, ByteClass};
pub use event::{CsiDispatch, DcsHeader, ParserEvent, StringKind};
pub use params::{MAX_INTERMEDIATES, MAX_PARAMS, MAX_PARAM_VALUE};
pub use state::{Parser, ParserState};

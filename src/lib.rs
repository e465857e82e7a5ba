//! Mochi VT
//!
//! A DEC VT-series terminal emulation engine: it turns a byte stream from an
//! application into a screen model, without any rendering or I/O of its own.
//!
//! - `config`: spec/emulator/override resolution
//! - `parser`: VT500-style escape sequence state machine
//! - `core`: screen state, cells, charsets, selection geometry, updates
//! - `interpreter`: applies parser events to the screen state
//! - `response`: encoding of replies sent back to the application
//! - `terminal`: the parser/interpreter pair most hosts use
//!
//! ```
//! use mochi_vt::{ResolveOptions, Terminal};
//!
//! let mut term = Terminal::new(&ResolveOptions::default()).unwrap();
//! term.write(b"hello\r\n\x1b[1mworld");
//! assert_eq!(term.snapshot().row_text(1), "world");
//! ```

pub mod config;
pub mod core;
pub mod interpreter;
pub mod parser;
pub mod response;
pub mod terminal;

pub use config::{
    resolve, C1Transmission, ConfigError, Emulator, FeatureOverrides, ResolveOptions,
    ResolvedConfig, TerminalCapabilities, TerminalSpec,
};
pub use core::{TerminalSelection, TerminalState, TerminalUpdate};
pub use parser::{Parser, ParserEvent, ParserState};
pub use terminal::Terminal;

//! Terminal
//!
//! Pairs one parser with one interpreter built from the same resolved
//! configuration. This is the integration point for hosts: feed it bytes
//! from the application, hand its updates to a renderer, and send its
//! responses back to the application.

use crate::config::{resolve, ConfigError, ResolveOptions, ResolvedConfig, TerminalCapabilities};
use crate::core::{TerminalSelection, TerminalState, TerminalUpdate};
use crate::interpreter::{BellHook, Interpreter};
use crate::parser::Parser;

/// A parser/interpreter pair
#[derive(Debug)]
pub struct Terminal {
    parser: Parser,
    interpreter: Interpreter,
}

impl Terminal {
    /// Resolve `options` and build a terminal from the result
    pub fn new(options: &ResolveOptions) -> Result<Self, ConfigError> {
        Self::with_config(resolve(options)?)
    }

    /// Build a terminal from an already resolved configuration. The fields
    /// of `config` are public, so the dimensions are checked again here.
    pub fn with_config(config: ResolvedConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            interpreter: Interpreter::new(config.capabilities)?,
            parser: Parser::new(config.parser),
        })
    }

    /// Process bytes from the application and return what changed
    pub fn write(&mut self, data: &[u8]) -> Vec<TerminalUpdate> {
        let Self {
            parser,
            interpreter,
        } = self;
        parser.write(data, |event| interpreter.handle_event(event));
        interpreter.take_updates()
    }

    /// Process text from the application and return what changed
    pub fn write_str(&mut self, text: &str) -> Vec<TerminalUpdate> {
        let Self {
            parser,
            interpreter,
        } = self;
        parser.write_str(text, |event| interpreter.handle_event(event));
        interpreter.take_updates()
    }

    /// Return both halves to their initial state. A partially received
    /// sequence is dropped.
    pub fn reset(&mut self) {
        self.parser.reset();
        self.interpreter.reset();
    }

    /// Current screen state
    pub fn snapshot(&self) -> &TerminalState {
        self.interpreter.snapshot()
    }

    pub fn capabilities(&self) -> &TerminalCapabilities {
        self.interpreter.capabilities()
    }

    /// Drain encoded replies for the application
    pub fn take_responses(&mut self) -> Vec<Vec<u8>> {
        self.interpreter.take_responses()
    }

    /// Install a hook called on every BEL
    pub fn on_bell<F>(&mut self, hook: F)
    where
        F: FnMut() + Send + 'static,
    {
        let hook: BellHook = Box::new(hook);
        self.interpreter.on_bell(hook);
    }

    /// Resize the grid. Both dimensions must be positive.
    pub fn resize(&mut self, rows: usize, columns: usize) -> Result<Vec<TerminalUpdate>, ConfigError> {
        self.interpreter.resize(rows, columns)?;
        tracing::debug!(rows, columns, "resized terminal");
        Ok(self.interpreter.take_updates())
    }

    /// Text covered by a selection, one line per selected row with
    /// trailing blanks trimmed
    pub fn selection_text(&self, selection: &TerminalSelection) -> String {
        let state = self.snapshot();
        selection
            .row_segments(state.columns())
            .into_iter()
            .filter_map(|segment| {
                let cells = state.row_cells(segment.row)?;
                let line: String = cells[segment.start_column..=segment.end_column]
                    .iter()
                    .filter(|cell| !cell.wide_continuation)
                    .map(|cell| if cell.is_empty() { " " } else { cell.glyph.as_str() })
                    .collect();
                Some(line.trim_end().to_string())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

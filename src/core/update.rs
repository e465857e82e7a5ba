//! Terminal updates
//!
//! Advisory diffs describing what an event batch changed. A renderer may
//! ignore them and repaint from the state, and must repaint the affected
//! area on `Clear`, `Scroll` and `ScrollRegion`.

use serde::{Deserialize, Serialize};

use super::cell::CellAttributes;
use super::cursor::Cursor;

/// A cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
}

/// Mode flags reported through [`TerminalUpdate::Mode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalMode {
    Insert,
    LinefeedNewline,
    ApplicationCursor,
    ApplicationKeypad,
    ReverseVideo,
    OriginMode,
    AutoWrap,
}

/// One change since the last flush
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TerminalUpdate {
    /// Cells whose glyph or attributes changed
    Cells { positions: Vec<CellPosition> },
    /// The whole grid changed (ED 2, RIS, DECALN, resize)
    Clear,
    /// Rows `top..=bottom` moved by `amount` (positive: content moved up)
    Scroll { top: usize, bottom: usize, amount: isize },
    /// New scroll region
    ScrollRegion { top: usize, bottom: usize },
    /// New cursor position
    Cursor { row: usize, column: usize },
    CursorVisibility { visible: bool },
    Mode { mode: TerminalMode, enabled: bool },
    /// New pen
    Attributes { attributes: CellAttributes },
    Bell,
    /// Window title (OSC 0/2)
    Title { title: String },
}

/// Ordered update collector.
///
/// Cells written by a run of prints are merged into one `Cells` update and
/// the cursor update for the run follows it when the run ends. Every other
/// update ends the current run first, so ordering is preserved.
#[derive(Debug, Default)]
pub struct UpdateBuffer {
    updates: Vec<TerminalUpdate>,
    run: Vec<CellPosition>,
    run_moved_cursor: bool,
}

impl UpdateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cell written by a print
    pub fn mark_cell(&mut self, row: usize, column: usize) {
        let position = CellPosition { row, column };
        if self.run.last() != Some(&position) {
            self.run.push(position);
        }
    }

    /// Record that a print moved the cursor
    pub fn mark_cursor(&mut self) {
        self.run_moved_cursor = true;
    }

    /// Close the current print run, emitting its cells and then the cursor
    pub fn end_run(&mut self, cursor: &Cursor) {
        if !self.run.is_empty() {
            let positions = std::mem::take(&mut self.run);
            self.updates.push(TerminalUpdate::Cells { positions });
        }
        if std::mem::take(&mut self.run_moved_cursor) {
            self.updates.push(TerminalUpdate::Cursor {
                row: cursor.row,
                column: cursor.column,
            });
        }
    }

    /// Append an update. Callers end any print run before this.
    pub fn push(&mut self, update: TerminalUpdate) {
        self.updates.push(update);
    }

    /// Drain the collected updates
    pub fn take(&mut self, cursor: &Cursor) -> Vec<TerminalUpdate> {
        self.end_run(cursor);
        std::mem::take(&mut self.updates)
    }

    /// Drop everything collected so far
    pub fn clear(&mut self) {
        self.updates.clear();
        self.run.clear();
        self.run_moved_cursor = false;
    }
}

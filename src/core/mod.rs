//! Terminal Core Module
//!
//! Platform-independent terminal state management. This module contains:
//! - Terminal state (grid, cursor, scroll region, modes)
//! - Cell representation with attributes
//! - Character set translation
//! - Selection geometry
//! - The update stream handed to renderers
//!
//! The core is deterministic: given the same sequence of parser events,
//! the interpreter always produces the same state.

mod cell;
pub mod charset;
mod cursor;
mod selection;
mod state;
mod update;

pub use cell::{Cell, CellAttributes, Color, MAX_COMBINING};
pub use charset::{resolve_charset, translate, CharsetId, CharsetState};
pub use cursor::{Cursor, SavedCursor};
pub use selection::{
    RowSegment, SelectionBounds, SelectionKind, SelectionPoint, SelectionStatus, TerminalSelection,
};
pub use state::{Modes, TerminalState};
pub use update::{CellPosition, TerminalMode, TerminalUpdate, UpdateBuffer};

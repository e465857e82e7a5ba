//! Cursor state management
//!
//! The cursor tracks its position and the pending-wrap flag. Save/restore
//! (DECSC/DECRC and CSI s/u) captures it together with the modes that
//! travel with it.

use serde::{Deserialize, Serialize};

use super::charset::CharsetState;

/// Cursor position, always inside the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed)
    pub row: usize,
    /// Column position (0-indexed)
    pub column: usize,
    /// Cursor is at the right margin and the next glyph wraps first
    #[serde(skip)]
    pub pending_wrap: bool,
}

impl Cursor {
    /// Create a new cursor at the home position
    pub fn new() -> Self {
        Self::default()
    }

    /// Move cursor to absolute position, clamping to bounds
    pub fn move_to(&mut self, row: usize, column: usize, rows: usize, columns: usize) {
        self.row = row.min(rows.saturating_sub(1));
        self.column = column.min(columns.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Move cursor up by n rows, stopping at `top` if the cursor starts
    /// at or below it, otherwise at row 0
    pub fn move_up(&mut self, n: usize, top: usize) {
        let floor = if self.row >= top { top } else { 0 };
        self.row = self.row.saturating_sub(n).max(floor);
        self.pending_wrap = false;
    }

    /// Move cursor down by n rows, stopping at `bottom` if the cursor starts
    /// at or above it, otherwise at the last row
    pub fn move_down(&mut self, n: usize, bottom: usize, rows: usize) {
        let ceiling = if self.row <= bottom {
            bottom
        } else {
            rows.saturating_sub(1)
        };
        self.row = self.row.saturating_add(n).min(ceiling);
        self.pending_wrap = false;
    }

    /// Move cursor left by n columns, stopping at column 0
    pub fn move_left(&mut self, n: usize) {
        self.column = self.column.saturating_sub(n);
        self.pending_wrap = false;
    }

    /// Move cursor right by n columns, stopping at the right margin
    pub fn move_right(&mut self, n: usize, columns: usize) {
        self.column = self
            .column
            .saturating_add(n)
            .min(columns.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Carriage return - move to column 0
    pub fn carriage_return(&mut self) {
        self.column = 0;
        self.pending_wrap = false;
    }
}

/// Cursor snapshot for DECSC/DECRC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursor {
    pub row: usize,
    pub column: usize,
    pub origin_mode: bool,
    pub auto_wrap: bool,
    pub charsets: CharsetState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_to() {
        let mut cursor = Cursor::new();
        cursor.move_to(10, 5, 24, 80);
        assert_eq!((cursor.row, cursor.column), (10, 5));

        // Clamped to the grid
        cursor.move_to(50, 100, 24, 80);
        assert_eq!((cursor.row, cursor.column), (23, 79));
    }

    #[test]
    fn test_cursor_movement() {
        let mut cursor = Cursor::new();
        cursor.move_to(10, 10, 24, 80);

        cursor.move_up(3, 0);
        assert_eq!(cursor.row, 7);

        cursor.move_down(5, 23, 24);
        assert_eq!(cursor.row, 12);

        cursor.move_left(4);
        assert_eq!(cursor.column, 6);

        cursor.move_right(10, 80);
        assert_eq!(cursor.column, 16);
    }

    #[test]
    fn test_cursor_boundaries() {
        let mut cursor = Cursor::new();

        cursor.move_up(100, 0);
        assert_eq!(cursor.row, 0);

        cursor.move_left(100);
        assert_eq!(cursor.column, 0);

        cursor.move_down(100, 23, 24);
        assert_eq!(cursor.row, 23);

        cursor.move_right(100, 80);
        assert_eq!(cursor.column, 79);
    }

    #[test]
    fn test_cursor_outside_margins() {
        let mut cursor = Cursor::new();
        cursor.move_to(2, 0, 24, 80);

        // Above the top margin already: movement continues to row 0
        cursor.move_up(1, 5);
        assert_eq!(cursor.row, 1);
        cursor.move_up(10, 5);
        assert_eq!(cursor.row, 0);

        cursor.move_to(20, 0, 24, 80);
        cursor.move_down(1, 10, 24);
        assert_eq!(cursor.row, 21);
        cursor.move_down(10, 10, 24);
        assert_eq!(cursor.row, 23);
    }

    #[test]
    fn test_carriage_return() {
        let mut cursor = Cursor::new();
        cursor.move_to(10, 50, 24, 80);
        cursor.pending_wrap = true;

        cursor.carriage_return();
        assert_eq!(cursor.column, 0);
        assert_eq!(cursor.row, 10);
        assert!(!cursor.pending_wrap);
    }
}

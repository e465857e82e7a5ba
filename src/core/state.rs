//! Terminal state
//!
//! The authoritative screen model: a `rows` x `columns` grid of cells plus
//! cursor, scroll region, pen, tab stops, and mode flags. The grid is only
//! ever replaced as a whole, so its shape always matches the dimensions.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellAttributes};
use super::charset::CharsetState;
use super::cursor::{Cursor, SavedCursor};
use crate::config::C1Transmission;

/// Terminal mode flags not stored elsewhere in the state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modes {
    /// Insert/replace mode (IRM)
    pub insert: bool,
    /// Line feed/new line mode (LNM)
    pub linefeed_newline: bool,
    /// Application cursor keys (DECCKM)
    pub application_cursor: bool,
    /// Reverse video (DECSCNM)
    pub reverse_video: bool,
    /// Application keypad (DECKPAM/DECKPNM)
    pub application_keypad: bool,
}

/// The terminal screen model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalState {
    rows: usize,
    columns: usize,
    cursor: Cursor,
    buffer: Vec<Vec<Cell>>,
    /// Scroll region top (0-indexed, inclusive)
    scroll_top: usize,
    /// Scroll region bottom (0-indexed, inclusive)
    scroll_bottom: usize,
    /// Pen applied to newly written cells
    attributes: CellAttributes,
    tab_stops: BTreeSet<usize>,
    auto_wrap: bool,
    origin_mode: bool,
    cursor_visible: bool,
    saved_cursor: Option<SavedCursor>,
    saved_attributes: Option<CellAttributes>,
    charsets: CharsetState,
    modes: Modes,
    title: String,
    icon_name: String,
    /// Live C1 transmission mode for responses (S7C1T/S8C1T)
    c1_transmission: C1Transmission,
}

fn default_tab_stops(columns: usize) -> BTreeSet<usize> {
    (8..columns).step_by(8).collect()
}

impl TerminalState {
    /// Create a blank state. Both dimensions must already be validated as
    /// positive.
    pub(crate) fn new(rows: usize, columns: usize, c1_transmission: C1Transmission) -> Self {
        debug_assert!(rows > 0 && columns > 0, "empty grid {}x{}", rows, columns);
        Self {
            rows,
            columns,
            cursor: Cursor::new(),
            buffer: vec![vec![Cell::default(); columns]; rows],
            scroll_top: 0,
            scroll_bottom: rows - 1,
            attributes: CellAttributes::default(),
            tab_stops: default_tab_stops(columns),
            auto_wrap: true,
            origin_mode: false,
            cursor_visible: true,
            saved_cursor: None,
            saved_attributes: None,
            charsets: CharsetState::new(),
            modes: Modes::default(),
            title: String::new(),
            icon_name: String::new(),
            c1_transmission,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Get a cell, or `None` outside the grid
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.buffer.get(row).and_then(|cells| cells.get(column))
    }

    /// All cells of a row
    pub fn row_cells(&self, row: usize) -> Option<&[Cell]> {
        self.buffer.get(row).map(Vec::as_slice)
    }

    /// Scroll region as `(top, bottom)`, both inclusive
    pub fn scroll_region(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    pub fn attributes(&self) -> &CellAttributes {
        &self.attributes
    }

    pub fn tab_stops(&self) -> &BTreeSet<usize> {
        &self.tab_stops
    }

    pub fn auto_wrap(&self) -> bool {
        self.auto_wrap
    }

    pub fn origin_mode(&self) -> bool {
        self.origin_mode
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn saved_cursor(&self) -> Option<&SavedCursor> {
        self.saved_cursor.as_ref()
    }

    pub fn saved_attributes(&self) -> Option<&CellAttributes> {
        self.saved_attributes.as_ref()
    }

    pub fn charsets(&self) -> &CharsetState {
        &self.charsets
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    /// Window title (OSC 0/2)
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Icon name (OSC 0/1)
    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn c1_transmission(&self) -> C1Transmission {
        self.c1_transmission
    }

    /// Plain text of one row. Blank cells read as spaces, the trailing half
    /// of a wide character is skipped, and trailing spaces are trimmed.
    pub fn row_text(&self, row: usize) -> String {
        let Some(cells) = self.buffer.get(row) else {
            return String::new();
        };
        let mut text = String::with_capacity(cells.len());
        for cell in cells {
            if cell.wide_continuation {
                continue;
            }
            if cell.is_empty() {
                text.push(' ');
            } else {
                text.push_str(&cell.glyph);
            }
        }
        text.truncate(text.trim_end_matches(' ').len());
        text
    }

    /// Plain text of the whole grid, one line per row
    pub fn to_text(&self) -> String {
        (0..self.rows)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Mutation, driven by the interpreter

    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut CellAttributes {
        &mut self.attributes
    }

    pub(crate) fn charsets_mut(&mut self) -> &mut CharsetState {
        &mut self.charsets
    }

    pub(crate) fn modes_mut(&mut self) -> &mut Modes {
        &mut self.modes
    }

    pub(crate) fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.buffer.get_mut(row).and_then(|cells| cells.get_mut(column))
    }

    pub(crate) fn set_auto_wrap(&mut self, enabled: bool) {
        self.auto_wrap = enabled;
        if !enabled {
            self.cursor.pending_wrap = false;
        }
    }

    pub(crate) fn set_origin_mode(&mut self, enabled: bool) {
        self.origin_mode = enabled;
    }

    pub(crate) fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_icon_name(&mut self, name: String) {
        self.icon_name = name;
    }

    pub(crate) fn set_c1_transmission(&mut self, mode: C1Transmission) {
        self.c1_transmission = mode;
    }

    /// Set the scroll region. The caller has validated `top < bottom < rows`.
    pub(crate) fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        self.scroll_top = top;
        self.scroll_bottom = bottom;
    }

    pub(crate) fn reset_scroll_region(&mut self) {
        self.scroll_top = 0;
        self.scroll_bottom = self.rows - 1;
    }

    pub(crate) fn set_tab_stop(&mut self, column: usize) {
        if column < self.columns {
            self.tab_stops.insert(column);
        }
    }

    pub(crate) fn clear_tab_stop(&mut self, column: usize) {
        self.tab_stops.remove(&column);
    }

    pub(crate) fn clear_all_tab_stops(&mut self) {
        self.tab_stops.clear();
    }

    /// Capture cursor position, wrap and origin modes, and charsets (DECSC)
    pub(crate) fn save_cursor(&mut self) {
        self.saved_cursor = Some(SavedCursor {
            row: self.cursor.row,
            column: self.cursor.column,
            origin_mode: self.origin_mode,
            auto_wrap: self.auto_wrap,
            charsets: self.charsets.clone(),
        });
        self.saved_attributes = Some(self.attributes);
    }

    /// Point the saved cursor at home with the current modes and a default
    /// pen, as DECSTR does
    pub(crate) fn save_cursor_at_home(&mut self) {
        self.saved_cursor = Some(SavedCursor {
            row: 0,
            column: 0,
            origin_mode: self.origin_mode,
            auto_wrap: self.auto_wrap,
            charsets: self.charsets.clone(),
        });
        self.saved_attributes = Some(CellAttributes::default());
    }

    /// Restore what [`save_cursor`](Self::save_cursor) captured (DECRC).
    /// Without a saved cursor this homes the cursor and resets the pen.
    pub(crate) fn restore_cursor(&mut self) {
        match self.saved_cursor.clone() {
            Some(saved) => {
                self.cursor.move_to(saved.row, saved.column, self.rows, self.columns);
                self.origin_mode = saved.origin_mode;
                self.auto_wrap = saved.auto_wrap;
                self.charsets = saved.charsets;
            }
            None => {
                self.cursor.move_to(0, 0, self.rows, self.columns);
                self.origin_mode = false;
                self.charsets.reset();
            }
        }
        self.attributes = self.saved_attributes.unwrap_or_default();
    }

    /// A row of blanks carrying the current background
    fn blank_row(&self) -> Vec<Cell> {
        vec![Cell::blank(&self.attributes); self.columns]
    }

    /// Erase `columns` of `row` with the current background
    pub(crate) fn erase_cells(&mut self, row: usize, columns: Range<usize>) {
        let blank = Cell::blank(&self.attributes);
        if let Some(cells) = self.buffer.get_mut(row) {
            let end = columns.end.min(cells.len());
            let start = columns.start.min(end);
            for cell in &mut cells[start..end] {
                cell.clone_from(&blank);
            }
        }
    }

    /// Erase whole rows with the current background
    pub(crate) fn erase_rows(&mut self, rows: Range<usize>) {
        for row in rows {
            self.erase_cells(row, 0..self.columns);
        }
    }

    /// Fill every cell with `c`, as DECALN does with `E`
    pub(crate) fn fill(&mut self, c: char) {
        let cell = Cell::new(c);
        for cells in &mut self.buffer {
            cells.fill(cell.clone());
        }
    }

    /// Scroll the region up by n lines (content moves up, blanks at bottom)
    pub(crate) fn scroll_up(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top, self.scroll_bottom);
        self.shift_rows_up(top, bottom, n);
    }

    /// Scroll the region down by n lines (content moves down, blanks at top)
    pub(crate) fn scroll_down(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top, self.scroll_bottom);
        self.shift_rows_down(top, bottom, n);
    }

    /// Insert n blank lines at the cursor row (IL). No-op outside the region.
    pub(crate) fn insert_lines(&mut self, n: usize) -> bool {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return false;
        }
        self.shift_rows_down(row, self.scroll_bottom, n);
        true
    }

    /// Delete n lines at the cursor row (DL). No-op outside the region.
    pub(crate) fn delete_lines(&mut self, n: usize) -> bool {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return false;
        }
        self.shift_rows_up(row, self.scroll_bottom, n);
        true
    }

    fn shift_rows_up(&mut self, top: usize, bottom: usize, n: usize) {
        let height = bottom + 1 - top;
        let n = n.min(height);
        if n == 0 {
            return;
        }
        let blank = self.blank_row();
        let region = &mut self.buffer[top..=bottom];
        region.rotate_left(n);
        for row in &mut region[height - n..] {
            row.clone_from(&blank);
        }
    }

    fn shift_rows_down(&mut self, top: usize, bottom: usize, n: usize) {
        let height = bottom + 1 - top;
        let n = n.min(height);
        if n == 0 {
            return;
        }
        let blank = self.blank_row();
        let region = &mut self.buffer[top..=bottom];
        region.rotate_right(n);
        for row in &mut region[..n] {
            row.clone_from(&blank);
        }
    }

    /// Insert n blanks at the cursor, shifting the rest of the row right (ICH)
    pub(crate) fn insert_chars(&mut self, n: usize) {
        let (row, column) = (self.cursor.row, self.cursor.column);
        let blank = Cell::blank(&self.attributes);
        if let Some(cells) = self.buffer.get_mut(row) {
            let tail = &mut cells[column..];
            let n = n.min(tail.len());
            tail.rotate_right(n);
            tail[..n].fill(blank);
        }
    }

    /// Delete n cells at the cursor, shifting the rest of the row left (DCH)
    pub(crate) fn delete_chars(&mut self, n: usize) {
        let (row, column) = (self.cursor.row, self.cursor.column);
        let blank = Cell::blank(&self.attributes);
        if let Some(cells) = self.buffer.get_mut(row) {
            let tail = &mut cells[column..];
            let n = n.min(tail.len());
            tail.rotate_left(n);
            let len = tail.len();
            tail[len - n..].fill(blank);
        }
    }

    /// Replace the grid with one of the new size, keeping the overlapping
    /// top-left content. The scroll region resets and the cursor is clamped.
    pub(crate) fn resize(&mut self, rows: usize, columns: usize) {
        debug_assert!(rows > 0 && columns > 0, "empty grid {}x{}", rows, columns);

        let mut buffer = vec![vec![Cell::default(); columns]; rows];
        for (new_row, old_row) in buffer.iter_mut().zip(&self.buffer) {
            let keep = columns.min(old_row.len());
            new_row[..keep].clone_from_slice(&old_row[..keep]);
            // Leading half of a glyph cut at the new margin
            if old_row.get(keep).is_some_and(|cell| cell.wide_continuation) {
                new_row[keep - 1] = Cell::default();
            }
        }

        let old_columns = self.columns;
        self.buffer = buffer;
        self.rows = rows;
        self.columns = columns;

        self.tab_stops.retain(|&stop| stop < columns);
        self.tab_stops
            .extend((8..columns).step_by(8).filter(|&stop| stop >= old_columns));

        self.reset_scroll_region();
        let cursor = self.cursor;
        self.cursor.move_to(cursor.row, cursor.column, rows, columns);
    }
}

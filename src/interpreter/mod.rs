//! Interpreter
//!
//! Applies parser events to the authoritative [`TerminalState`] and records
//! what changed as [`TerminalUpdate`]s. Host-bound replies (status reports,
//! device attributes) are encoded with the live C1 transmission mode and
//! queued until [`Interpreter::take_responses`].

mod csi;
mod dcs;
mod osc;
mod sgr;

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::config::{check_dimensions, C1Transmission, ConfigError, TerminalCapabilities};
use crate::core::{
    resolve_charset, Cell, CellPosition, TerminalMode, TerminalState, TerminalUpdate, UpdateBuffer,
};
use crate::parser::ParserEvent;
use crate::response::encode_response_payload;

use self::dcs::DcsSession;

pub use self::sgr::{apply_sgr, sgr_report};

/// Notification hook invoked on BEL
pub type BellHook = Box<dyn FnMut() + Send>;

/// Event interpreter owning one terminal state
pub struct Interpreter {
    capabilities: TerminalCapabilities,
    state: TerminalState,
    updates: UpdateBuffer,
    responses: Vec<Vec<u8>>,
    /// Open DCS request, if the hooked DCS is one we answer
    dcs: Option<DcsSession>,
    bell: Option<BellHook>,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("capabilities", &self.capabilities)
            .field("state", &self.state)
            .field("responses", &self.responses.len())
            .field("dcs", &self.dcs)
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Create an interpreter with a blank state sized by `capabilities`.
    /// Fails when the initial grid would have no rows or no columns.
    pub fn new(capabilities: TerminalCapabilities) -> Result<Self, ConfigError> {
        let features = &capabilities.features;
        check_dimensions(features.initial_rows, features.initial_columns)?;
        let state = Self::initial_state(&capabilities);
        Ok(Self {
            capabilities,
            state,
            updates: UpdateBuffer::new(),
            responses: Vec::new(),
            dcs: None,
            bell: None,
        })
    }

    fn initial_state(capabilities: &TerminalCapabilities) -> TerminalState {
        let features = &capabilities.features;
        TerminalState::new(
            features.initial_rows,
            features.initial_columns,
            features.default_c1_transmission,
        )
    }

    pub fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    /// Current state (read-only)
    pub fn snapshot(&self) -> &TerminalState {
        &self.state
    }

    /// Install the BEL notification hook
    pub fn on_bell(&mut self, hook: BellHook) {
        self.bell = Some(hook);
    }

    /// Apply a batch of events and return the updates they produced
    pub fn handle_events<I>(&mut self, events: I) -> Vec<TerminalUpdate>
    where
        I: IntoIterator<Item = ParserEvent>,
    {
        for event in events {
            self.handle_event(event);
        }
        self.take_updates()
    }

    /// Drain updates recorded since the last call
    pub fn take_updates(&mut self) -> Vec<TerminalUpdate> {
        self.updates.take(self.state.cursor())
    }

    /// Drain encoded host-bound replies
    pub fn take_responses(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.responses)
    }

    /// Blank, default-sized, default-attributed state. Pending updates and
    /// responses are dropped.
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.capabilities);
        self.dcs = None;
        self.updates.clear();
        self.responses.clear();
        self.updates.push(TerminalUpdate::Clear);
        self.emit_cursor();
    }

    /// Replace the grid with one of the given size. Both dimensions must be
    /// positive; on error nothing changes.
    pub fn resize(&mut self, rows: usize, columns: usize) -> Result<(), ConfigError> {
        check_dimensions(rows, columns)?;
        self.end_run();
        self.state.resize(rows, columns);
        self.updates.push(TerminalUpdate::Clear);
        let (top, bottom) = self.state.scroll_region();
        self.updates.push(TerminalUpdate::ScrollRegion { top, bottom });
        self.emit_cursor();
        Ok(())
    }

    /// Apply one event
    pub fn handle_event(&mut self, event: ParserEvent) {
        if let ParserEvent::Print(c) = event {
            self.print(c);
            return;
        }

        self.end_run();
        if !event.is_dcs() && self.dcs.take().is_some() {
            tracing::debug!("discarding unterminated DCS request");
        }

        match event {
            ParserEvent::Print(_) => {}
            ParserEvent::Execute(byte) => self.execute(byte),
            ParserEvent::EscDispatch {
                intermediates,
                final_byte,
            } => self.esc_dispatch(&intermediates, final_byte),
            ParserEvent::CsiDispatch(csi) => self.csi_dispatch(&csi),
            ParserEvent::OscDispatch(payload) => self.osc_dispatch(&payload),
            ParserEvent::DcsHook(header) => self.dcs_hook(&header),
            ParserEvent::DcsPut(byte) => self.dcs_put(byte),
            ParserEvent::DcsUnhook => self.dcs_unhook(),
            ParserEvent::SosPmApcDispatch { kind, payload } => {
                tracing::debug!(?kind, len = payload.len(), "ignoring string");
            }
            ParserEvent::Ignore => {}
        }
    }

    // Update plumbing

    fn end_run(&mut self) {
        self.updates.end_run(self.state.cursor());
    }

    fn emit(&mut self, update: TerminalUpdate) {
        self.end_run();
        self.updates.push(update);
    }

    fn emit_cursor(&mut self) {
        let cursor = *self.state.cursor();
        self.emit(TerminalUpdate::Cursor {
            row: cursor.row,
            column: cursor.column,
        });
    }

    fn emit_mode(&mut self, mode: TerminalMode, enabled: bool) {
        self.emit(TerminalUpdate::Mode { mode, enabled });
    }

    fn emit_attributes(&mut self) {
        let attributes = *self.state.attributes();
        self.emit(TerminalUpdate::Attributes { attributes });
    }

    /// Emit cell updates for columns `start..end` of `row`
    fn emit_row_cells(&mut self, row: usize, start: usize, end: usize) {
        let end = end.min(self.state.columns());
        if start >= end {
            return;
        }
        let positions = (start..end)
            .map(|column| CellPosition { row, column })
            .collect();
        self.emit(TerminalUpdate::Cells { positions });
    }

    /// Encode and queue a host-bound reply
    fn respond(&mut self, sequence: &str) {
        let bytes = encode_response_payload(sequence, self.state.c1_transmission());
        tracing::trace!(?sequence, "queued response");
        self.responses.push(bytes);
    }

    fn ring_bell(&mut self) {
        self.emit(TerminalUpdate::Bell);
        if let Some(hook) = self.bell.as_mut() {
            hook();
        }
    }

    // Printing

    /// Write one glyph at the cursor using the active charset and pen
    fn print(&mut self, c: char) {
        let c = self.state.charsets_mut().translate(c);
        let width = c.width().unwrap_or(0);

        if width == 0 {
            self.attach_combining(c);
            return;
        }

        if self.state.cursor().pending_wrap && self.state.auto_wrap() {
            self.wrap();
        }

        let columns = self.state.columns();
        // A wide glyph never fits a single-column grid
        let width = width.min(columns);
        let mut cursor = *self.state.cursor();

        if width == 2 && cursor.column == columns - 1 {
            if self.state.auto_wrap() {
                self.state.erase_cells(cursor.row, cursor.column..columns);
                self.updates.mark_cell(cursor.row, cursor.column);
                self.wrap();
            } else {
                self.state.cursor_mut().column = columns - 2;
            }
            cursor = *self.state.cursor();
        }

        let (row, column) = (cursor.row, cursor.column);
        if self.state.modes().insert {
            self.state.insert_chars(width);
            for shifted in column..columns {
                self.updates.mark_cell(row, shifted);
            }
        }

        self.clear_wide_remnants(row, column, width);

        let attributes = *self.state.attributes();
        if let Some(cell) = self.state.cell_mut(row, column) {
            *cell = Cell::with_attributes(c, attributes);
        }
        self.updates.mark_cell(row, column);
        if width == 2 {
            if let Some(cell) = self.state.cell_mut(row, column + 1) {
                *cell = Cell::continuation(attributes);
            }
            self.updates.mark_cell(row, column + 1);
        }

        let next = column + width;
        let auto_wrap = self.state.auto_wrap();
        let cursor = self.state.cursor_mut();
        if next >= columns {
            cursor.column = columns - 1;
            cursor.pending_wrap = auto_wrap;
        } else {
            cursor.column = next;
        }
        self.updates.mark_cursor();
    }

    /// Blank the other half of any wide glyph the write at `column` splits
    fn clear_wide_remnants(&mut self, row: usize, column: usize, width: usize) {
        let overwrites_trailing_half = self
            .state
            .cell(row, column)
            .is_some_and(|cell| cell.wide_continuation);
        if overwrites_trailing_half && column > 0 {
            self.state.erase_cells(row, column - 1..column);
            self.updates.mark_cell(row, column - 1);
        }

        let after = column + width;
        let orphaned = self
            .state
            .cell(row, after)
            .is_some_and(|cell| cell.wide_continuation);
        if orphaned {
            self.state.erase_cells(row, after..after + 1);
            self.updates.mark_cell(row, after);
        }
    }

    /// Attach a zero-width character to the most recently written cell
    fn attach_combining(&mut self, c: char) {
        let cursor = *self.state.cursor();
        let mut column = if cursor.pending_wrap {
            cursor.column
        } else if cursor.column > 0 {
            cursor.column - 1
        } else {
            return;
        };
        if column > 0
            && self
                .state
                .cell(cursor.row, column)
                .is_some_and(|cell| cell.wide_continuation)
        {
            column -= 1;
        }
        if let Some(cell) = self.state.cell_mut(cursor.row, column) {
            if !cell.is_empty() && cell.push_combining(c) {
                self.updates.mark_cell(cursor.row, column);
            }
        }
    }

    /// Move to the start of the next line, scrolling at the region bottom
    fn wrap(&mut self) {
        self.state.cursor_mut().carriage_return();
        self.index();
        self.updates.mark_cursor();
    }

    // Cursor and scrolling primitives

    /// Move down one row, scrolling the region at its bottom margin (IND)
    fn index(&mut self) {
        let (top, bottom) = self.state.scroll_region();
        let row = self.state.cursor().row;
        if row == bottom {
            self.state.scroll_up(1);
            self.emit(TerminalUpdate::Scroll {
                top,
                bottom,
                amount: 1,
            });
        } else if row + 1 < self.state.rows() {
            self.state.cursor_mut().row += 1;
        }
        self.state.cursor_mut().pending_wrap = false;
    }

    /// Move up one row, scrolling the region at its top margin (RI)
    fn reverse_index(&mut self) {
        let (top, bottom) = self.state.scroll_region();
        let row = self.state.cursor().row;
        if row == top {
            self.state.scroll_down(1);
            self.emit(TerminalUpdate::Scroll {
                top,
                bottom,
                amount: -1,
            });
        } else if row > 0 {
            self.state.cursor_mut().row -= 1;
        }
        self.state.cursor_mut().pending_wrap = false;
    }

    /// LF, VT, FF: index, plus carriage return under LNM
    fn linefeed(&mut self) {
        self.index();
        if self.state.modes().linefeed_newline {
            self.state.cursor_mut().carriage_return();
        }
    }

    /// Absolute move; `row` is relative to the scroll region under DECOM
    fn set_cursor_position(&mut self, row: usize, column: usize) {
        let (top, bottom) = self.state.scroll_region();
        let (rows, columns) = (self.state.rows(), self.state.columns());
        let row = if self.state.origin_mode() {
            top.saturating_add(row).min(bottom)
        } else {
            row
        };
        self.state.cursor_mut().move_to(row, column, rows, columns);
    }

    /// Column of the next tab stop, or the right margin
    fn next_tab_stop(&self, column: usize) -> usize {
        let last = self.state.columns() - 1;
        let next = if self.capabilities.features.supports_tab_stops {
            self.state
                .tab_stops()
                .range(column + 1..)
                .next()
                .copied()
        } else {
            Some((column / 8 + 1) * 8)
        };
        next.map_or(last, |stop| stop.min(last))
    }

    /// Column of the previous tab stop, or column 0
    fn previous_tab_stop(&self, column: usize) -> usize {
        if column == 0 {
            return 0;
        }
        if self.capabilities.features.supports_tab_stops {
            self.state
                .tab_stops()
                .range(..column)
                .next_back()
                .copied()
                .unwrap_or(0)
        } else {
            (column - 1) / 8 * 8
        }
    }

    fn tab_forward(&mut self, count: usize) {
        let mut column = self.state.cursor().column;
        for _ in 0..count {
            column = self.next_tab_stop(column);
        }
        let cursor = self.state.cursor_mut();
        cursor.column = column;
        cursor.pending_wrap = false;
    }

    fn tab_backward(&mut self, count: usize) {
        let mut column = self.state.cursor().column;
        for _ in 0..count {
            column = self.previous_tab_stop(column);
        }
        let cursor = self.state.cursor_mut();
        cursor.column = column;
        cursor.pending_wrap = false;
    }

    /// HTS
    fn set_tab_stop(&mut self) {
        if self.capabilities.features.supports_tab_stops {
            let column = self.state.cursor().column;
            self.state.set_tab_stop(column);
        }
    }

    fn save_cursor(&mut self) {
        self.state.save_cursor();
    }

    fn restore_cursor(&mut self) {
        self.state.restore_cursor();
        self.emit_attributes();
        self.emit_cursor();
    }

    /// Switch the C1 form used in replies (S7C1T/S8C1T)
    fn set_c1_transmission(&mut self, mode: C1Transmission) {
        if mode == C1Transmission::EightBit && self.capabilities.spec.level() < 2 {
            tracing::debug!(spec = %self.capabilities.spec, "S8C1T not supported");
            return;
        }
        self.state.set_c1_transmission(mode);
    }

    /// RIS: blank state at the current size
    fn full_reset(&mut self) {
        let (rows, columns) = (self.state.rows(), self.state.columns());
        self.state = TerminalState::new(
            rows,
            columns,
            self.capabilities.features.default_c1_transmission,
        );
        self.dcs = None;
        self.emit(TerminalUpdate::Clear);
        let (top, bottom) = self.state.scroll_region();
        self.emit(TerminalUpdate::ScrollRegion { top, bottom });
        self.emit_attributes();
        self.emit(TerminalUpdate::CursorVisibility { visible: true });
        self.emit_cursor();
    }

    // C0 / C1 controls

    fn execute(&mut self, byte: u8) {
        match byte {
            // BEL
            0x07 => self.ring_bell(),
            // BS
            0x08 => {
                let cursor = self.state.cursor_mut();
                cursor.move_left(1);
                self.emit_cursor();
            }
            // HT
            0x09 => {
                self.tab_forward(1);
                self.emit_cursor();
            }
            // LF, VT, FF
            0x0A..=0x0C => {
                self.linefeed();
                self.emit_cursor();
            }
            // CR
            0x0D => {
                self.state.cursor_mut().carriage_return();
                self.emit_cursor();
            }
            // SO / SI
            0x0E => self.state.charsets_mut().shift_out(),
            0x0F => self.state.charsets_mut().shift_in(),
            // IND
            0x84 => {
                self.index();
                self.emit_cursor();
            }
            // NEL
            0x85 => {
                self.index();
                self.state.cursor_mut().carriage_return();
                self.emit_cursor();
            }
            // HTS
            0x88 => self.set_tab_stop(),
            // RI
            0x8D => {
                self.reverse_index();
                self.emit_cursor();
            }
            // SS2 / SS3
            0x8E => self.state.charsets_mut().single_shift_2(),
            0x8F => self.state.charsets_mut().single_shift_3(),
            _ => tracing::debug!("unhandled control 0x{:02x}", byte),
        }
    }

    // Escape sequences

    fn esc_dispatch(&mut self, intermediates: &[u8], final_byte: u8) {
        match (intermediates, final_byte) {
            ([], b'7') => self.save_cursor(),
            ([], b'8') => self.restore_cursor(),
            ([], b'D') => {
                self.index();
                self.emit_cursor();
            }
            ([], b'E') => {
                self.index();
                self.state.cursor_mut().carriage_return();
                self.emit_cursor();
            }
            ([], b'H') => self.set_tab_stop(),
            ([], b'M') => {
                self.reverse_index();
                self.emit_cursor();
            }
            ([], b'c') => self.full_reset(),
            ([], b'N') => self.state.charsets_mut().single_shift_2(),
            ([], b'O') => self.state.charsets_mut().single_shift_3(),
            ([], b'=') => {
                self.state.modes_mut().application_keypad = true;
                self.emit_mode(TerminalMode::ApplicationKeypad, true);
            }
            ([], b'>') => {
                self.state.modes_mut().application_keypad = false;
                self.emit_mode(TerminalMode::ApplicationKeypad, false);
            }
            // DECALN
            ([b'#'], b'8') => {
                self.state.fill('E');
                self.state.reset_scroll_region();
                self.set_cursor_position(0, 0);
                self.emit(TerminalUpdate::Clear);
                let (top, bottom) = self.state.scroll_region();
                self.emit(TerminalUpdate::ScrollRegion { top, bottom });
                self.emit_cursor();
            }
            // SCS: designate G0-G3
            ([slot @ (b'(' | b')' | b'*' | b'+')], designator) => {
                let slot = slot - b'(';
                let charset = resolve_charset(designator);
                self.state.charsets_mut().designate(slot, charset);
            }
            ([b' '], b'F') => self.set_c1_transmission(C1Transmission::SevenBit),
            ([b' '], b'G') => self.set_c1_transmission(C1Transmission::EightBit),
            _ => tracing::debug!(?intermediates, final_byte = %char::from(final_byte), "unhandled ESC"),
        }
    }
}

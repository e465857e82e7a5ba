//! Control sequence dispatch

use super::sgr::apply_sgr;
use super::Interpreter;
use crate::config::TerminalSpec;
use crate::core::{TerminalMode, TerminalUpdate};
use crate::parser::CsiDispatch;

impl Interpreter {
    pub(super) fn csi_dispatch(&mut self, csi: &CsiDispatch) {
        let n = usize::from(csi.param_or_default(0, 1));

        match (csi.private_marker, csi.intermediates.as_slice(), csi.final_byte) {
            // CUU
            (None, [], b'A') => {
                let (top, _) = self.state.scroll_region();
                self.state.cursor_mut().move_up(n, top);
                self.emit_cursor();
            }
            // CUD, VPR
            (None, [], b'B' | b'e') => {
                let (_, bottom) = self.state.scroll_region();
                let rows = self.state.rows();
                self.state.cursor_mut().move_down(n, bottom, rows);
                self.emit_cursor();
            }
            // CUF, HPR
            (None, [], b'C' | b'a') => {
                let columns = self.state.columns();
                self.state.cursor_mut().move_right(n, columns);
                self.emit_cursor();
            }
            // CUB
            (None, [], b'D') => {
                self.state.cursor_mut().move_left(n);
                self.emit_cursor();
            }
            // CNL
            (None, [], b'E') => {
                let (_, bottom) = self.state.scroll_region();
                let rows = self.state.rows();
                let cursor = self.state.cursor_mut();
                cursor.move_down(n, bottom, rows);
                cursor.carriage_return();
                self.emit_cursor();
            }
            // CPL
            (None, [], b'F') => {
                let (top, _) = self.state.scroll_region();
                let cursor = self.state.cursor_mut();
                cursor.move_up(n, top);
                cursor.carriage_return();
                self.emit_cursor();
            }
            // CHA, HPA
            (None, [], b'G' | b'`') => {
                let row = self.state.cursor().row;
                let (rows, columns) = (self.state.rows(), self.state.columns());
                self.state.cursor_mut().move_to(row, n - 1, rows, columns);
                self.emit_cursor();
            }
            // CUP, HVP
            (None, [], b'H' | b'f') => {
                let row = usize::from(csi.param_or_default(0, 1)) - 1;
                let column = usize::from(csi.param_or_default(1, 1)) - 1;
                self.set_cursor_position(row, column);
                self.emit_cursor();
            }
            // VPA
            (None, [], b'd') => {
                let column = self.state.cursor().column;
                self.set_cursor_position(n - 1, column);
                self.emit_cursor();
            }
            // CHT
            (None, [], b'I') => {
                self.tab_forward(n);
                self.emit_cursor();
            }
            // CBT
            (None, [], b'Z') => {
                self.tab_backward(n);
                self.emit_cursor();
            }
            (None, [], b'J') => self.erase_display(csi.param(0, 0)),
            (None, [], b'K') => self.erase_line(csi.param(0, 0)),
            // ECH
            (None, [], b'X') => {
                let cursor = *self.state.cursor();
                let end = cursor.column.saturating_add(n);
                self.state.erase_cells(cursor.row, cursor.column..end);
                self.emit_row_cells(cursor.row, cursor.column, end);
            }
            // IL
            (None, [], b'L') => {
                if self.state.insert_lines(n) {
                    self.emit_line_shift(-(n as isize));
                }
            }
            // DL
            (None, [], b'M') => {
                if self.state.delete_lines(n) {
                    self.emit_line_shift(n as isize);
                }
            }
            // ICH
            (None, [], b'@') => {
                self.state.insert_chars(n);
                self.emit_rest_of_row();
            }
            // DCH
            (None, [], b'P') => {
                self.state.delete_chars(n);
                self.emit_rest_of_row();
            }
            // SU
            (None, [], b'S') => self.scroll(n as isize),
            // SD; xterm's five-parameter form is mouse tracking
            (None, [], b'T') if csi.params.len() <= 1 => self.scroll(-(n as isize)),
            (None, [], b'r') => self.set_scroll_region(csi),
            (None, [], b'm') => {
                let colors = self.capabilities.features.supports_ansi_colors;
                apply_sgr(self.state.attributes_mut(), &csi.params, colors);
                self.emit_attributes();
            }
            // TBC
            (None, [], b'g') => self.clear_tab_stops(csi.param(0, 0)),
            (None, [], b'h') => self.set_modes(&csi.params, true),
            (None, [], b'l') => self.set_modes(&csi.params, false),
            (Some(b'?'), [], b'h') => self.set_dec_modes(&csi.params, true),
            (Some(b'?'), [], b'l') => self.set_dec_modes(&csi.params, false),
            (None, [], b'n') => self.device_status_report(csi.param(0, 0)),
            (None, [], b'c') if csi.param(0, 0) == 0 => self.primary_device_attributes(),
            (Some(b'>'), [], b'c') if csi.param(0, 0) == 0 => self.secondary_device_attributes(),
            // ANSI save/restore cursor
            (None, [], b's') if csi.params.is_empty() => self.save_cursor(),
            (None, [], b'u') if csi.params.is_empty() => self.restore_cursor(),
            // DECSTR
            (None, [b'!'], b'p') => self.soft_reset(),
            _ => {
                tracing::debug!(
                    private_marker = ?csi.private_marker.map(char::from),
                    params = ?csi.params,
                    intermediates = ?csi.intermediates,
                    final_byte = %char::from(csi.final_byte),
                    "unhandled CSI"
                );
            }
        }
    }

    /// ED
    fn erase_display(&mut self, mode: u16) {
        let cursor = *self.state.cursor();
        let (rows, columns) = (self.state.rows(), self.state.columns());
        match mode {
            0 => {
                self.state.erase_cells(cursor.row, cursor.column..columns);
                self.state.erase_rows(cursor.row + 1..rows);
            }
            1 => {
                self.state.erase_rows(0..cursor.row);
                self.state.erase_cells(cursor.row, 0..cursor.column + 1);
            }
            2 => self.state.erase_rows(0..rows),
            _ => {
                tracing::debug!(mode, "unhandled ED mode");
                return;
            }
        }
        self.emit(TerminalUpdate::Clear);
    }

    /// EL
    fn erase_line(&mut self, mode: u16) {
        let cursor = *self.state.cursor();
        let columns = self.state.columns();
        let range = match mode {
            0 => cursor.column..columns,
            1 => 0..cursor.column + 1,
            2 => 0..columns,
            _ => {
                tracing::debug!(mode, "unhandled EL mode");
                return;
            }
        };
        self.state.erase_cells(cursor.row, range.clone());
        self.emit_row_cells(cursor.row, range.start, range.end);
    }

    /// IL and DL shift the rows from the cursor to the region bottom and
    /// leave the cursor at the left margin
    fn emit_line_shift(&mut self, amount: isize) {
        let (_, bottom) = self.state.scroll_region();
        let top = self.state.cursor().row;
        self.emit(TerminalUpdate::Scroll {
            top,
            bottom,
            amount,
        });
        self.state.cursor_mut().carriage_return();
        self.emit_cursor();
    }

    fn emit_rest_of_row(&mut self) {
        let cursor = *self.state.cursor();
        let columns = self.state.columns();
        self.emit_row_cells(cursor.row, cursor.column, columns);
    }

    /// SU (positive) and SD (negative) over the scroll region
    fn scroll(&mut self, amount: isize) {
        let (top, bottom) = self.state.scroll_region();
        let lines = amount.unsigned_abs();
        if amount > 0 {
            self.state.scroll_up(lines);
        } else {
            self.state.scroll_down(lines);
        }
        self.emit(TerminalUpdate::Scroll {
            top,
            bottom,
            amount,
        });
    }

    /// DECSTBM
    fn set_scroll_region(&mut self, csi: &CsiDispatch) {
        if !self.capabilities.features.supports_scroll_region {
            tracing::debug!("scroll regions disabled");
            return;
        }
        let rows = self.state.rows();
        let top = usize::from(csi.param_or_default(0, 1)) - 1;
        let bottom = match csi.param_or_default(1, 0) {
            0 => rows - 1,
            value => usize::from(value) - 1,
        }
        .min(rows - 1);
        if top >= bottom {
            tracing::debug!(top, bottom, rows, "invalid scroll region");
            return;
        }

        self.state.set_scroll_region(top, bottom);
        self.emit(TerminalUpdate::ScrollRegion { top, bottom });
        self.set_cursor_position(0, 0);
        self.emit_cursor();
    }

    /// TBC
    fn clear_tab_stops(&mut self, mode: u16) {
        if !self.capabilities.features.supports_tab_stops {
            return;
        }
        match mode {
            0 => {
                let column = self.state.cursor().column;
                self.state.clear_tab_stop(column);
            }
            3 => self.state.clear_all_tab_stops(),
            _ => tracing::debug!(mode, "unhandled TBC mode"),
        }
    }

    /// SM / RM
    fn set_modes(&mut self, params: &[u16], enabled: bool) {
        for &param in params {
            match param {
                4 => {
                    self.state.modes_mut().insert = enabled;
                    self.emit_mode(TerminalMode::Insert, enabled);
                }
                20 => {
                    self.state.modes_mut().linefeed_newline = enabled;
                    self.emit_mode(TerminalMode::LinefeedNewline, enabled);
                }
                _ => tracing::debug!(param, enabled, "unhandled mode"),
            }
        }
    }

    /// DECSET / DECRST
    fn set_dec_modes(&mut self, params: &[u16], enabled: bool) {
        for &param in params {
            match param {
                1 => {
                    self.state.modes_mut().application_cursor = enabled;
                    self.emit_mode(TerminalMode::ApplicationCursor, enabled);
                }
                5 => {
                    self.state.modes_mut().reverse_video = enabled;
                    self.emit_mode(TerminalMode::ReverseVideo, enabled);
                }
                6 => {
                    self.state.set_origin_mode(enabled);
                    self.emit_mode(TerminalMode::OriginMode, enabled);
                    self.set_cursor_position(0, 0);
                    self.emit_cursor();
                }
                7 => {
                    self.state.set_auto_wrap(enabled);
                    self.emit_mode(TerminalMode::AutoWrap, enabled);
                }
                25 => {
                    self.state.set_cursor_visible(enabled);
                    self.emit(TerminalUpdate::CursorVisibility { visible: enabled });
                }
                _ => tracing::debug!(param, enabled, "unhandled DEC private mode"),
            }
        }
    }

    /// DSR: operating status (5) and cursor position (6)
    fn device_status_report(&mut self, request: u16) {
        match request {
            5 => self.respond("\x1b[0n"),
            6 => {
                let cursor = *self.state.cursor();
                let (top, _) = self.state.scroll_region();
                let row = if self.state.origin_mode() {
                    cursor.row - top.min(cursor.row)
                } else {
                    cursor.row
                };
                let report = format!("\x1b[{};{}R", row + 1, cursor.column + 1);
                self.respond(&report);
            }
            _ => tracing::debug!(request, "unhandled DSR"),
        }
    }

    /// Primary DA: service class and feature list of the configured spec
    fn primary_device_attributes(&mut self) {
        let reply = match self.capabilities.spec {
            TerminalSpec::Vt100 => "\x1b[?1;2c".to_string(),
            TerminalSpec::Vt102 => "\x1b[?6c".to_string(),
            spec => {
                let mut features = String::from("1;2;6;7;8;9");
                if spec.level() >= 4 {
                    features.push_str(";15;18;21");
                }
                if self.capabilities.features.supports_ansi_colors {
                    features.push_str(";22");
                }
                format!("\x1b[?{};{}c", 60 + spec.level(), features)
            }
        };
        self.respond(&reply);
    }

    /// Secondary DA: terminal model, firmware version, keyboard
    fn secondary_device_attributes(&mut self) {
        let model = match self.capabilities.spec {
            TerminalSpec::Vt100 | TerminalSpec::Vt102 => 0,
            TerminalSpec::Vt220 => 1,
            TerminalSpec::Vt240 => 2,
            TerminalSpec::Vt320 => 24,
            TerminalSpec::Vt340 => 19,
            TerminalSpec::Vt420 => 41,
            TerminalSpec::Vt510 => 61,
            TerminalSpec::Vt520 => 64,
            TerminalSpec::Vt525 => 65,
        };
        self.respond(&format!("\x1b[>{};10;0c", model));
    }

    /// DECSTR
    fn soft_reset(&mut self) {
        self.state.set_cursor_visible(true);
        self.state.set_origin_mode(false);
        self.state.set_auto_wrap(true);
        let modes = self.state.modes_mut();
        modes.insert = false;
        modes.application_cursor = false;
        modes.application_keypad = false;
        self.state.reset_scroll_region();
        *self.state.attributes_mut() = Default::default();
        self.state.charsets_mut().reset();
        self.state.save_cursor_at_home();

        self.emit(TerminalUpdate::CursorVisibility { visible: true });
        self.emit_mode(TerminalMode::Insert, false);
        self.emit_mode(TerminalMode::OriginMode, false);
        self.emit_mode(TerminalMode::AutoWrap, true);
        self.emit_mode(TerminalMode::ApplicationCursor, false);
        self.emit_mode(TerminalMode::ApplicationKeypad, false);
        let (top, bottom) = self.state.scroll_region();
        self.emit(TerminalUpdate::ScrollRegion { top, bottom });
        self.emit_attributes();
    }
}

//! Golden tests for the terminal engine
//!
//! Each test writes a byte stream through the `Terminal` facade and checks
//! the resulting screen, cursor, pen, and replies.

use mochi_vt::config::{FeatureOverrides, StringLimits};
use mochi_vt::core::{CellPosition, Color, SelectionKind, SelectionPoint, TerminalMode};
use mochi_vt::{
    C1Transmission, Emulator, ResolveOptions, Terminal, TerminalSelection, TerminalSpec,
    TerminalUpdate,
};

/// xterm-flavoured terminal of the given size
fn xterm(rows: usize, columns: usize) -> Terminal {
    Terminal::new(&ResolveOptions {
        emulator: Some(Emulator::Xterm),
        features: FeatureOverrides {
            initial_rows: Some(rows),
            initial_columns: Some(columns),
            ..Default::default()
        },
        ..Default::default()
    })
    .expect("valid options")
}

fn cursor(term: &Terminal) -> (usize, usize) {
    let cursor = term.snapshot().cursor();
    (cursor.row, cursor.column)
}

#[test]
fn test_cursor_movement() {
    let mut term = xterm(24, 80);
    term.write(b"Hello\x1b[3CWorld\x1b[2DXX\x1b[H\x1b[2J\x1b[5;10HPositioned");

    assert_eq!(term.snapshot().row_text(0), "");
    assert_eq!(term.snapshot().row_text(4), "         Positioned");
    assert_eq!(cursor(&term), (4, 19));
}

#[test]
fn test_basic_colors() {
    let mut term = xterm(24, 80);
    term.write(b"\x1b[31mRed\x1b[0m \x1b[32mGreen\x1b[0m \x1b[34mBlue\x1b[0m");

    let state = term.snapshot();
    assert_eq!(state.row_text(0), "Red Green Blue");
    assert_eq!(state.cell(0, 0).unwrap().attributes.fg, Color::RED);
    assert_eq!(state.cell(0, 4).unwrap().attributes.fg, Color::GREEN);
    assert_eq!(state.cell(0, 3).unwrap().attributes.fg, Color::Default);
}

#[test]
fn test_256_and_truecolor() {
    let mut term = xterm(24, 80);
    term.write(b"\x1b[38;5;196mRed256\x1b[0m \x1b[38;2;0;255;0mTrueGreen\x1b[0m");

    let state = term.snapshot();
    assert_eq!(state.row_text(0), "Red256 TrueGreen");
    assert_eq!(state.cell(0, 0).unwrap().attributes.fg, Color::Indexed(196));
    assert_eq!(state.cell(0, 7).unwrap().attributes.fg, Color::Rgb(0, 255, 0));
}

#[test]
fn test_colors_disabled_on_vt220() {
    let mut term = Terminal::new(&ResolveOptions::with_spec(TerminalSpec::Vt220)).unwrap();
    term.write(b"\x1b[1;31mX");

    let cell = term.snapshot().cell(0, 0).unwrap();
    assert!(cell.attributes.bold);
    assert_eq!(cell.attributes.fg, Color::Default);
}

#[test]
fn test_line_wrapping() {
    let mut term = xterm(3, 10);
    term.write(b"0123456789ABCDE");

    assert_eq!(term.snapshot().to_text(), "0123456789\nABCDE\n");
    assert_eq!(cursor(&term), (1, 5));
}

#[test]
fn test_newline_and_carriage_return() {
    let mut term = xterm(4, 20);
    term.write(b"Line1\r\nLine2\r\nLine3");
    assert_eq!(term.snapshot().to_text(), "Line1\nLine2\nLine3\n");

    // Bare LF keeps the column
    let mut term = xterm(3, 10);
    term.write(b"ab\ncd");
    assert_eq!(term.snapshot().to_text(), "ab\n  cd\n");
}

#[test]
fn test_scrolling_past_bottom() {
    let mut term = xterm(3, 5);
    term.write(b"1\r\n2\r\n3\r\n4\r\n5");
    assert_eq!(term.snapshot().to_text(), "3\n4\n5");
}

#[test]
fn test_scroll_region_confines_scrolling() {
    let mut term = xterm(6, 5);
    term.write(b"top\x1b[6;1Hbot\x1b[2;5r\x1b[5;1H");
    term.write(b"a\r\nb\r\nc\r\nd\r\ne");

    let state = term.snapshot();
    assert_eq!(state.row_text(0), "top");
    assert_eq!(state.row_text(5), "bot");
    assert_eq!(state.to_text(), "top\nb\nc\nd\ne\nbot");
}

#[test]
fn test_dec_line_drawing() {
    let mut term = xterm(3, 10);
    term.write(b"\x1b(0lqqk\r\nx  x\r\nmqqj\x1b(B");
    assert_eq!(term.snapshot().to_text(), "┌──┐\n│  │\n└──┘");
}

#[test]
fn test_national_replacement_sets() {
    let mut term = xterm(3, 10);
    term.write(b"\x1b(A#\x1b(K[\\]\x1b(R@\x1b(B#");
    assert_eq!(term.snapshot().row_text(0), "£ÄÖÜà#");
}

#[test]
fn test_single_shift() {
    let mut term = xterm(1, 10);
    term.write(b"\x1b*0\x1bNqq");
    assert_eq!(term.snapshot().row_text(0), "─q");
}

#[test]
fn test_title_update() {
    let mut term = xterm(2, 10);
    let updates = term.write(b"\x1b]2;build: ok\x1b\\");

    assert_eq!(
        updates,
        vec![TerminalUpdate::Title {
            title: "build: ok".into()
        }]
    );
    assert_eq!(term.snapshot().title(), "build: ok");
}

#[test]
fn test_oversized_title_is_dropped() {
    let mut term = Terminal::new(&ResolveOptions {
        features: FeatureOverrides {
            osc_limit: Some(8),
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();

    let mut input = b"\x1b]2;".to_vec();
    input.extend(std::iter::repeat(b'x').take(64));
    input.extend(b"\x1b\\ok");
    term.write(&input);

    assert_eq!(term.snapshot().title(), "");
    assert_eq!(term.snapshot().row_text(0), "ok");
}

#[test]
fn test_print_run_updates() {
    let mut term = xterm(2, 10);
    let updates = term.write(b"hi\x1b[2;1Hx");

    assert_eq!(
        updates,
        vec![
            TerminalUpdate::Cells {
                positions: vec![
                    CellPosition { row: 0, column: 0 },
                    CellPosition { row: 0, column: 1 },
                ]
            },
            TerminalUpdate::Cursor { row: 0, column: 2 },
            TerminalUpdate::Cursor { row: 1, column: 0 },
            TerminalUpdate::Cells {
                positions: vec![CellPosition { row: 1, column: 0 }]
            },
            TerminalUpdate::Cursor { row: 1, column: 1 },
        ]
    );
}

#[test]
fn test_mode_updates() {
    let mut term = xterm(2, 10);
    let updates = term.write(b"\x1b[4h\x1b[?7l\x1b=");

    assert_eq!(
        updates,
        vec![
            TerminalUpdate::Mode {
                mode: TerminalMode::Insert,
                enabled: true
            },
            TerminalUpdate::Mode {
                mode: TerminalMode::AutoWrap,
                enabled: false
            },
            TerminalUpdate::Mode {
                mode: TerminalMode::ApplicationKeypad,
                enabled: true
            },
        ]
    );
}

#[test]
fn test_bell_hook() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let rings = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&rings);
    let mut term = xterm(2, 10);
    term.on_bell(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let updates = term.write(b"a\x07b\x07");
    assert_eq!(rings.load(Ordering::SeqCst), 2);
    assert_eq!(
        updates
            .iter()
            .filter(|u| matches!(u, TerminalUpdate::Bell))
            .count(),
        2
    );
}

#[test]
fn test_bel_string_terminator_rings() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let rings = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&rings);
    let mut term = xterm(2, 10);
    term.on_bell(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let updates = term.write(b"\x1b]2;done\x07");
    assert_eq!(
        updates,
        vec![
            TerminalUpdate::Title {
                title: "done".into()
            },
            TerminalUpdate::Bell,
        ]
    );
    assert_eq!(rings.load(Ordering::SeqCst), 1);

    // DECRQSS closed by BEL still answers, then rings
    term.write(b"\x1bP$qm\x07");
    assert_eq!(term.take_responses(), vec![b"\x1bP1$r0m\x1b\\".to_vec()]);
    assert_eq!(rings.load(Ordering::SeqCst), 2);

    // ST-terminated strings stay silent
    term.write(b"\x1b]2;quiet\x1b\\\x1b_apc\x1b\\");
    assert_eq!(rings.load(Ordering::SeqCst), 2);
}

#[test]
fn test_replies_use_live_c1_mode() {
    let mut term = Terminal::new(&ResolveOptions::with_spec(TerminalSpec::Vt320)).unwrap();
    assert_eq!(
        term.capabilities().features.default_c1_transmission,
        C1Transmission::EightBit
    );

    term.write(b"\x1b[6n");
    assert_eq!(term.take_responses(), vec![b"\x9b1;1R".to_vec()]);

    term.write(b"\x1b F\x1b[6n");
    assert_eq!(term.take_responses(), vec![b"\x1b[1;1R".to_vec()]);
}

#[test]
fn test_eight_bit_csi_input() {
    let mut term = Terminal::new(&ResolveOptions::with_spec(TerminalSpec::Vt220)).unwrap();
    term.write(b"\x9b3;3Hx");
    assert_eq!(cursor(&term), (2, 3));

    // VT100 does not honour single-byte introducers
    let mut term = Terminal::new(&ResolveOptions::with_spec(TerminalSpec::Vt100)).unwrap();
    term.write(b"\x9b3;3Hx");
    assert_eq!(term.snapshot().row_text(0), "3;3Hx");
}

#[test]
fn test_decrqss_round_trip() {
    let mut term = xterm(10, 10);
    term.write(b"\x1b[3;7r\x1bP$qr\x1b\\\x1b[4;7m\x1bP$qm\x1b\\");
    assert_eq!(
        term.take_responses(),
        vec![b"\x1bP1$r3;7r\x1b\\".to_vec(), b"\x1bP1$r0;4;7m\x1b\\".to_vec()]
    );
}

#[test]
fn test_truncated_dcs_gets_no_reply() {
    let mut term = Terminal::new(&ResolveOptions {
        emulator: Some(Emulator::Xterm),
        features: FeatureOverrides {
            dcs_limit: Some(1),
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        term.capabilities().features.string_limits,
        StringLimits {
            osc: 65536,
            dcs: 1,
            sos_pm_apc: 65536
        }
    );

    term.write(b"\x1bP$q\"p\x1b\\");
    assert!(term.take_responses().is_empty());

    // The terminal keeps working afterwards
    term.write(b"\x1b[5n");
    assert_eq!(term.take_responses(), vec![b"\x1b[0n".to_vec()]);
}

#[test]
fn test_wide_and_combining_text() {
    let mut term = xterm(2, 10);
    term.write_str("日本e\u{0301}");

    let state = term.snapshot();
    assert_eq!(state.row_text(0), "日本e\u{0301}");
    assert_eq!(cursor(&term), (0, 5));
}

#[test]
fn test_selection_text_over_wide_glyphs() {
    let mut term = xterm(2, 10);
    term.write_str("日本語です");

    let selection = TerminalSelection::new(
        SelectionPoint::new(0, 2),
        SelectionPoint::new(0, 6),
        SelectionKind::Normal,
    );
    assert_eq!(term.selection_text(&selection), "本語");
}

#[test]
fn test_snapshot_json() {
    let mut term = xterm(2, 4);
    term.write(b"\x1b[1mA\x1b]2;t\x07");

    let json = serde_json::to_value(term.snapshot()).unwrap();
    assert_eq!(json["rows"], 2);
    assert_eq!(json["columns"], 4);
    assert_eq!(json["title"], "t");
    assert_eq!(json["buffer"][0][0]["glyph"], "A");
    assert_eq!(json["buffer"][0][0]["attributes"]["bold"], true);
    assert_eq!(json["cursor"]["column"], 1);
}

#[test]
fn test_garbage_then_recovery() {
    let mut term = xterm(2, 20);
    term.write(b"\x1b[1;2;3;4;5;6;7;8;9;10;11;12;13;14;15;16;17;18m");
    term.write(b"\x1b[?1:2h\x1b[1$$$q\x1bP1;2$$$q junk \x1b\\\x18\x1a");
    term.write(b"ok");
    assert_eq!(term.snapshot().row_text(0), "ok");
}

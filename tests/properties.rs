//! Property-based invariant tests
//!
//! These hold for any input:
//!
//! 1. Byte classification is correct over the whole 0-255 domain.
//! 2. The parser never panics and a reset leaves no partial sequence behind.
//! 3. Well-formed CSI sequences dispatch exactly what was sent.
//! 4. Oversized OSC payloads never dispatch and the parser resynchronises.
//! 5. The screen model keeps its shape and cursor bounds.

use mochi_vt::config::{FeatureOverrides, ParserOptions, StringLimits};
use mochi_vt::parser::{classify, ByteClass, CsiDispatch, Parser, ParserEvent, ParserState};
use mochi_vt::{Emulator, ResolveOptions, Terminal};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn expected_class(byte: u8) -> ByteClass {
    let mut class = ByteClass::empty();
    if byte <= 0x1F || (0x80..=0x9F).contains(&byte) {
        class |= ByteClass::CONTROL;
    }
    if byte == 0x1B {
        class |= ByteClass::ESCAPE;
    }
    if byte == 0x07 || byte == 0x9C {
        class |= ByteClass::STRING_TERMINATOR;
    }
    if (0x20..=0x2F).contains(&byte) {
        class |= ByteClass::INTERMEDIATE;
    }
    if (0x30..=0x3F).contains(&byte) {
        class |= ByteClass::PARAMETER;
    }
    if (0x40..=0x7E).contains(&byte) {
        class |= ByteClass::FINAL;
    }
    if byte == 0x7F {
        class |= ByteClass::DELETE;
    } else if (0x20..=0x7E).contains(&byte) || class.is_empty() {
        class |= ByteClass::PRINTABLE;
    }
    class
}

fn csi_sequence() -> impl Strategy<Value = CsiDispatch> {
    (
        prop::option::of(prop::sample::select(vec![b'<', b'=', b'>', b'?'])),
        prop::collection::vec(any::<u16>(), 0..=16),
        prop::collection::vec(0x20u8..=0x2F, 0..=2),
        0x40u8..=0x7E,
    )
        .prop_map(|(private_marker, params, intermediates, final_byte)| CsiDispatch {
            private_marker,
            params,
            intermediates,
            final_byte,
        })
}

fn encode_csi(csi: &CsiDispatch) -> Vec<u8> {
    let mut bytes = b"\x1b[".to_vec();
    bytes.extend(csi.private_marker);
    let params: Vec<String> = csi.params.iter().map(u16::to_string).collect();
    bytes.extend(params.join(";").bytes());
    bytes.extend(&csi.intermediates);
    bytes.push(csi.final_byte);
    bytes
}

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
    .unwrap()
}

/// Byte streams biased towards control sequences
fn terminal_bytes() -> impl Strategy<Value = Vec<u8>> {
    let fragment = prop_oneof![
        prop::collection::vec(0x20u8..=0x7E, 1..8),
        Just(b"\x1b[".to_vec()),
        Just(b"\x1b]".to_vec()),
        Just(b"\x1bP".to_vec()),
        Just(b"\x1b\\".to_vec()),
        Just(b"\r\n".to_vec()),
        prop::collection::vec(any::<u8>(), 1..4),
        "[0-9;?]{0,8}[@A-Za-z`]".prop_map(|s| {
            let mut bytes = b"\x1b[".to_vec();
            bytes.extend(s.bytes());
            bytes
        }),
    ];
    prop::collection::vec(fragment, 0..64).prop_map(|parts| parts.concat())
}

// ── Classification ──────────────────────────────────────────────────────

#[test]
fn classification_is_exhaustively_correct() {
    for byte in 0..=255u8 {
        assert_eq!(classify(byte), expected_class(byte), "byte 0x{:02x}", byte);
    }
}

#[test]
fn delete_is_never_printable() {
    assert!(!classify(0x7F).contains(ByteClass::PRINTABLE));
    assert!(classify(0x7F).contains(ByteClass::DELETE));
}

proptest! {
    #[test]
    fn every_byte_has_a_class(byte in any::<u8>()) {
        prop_assert!(!classify(byte).is_empty());
    }

    // ── Parser ──────────────────────────────────────────────────────────

    #[test]
    fn parser_never_panics(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut parser = Parser::default();
        let _ = parser.parse(&data);
    }

    #[test]
    fn reset_leaves_no_partial_state(
        prefix in terminal_bytes(),
        suffix in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut parser = Parser::default();
        parser.parse(&prefix);
        parser.reset();
        prop_assert_eq!(parser.state(), ParserState::Ground);

        let mut fresh = Parser::default();
        prop_assert_eq!(parser.parse(&suffix), fresh.parse(&suffix));
    }

    #[test]
    fn reset_is_idempotent(prefix in terminal_bytes()) {
        let mut parser = Parser::default();
        parser.parse(&prefix);
        parser.reset();
        let once = parser.parse(b"\x1b[1mx");
        parser.reset();
        parser.reset();
        prop_assert_eq!(parser.parse(b"\x1b[1mx"), once);
    }

    #[test]
    fn csi_round_trip(csi in csi_sequence()) {
        let mut parser = Parser::default();
        let events = parser.parse(&encode_csi(&csi));
        prop_assert_eq!(events, vec![ParserEvent::CsiDispatch(csi)]);
        prop_assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn oversized_osc_never_dispatches(
        limit in 1usize..64,
        extra in 1usize..64,
        bel in any::<bool>(),
    ) {
        let mut parser = Parser::new(ParserOptions {
            string_limits: StringLimits { osc: limit, dcs: 64, sos_pm_apc: 64 },
            ..ParserOptions::default()
        });

        let mut input = b"\x1b]".to_vec();
        input.extend(std::iter::repeat(b'x').take(limit + extra));
        input.extend_from_slice(if bel { b"\x07" } else { b"\x1b\\" });

        let events = parser.parse(&input);
        prop_assert!(!events.iter().any(|e| matches!(e, ParserEvent::OscDispatch(_))));
        // A BEL terminator is also a bell
        let mut expected = vec![ParserEvent::Ignore];
        if bel {
            expected.push(ParserEvent::Execute(0x07));
        }
        prop_assert_eq!(events, expected);
        prop_assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn osc_within_limit_dispatches(payload in "[ -~]{0,32}") {
        let mut parser = Parser::default();
        let mut input = b"\x1b]".to_vec();
        input.extend(payload.bytes());
        input.push(0x07);
        prop_assert_eq!(
            parser.parse(&input),
            vec![ParserEvent::OscDispatch(payload.into_bytes()), ParserEvent::Execute(0x07)]
        );
    }

    // ── Screen model ────────────────────────────────────────────────────

    #[test]
    fn screen_shape_and_cursor_bounds(
        rows in 1usize..30,
        columns in 1usize..100,
        data in terminal_bytes(),
    ) {
        let mut term = xterm(rows, columns);
        term.write(&data);

        let state = term.snapshot();
        prop_assert_eq!(state.rows(), rows);
        prop_assert_eq!(state.columns(), columns);
        for row in 0..rows {
            prop_assert_eq!(state.row_cells(row).map(<[_]>::len), Some(columns));
        }
        prop_assert!(state.cursor().row < rows);
        prop_assert!(state.cursor().column < columns);
        let (top, bottom) = state.scroll_region();
        prop_assert!(top <= bottom && bottom < rows);
    }

    #[test]
    fn chunking_does_not_change_the_result(
        data in terminal_bytes(),
        split in any::<prop::sample::Index>(),
    ) {
        let mut whole = xterm(10, 40);
        whole.write(&data);

        let at = split.index(data.len() + 1);
        let mut chunked = xterm(10, 40);
        chunked.write(&data[..at]);
        chunked.write(&data[at..]);

        prop_assert_eq!(whole.snapshot(), chunked.snapshot());
    }

    #[test]
    fn resize_keeps_invariants(
        data in terminal_bytes(),
        rows in 1usize..40,
        columns in 1usize..120,
    ) {
        let mut term = xterm(24, 80);
        term.write(&data);
        term.resize(rows, columns).unwrap();

        let state = term.snapshot();
        prop_assert_eq!(state.rows(), rows);
        prop_assert_eq!(state.columns(), columns);
        prop_assert!(state.cursor().row < rows);
        prop_assert!(state.cursor().column < columns);
        prop_assert_eq!(state.scroll_region(), (0, rows - 1));
    }
}

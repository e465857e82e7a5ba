//! Device control strings
//!
//! Only DECRQSS (`DCS $ q Pt ST`) is answered. Other DCS payloads are
//! consumed and dropped.

use super::sgr::sgr_report;
use super::Interpreter;
use crate::config::C1Transmission;
use crate::parser::DcsHeader;

/// Longest DECRQSS request we buffer; real requests are one or two bytes
const MAX_REQUEST: usize = 8;

/// An open DECRQSS request
#[derive(Debug, Default)]
pub(super) struct DcsSession {
    request: Vec<u8>,
    overflowed: bool,
}

impl DcsSession {
    fn push(&mut self, byte: u8) {
        if self.request.len() < MAX_REQUEST {
            self.request.push(byte);
        } else {
            self.overflowed = true;
        }
    }
}

impl Interpreter {
    pub(super) fn dcs_hook(&mut self, header: &DcsHeader) {
        let is_decrqss = header.private_marker.is_none()
            && header.params.is_empty()
            && header.intermediates == [b'$']
            && header.final_byte == b'q';
        if is_decrqss {
            self.dcs = Some(DcsSession::default());
        } else {
            self.dcs = None;
            tracing::debug!(
                intermediates = ?header.intermediates,
                final_byte = %char::from(header.final_byte),
                "unhandled DCS"
            );
        }
    }

    pub(super) fn dcs_put(&mut self, byte: u8) {
        if let Some(session) = self.dcs.as_mut() {
            session.push(byte);
        }
    }

    pub(super) fn dcs_unhook(&mut self) {
        let Some(session) = self.dcs.take() else {
            return;
        };
        let status = if session.overflowed {
            None
        } else {
            self.setting_report(&session.request)
        };
        let reply = match status {
            Some(setting) => format!("\x1bP1$r{}\x1b\\", setting),
            None => {
                tracing::debug!(request = ?session.request, "unknown DECRQSS request");
                String::from("\x1bP0$r\x1b\\")
            }
        };
        self.respond(&reply);
    }

    /// Current value of the setting named by a DECRQSS request, in the
    /// form of the control function that would set it
    fn setting_report(&self, request: &[u8]) -> Option<String> {
        match request {
            // SGR
            b"m" => Some(format!("{}m", sgr_report(self.state.attributes()))),
            // DECSTBM
            b"r" => {
                let (top, bottom) = self.state.scroll_region();
                Some(format!("{};{}r", top + 1, bottom + 1))
            }
            // DECSCL
            b"\"p" => {
                let level = self.capabilities.spec.level();
                if level < 2 {
                    Some(String::from("61\"p"))
                } else {
                    let controls = match self.state.c1_transmission() {
                        C1Transmission::SevenBit => 1,
                        C1Transmission::EightBit => 0,
                    };
                    Some(format!("{};{}\"p", 60 + level, controls))
                }
            }
            // DECSCA: character protection is not tracked
            b"\"q" => Some(String::from("0\"q")),
            _ => None,
        }
    }
}

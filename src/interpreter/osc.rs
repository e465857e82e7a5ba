//! Operating system commands

use super::Interpreter;
use crate::core::TerminalUpdate;

/// A decoded OSC payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscCommand {
    /// OSC 0: icon name and window title
    SetIconAndTitle(String),
    /// OSC 1
    SetIconName(String),
    /// OSC 2
    SetTitle(String),
    Unknown { command: String, data: String },
}

impl OscCommand {
    /// Decode `Ps ; Pt`. Text is UTF-8 with invalid sequences replaced.
    pub fn parse(payload: &[u8]) -> Self {
        let text = String::from_utf8_lossy(payload);
        let (command, data) = text.split_once(';').unwrap_or((text.as_ref(), ""));
        match command {
            "0" => OscCommand::SetIconAndTitle(data.to_string()),
            "1" => OscCommand::SetIconName(data.to_string()),
            "2" => OscCommand::SetTitle(data.to_string()),
            _ => OscCommand::Unknown {
                command: command.to_string(),
                data: data.to_string(),
            },
        }
    }
}

impl Interpreter {
    pub(super) fn osc_dispatch(&mut self, payload: &[u8]) {
        match OscCommand::parse(payload) {
            OscCommand::SetIconAndTitle(text) => {
                self.state.set_icon_name(text.clone());
                self.set_title(text);
            }
            OscCommand::SetIconName(name) => self.state.set_icon_name(name),
            OscCommand::SetTitle(title) => self.set_title(title),
            OscCommand::Unknown { command, data } => {
                tracing::debug!(%command, len = data.len(), "unhandled OSC");
            }
        }
    }

    fn set_title(&mut self, title: String) {
        self.state.set_title(title.clone());
        self.emit(TerminalUpdate::Title { title });
    }
}

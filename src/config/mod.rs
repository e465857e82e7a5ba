//! Terminal configuration
//!
//! A terminal is configured from three layers: the defaults of a historical
//! DEC spec, an optional modern-emulator overlay, and explicit per-feature
//! overrides. [`resolve`] merges them into one frozen [`ResolvedConfig`]
//! that the parser and interpreter share for their whole lifetime.

mod profile;
mod resolve;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use profile::{emulator_layer, spec_layer, EmulatorLayer, FeatureLayer};
pub use resolve::resolve;

/// Historical terminal spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalSpec {
    Vt100,
    Vt102,
    #[default]
    Vt220,
    Vt240,
    Vt320,
    Vt340,
    Vt420,
    Vt510,
    Vt520,
    Vt525,
}

impl TerminalSpec {
    pub fn name(self) -> &'static str {
        match self {
            TerminalSpec::Vt100 => "vt100",
            TerminalSpec::Vt102 => "vt102",
            TerminalSpec::Vt220 => "vt220",
            TerminalSpec::Vt240 => "vt240",
            TerminalSpec::Vt320 => "vt320",
            TerminalSpec::Vt340 => "vt340",
            TerminalSpec::Vt420 => "vt420",
            TerminalSpec::Vt510 => "vt510",
            TerminalSpec::Vt520 => "vt520",
            TerminalSpec::Vt525 => "vt525",
        }
    }

    /// Operating level reported in device attributes (1 for VT100 class, 2 for VT200, ...)
    pub fn level(self) -> u8 {
        match self {
            TerminalSpec::Vt100 | TerminalSpec::Vt102 => 1,
            TerminalSpec::Vt220 | TerminalSpec::Vt240 => 2,
            TerminalSpec::Vt320 | TerminalSpec::Vt340 => 3,
            TerminalSpec::Vt420 => 4,
            TerminalSpec::Vt510 | TerminalSpec::Vt520 | TerminalSpec::Vt525 => 5,
        }
    }
}

impl fmt::Display for TerminalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Modern emulator overlay applied on top of a spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emulator {
    Xterm,
}

/// How C1 controls are transmitted in terminal-generated responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum C1Transmission {
    /// `ESC [` style two-byte introducers
    #[serde(rename = "7-bit")]
    SevenBit,
    /// Single-byte 0x80-0x9F introducers
    #[serde(rename = "8-bit")]
    EightBit,
}

/// Per-channel payload caps, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLimits {
    pub osc: usize,
    pub dcs: usize,
    pub sos_pm_apc: usize,
}

/// Resolved feature record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub supports_ansi_colors: bool,
    pub supports_scroll_region: bool,
    pub supports_tab_stops: bool,
    pub default_c1_transmission: C1Transmission,
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub string_limits: StringLimits,
}

/// Caller overrides; unset fields leave the lower layers intact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureOverrides {
    pub supports_ansi_colors: Option<bool>,
    pub supports_scroll_region: Option<bool>,
    pub supports_tab_stops: Option<bool>,
    pub default_c1_transmission: Option<C1Transmission>,
    pub initial_rows: Option<usize>,
    pub initial_columns: Option<usize>,
    pub osc_limit: Option<usize>,
    pub dcs_limit: Option<usize>,
    pub sos_pm_apc_limit: Option<usize>,
    pub accept_c1_controls: Option<bool>,
    pub utf8: Option<bool>,
}

/// Input to [`resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    pub spec: Option<TerminalSpec>,
    pub emulator: Option<Emulator>,
    pub features: FeatureOverrides,
}

impl ResolveOptions {
    pub fn with_spec(spec: TerminalSpec) -> Self {
        Self {
            spec: Some(spec),
            ..Default::default()
        }
    }

    pub fn with_emulator(emulator: Emulator) -> Self {
        Self {
            emulator: Some(emulator),
            ..Default::default()
        }
    }

    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Options consumed by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    pub spec: TerminalSpec,
    /// Honour single-byte C1 introducers (0x90, 0x9B, 0x9C, ...)
    pub accept_c1_controls: bool,
    /// Decode UTF-8 in ground state
    pub utf8: bool,
    pub string_limits: StringLimits,
}

impl Default for ParserOptions {
    fn default() -> Self {
        resolve::baseline().parser
    }
}

/// Capabilities consumed by the interpreter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalCapabilities {
    pub spec: TerminalSpec,
    pub emulator: Option<Emulator>,
    pub features: Features,
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        resolve::baseline().capabilities
    }
}

/// Output of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub parser: ParserOptions,
    pub capabilities: TerminalCapabilities,
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid terminal dimensions {rows}x{columns}: rows and columns must be positive")]
    InvalidDimensions { rows: usize, columns: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reject a grid with no rows or no columns
pub fn check_dimensions(rows: usize, columns: usize) -> Result<(), ConfigError> {
    if rows == 0 || columns == 0 {
        return Err(ConfigError::InvalidDimensions { rows, columns });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_json() {
        let options = ResolveOptions::from_json(
            r#"{"spec": "vt320", "emulator": "xterm", "features": {"default_c1_transmission": "7-bit"}}"#,
        )
        .unwrap();

        assert_eq!(options.spec, Some(TerminalSpec::Vt320));
        assert_eq!(options.emulator, Some(Emulator::Xterm));
        assert_eq!(
            options.features.default_c1_transmission,
            Some(C1Transmission::SevenBit)
        );
        assert_eq!(options.features.initial_rows, None);
    }

    #[test]
    fn test_options_empty_json() {
        let options = ResolveOptions::from_json("{}").unwrap();
        assert_eq!(options, ResolveOptions::default());
    }

    #[test]
    fn test_options_bad_json() {
        let err = ResolveOptions::from_json(r#"{"spec": "vt999"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_options_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminal.json");
        std::fs::write(&path, r#"{"spec": "vt100"}"#).unwrap();

        let options = ResolveOptions::load(&path).unwrap();
        assert_eq!(options.spec, Some(TerminalSpec::Vt100));

        let missing = ResolveOptions::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_spec_display() {
        assert_eq!(TerminalSpec::Vt525.to_string(), "vt525");
        assert_eq!(TerminalSpec::Vt220.level(), 2);
    }
}

//! Built-in configuration layers
//!
//! Each historical spec supplies a complete [`FeatureLayer`]; emulator
//! overlays only carry the fields they change.

use super::{C1Transmission, Emulator, FeatureOverrides, StringLimits, TerminalSpec};

/// A complete set of tunables, as fixed by one spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayer {
    pub supports_ansi_colors: bool,
    pub supports_scroll_region: bool,
    pub supports_tab_stops: bool,
    pub default_c1_transmission: C1Transmission,
    pub accept_c1_controls: bool,
    pub utf8: bool,
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub string_limits: StringLimits,
}

impl FeatureLayer {
    /// Overlay every field the overrides set; unset fields are kept
    pub fn apply(&mut self, overrides: &FeatureOverrides) {
        if let Some(v) = overrides.supports_ansi_colors {
            self.supports_ansi_colors = v;
        }
        if let Some(v) = overrides.supports_scroll_region {
            self.supports_scroll_region = v;
        }
        if let Some(v) = overrides.supports_tab_stops {
            self.supports_tab_stops = v;
        }
        if let Some(v) = overrides.default_c1_transmission {
            self.default_c1_transmission = v;
        }
        if let Some(v) = overrides.accept_c1_controls {
            self.accept_c1_controls = v;
        }
        if let Some(v) = overrides.utf8 {
            self.utf8 = v;
        }
        if let Some(v) = overrides.initial_rows {
            self.initial_rows = v;
        }
        if let Some(v) = overrides.initial_columns {
            self.initial_columns = v;
        }
        if let Some(v) = overrides.osc_limit {
            self.string_limits.osc = v;
        }
        if let Some(v) = overrides.dcs_limit {
            self.string_limits.dcs = v;
        }
        if let Some(v) = overrides.sos_pm_apc_limit {
            self.string_limits.sos_pm_apc = v;
        }
    }
}

/// Overlay of a modern emulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorLayer {
    /// Spec used when the caller names none
    pub implied_spec: Option<TerminalSpec>,
    pub overrides: FeatureOverrides,
}

/// Defaults fixed by a historical spec
pub fn spec_layer(spec: TerminalSpec) -> FeatureLayer {
    let (c1, accept_c1, string_limits) = match spec {
        TerminalSpec::Vt100 | TerminalSpec::Vt102 => (
            C1Transmission::SevenBit,
            false,
            StringLimits {
                osc: 256,
                dcs: 256,
                sos_pm_apc: 256,
            },
        ),
        TerminalSpec::Vt220 | TerminalSpec::Vt240 => (
            C1Transmission::EightBit,
            true,
            StringLimits {
                osc: 1024,
                dcs: 4096,
                sos_pm_apc: 1024,
            },
        ),
        TerminalSpec::Vt320 | TerminalSpec::Vt340 => (
            C1Transmission::EightBit,
            true,
            StringLimits {
                osc: 2048,
                dcs: 8192,
                sos_pm_apc: 2048,
            },
        ),
        TerminalSpec::Vt420 | TerminalSpec::Vt510 | TerminalSpec::Vt520 | TerminalSpec::Vt525 => (
            C1Transmission::EightBit,
            true,
            StringLimits {
                osc: 4096,
                dcs: 16384,
                sos_pm_apc: 4096,
            },
        ),
    };

    FeatureLayer {
        supports_ansi_colors: spec == TerminalSpec::Vt525,
        supports_scroll_region: true,
        supports_tab_stops: true,
        default_c1_transmission: c1,
        accept_c1_controls: accept_c1,
        utf8: false,
        initial_rows: 24,
        initial_columns: 80,
        string_limits,
    }
}

/// Overrides carried by a modern emulator
pub fn emulator_layer(emulator: Emulator) -> EmulatorLayer {
    match emulator {
        Emulator::Xterm => EmulatorLayer {
            implied_spec: Some(TerminalSpec::Vt100),
            overrides: FeatureOverrides {
                supports_ansi_colors: Some(true),
                accept_c1_controls: Some(true),
                utf8: Some(true),
                osc_limit: Some(65536),
                dcs_limit: Some(65536),
                sos_pm_apc_limit: Some(65536),
                ..Default::default()
            },
        },
    }
}

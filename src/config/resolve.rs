//! Three-layer configuration merge
//!
//! Precedence, lowest first: terminal model defaults, emulator overlay, caller
//! overrides. The `TerminalSpec` comes from the caller if given, else from the
//! emulator, else VT220.

use super::profile::{emulator_layer, spec_layer, FeatureLayer};
use super::{
    check_dimensions, ConfigError, Features, ParserOptions, ResolveOptions, ResolvedConfig,
    TerminalCapabilities, TerminalSpec,
};

/// Resolve options into frozen parser options and terminal capabilities.
///
/// Fails only when the merged dimensions are not positive.
pub fn resolve(options: &ResolveOptions) -> Result<ResolvedConfig, ConfigError> {
    let overlay = options.emulator.map(emulator_layer);

    let spec = options
        .spec
        .or_else(|| overlay.as_ref().and_then(|layer| layer.implied_spec))
        .unwrap_or_default();

    let mut layer = spec_layer(spec);
    if let Some(overlay) = &overlay {
        layer.apply(&overlay.overrides);
    }
    layer.apply(&options.features);

    check_dimensions(layer.initial_rows, layer.initial_columns)?;

    tracing::debug!(%spec, emulator = ?options.emulator, "resolved terminal configuration");

    Ok(build(spec, options, layer))
}

/// The no-argument VT220 configuration
pub(super) fn baseline() -> ResolvedConfig {
    let spec = TerminalSpec::default();
    build(spec, &ResolveOptions::default(), spec_layer(spec))
}

fn build(spec: TerminalSpec, options: &ResolveOptions, layer: FeatureLayer) -> ResolvedConfig {
    ResolvedConfig {
        parser: ParserOptions {
            spec,
            accept_c1_controls: layer.accept_c1_controls,
            utf8: layer.utf8,
            string_limits: layer.string_limits,
        },
        capabilities: TerminalCapabilities {
            spec,
            emulator: options.emulator,
            features: Features {
                supports_ansi_colors: layer.supports_ansi_colors,
                supports_scroll_region: layer.supports_scroll_region,
                supports_tab_stops: layer.supports_tab_stops,
                default_c1_transmission: layer.default_c1_transmission,
                initial_rows: layer.initial_rows,
                initial_columns: layer.initial_columns,
                string_limits: layer.string_limits,
            },
        },
    }
}

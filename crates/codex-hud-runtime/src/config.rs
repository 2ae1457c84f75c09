use crate::{Error, Result};
use codex_hud_providers::codex::fields;
use codex_hud_types::HudConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// `~/.codex-hud/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".codex-hud").join("config.json"))
}

/// Load the HUD config, falling back to defaults on any failure.
///
/// `explicit` overrides the default location.
pub fn load_config(explicit: Option<&Path>) -> HudConfig {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(default_config_path) else {
        return HudConfig::default();
    };

    match load_config_from(&path) {
        Ok(config) => config,
        Err(Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            HudConfig::default()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config");
            HudConfig::default()
        }
    }
}

/// Read and validate a config file. Fails only when the file cannot be read or
/// is not JSON.
pub fn load_config_from(path: &Path) -> Result<HudConfig> {
    let content = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&content)?;
    Ok(config_from_value(&raw))
}

/// Merge well-typed fields of `raw` over the defaults.
pub fn config_from_value(raw: &Value) -> HudConfig {
    let defaults = HudConfig::default();
    let Some(raw) = raw.as_object() else {
        return defaults;
    };

    HudConfig {
        refresh_ms: raw
            .get("refreshMs")
            .and_then(positive_int)
            .unwrap_or(defaults.refresh_ms),
        max_tools: raw
            .get("maxTools")
            .and_then(positive_int)
            .map(|n| n as usize)
            .unwrap_or(defaults.max_tools),
        show_plan: fields::bool_field(raw, "showPlan").unwrap_or(defaults.show_plan),
        show_rates: fields::bool_field(raw, "showRates").unwrap_or(defaults.show_rates),
    }
}

fn positive_int(value: &Value) -> Option<u64> {
    let n = value.as_f64().filter(|n| n.is_finite() && *n > 0.0)?;
    let rounded = n.round();
    (rounded >= 1.0).then_some(rounded as u64)
}

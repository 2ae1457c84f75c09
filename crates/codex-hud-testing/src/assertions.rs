//! Assertions over the `--format json` snapshot output.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert the snapshot's turn state.
pub fn assert_turn_state(json: &Value, expected: &str) -> Result<()> {
    let state = json["turn_state"]
        .as_str()
        .context("Expected 'turn_state' string in JSON")?;

    if state != expected {
        anyhow::bail!("Expected turn_state {}, got {}", expected, state);
    }

    Ok(())
}

/// Assert the number of active and recent tool activities.
pub fn assert_tool_counts(json: &Value, active: usize, recent: usize) -> Result<()> {
    let active_tools = json["active_tools"]
        .as_array()
        .context("Expected 'active_tools' array in JSON")?;
    let recent_tools = json["recent_tools"]
        .as_array()
        .context("Expected 'recent_tools' array in JSON")?;

    if active_tools.len() != active || recent_tools.len() != recent {
        anyhow::bail!(
            "Expected {} active / {} recent tools, got {} / {}",
            active,
            recent,
            active_tools.len(),
            recent_tools.len()
        );
    }

    Ok(())
}

/// Assert a rate window's `used_percent` (`"rate_primary"` or `"rate_secondary"`).
pub fn assert_rate_percent(json: &Value, window: &str, expected: f64) -> Result<()> {
    let used = json[window]["used_percent"]
        .as_f64()
        .with_context(|| format!("Expected '{}.used_percent' number in JSON", window))?;

    if (used - expected).abs() > f64::EPSILON {
        anyhow::bail!("Expected {} used_percent {}, got {}", window, expected, used);
    }

    Ok(())
}

/// Assert that every rendered line fits within `width` columns.
pub fn assert_lines_fit(output: &str, width: usize) -> Result<()> {
    for (i, line) in output.lines().enumerate() {
        let len = line.chars().count();
        if len > width {
            anyhow::bail!("Line {} is {} columns wide (limit {}): {:?}", i, len, width, line);
        }
    }
    Ok(())
}

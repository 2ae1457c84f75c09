use serde::Serialize;

/// Presentation policy for the HUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudConfig {
    pub refresh_ms: u64,
    pub max_tools: usize,
    pub show_plan: bool,
    pub show_rates: bool,
}

impl HudConfig {
    pub const DEFAULT_REFRESH_MS: u64 = 700;
    pub const DEFAULT_MAX_TOOLS: usize = 3;
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            refresh_ms: Self::DEFAULT_REFRESH_MS,
            max_tools: Self::DEFAULT_MAX_TOOLS,
            show_plan: true,
            show_rates: true,
        }
    }
}

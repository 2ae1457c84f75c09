use codex_hud_engine::is_spark_model;

/// Compact model name for the status line, e.g. `gpt-5.3-codex` → `g5.3c`
pub fn shorten_model(model: &str) -> String {
    let lower = model.to_lowercase();
    let mut short = match lower.strip_prefix("gpt-") {
        Some(rest) => format!("g{}", rest),
        None => lower,
    };

    if let Some(base) = short.strip_suffix("-codex-spark") {
        short = format!("{}s", base);
    } else if let Some(base) = short.strip_suffix("-codex") {
        short = format!("{}c", base);
    }

    short.retain(|c| !c.is_whitespace());
    short
}

/// Tier badge shown next to the model
pub fn model_tier(model: &str) -> &'static str {
    if is_spark_model(Some(model)) {
        "Spark"
    } else {
        "Max"
    }
}

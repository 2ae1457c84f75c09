use codex_hud_providers::codex::fields::{self, Object};
use codex_hud_types::RateWindow;
use regex::Regex;
use std::sync::LazyLock;

/// Marker separating Spark-tier models and limits from the default tier
static SPARK_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)spark").unwrap());

/// Whether a model name belongs to the Spark tier
pub fn is_spark_model(model: Option<&str>) -> bool {
    model.is_some_and(|m| SPARK_MARKER.is_match(m))
}

/// Both windows of one `rate_limits` payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateLimitPair {
    pub primary: Option<RateWindow>,
    pub secondary: Option<RateWindow>,
}

/// Rate-limit state per tier; each tier keeps only its latest payload
#[derive(Debug, Clone, Default)]
pub struct RateBuckets {
    default_tier: RateLimitPair,
    spark_tier: RateLimitPair,
}

impl RateBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a `rate_limits` payload under its tier, replacing that tier's previous value
    pub fn ingest(&mut self, rate_limits: &Object) {
        let pair = RateLimitPair {
            primary: fields::object_field(rate_limits, "primary").and_then(parse_rate_window),
            secondary: fields::object_field(rate_limits, "secondary").and_then(parse_rate_window),
        };

        if is_spark_limit(rate_limits) {
            self.spark_tier = pair;
        } else {
            self.default_tier = pair;
        }
    }

    /// Windows for a model of the given tier, each falling back to the other tier
    pub fn resolve(self, spark_model: bool) -> RateLimitPair {
        let (preferred, fallback) = if spark_model {
            (self.spark_tier, self.default_tier)
        } else {
            (self.default_tier, self.spark_tier)
        };

        RateLimitPair {
            primary: preferred.primary.or(fallback.primary),
            secondary: preferred.secondary.or(fallback.secondary),
        }
    }
}

fn is_spark_limit(rate_limits: &Object) -> bool {
    ["limit_id", "limit_name"]
        .iter()
        .filter_map(|key| fields::str_field(rate_limits, key))
        .any(|value| SPARK_MARKER.is_match(value))
}

fn parse_rate_window(window: &Object) -> Option<RateWindow> {
    let used_percent = fields::num_field(window, "used_percent")?;

    Some(RateWindow {
        used_percent,
        resets_at: fields::num_field(window, "resets_at").and_then(fields::from_unix_seconds),
        window_minutes: fields::num_field(window, "window_minutes"),
    })
}

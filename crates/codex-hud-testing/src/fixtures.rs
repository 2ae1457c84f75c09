//! Sample rollouts and a builder for synthetic ones.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Bundled sample rollout files.
pub struct SampleFiles {
    samples_dir: PathBuf,
}

impl Default for SampleFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleFiles {
    /// Assumes samples are in `crates/codex-hud-providers/tests/samples/`.
    pub fn new() -> Self {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let samples_dir = manifest_dir
            .parent()
            .unwrap()
            .join("codex-hud-providers/tests/samples");

        Self { samples_dir }
    }

    pub fn path(&self, sample_name: &str) -> PathBuf {
        self.samples_dir.join(sample_name)
    }

    pub fn read(&self, sample_name: &str) -> Result<String> {
        let path = self.path(sample_name);
        fs::read_to_string(&path).with_context(|| format!("reading sample {}", path.display()))
    }

    /// Copy a sample file to a destination, creating parent directories.
    pub fn copy_to(&self, sample_name: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(self.path(sample_name), dest)?;
        Ok(())
    }
}

/// Fluent builder for rollout JSONL.
///
/// Every record is stamped one second after the previous one, starting from
/// [`RolloutWriter::START`].
///
/// # Example
/// ```
/// use codex_hud_testing::RolloutWriter;
///
/// let lines = RolloutWriter::new()
///     .turn_context("/work/app", "gpt-5-codex")
///     .turn_started(Some(200_000))
///     .exec_begin("c1", &["cargo", "build"])
///     .lines();
/// assert_eq!(lines.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RolloutWriter {
    clock: DateTime<Utc>,
    lines: Vec<String>,
}

impl Default for RolloutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl RolloutWriter {
    /// 2026-02-13T09:00:00Z
    pub const START: i64 = 1_770_973_200;

    pub fn new() -> Self {
        Self {
            clock: Utc.timestamp_opt(Self::START, 0).unwrap(),
            lines: Vec::new(),
        }
    }

    /// Timestamp the next record will carry.
    pub fn clock(&self) -> DateTime<Utc> {
        self.clock
    }

    /// Skip the clock forward.
    pub fn advance(mut self, seconds: i64) -> Self {
        self.clock += Duration::seconds(seconds);
        self
    }

    pub fn session_meta(self) -> Self {
        self.record("session_meta", json!({"id": "test-session"}))
    }

    pub fn turn_context(self, cwd: &str, model: &str) -> Self {
        self.record("turn_context", json!({"cwd": cwd, "model": model}))
    }

    pub fn turn_started(self, context_window: Option<u64>) -> Self {
        let mut payload = json!({"type": "turn_started"});
        if let Some(window) = context_window {
            payload["model_context_window"] = json!(window);
        }
        self.event(payload)
    }

    pub fn turn_complete(self) -> Self {
        self.event(json!({"type": "turn_complete"}))
    }

    pub fn turn_aborted(self) -> Self {
        self.event(json!({"type": "turn_aborted"}))
    }

    pub fn token_count(self, total_tokens: u64, context_window: u64) -> Self {
        self.event(json!({
            "type": "token_count",
            "info": {
                "total_token_usage": {"total_tokens": total_tokens},
                "model_context_window": context_window
            }
        }))
    }

    /// A `token_count` event carrying only rate limits.
    pub fn rate_limits(
        self,
        limit_id: &str,
        limit_name: Option<&str>,
        primary_percent: f64,
        secondary_percent: f64,
    ) -> Self {
        let resets_at = self.clock.timestamp() + 3600;
        let mut limits = json!({
            "limit_id": limit_id,
            "primary": {
                "used_percent": primary_percent,
                "window_minutes": 300,
                "resets_at": resets_at
            },
            "secondary": {
                "used_percent": secondary_percent,
                "window_minutes": 10080,
                "resets_at": resets_at + 86_400
            }
        });
        if let Some(name) = limit_name {
            limits["limit_name"] = json!(name);
        }
        self.event(json!({"type": "token_count", "info": null, "rate_limits": limits}))
    }

    /// A `plan_update` from `(status, step)` pairs.
    pub fn plan(self, steps: &[(&str, &str)]) -> Self {
        let plan: Vec<Value> = steps
            .iter()
            .map(|(status, step)| json!({"status": status, "step": step}))
            .collect();
        self.event(json!({"type": "plan_update", "plan": plan}))
    }

    pub fn exec_begin(self, call_id: &str, command: &[&str]) -> Self {
        self.event(json!({"type": "exec_command_begin", "call_id": call_id, "command": command}))
    }

    pub fn exec_end(self, call_id: &str, exit_code: i64) -> Self {
        self.event(json!({"type": "exec_command_end", "call_id": call_id, "exit_code": exit_code}))
    }

    pub fn mcp_begin(self, call_id: &str, server: &str, tool: &str) -> Self {
        self.event(json!({
            "type": "mcp_tool_call_begin",
            "call_id": call_id,
            "invocation": {"server": server, "tool": tool}
        }))
    }

    pub fn mcp_end(self, call_id: &str) -> Self {
        self.event(json!({"type": "mcp_tool_call_end", "call_id": call_id}))
    }

    /// An `event_msg` record with an arbitrary payload.
    pub fn event(self, payload: Value) -> Self {
        self.record("event_msg", payload)
    }

    /// A record of any type.
    pub fn record(mut self, record_type: &str, payload: Value) -> Self {
        let line = json!({
            "timestamp": self.clock.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "type": record_type,
            "payload": payload
        });
        self.lines.push(line.to_string());
        self.clock += Duration::seconds(1);
        self
    }

    /// A verbatim line, e.g. malformed JSON.
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    pub fn to_jsonl(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the rollout to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_jsonl())?;
        Ok(())
    }
}

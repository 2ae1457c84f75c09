use chrono::{DateTime, Utc};
use codex_hud_providers::codex::fields::{self, Object};
use codex_hud_providers::codex::{EventMsgType, RecordType, RolloutRecord, parse_rollout_lines};
use codex_hud_types::{Snapshot, ToolStatus, TurnState};
use std::path::PathBuf;

use crate::plan::parse_plan;
use crate::rates::{RateBuckets, is_spark_model};
use crate::tools::{ToolTracker, command_label, mcp_label};

/// Fold rollout lines into a snapshot, using the current time for undated records
pub fn reduce<I, S>(session_path: impl Into<PathBuf>, lines: I) -> Snapshot
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    reduce_at(session_path, lines, Utc::now())
}

/// Fold rollout lines into a snapshot with an explicit fallback time
pub fn reduce_at<I, S>(session_path: impl Into<PathBuf>, lines: I, now: DateTime<Utc>) -> Snapshot
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut reducer = SnapshotReducer::new(session_path, now);
    for record in parse_rollout_lines(lines) {
        reducer.apply(&record);
    }
    reducer.finish()
}

/// Single-pass accumulator over rollout records.
///
/// Scalar fields are last-write-wins except `session_start`, which keeps the
/// first value. Tool begin/end records are paired by call id.
#[derive(Debug)]
pub struct SnapshotReducer {
    snapshot: Snapshot,
    tools: ToolTracker,
    rates: RateBuckets,
    now: DateTime<Utc>,
}

impl SnapshotReducer {
    pub fn new(session_path: impl Into<PathBuf>, now: DateTime<Utc>) -> Self {
        Self {
            snapshot: Snapshot::empty(session_path),
            tools: ToolTracker::new(),
            rates: RateBuckets::new(),
            now,
        }
    }

    pub fn apply(&mut self, record: &RolloutRecord) {
        let at = record.timestamp().unwrap_or(self.now);

        match record.record_type() {
            RecordType::TurnContext => {
                if let Some(payload) = record.payload() {
                    self.apply_turn_context(payload);
                }
            }
            RecordType::SessionMeta => {
                if self.snapshot.session_start.is_none() {
                    self.snapshot.session_start = Some(at);
                }
            }
            RecordType::EventMsg => {
                if let Some(event) = record.payload() {
                    self.apply_event(record.event_type(), event, at);
                }
            }
            RecordType::ResponseItem | RecordType::Unknown => {}
        }
    }

    /// Finish with the built-in Spark model classification
    pub fn finish(self) -> Snapshot {
        self.finish_with(is_spark_model)
    }

    /// Finish, choosing the rate-limit tier with `classify(model)`
    pub fn finish_with<F>(self, classify: F) -> Snapshot
    where
        F: Fn(Option<&str>) -> bool,
    {
        let mut snapshot = self.snapshot;

        let (active, recent) = self.tools.into_partitions();
        snapshot.active_tools = active;
        snapshot.recent_tools = recent;

        let rates = self.rates.resolve(classify(snapshot.model.as_deref()));
        snapshot.rate_primary = rates.primary;
        snapshot.rate_secondary = rates.secondary;

        snapshot
    }

    fn apply_turn_context(&mut self, payload: &Object) {
        if let Some(cwd) = fields::str_field(payload, "cwd") {
            self.snapshot.cwd = Some(cwd.to_string());
        }
        if let Some(model) = fields::str_field(payload, "model") {
            self.snapshot.model = Some(model.to_string());
        }
    }

    fn apply_event(&mut self, kind: EventMsgType, event: &Object, at: DateTime<Utc>) {
        match kind {
            EventMsgType::TurnStarted => {
                self.snapshot.turn_state = TurnState::Running;
                if let Some(window) = fields::num_field(event, "model_context_window") {
                    self.snapshot.context_window = Some(window);
                    self.update_context_percent();
                }
            }
            EventMsgType::TurnComplete | EventMsgType::TurnAborted => {
                self.snapshot.turn_state = TurnState::Idle;
            }
            EventMsgType::TokenCount => self.apply_token_count(event),
            EventMsgType::PlanUpdate | EventMsgType::PlanDelta => {
                let plan = parse_plan(event);
                if !plan.is_empty() {
                    self.snapshot.plan = plan;
                }
            }
            EventMsgType::ExecCommandBegin => {
                let id = call_id(event)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("exec-{}", at.timestamp_millis()));
                self.tools.begin(id, command_label(event.get("command")), at);
            }
            EventMsgType::ExecCommandEnd => {
                let Some(id) = call_id(event) else {
                    return;
                };
                let status = if fields::num_field(event, "exit_code") == Some(0.0) {
                    ToolStatus::Completed
                } else {
                    ToolStatus::Failed
                };
                if !self.tools.end(id, status, at) {
                    let label = command_label(event.get("command"));
                    self.tools.push_orphan_end(id.to_string(), label, status, at);
                }
            }
            EventMsgType::McpToolCallBegin => {
                let id = call_id(event)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("mcp-{}", at.timestamp_millis()));
                self.tools.begin(id, mcp_label(event.get("invocation")), at);
            }
            EventMsgType::McpToolCallEnd => {
                let Some(id) = call_id(event) else {
                    return;
                };
                if !self.tools.end(id, ToolStatus::Completed, at) {
                    tracing::trace!(call_id = id, "dropping MCP end without a matching begin");
                }
            }
            EventMsgType::Unknown => {}
        }
    }

    fn apply_token_count(&mut self, event: &Object) {
        if let Some(info) = fields::object_field(event, "info") {
            if let Some(tokens) = fields::object_field(info, "total_token_usage")
                .and_then(|usage| fields::num_field(usage, "total_tokens"))
            {
                self.snapshot.context_tokens = Some(tokens);
            }
            if let Some(window) = fields::num_field(info, "model_context_window") {
                self.snapshot.context_window = Some(window);
            }
            self.update_context_percent();
        }

        if let Some(rate_limits) = fields::object_field(event, "rate_limits") {
            self.rates.ingest(rate_limits);
        }
    }

    fn update_context_percent(&mut self) {
        self.snapshot.context_used_percent =
            match (self.snapshot.context_tokens, self.snapshot.context_window) {
                (Some(tokens), Some(window)) if window > 0.0 => {
                    Some(context_percent(tokens, window))
                }
                _ => None,
            };
    }
}

/// `round(100 * tokens / window)` clamped to 0..=100
pub fn context_percent(tokens: f64, window: f64) -> u8 {
    ((tokens / window) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn call_id(event: &Object) -> Option<&str> {
    fields::str_field(event, "call_id").filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap()
    }

    fn event(ts: &str, payload: Value) -> String {
        json!({"timestamp": ts, "type": "event_msg", "payload": payload}).to_string()
    }

    fn run(lines: &[String]) -> Snapshot {
        reduce_at("/tmp/rollout.jsonl", lines, now())
    }

    #[test]
    fn test_context_percent_rounding_and_clamp() {
        assert_eq!(context_percent(64_500.0, 258_000.0), 25);
        assert_eq!(context_percent(1.0, 3.0), 33);
        assert_eq!(context_percent(500_000.0, 258_000.0), 100);
        assert_eq!(context_percent(-10.0, 100.0), 0);
    }

    #[test]
    fn test_turn_context_is_non_destructive() {
        let lines = vec![
            json!({"type": "turn_context", "payload": {"cwd": "/a", "model": "gpt-5-codex"}})
                .to_string(),
            json!({"type": "turn_context", "payload": {"cwd": "/b"}}).to_string(),
            json!({"type": "turn_context", "payload": {"model": 5}}).to_string(),
        ];
        let snapshot = run(&lines);
        assert_eq!(snapshot.cwd.as_deref(), Some("/b"));
        assert_eq!(snapshot.model.as_deref(), Some("gpt-5-codex"));
    }

    #[test]
    fn test_session_start_first_write_wins() {
        let lines = vec![
            json!({"timestamp": "2026-02-13T09:00:00Z", "type": "session_meta"}).to_string(),
            json!({"timestamp": "2026-02-13T10:00:00Z", "type": "session_meta"}).to_string(),
        ];
        let snapshot = run(&lines);
        assert_eq!(
            snapshot.session_start,
            Some(Utc.with_ymd_and_hms(2026, 2, 13, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_now() {
        let lines = vec![json!({"type": "session_meta"}).to_string()];
        assert_eq!(run(&lines).session_start, Some(now()));
    }

    #[test]
    fn test_turn_state_transitions() {
        let started = event("2026-02-13T09:00:00Z", json!({"type": "turn_started"}));
        let aborted = event("2026-02-13T09:00:01Z", json!({"type": "turn_aborted"}));
        let complete = event("2026-02-13T09:00:02Z", json!({"type": "turn_complete"}));

        assert_eq!(run(&[started.clone()]).turn_state, TurnState::Running);
        assert_eq!(run(&[started.clone(), aborted]).turn_state, TurnState::Idle);
        assert_eq!(run(&[started, complete]).turn_state, TurnState::Idle);
    }

    #[test]
    fn test_turn_started_records_window() {
        let lines = vec![event(
            "2026-02-13T09:00:00Z",
            json!({"type": "turn_started", "model_context_window": 272000}),
        )];
        let snapshot = run(&lines);
        assert_eq!(snapshot.context_window, Some(272_000.0));
        assert!(snapshot.context_used_percent.is_none());
    }

    #[test]
    fn test_token_count_with_null_info_keeps_context() {
        let lines = vec![
            event(
                "2026-02-13T09:00:00Z",
                json!({"type": "token_count", "info": {
                    "total_token_usage": {"total_tokens": 1000},
                    "model_context_window": 4000
                }}),
            ),
            event("2026-02-13T09:00:01Z", json!({"type": "token_count", "info": null})),
        ];
        let snapshot = run(&lines);
        assert_eq!(snapshot.context_tokens, Some(1000.0));
        assert_eq!(snapshot.context_used_percent, Some(25));
    }

    #[test]
    fn test_non_positive_window_clears_percent() {
        let lines = vec![
            event(
                "2026-02-13T09:00:00Z",
                json!({"type": "token_count", "info": {
                    "total_token_usage": {"total_tokens": 1000},
                    "model_context_window": 4000
                }}),
            ),
            event(
                "2026-02-13T09:00:01Z",
                json!({"type": "token_count", "info": {"model_context_window": 0}}),
            ),
        ];
        let snapshot = run(&lines);
        assert_eq!(snapshot.context_window, Some(0.0));
        assert!(snapshot.context_used_percent.is_none());
    }

    #[test]
    fn test_tokens_without_window_have_no_percent() {
        let lines = vec![event(
            "2026-02-13T09:00:00Z",
            json!({"type": "token_count", "info": {"total_token_usage": {"total_tokens": 1000}}}),
        )];
        let snapshot = run(&lines);
        assert_eq!(snapshot.context_tokens, Some(1000.0));
        assert!(snapshot.context_used_percent.is_none());
    }

    #[test]
    fn test_empty_plan_does_not_clear() {
        let lines = vec![
            event(
                "2026-02-13T09:00:00Z",
                json!({"type": "plan_update", "plan": [{"status": "pending", "step": "A"}]}),
            ),
            event("2026-02-13T09:00:01Z", json!({"type": "plan_delta", "plan": []})),
            event(
                "2026-02-13T09:00:02Z",
                json!({"type": "plan_update", "plan": [{"status": "pending"}]}),
            ),
        ];
        let snapshot = run(&lines);
        assert_eq!(snapshot.plan.len(), 1);
        assert_eq!(snapshot.plan[0].step, "A");
    }

    #[test]
    fn test_plan_is_replaced_wholesale() {
        let lines = vec![
            event(
                "2026-02-13T09:00:00Z",
                json!({"type": "plan_update", "plan": [
                    {"status": "pending", "step": "A"},
                    {"status": "pending", "step": "B"}
                ]}),
            ),
            event(
                "2026-02-13T09:00:01Z",
                json!({"type": "plan_delta", "steps": [{"status": "completed", "step": "C"}]}),
            ),
        ];
        let snapshot = run(&lines);
        assert_eq!(snapshot.plan.len(), 1);
        assert_eq!(snapshot.plan[0].step, "C");
    }

    #[test]
    fn test_exec_exit_code_semantics() {
        let lines = vec![
            event(
                "2026-02-13T09:00:00Z",
                json!({"type": "exec_command_begin", "call_id": "ok", "command": ["true"]}),
            ),
            event(
                "2026-02-13T09:00:01Z",
                json!({"type": "exec_command_begin", "call_id": "bad", "command": ["false"]}),
            ),
            event(
                "2026-02-13T09:00:02Z",
                json!({"type": "exec_command_begin", "call_id": "nocode", "command": ["sleep"]}),
            ),
            event("2026-02-13T09:00:03Z", json!({"type": "exec_command_end", "call_id": "ok", "exit_code": 0})),
            event("2026-02-13T09:00:04Z", json!({"type": "exec_command_end", "call_id": "bad", "exit_code": 1})),
            event("2026-02-13T09:00:05Z", json!({"type": "exec_command_end", "call_id": "nocode"})),
        ];
        let snapshot = run(&lines);
        let statuses: Vec<_> = snapshot.recent_tools.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![ToolStatus::Completed, ToolStatus::Failed, ToolStatus::Failed]
        );
        assert!(snapshot.active_tools.is_empty());
    }

    #[test]
    fn test_exec_end_without_call_id_is_ignored() {
        let lines = vec![event(
            "2026-02-13T09:00:00Z",
            json!({"type": "exec_command_end", "exit_code": 0}),
        )];
        assert!(run(&lines).recent_tools.is_empty());
    }

    #[test]
    fn test_orphan_exec_end_creates_terminal_entry() {
        let lines = vec![event(
            "2026-02-13T09:00:00Z",
            json!({"type": "exec_command_end", "call_id": "x", "command": ["make"], "exit_code": 2}),
        )];
        let snapshot = run(&lines);
        assert_eq!(snapshot.recent_tools.len(), 1);
        assert_eq!(snapshot.recent_tools[0].label, "make");
        assert_eq!(snapshot.recent_tools[0].status, ToolStatus::Failed);
    }

    #[test]
    fn test_orphan_mcp_end_is_dropped() {
        let lines = vec![event(
            "2026-02-13T09:00:00Z",
            json!({"type": "mcp_tool_call_end", "call_id": "x"}),
        )];
        let snapshot = run(&lines);
        assert!(snapshot.recent_tools.is_empty());
        assert!(snapshot.active_tools.is_empty());
    }

    #[test]
    fn test_begin_without_call_id_gets_time_based_id() {
        let lines = vec![event(
            "2026-02-13T09:00:00Z",
            json!({"type": "exec_command_begin", "command": ["ls"]}),
        )];
        let snapshot = run(&lines);
        let expected = Utc.with_ymd_and_hms(2026, 2, 13, 9, 0, 0).unwrap();
        assert_eq!(
            snapshot.active_tools[0].id,
            format!("exec-{}", expected.timestamp_millis())
        );
    }

    #[test]
    fn test_non_object_event_payload_is_ignored() {
        let lines = vec![
            json!({"type": "event_msg", "payload": ["turn_started"]}).to_string(),
            json!({"type": "event_msg", "payload": null}).to_string(),
        ];
        assert_eq!(run(&lines).turn_state, TurnState::Idle);
    }

    #[test]
    fn test_custom_classifier() {
        let lines = vec![
            json!({"type": "turn_context", "payload": {"model": "gpt-5-codex"}}).to_string(),
            event(
                "2026-02-13T09:00:00Z",
                json!({"type": "token_count", "rate_limits": {
                    "limit_id": "codex", "primary": {"used_percent": 11}
                }}),
            ),
            event(
                "2026-02-13T09:00:01Z",
                json!({"type": "token_count", "rate_limits": {
                    "limit_id": "codex_spark", "primary": {"used_percent": 33}
                }}),
            ),
        ];

        let mut reducer = SnapshotReducer::new("/tmp/rollout.jsonl", now());
        for record in parse_rollout_lines(&lines) {
            reducer.apply(&record);
        }
        let snapshot = reducer.finish_with(|_| true);
        assert_eq!(snapshot.rate_primary.unwrap().used_percent, 33.0);
    }
}

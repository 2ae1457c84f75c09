use chrono::{DateTime, Utc};
use codex_hud_types::{MAX_ACTIVE_TOOLS, MAX_RECENT_TOOLS, ToolActivity, ToolStatus, truncate};
use serde_json::Value;
use std::collections::HashMap;

/// Longest label shown for a tool invocation, ellipsis included
pub const MAX_LABEL_CHARS: usize = 42;

/// Open/close pairing table for tool invocations.
///
/// Activities live in one arena in arrival order; `open` maps a call id to the
/// arena slot of its still-running activity.
#[derive(Debug, Default)]
pub struct ToolTracker {
    activities: Vec<ToolActivity>,
    open: HashMap<String, usize>,
}

impl ToolTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a begin. A repeated begin for an id that is still open restarts
    /// that activity in place.
    pub fn begin(&mut self, id: String, label: String, at: DateTime<Utc>) {
        let activity = ToolActivity::running(id.clone(), label, at);
        match self.open.get(&id) {
            Some(&slot) => self.activities[slot] = activity,
            None => {
                self.open.insert(id, self.activities.len());
                self.activities.push(activity);
            }
        }
    }

    /// Close the open activity for `id`. Returns false when no begin was seen.
    pub fn end(&mut self, id: &str, status: ToolStatus, at: DateTime<Utc>) -> bool {
        match self.open.remove(id) {
            Some(slot) => {
                self.activities[slot].finish(status, at);
                true
            }
            None => false,
        }
    }

    /// Append an already-terminal activity for an end without a begin
    pub fn push_orphan_end(
        &mut self,
        id: String,
        label: String,
        status: ToolStatus,
        at: DateTime<Utc>,
    ) {
        self.activities
            .push(ToolActivity::finished(id, label, status, at));
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Split into (running, finished), each ordered by start time and capped
    pub fn into_partitions(self) -> (Vec<ToolActivity>, Vec<ToolActivity>) {
        let mut ordered = self.activities;
        ordered.sort_by_key(|tool| tool.start_time);

        let (active, recent): (Vec<_>, Vec<_>) =
            ordered.into_iter().partition(ToolActivity::is_running);

        (tail(active, MAX_ACTIVE_TOOLS), tail(recent, MAX_RECENT_TOOLS))
    }
}

fn tail<T>(items: Vec<T>, keep: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(keep);
    items.into_iter().skip(skip).collect()
}

/// Label for an exec command: the string arguments joined by spaces
pub fn command_label(command: Option<&Value>) -> String {
    let words: Vec<&str> = command
        .and_then(Value::as_array)
        .map(|args| args.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if words.is_empty() {
        return "command".to_string();
    }
    truncate(&words.join(" "), MAX_LABEL_CHARS)
}

/// Label for an MCP call: `server/tool`
pub fn mcp_label(invocation: Option<&Value>) -> String {
    let invocation = invocation.and_then(Value::as_object);
    let server = invocation.and_then(|i| i.get("server")).and_then(Value::as_str);
    let tool = invocation.and_then(|i| i.get("tool")).and_then(Value::as_str);

    match (server, tool) {
        (Some(server), Some(tool)) => {
            truncate(&format!("{}/{}", server, tool), MAX_LABEL_CHARS)
        }
        _ => "mcp tool".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_begin_end_pairs_in_place() {
        let mut tracker = ToolTracker::new();
        tracker.begin("a".into(), "ls".into(), t(0));
        assert!(tracker.end("a", ToolStatus::Completed, t(3)));

        let (active, recent) = tracker.into_partitions();
        assert!(active.is_empty());
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].label, "ls");
        assert_eq!(recent[0].start_time, t(0));
        assert_eq!(recent[0].end_time, Some(t(3)));
    }

    #[test]
    fn test_end_without_begin() {
        let mut tracker = ToolTracker::new();
        assert!(!tracker.end("ghost", ToolStatus::Failed, t(1)));
        tracker.push_orphan_end("ghost".into(), "make".into(), ToolStatus::Failed, t(1));

        assert_eq!(tracker.len(), 1);
        let (_, recent) = tracker.into_partitions();
        assert_eq!(recent[0].start_time, recent[0].end_time.unwrap());
    }

    #[test]
    fn test_second_end_does_not_reopen() {
        let mut tracker = ToolTracker::new();
        tracker.begin("a".into(), "ls".into(), t(0));
        assert!(tracker.end("a", ToolStatus::Completed, t(1)));
        assert!(!tracker.end("a", ToolStatus::Failed, t(2)));
    }

    #[test]
    fn test_repeated_begin_restarts_open_activity() {
        let mut tracker = ToolTracker::new();
        tracker.begin("a".into(), "first".into(), t(0));
        tracker.begin("a".into(), "second".into(), t(5));

        assert_eq!(tracker.len(), 1);
        let (active, _) = tracker.into_partitions();
        assert_eq!(active[0].label, "second");
        assert_eq!(active[0].start_time, t(5));
    }

    #[test]
    fn test_partitions_are_sorted_and_capped() {
        let mut tracker = ToolTracker::new();
        for i in (0..15).rev() {
            tracker.begin(format!("run-{}", i), format!("r{}", i), t(i));
        }
        for i in 0..25 {
            tracker.push_orphan_end(
                format!("done-{}", i),
                format!("d{}", i),
                ToolStatus::Completed,
                t(100 + i),
            );
        }

        let (active, recent) = tracker.into_partitions();
        assert_eq!(active.len(), MAX_ACTIVE_TOOLS);
        assert_eq!(recent.len(), MAX_RECENT_TOOLS);
        assert_eq!(active.first().unwrap().label, "r5");
        assert_eq!(active.last().unwrap().label, "r14");
        assert_eq!(recent.first().unwrap().label, "d5");
        assert!(active.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }

    #[test]
    fn test_command_label() {
        assert_eq!(command_label(Some(&json!(["git", "status"]))), "git status");
        assert_eq!(command_label(Some(&json!(["ls", 3, "-la"]))), "ls -la");
        assert_eq!(command_label(Some(&json!("git status"))), "command");
        assert_eq!(command_label(Some(&json!([]))), "command");
        assert_eq!(command_label(None), "command");
    }

    #[test]
    fn test_command_label_truncates_to_42() {
        let long = json!(["bash", "-lc", "cargo test --workspace --all-features -- --nocapture"]);
        let label = command_label(Some(&long));
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
        assert!(label.ends_with("..."));
        assert!(label.starts_with("bash -lc cargo test"));
    }

    #[test]
    fn test_mcp_label() {
        let inv = json!({"server": "filesystem", "tool": "read_file"});
        assert_eq!(mcp_label(Some(&inv)), "filesystem/read_file");
        assert_eq!(mcp_label(Some(&json!({"server": "filesystem"}))), "mcp tool");
        assert_eq!(mcp_label(Some(&json!("filesystem/read_file"))), "mcp tool");
        assert_eq!(mcp_label(None), "mcp tool");
    }
}

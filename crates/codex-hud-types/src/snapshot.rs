use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Maximum number of running tool invocations kept on a snapshot
pub const MAX_ACTIVE_TOOLS: usize = 10;

/// Maximum number of finished tool invocations kept on a snapshot
pub const MAX_RECENT_TOOLS: usize = 20;

/// Phase of the current conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    Idle,
    Running,
}

impl TurnState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnState::Idle => "idle",
            TurnState::Running => "running",
        }
    }
}

/// Lifecycle status of a tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Running,
    Completed,
    Failed,
}

impl ToolStatus {
    /// Completed and failed are terminal; running is not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ToolStatus::Running)
    }
}

/// One invocation of a shell command or MCP tool, tracked from begin to end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolActivity {
    pub id: String,
    pub label: String,
    pub status: ToolStatus,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl ToolActivity {
    pub fn running(id: impl Into<String>, label: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status: ToolStatus::Running,
            start_time: at,
            end_time: None,
        }
    }

    /// An activity whose begin record was never observed.
    ///
    /// Start and end collapse onto the end record's timestamp.
    pub fn finished(
        id: impl Into<String>,
        label: impl Into<String>,
        status: ToolStatus,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status,
            start_time: at,
            end_time: Some(at),
        }
    }

    pub fn finish(&mut self, status: ToolStatus, at: DateTime<Utc>) {
        self.status = status;
        self.end_time = Some(at);
    }

    pub fn is_running(&self) -> bool {
        self.status == ToolStatus::Running
    }
}

/// Usage of one rate-limit window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateWindow {
    pub used_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_minutes: Option<f64>,
}

/// One step of the assistant's plan checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    pub status: String,
    pub step: String,
}

impl PlanItem {
    pub fn new(status: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            step: step.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == "in_progress"
    }
}

/// Point-in-time state of a Codex session, rebuilt from the rollout on every refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub session_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty: Option<bool>,
    pub turn_state: TurnState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_tokens: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<f64>,
    /// Always within 0..=100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_used_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_primary: Option<RateWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_secondary: Option<RateWindow>,
    /// Running invocations, oldest first
    pub active_tools: Vec<ToolActivity>,
    /// Finished invocations, oldest first
    pub recent_tools: Vec<ToolActivity>,
    pub plan: Vec<PlanItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_start: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Snapshot with nothing observed yet
    pub fn empty(session_path: impl Into<PathBuf>) -> Self {
        Self {
            session_path: session_path.into(),
            cwd: None,
            model: None,
            git_branch: None,
            git_dirty: None,
            turn_state: TurnState::Idle,
            context_tokens: None,
            context_window: None,
            context_used_percent: None,
            rate_primary: None,
            rate_secondary: None,
            active_tools: Vec::new(),
            recent_tools: Vec::new(),
            plan: Vec::new(),
            session_start: None,
        }
    }
}

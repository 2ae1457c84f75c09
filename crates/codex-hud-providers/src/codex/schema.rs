use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::fields;
use crate::Result;

/// Top-level `type` of a rollout line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    SessionMeta,
    TurnContext,
    EventMsg,
    ResponseItem,
    #[serde(other)]
    Unknown,
}

/// `payload.type` of an `event_msg` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventMsgType {
    TurnStarted,
    TurnComplete,
    TurnAborted,
    TokenCount,
    PlanUpdate,
    PlanDelta,
    ExecCommandBegin,
    ExecCommandEnd,
    McpToolCallBegin,
    McpToolCallEnd,
    #[serde(other)]
    Unknown,
}

/// One parsed line of a rollout file.
///
/// Fields are kept as loose JSON: every accessor validates its own field and
/// reports a wrong-typed value as absent instead of rejecting the line.
#[derive(Debug, Clone)]
pub struct RolloutRecord {
    raw: Value,
}

impl RolloutRecord {
    /// Parse one JSONL line. Only invalid JSON is an error.
    pub fn parse(line: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(line)?;
        Ok(Self { raw })
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.raw
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(fields::parse_timestamp)
    }

    pub fn record_type(&self) -> RecordType {
        self.raw
            .get("type")
            .and_then(|v| fields::tag::<RecordType>(v))
            .unwrap_or(RecordType::Unknown)
    }

    /// The payload, when it is a JSON object
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        self.raw.get("payload").and_then(Value::as_object)
    }

    /// The nested event discriminator of an `event_msg` payload
    pub fn event_type(&self) -> EventMsgType {
        self.payload()
            .and_then(|p| p.get("type"))
            .and_then(|v| fields::tag::<EventMsgType>(v))
            .unwrap_or(EventMsgType::Unknown)
    }
}

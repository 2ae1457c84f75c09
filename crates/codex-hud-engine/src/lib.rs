//! Folds a Codex rollout log into a point-in-time [`Snapshot`].
//!
//! [`Snapshot`]: codex_hud_types::Snapshot

pub mod plan;
pub mod rates;
pub mod reducer;
pub mod tools;

pub use rates::is_spark_model;
pub use reducer::{SnapshotReducer, context_percent, reduce, reduce_at};

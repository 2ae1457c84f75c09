//! Testing infrastructure for codex-hud integration tests.
//!
//! - `TestWorld`: isolated HOME / CODEX_HOME with a fluent setup API
//! - `fixtures`: bundled sample rollouts and a JSONL rollout builder
//! - `assertions`: checks over `--format json` snapshot output
//! - `process`: background process handle for the refresh loop

pub mod assertions;
pub mod fixtures;
pub mod process;
pub mod world;

pub use fixtures::{RolloutWriter, SampleFiles};
pub use world::TestWorld;

pub mod backend;
pub mod multi_line;
pub mod status_line;

pub use backend::{Frame, FrameWriter, RecordingWriter, StreamWriter};
pub use multi_line::render_multi_line;
pub use status_line::render_status_line;

use chrono::{DateTime, Utc};
use codex_hud_types::Snapshot;

use super::style::{Palette, process_env};
use super::width::{resolve_width, terminal_columns};

/// Everything a render needs from the environment, captured up front
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub palette: Palette,
    /// Target columns for the status line
    pub width: usize,
    pub now: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(palette: Palette, width: usize, now: DateTime<Utc>) -> Self {
        Self {
            palette,
            width,
            now,
        }
    }

    /// Probe the process environment and terminal
    pub fn detect(explicit_width: Option<usize>) -> Self {
        Self {
            palette: Palette::from_env(process_env),
            width: resolve_width(explicit_width, process_env, terminal_columns()),
            now: Utc::now(),
        }
    }
}

/// `git:(branch)` with a `*` when the tree is dirty
pub(crate) fn git_badge(snapshot: &Snapshot) -> Option<String> {
    let branch = snapshot.git_branch.as_deref()?;
    let dirty = if snapshot.git_dirty == Some(true) { "*" } else { "" };
    Some(format!("git:({}{})", branch, dirty))
}

pub(crate) fn round_percent(percent: f64) -> i64 {
    percent.round() as i64
}

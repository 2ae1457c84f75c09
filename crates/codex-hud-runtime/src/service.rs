use chrono::{DateTime, Utc};
use codex_hud_engine::reduce_at;
use codex_hud_providers::SessionLocator;
use codex_hud_providers::codex::read_rollout;
use codex_hud_types::Snapshot;
use std::path::Path;

use crate::git::git_info;

/// Read and reduce a rollout file. An unreadable file yields an empty snapshot.
pub fn build_snapshot(path: &Path) -> Snapshot {
    build_snapshot_at(path, Utc::now())
}

pub fn build_snapshot_at(path: &Path, now: DateTime<Utc>) -> Snapshot {
    match read_rollout(path) {
        Ok(text) => reduce_at(path, text.lines(), now),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "rollout unreadable");
            Snapshot::empty(path)
        }
    }
}

/// Fill branch and dirty state from the snapshot's working directory
pub fn attach_git(snapshot: &mut Snapshot) {
    let info = git_info(snapshot.cwd.as_deref().map(Path::new));
    snapshot.git_branch = info.branch;
    snapshot.git_dirty = info.dirty;
}

/// One refresh cycle: locate the session, rebuild its snapshot from scratch.
pub struct SnapshotService {
    locator: Box<dyn SessionLocator>,
    git: bool,
}

impl SnapshotService {
    pub fn new(locator: Box<dyn SessionLocator>) -> Self {
        Self { locator, git: true }
    }

    /// Skip the git subprocesses
    pub fn without_git(mut self) -> Self {
        self.git = false;
        self
    }

    pub fn locator_id(&self) -> &'static str {
        self.locator.id()
    }

    /// `None` while no session log exists yet.
    pub fn refresh(&self) -> Option<Snapshot> {
        self.refresh_at(Utc::now())
    }

    pub fn refresh_at(&self, now: DateTime<Utc>) -> Option<Snapshot> {
        let path = self.locator.latest_session()?;
        let mut snapshot = build_snapshot_at(&path, now);
        if self.git {
            attach_git(&mut snapshot);
        }
        Some(snapshot)
    }
}

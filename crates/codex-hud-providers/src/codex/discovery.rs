use crate::traits::SessionLocator;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Locates the newest Codex rollout under `<codex_home>/sessions`
#[derive(Debug, Clone, Default)]
pub struct CodexDiscovery {
    codex_home: Option<PathBuf>,
}

impl CodexDiscovery {
    pub fn new(codex_home: Option<PathBuf>) -> Self {
        Self { codex_home }
    }
}

impl SessionLocator for CodexDiscovery {
    fn id(&self) -> &'static str {
        "codex"
    }

    fn latest_session(&self) -> Option<PathBuf> {
        find_latest_rollout(self.codex_home.as_deref())
    }
}

/// Resolve the Codex home directory:
/// 1. CODEX_HOME environment variable
/// 2. ~/.codex
pub fn default_codex_home() -> Option<PathBuf> {
    if let Some(env_home) = std::env::var_os("CODEX_HOME")
        && !env_home.is_empty()
    {
        return Some(PathBuf::from(env_home));
    }
    dirs::home_dir().map(|home| home.join(".codex"))
}

/// Codex names session logs `rollout-<timestamp>-<id>.jsonl`
pub fn is_rollout_file(path: &Path) -> bool {
    let is_jsonl = path.extension().is_some_and(|e| e == "jsonl");
    let filename = path.file_name().and_then(|f| f.to_str()).unwrap_or("");
    is_jsonl && filename.starts_with("rollout-")
}

/// Most recently modified rollout file, or `None` when nothing is found.
///
/// Unreadable directories and files are skipped.
pub fn find_latest_rollout(codex_home: Option<&Path>) -> Option<PathBuf> {
    let home = match codex_home {
        Some(path) => path.to_path_buf(),
        None => default_codex_home()?,
    };
    let sessions_dir = home.join("sessions");

    if !sessions_dir.is_dir() {
        tracing::debug!(dir = %sessions_dir.display(), "no Codex sessions directory");
        return None;
    }

    let mut latest: Option<(SystemTime, PathBuf)> = None;

    for entry in WalkDir::new(&sessions_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_rollout_file(entry.path()) {
            continue;
        }

        let modified = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(time) => time,
            None => continue,
        };

        if latest.as_ref().is_none_or(|(best, _)| modified > *best) {
            latest = Some((modified, entry.into_path()));
        }
    }

    latest.map(|(_, path)| path)
}

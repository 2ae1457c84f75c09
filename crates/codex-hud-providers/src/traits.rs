use std::path::PathBuf;

/// Finds the session log a HUD should follow
pub trait SessionLocator {
    /// Provider ID (e.g., "codex")
    fn id(&self) -> &'static str;

    /// Path of the most recently active session log, if any
    fn latest_session(&self) -> Option<PathBuf>;
}

/// Locator pinned to one explicit file (e.g. `--rollout <path>`)
#[derive(Debug, Clone)]
pub struct FixedSession(pub PathBuf);

impl SessionLocator for FixedSession {
    fn id(&self) -> &'static str {
        "fixed"
    }

    fn latest_session(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

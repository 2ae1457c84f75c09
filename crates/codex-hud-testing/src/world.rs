//! TestWorld pattern for declarative integration test setup.

use anyhow::Result;
use assert_cmd::Command;
use filetime::FileTime;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::{RolloutWriter, SampleFiles};
use crate::process::BackgroundProcess;

/// Isolated environment with its own HOME and CODEX_HOME.
///
/// # Example
/// ```no_run
/// use codex_hud_testing::{RolloutWriter, TestWorld};
///
/// let world = TestWorld::new();
/// world
///     .write_rollout("2026/02/13/rollout-a.jsonl", &RolloutWriter::new().session_meta())
///     .unwrap();
///
/// let result = world.run(&["--once"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    home: PathBuf,
    codex_home: PathBuf,
    env_vars: HashMap<String, String>,
    samples: SampleFiles,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let home = temp_dir.path().join("home");
        let codex_home = home.join(".codex");

        std::fs::create_dir_all(codex_home.join("sessions")).expect("Failed to create sessions dir");

        Self {
            temp_dir,
            home,
            codex_home,
            env_vars: HashMap::new(),
            samples: SampleFiles::new(),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn codex_home(&self) -> &Path {
        &self.codex_home
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.codex_home.join("sessions")
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write `~/.codex-hud/config.json` inside the isolated HOME.
    pub fn with_config(self, json: &str) -> Self {
        let dir = self.home.join(".codex-hud");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        std::fs::write(dir.join("config.json"), json).expect("Failed to write config");
        self
    }

    /// Write a rollout under `sessions/`, returning its absolute path.
    pub fn write_rollout(&self, relative: &str, writer: &RolloutWriter) -> Result<PathBuf> {
        let path = self.sessions_dir().join(relative);
        writer.write_to(&path)?;
        Ok(path)
    }

    /// Copy a bundled sample under `sessions/`, returning its absolute path.
    pub fn copy_sample(&self, sample_name: &str, relative: &str) -> Result<PathBuf> {
        let path = self.sessions_dir().join(relative);
        self.samples.copy_to(sample_name, &path)?;
        Ok(path)
    }

    /// Pin a file's modification time to `unix_seconds`.
    pub fn set_mtime(&self, path: &Path, unix_seconds: i64) -> Result<()> {
        filetime::set_file_mtime(path, FileTime::from_unix_time(unix_seconds, 0))?;
        Ok(())
    }

    /// Configure a CLI command with this environment.
    ///
    /// Colors are disabled unless a test overrides them through `with_env`.
    pub fn configure_command<'a>(
        &self,
        cmd: &'a mut std::process::Command,
    ) -> &'a mut std::process::Command {
        cmd.current_dir(self.temp_dir.path())
            .env("HOME", &self.home)
            .env("CODEX_HOME", &self.codex_home)
            .env("NO_COLOR", "1")
            .env_remove("FORCE_COLOR")
            .env_remove("CLICOLOR_FORCE")
            .env_remove("CODEX_HUD_WIDTH")
            .env_remove("COLUMNS")
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// A `codex-hud` command configured for this environment.
    #[allow(deprecated)]
    pub fn command(&self, args: &[&str]) -> std::process::Command {
        let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("codex-hud"));
        self.configure_command(&mut cmd);
        cmd.args(args);
        cmd
    }

    /// Run the `codex-hud` binary with `args` to completion.
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let output = Command::from_std(self.command(args)).output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Start the `codex-hud` binary in the background.
    pub fn spawn(&self, args: &[&str]) -> Result<BackgroundProcess> {
        Ok(BackgroundProcess::spawn_piped(self.command(args))?)
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

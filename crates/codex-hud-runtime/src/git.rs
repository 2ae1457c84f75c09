use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Upper bound for each git invocation
pub const GIT_TIMEOUT: Duration = Duration::from_millis(800);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Branch and working-tree state of a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInfo {
    pub branch: Option<String>,
    pub dirty: Option<bool>,
}

/// Best-effort git lookup for `dir`. Never fails; anything unexpected yields
/// an empty `GitInfo`.
pub fn git_info(dir: Option<&Path>) -> GitInfo {
    let Some(dir) = dir else {
        return GitInfo::default();
    };

    let branch = match run_git(dir, &["rev-parse", "--abbrev-ref", "HEAD"]) {
        Some(out) if !out.trim().is_empty() => out.trim().to_string(),
        _ => return GitInfo::default(),
    };

    let dirty = run_git(dir, &["--no-optional-locks", "status", "--porcelain"])
        .map(|out| !out.trim().is_empty())
        .unwrap_or(false);

    GitInfo {
        branch: Some(branch),
        dirty: Some(dirty),
    }
}

/// Run git in `dir` and return stdout on success within [`GIT_TIMEOUT`].
fn run_git(dir: &Path, args: &[&str]) -> Option<String> {
    let mut command = Command::new("git");
    command.args(args).current_dir(dir);
    run_bounded(command, args.join(" "), GIT_TIMEOUT)
}

/// Run `command` and collect its stdout. Anything not finished within
/// `timeout`, including a pipe still held open by a grandchild, yields `None`.
fn run_bounded(mut command: Command, label: String, timeout: Duration) -> Option<String> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| tracing::debug!(command = %label, error = %err, "git unavailable"))
        .ok()?;

    // Drain stdout concurrently so a large status listing cannot fill the pipe.
    let Some(mut stdout) = child.stdout.take() else {
        stop(&mut child);
        return None;
    };
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = String::new();
        let _ = tx.send(stdout.read_to_string(&mut buf).map(|_| buf));
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if start.elapsed() > timeout => {
                tracing::debug!(command = %label, "git timed out");
                stop(&mut child);
                return None;
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(err) => {
                tracing::debug!(command = %label, error = %err, "git wait failed");
                stop(&mut child);
                return None;
            }
        }
    };

    if !status.success() {
        return None;
    }
    rx.recv_timeout(timeout.saturating_sub(start.elapsed()))
        .ok()?
        .ok()
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

//! Background process management for the refresh loop.

use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::Duration;

/// A background process handle, killed on drop.
pub struct BackgroundProcess {
    child: Child,
}

impl BackgroundProcess {
    /// Spawn with piped stdout and stderr.
    pub fn spawn_piped(mut command: Command) -> std::io::Result<Self> {
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        let child = command.spawn()?;
        Ok(Self { child })
    }

    /// Wait for the process to exit with a timeout.
    pub fn wait_timeout(
        &mut self,
        timeout: Duration,
    ) -> std::io::Result<Option<std::process::ExitStatus>> {
        let start = std::time::Instant::now();
        loop {
            match self.child.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() > timeout {
                        return Ok(None);
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
            }
        }
    }

    /// Send SIGINT, as Ctrl-C would.
    #[cfg(unix)]
    pub fn interrupt(&self) -> std::io::Result<()> {
        let status = Command::new("kill")
            .arg("-INT")
            .arg(self.child.id().to_string())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other("kill -INT failed"))
        }
    }

    pub fn stdout(&mut self) -> Option<&mut ChildStdout> {
        self.child.stdout.as_mut()
    }
}

impl Drop for BackgroundProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

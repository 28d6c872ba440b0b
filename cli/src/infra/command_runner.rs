//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs host tools (`git`, `systemctl`) with a hard
//! timeout and kills the child when it fires.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;

/// Default timeout for short host commands (`systemctl is-active`, probes).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Ceiling for `systemctl stop`; the node can take minutes to flush its store.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(600);

/// Ceiling for `git clone` / `git pull` of the source tree.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(900);

/// Production `CommandRunner` backed by `tokio::process`.
///
/// Uses `tokio::select!` with an explicit `child.kill()` so a timed-out
/// process never outlives the call.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, timeout_secs = timeout.as_secs(), "running command");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                let output = Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                };
                tracing::debug!(program, code = ?output.status.code(), "command exited");
                Ok(output)
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                tracing::warn!(program, "command timed out, killed");
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }
}

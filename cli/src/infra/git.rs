//! `git` implementation of the `SourceFetcher` port.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, SourceFetcher};
use crate::domain::error::InstallError;
use crate::infra::command_runner::GIT_TIMEOUT;

pub struct GitSourceFetcher<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> GitSourceFetcher<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn git(&self, args: &[&str]) -> Result<()> {
        let output = self.runner.run_with_timeout("git", args, GIT_TIMEOUT).await?;
        if output.status.success() {
            return Ok(());
        }
        Err(InstallError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }
}

impl<R: CommandRunner> SourceFetcher for GitSourceFetcher<R> {
    async fn sync(&self, repo_url: &str, branch: &str, dest: &Path) -> Result<()> {
        let dest_str = dest.to_string_lossy();
        if dest.join(".git").is_dir() {
            tracing::debug!(dest = %dest_str, branch, "updating existing clone");
            let d = dest_str.as_ref();
            self.git(&["-C", d, "fetch", "origin", branch]).await?;
            self.git(&["-C", d, "checkout", branch]).await?;
            self.git(&["-C", d, "pull", "--ff-only", "origin", branch]).await?;
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tracing::debug!(repo_url, branch, dest = %dest_str, "cloning");
        self.git(&["clone", "--branch", branch, repo_url, &dest_str]).await
    }
}

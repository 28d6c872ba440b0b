//! systemd implementation of the `ServiceManager` port.
//!
//! Unit files are written directly into the unit directory; every other
//! operation shells out to `systemctl` through the injected `CommandRunner`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ServiceManager};
use crate::domain::error::InstallError;
use crate::domain::unit::{ServiceState, ServiceUnit, unit_file_name};
use crate::infra::command_runner::STOP_TIMEOUT;

const UNIT_FILE_MODE: u32 = 0o644;

pub struct SystemdServiceManager<R: CommandRunner> {
    runner: R,
    unit_dir: PathBuf,
}

impl<R: CommandRunner> SystemdServiceManager<R> {
    #[must_use]
    pub fn new(runner: R, unit_dir: PathBuf) -> Self {
        Self { runner, unit_dir }
    }

    #[must_use]
    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.unit_dir.join(unit_file_name(name))
    }

    async fn systemctl(&self, args: &[&str]) -> Result<Output> {
        let output = self.runner.run("systemctl", args).await?;
        check_status("systemctl", args, output)
    }
}

/// Map a non-zero exit into `InstallError::CommandFailed`.
fn check_status(program: &str, args: &[&str], output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    Err(InstallError::CommandFailed {
        command: format!("{program} {}", args.join(" ")),
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
    .into())
}

fn write_unit_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let tmp = path.with_extension("service.tmp");
    std::fs::write(&tmp, content).with_context(|| format!("writing {}", tmp.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(UNIT_FILE_MODE))
            .with_context(|| format!("setting permissions on {}", tmp.display()))?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("finalizing {}", path.display()))
}

impl<R: CommandRunner> ServiceManager for SystemdServiceManager<R> {
    async fn install_unit(&self, unit: &ServiceUnit) -> Result<PathBuf> {
        let path = self.unit_path(&unit.name);
        write_unit_file(&path, &unit.render())?;
        tracing::info!(path = %path.display(), "unit file written");
        Ok(path)
    }

    fn unit_installed(&self, name: &str) -> bool {
        self.unit_path(name).is_file()
    }

    async fn daemon_reload(&self) -> Result<()> {
        self.systemctl(&["daemon-reload"]).await.map(drop)
    }

    async fn enable(&self, name: &str) -> Result<()> {
        self.systemctl(&["enable", name]).await.map(drop)
    }

    async fn disable(&self, name: &str) -> Result<()> {
        self.systemctl(&["disable", name]).await.map(drop)
    }

    async fn start(&self, name: &str) -> Result<()> {
        self.systemctl(&["start", name]).await.map(drop)
    }

    async fn stop(&self, name: &str) -> Result<()> {
        let args = ["stop", name];
        let output = self
            .runner
            .run_with_timeout("systemctl", &args, STOP_TIMEOUT)
            .await?;
        check_status("systemctl", &args, output).map(drop)
    }

    async fn restart(&self, name: &str) -> Result<()> {
        self.systemctl(&["restart", name]).await.map(drop)
    }

    async fn state(&self, name: &str) -> Result<ServiceState> {
        // is-active exits non-zero for anything but "active"; stdout carries the state.
        let output = self.runner.run("systemctl", &["is-active", name]).await?;
        let state = ServiceState::parse(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(service = name, %state, "queried service state");
        Ok(state)
    }
}

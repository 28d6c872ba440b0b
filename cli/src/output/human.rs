//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::install::InstallOutcome;
use crate::application::services::snapshot::SnapshotOutcome;
use crate::application::services::status::StatusReport;
use crate::application::services::update::UpdateOutcome;
use crate::domain::config::QnodeConfig;
use crate::domain::node_config::{PatchOutcome, PatchReport};
use crate::output::OutputContext;

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_version(&self, version: &str) {
        if !self.ctx.quiet {
            println!("qnode {version}");
        }
    }

    pub fn render_status(&self, status: &StatusReport) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.kv("Platform:", &status.platform.to_string());
        match &status.installed {
            Some(r) => {
                self.ctx.kv("Node:", &format!("{} ({})", r.node_version, r.node_binary));
                if let Some(client) = &r.client_binary {
                    self.ctx.kv("Client:", client);
                }
                self.ctx
                    .kv("Installed:", &r.installed_at.format("%Y-%m-%d %H:%M UTC").to_string());
            }
            None => self.ctx.kv("Node:", "not installed"),
        }

        let state = status.service.to_string();
        let unit = if status.unit_installed { "" } else { " (no unit file)" };
        println!(
            "  {:<18}{} {}{unit}",
            "Service:".style(self.ctx.styles.dim),
            status.service_name,
            state.style(self.ctx.styles.service_state(&status.service)),
        );
        self.ctx
            .kv("Directory:", &status.paths.install_dir.display().to_string());

        println!();
        self.ctx.header("Node config:");
        match &status.node_config {
            None => self.ctx.warn(&format!(
                "{} not written yet",
                status.paths.node_config.display()
            )),
            Some(keys) => {
                for key in keys {
                    match key.state {
                        PatchOutcome::AlreadySet | PatchOutcome::Patched => {
                            self.ctx.success(key.key);
                        }
                        PatchOutcome::Missing => {
                            self.ctx.warn(&format!("{} differs from the configured value", key.key));
                        }
                    }
                }
            }
        }
    }

    pub fn render_config(&self, config: &QnodeConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let opt = |v: Option<String>| v.unwrap_or_else(|| "(not set)".to_string());
        let rows = [
            ("source.repo_url", config.source.repo_url.clone()),
            ("source.branch", config.source.branch.clone()),
            (
                "source.install_dir",
                opt(config.source.install_dir.as_ref().map(|p| p.display().to_string())),
            ),
            ("release.manifest_url", config.release.manifest_url.clone()),
            ("release.artifact_base_url", config.release.artifact_base_url.clone()),
            ("release.client_manifest_url", config.release.client_manifest_url.clone()),
            ("release.include_client", config.release.include_client.to_string()),
            ("service.name", config.service.name.clone()),
            ("service.description", config.service.description.clone()),
            ("service.unit_dir", config.service.unit_dir.display().to_string()),
            ("service.user", opt(config.service.user.clone())),
            ("node.max_frames", config.node.max_frames.to_string()),
            ("node.listen_grpc_multiaddr", config.node.listen_grpc_multiaddr.clone()),
            ("node.listen_rest_multiaddr", config.node.listen_rest_multiaddr.clone()),
            ("node.config_wait_secs", config.node.config_wait_secs.to_string()),
            ("snapshot.url", opt(config.snapshot.url.clone())),
        ];
        for (key, value) in rows {
            println!("  {:<30} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["QNODE_CONFIG", "NO_COLOR", "RUST_LOG"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
    }

    pub fn render_config_path(&self, path: &Path) {
        println!("{}", path.display());
    }

    pub fn render_config_set(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }

    pub fn render_install(&self, outcome: &InstallOutcome) {
        println!();
        self.ctx.success(&format!(
            "Node {} installed and running as {}",
            outcome.record.node_version, outcome.record.service_name
        ));
        if let Some(client) = &outcome.record.client_binary {
            self.ctx.info(&format!("Client: {client}"));
        }
        for key in outcome.config.missing() {
            self.ctx.warn(&format!("{key} was not found in the node config"));
        }
    }

    pub fn render_update(&self, outcome: &UpdateOutcome) {
        match outcome {
            UpdateOutcome::UpToDate { version } => {
                self.ctx.success(&format!("Node {version} is up to date"));
            }
            UpdateOutcome::Available { current, latest } => {
                self.ctx.info(&format!("Update available: {current} → {latest}"));
                self.ctx.info("Run: qnode update");
            }
            UpdateOutcome::Updated { from, to } => {
                self.ctx.success(&format!("Updated node {from} → {to}"));
            }
        }
    }

    pub fn render_snapshot(&self, outcome: &SnapshotOutcome) {
        self.ctx.success(&format!(
            "Restored {} entries into {}",
            outcome.entries,
            outcome.store_dir.display()
        ));
    }

    pub fn render_configure(&self, report: &PatchReport, restarted: bool) {
        if report.is_changed() {
            let note = if restarted { " and restarted the service" } else { "" };
            self.ctx.success(&format!("Updated node config{note}"));
        }
    }

    pub fn render_service_action(&self, service: &str, action: &str) {
        self.ctx.success(&format!("{service}: {action}"));
    }
}

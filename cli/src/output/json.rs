//! JSON renderer and error-object formatter used by `--json` code paths.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::install::InstallOutcome;
use crate::application::services::snapshot::SnapshotOutcome;
use crate::application::services::status::StatusReport;
use crate::application::services::update::UpdateOutcome;
use crate::domain::config::QnodeConfig;
use crate::domain::node_config::PatchReport;

/// Format a JSON error object:
///
/// ```json
/// { "error": true, "message": "...", "code": "..." }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Prints every result as one pretty-printed JSON document on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn print(value: &impl Serialize) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        Self::print(&serde_json::json!({ "version": version }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_status(&self, status: &StatusReport) -> Result<()> {
        Self::print(status)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &QnodeConfig, path: &Path) -> Result<()> {
        Self::print(&serde_json::json!({ "path": path, "config": config }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config_path(&self, path: &Path) -> Result<()> {
        Self::print(&serde_json::json!({ "path": path }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config_set(&self, key: &str, value: &str) -> Result<()> {
        Self::print(&serde_json::json!({ "key": key, "value": value }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_install(&self, outcome: &InstallOutcome) -> Result<()> {
        Self::print(&serde_json::json!({
            "installed": outcome.record,
            "was_running": outcome.was_running,
            "node_config": patch_outcomes(&outcome.config),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_update(&self, outcome: &UpdateOutcome) -> Result<()> {
        Self::print(outcome)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_snapshot(&self, outcome: &SnapshotOutcome) -> Result<()> {
        Self::print(&serde_json::json!({
            "url": outcome.url,
            "bytes": outcome.bytes,
            "entries": outcome.entries,
            "store_dir": outcome.store_dir,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_configure(&self, report: &PatchReport, restarted: bool) -> Result<()> {
        Self::print(&serde_json::json!({
            "changed": report.is_changed(),
            "restarted": restarted,
            "node_config": patch_outcomes(report),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_service_action(&self, service: &str, action: &str) -> Result<()> {
        Self::print(&serde_json::json!({ "service": service, "action": action }))
    }
}

fn patch_outcomes(report: &PatchReport) -> serde_json::Map<String, serde_json::Value> {
    report
        .outcomes
        .iter()
        .map(|(key, outcome)| ((*key).to_string(), serde_json::json!(outcome)))
        .collect()
}

//! systemd unit generation and service state: pure functions, no I/O.
//!
//! The caller is responsible for writing the rendered unit to disk and for
//! reloading the service manager.

#![allow(clippy::format_push_string)]

use std::fmt;

use serde::Serialize;

use crate::domain::error::UnitError;

/// Description written into the unit when none is configured.
pub const DEFAULT_DESCRIPTION: &str = "Ceremony Client Go App Service";

/// A simple long-running service supervised by systemd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    pub name: String,
    pub description: String,
    pub working_directory: String,
    pub exec_start: String,
    /// Run as this user; `None` leaves systemd's default (root).
    pub user: Option<String>,
}

impl ServiceUnit {
    /// Build a unit, validating the name and that both paths are absolute.
    ///
    /// # Errors
    ///
    /// `UnitError::InvalidName`, `UnitError::RelativePath`, or
    /// `UnitError::ControlCharacter` for a value that would break the unit
    /// file's line structure.
    pub fn new(
        name: &str,
        description: &str,
        working_directory: &str,
        exec_start: &str,
        user: Option<&str>,
    ) -> Result<Self, UnitError> {
        validate_service_name(name)?;
        for (field, value) in [
            ("Description", description),
            ("WorkingDirectory", working_directory),
            ("ExecStart", exec_start),
            ("User", user.unwrap_or_default()),
        ] {
            if has_control_chars(value) {
                return Err(UnitError::ControlCharacter { field });
            }
        }
        for (field, value) in [
            ("WorkingDirectory", working_directory),
            ("ExecStart", exec_start),
        ] {
            if !value.starts_with('/') {
                return Err(UnitError::RelativePath {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            working_directory: working_directory.to_string(),
            exec_start: exec_start.to_string(),
            user: user.filter(|u| !u.is_empty()).map(str::to_string),
        })
    }

    /// `<name>.service`
    #[must_use]
    pub fn file_name(&self) -> String {
        unit_file_name(&self.name)
    }

    /// Render the unit file content.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# Generated by qnode - DO NOT EDIT\n");
        out.push_str("[Unit]\n");
        out.push_str(&format!("Description={}\n", self.description));
        out.push_str("After=network-online.target\n");
        out.push_str("Wants=network-online.target\n");
        out.push('\n');
        out.push_str("[Service]\n");
        out.push_str("Type=simple\n");
        if let Some(user) = &self.user {
            out.push_str(&format!("User={user}\n"));
        }
        out.push_str(&format!("WorkingDirectory={}\n", self.working_directory));
        out.push_str(&format!("ExecStart={}\n", self.exec_start));
        out.push_str("Restart=always\n");
        out.push_str("RestartSec=5s\n");
        out.push('\n');
        out.push_str("[Install]\n");
        out.push_str("WantedBy=multi-user.target\n");
        out
    }
}

/// Whether `value` holds anything that would end or corrupt a unit file line.
#[must_use]
pub fn has_control_chars(value: &str) -> bool {
    value.chars().any(char::is_control)
}

/// `<name>.service`
#[must_use]
pub fn unit_file_name(name: &str) -> String {
    format!("{name}.service")
}

/// Validate a systemd unit name.
///
/// # Errors
///
/// Returns `UnitError::InvalidName` for empty names or disallowed characters.
pub fn validate_service_name(name: &str) -> Result<(), UnitError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));
    if ok {
        Ok(())
    } else {
        Err(UnitError::InvalidName(name.to_string()))
    }
}

/// Service state as reported by `systemctl is-active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Active,
    Inactive,
    Failed,
    Activating,
    Deactivating,
    Unknown(String),
}

impl ServiceState {
    /// Parse `systemctl is-active` stdout.
    #[must_use]
    pub fn parse(stdout: &str) -> Self {
        match stdout.trim() {
            "active" | "reloading" => Self::Active,
            "inactive" => Self::Inactive,
            "failed" => Self::Failed,
            "activating" => Self::Activating,
            "deactivating" => Self::Deactivating,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether the unit holds (or is about to hold) its files open.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Active | Self::Activating | Self::Deactivating)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Inactive => f.write_str("inactive"),
            Self::Failed => f.write_str("failed"),
            Self::Activating => f.write_str("activating"),
            Self::Deactivating => f.write_str("deactivating"),
            Self::Unknown(s) if s.is_empty() => f.write_str("unknown"),
            Self::Unknown(s) => f.write_str(s),
        }
    }
}

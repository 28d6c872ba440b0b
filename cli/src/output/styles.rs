//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

use crate::domain::unit::ServiceState;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Success messages (green)
    pub success: Style,
    /// Warning messages (yellow)
    pub warning: Style,
    /// Error messages (red)
    pub error: Style,
    /// Info and step markers (cyan)
    pub info: Style,
    /// Dimmed/secondary text
    pub dim: Style,
    pub bold: Style,
    /// Headers/section titles
    pub header: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().cyan();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }

    /// Style for a systemd unit state.
    #[must_use]
    pub fn service_state(&self, state: &ServiceState) -> Style {
        match state {
            ServiceState::Active => self.success,
            ServiceState::Activating | ServiceState::Deactivating => self.warning,
            ServiceState::Failed => self.error,
            ServiceState::Inactive | ServiceState::Unknown(_) => self.dim,
        }
    }
}

//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::install::InstallOutcome;
use crate::application::services::snapshot::SnapshotOutcome;
use crate::application::services::status::StatusReport;
use crate::application::services::update::UpdateOutcome;
use crate::domain::config::QnodeConfig;
use crate::domain::node_config::PatchReport;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `!`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "!".style(self.styles.warning));
        }
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<18}{value}", key.style(self.styles.dim));
        }
    }
}

/// Renders command results in the mode picked by `--json`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

macro_rules! dispatch {
    ($(fn $name:ident($($arg:ident: $ty:ty),*);)*) => {
        $(
            /// # Errors
            ///
            /// Returns an error if JSON serialization fails.
            pub fn $name(&self, $($arg: $ty),*) -> anyhow::Result<()> {
                match self {
                    Self::Human(r) => {
                        r.$name($($arg),*);
                        Ok(())
                    }
                    Self::Json(r) => r.$name($($arg),*),
                }
            }
        )*
    };
}

impl Renderer<'_> {
    dispatch! {
        fn render_version(version: &str);
        fn render_status(status: &StatusReport);
        fn render_config(config: &QnodeConfig, path: &Path);
        fn render_config_path(path: &Path);
        fn render_config_set(key: &str, value: &str);
        fn render_install(outcome: &InstallOutcome);
        fn render_update(outcome: &UpdateOutcome);
        fn render_snapshot(outcome: &SnapshotOutcome);
        fn render_configure(report: &PatchReport, restarted: bool);
        fn render_service_action(service: &str, action: &str);
    }
}

//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Application services emit step/success/warn events through the port; this
//! type prints them with the context's stylesheet.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
///
/// `step` and `success` are suppressed when `ctx.quiet`; warnings go to stderr
/// and are always shown. JSON commands build the reporter over a quiet context.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: RefCell::new(None),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("  {} {message}", "!".style(self.ctx.styles.warning));
    }

    fn show_progress(&self) -> bool {
        self.ctx.show_progress()
    }

    fn wait_started(&self, message: &str) {
        if self.ctx.show_progress() {
            *self.spinner.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.step(message);
        }
    }

    fn wait_finished(&self, ok: bool, message: &str) {
        match (self.spinner.borrow_mut().take(), ok) {
            (Some(pb), true) => progress::finish_ok(&pb, message),
            (Some(pb), false) => progress::finish_error(&pb, message),
            (None, true) => self.success(message),
            (None, false) => self.warn(message),
        }
    }
}

//! `ProgressReporter` implementations for the presentation layer.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

const TICK: Duration = Duration::from_millis(80);

/// Reporter for human mode.
///
/// On an interactive terminal every step replaces the message of one
/// spinner line, which shows the elapsed time while the agent starts.
/// Elsewhere each event becomes its own line.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        let spinner = ctx.show_progress().then(new_spinner);
        Self { ctx, spinner }
    }

    /// Remove the spinner line without printing anything (failure path).
    pub fn clear(&self) {
        if let Some(pb) = &self.spinner {
            pb.finish_and_clear();
        }
    }
}

fn new_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // The template is a literal; a parse failure only loses the decoration.
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg} {elapsed:.dim}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    pb.enable_steady_tick(TICK);
    pb
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        match &self.spinner {
            Some(pb) => pb.set_message(message.to_string()),
            None => self.ctx.step(message),
        }
    }

    fn success(&self, message: &str) {
        match &self.spinner {
            Some(pb) => {
                pb.finish_and_clear();
                self.ctx.success(message);
            }
            None => self.ctx.success(message),
        }
    }

    fn warn(&self, message: &str) {
        match &self.spinner {
            Some(pb) => pb.suspend(|| self.ctx.warn(message)),
            None => self.ctx.warn(message),
        }
    }
}

/// Reporter that discards every event; used in `--json` mode so stdout
/// carries nothing but the final document.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

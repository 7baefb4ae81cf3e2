//! Human-readable terminal output and `--json` rendering helpers.

pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::{NullReporter, TerminalReporter};
pub use styles::Palette;

/// Stream a line is written to. Only stdout lines obey `--quiet`.
#[derive(Clone, Copy)]
enum Sink {
    Stdout,
    Stderr,
}

/// Terminal state shared by every human-mode command.
pub struct OutputContext {
    pub palette: Palette,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// `--quiet`: only errors are printed.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY, without `--no-color` and `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let colored = is_tty && !no_color && std::env::var_os("NO_COLOR").is_none();
        Self {
            palette: if colored {
                Palette::colored()
            } else {
                Palette::plain()
            },
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn emit(&self, sink: Sink, glyph: &str, style: Style, msg: &str) {
        match sink {
            Sink::Stderr => eprintln!("  {} {msg}", glyph.style(style)),
            Sink::Stdout if !self.quiet => println!("  {} {msg}", glyph.style(style)),
            Sink::Stdout => {}
        }
    }

    pub fn success(&self, msg: &str) {
        self.emit(Sink::Stdout, "✓", self.palette.ok, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(Sink::Stdout, "!", self.palette.warn, msg);
    }

    /// Errors go to stderr and ignore `--quiet`.
    pub fn error(&self, msg: &str) {
        self.emit(Sink::Stderr, "✗", self.palette.err, msg);
    }

    pub fn step(&self, msg: &str) {
        self.emit(Sink::Stdout, "→", self.palette.step, msg);
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.style(self.palette.title));
        }
    }

    /// Print `key  value` with the key dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.palette.key));
        }
    }
}

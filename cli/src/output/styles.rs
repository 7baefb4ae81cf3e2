//! Terminal palette built on owo-colors styles.

use owo_colors::Style;

/// Styles for each kind of line the CLI prints.
///
/// [`Palette::plain`] leaves text untouched; it is used whenever colors are
/// disabled or stdout is not a terminal.
#[derive(Clone, Copy, Default)]
pub struct Palette {
    pub ok: Style,
    pub warn: Style,
    pub err: Style,
    pub step: Style,
    pub key: Style,
    pub title: Style,
}

impl Palette {
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn colored() -> Self {
        Self {
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            err: Style::new().red().bold(),
            step: Style::new().cyan(),
            key: Style::new().dimmed(),
            title: Style::new().bold(),
        }
    }
}

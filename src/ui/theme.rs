use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for review output: headings, status lines and star ratings.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    /// Filled stars
    pub rating: Style,
}

impl Theme {
    /// Colored output unless console has colors disabled for stdout
    /// (not a terminal, `NO_COLOR`, `CLICOLOR=0`).
    pub fn for_stdout() -> Self {
        if console::colors_enabled() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            rating: Style::new().bright_yellow(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            header: none,
            success: none,
            warn: none,
            info: none,
            dim: none,
            rating: none,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::for_stdout)
}

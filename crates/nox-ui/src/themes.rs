use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark and 7–15 light. Absent or unparseable values count as dark.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Styles used by the chart and table views.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub text: Style,
    pub dim: Style,
    pub axis: Style,

    /// Bars within the regulatory limit.
    pub bar: Style,
    /// Bars above the regulatory limit.
    pub bar_breach: Style,
    /// Dashed reference line at the limit.
    pub threshold: Style,

    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub breach: Style,
    pub compliant: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            axis: Style::default().fg(Color::Gray),

            bar: Style::default().fg(Color::Cyan),
            bar_breach: Style::default().fg(Color::Magenta),
            threshold: Style::default().fg(Color::Red),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            breach: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            compliant: Style::default().fg(Color::Green),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            axis: Style::default().fg(Color::DarkGray),

            bar: Style::default().fg(Color::Blue),
            bar_breach: Style::default().fg(Color::Magenta),
            threshold: Style::default().fg(Color::Red),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            breach: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            compliant: Style::default().fg(Color::Green),
        }
    }

    /// Choose a theme based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names fall back to `auto_detect`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }
}

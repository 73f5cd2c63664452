use neuroflow::Rgb;
use ratatui::style::{Color, Modifier, Style};

/// Slate theme matching the diagram palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Rgb(0x0f, 0x17, 0x2a);
    pub const FG: Color = Color::Rgb(0xe2, 0xe8, 0xf0);
    pub const FG_DIM: Color = Color::Rgb(0x94, 0xa3, 0xb8);
    pub const FG_MUTED: Color = Color::Rgb(0x47, 0x55, 0x69);
    pub const BORDER: Color = Color::Rgb(0x33, 0x41, 0x55);
    pub const ACCENT_YELLOW: Color = Color::Rgb(0xfa, 0xcc, 0x15);

    pub fn color(rgb: Rgb) -> Color {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    /// Panel borders.
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER).bg(Self::BG)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    /// Selected tab.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::FG)
            .bg(Self::BORDER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warn() -> Style {
        Style::default()
            .fg(Self::ACCENT_YELLOW)
            .add_modifier(Modifier::BOLD)
    }

    /// Bold text in one of the signal colors.
    pub fn signal(rgb: Rgb) -> Style {
        Style::default()
            .fg(Self::color(rgb))
            .add_modifier(Modifier::BOLD)
    }
}

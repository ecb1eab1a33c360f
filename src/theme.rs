//! Kanagawa Dragon theme module.
//!
//! Low-contrast, warm, dark palette inspired by traditional Japanese ink
//! wash painting, with semantic styles for the timetable grid cells.

use ratatui::style::Color;

/// Kanagawa Dragon color palette
pub mod colors {
    use super::Color;

    // === Background Colors ===
    /// Dragon Black - Primary background
    pub const BG_DARK: Color = Color::Rgb(0x18, 0x16, 0x16);
    /// Slightly lighter background for medium contrast areas
    pub const BG_MEDIUM: Color = Color::Rgb(0x1D, 0x1C, 0x19);
    /// Background for highlighted/selected areas
    pub const BG_HIGHLIGHT: Color = Color::Rgb(0x28, 0x27, 0x27);

    // === Foreground Colors ===
    /// Old White - Primary text color
    pub const FG_PRIMARY: Color = Color::Rgb(0xC5, 0xC9, 0xC5);
    /// Dimmed text for secondary information
    pub const FG_DIM: Color = Color::Rgb(0x72, 0x71, 0x69);
    /// Very dim text for hints and placeholders
    pub const FG_HINT: Color = Color::Rgb(0x54, 0x54, 0x54);

    // === Accent Colors ===
    /// Dragon Red - For errors and blocked cells
    pub const RED: Color = Color::Rgb(0xC4, 0x74, 0x6E);
    /// Dragon Green - For checked sessions
    pub const GREEN: Color = Color::Rgb(0x8A, 0x9A, 0x7B);
    /// Carp Yellow - For warnings and the "now" marker
    pub const YELLOW: Color = Color::Rgb(0xC4, 0xB2, 0x8A);
    /// Dragon Blue - For info and selection
    pub const BLUE: Color = Color::Rgb(0x8B, 0xA4, 0xB0);
    /// Purple - For special accents
    pub const PURPLE: Color = Color::Rgb(0x95, 0x7F, 0xB8);

    // === UI Element Colors ===
    /// Wall Gray - For borders and separators
    pub const BORDER: Color = Color::Rgb(0x72, 0x71, 0x69);
    /// Dim border for less important separators
    pub const BORDER_DIM: Color = Color::Rgb(0x3A, 0x3A, 0x3A);

    /// Current-time marker line
    pub const NOW_MARKER: Color = YELLOW;
}

/// Color palette for track columns, cycled by column index.
pub const TRACK_COLORS: &[Color] = &[
    Color::Rgb(0x7A, 0xA2, 0xF7), // Bright blue
    Color::Rgb(0x9E, 0xCE, 0x6A), // Bright green
    Color::Rgb(0xE0, 0xAF, 0x68), // Golden yellow
    Color::Rgb(0xBB, 0x9A, 0xF7), // Bright purple
    Color::Rgb(0xFF, 0x9E, 0x64), // Bright orange
    Color::Rgb(0xF7, 0x76, 0x8E), // Pink/magenta
    Color::Rgb(0x73, 0xDA, 0xCA), // Cyan/teal
    Color::Rgb(0xC0, 0xCA, 0xF5), // Lavender
];

/// Track accent color by column index (cycles).
pub fn track_color(index: usize) -> Color {
    TRACK_COLORS[index % TRACK_COLORS.len()]
}

/// Semantic styling helpers
pub mod styles {
    use ratatui::style::{Modifier, Style};

    use super::colors;

    /// Style for primary text
    pub fn text() -> Style {
        Style::default().fg(colors::FG_PRIMARY)
    }

    /// Style for dimmed/secondary text
    pub fn text_dim() -> Style {
        Style::default().fg(colors::FG_DIM)
    }

    /// Style for hint text
    pub fn text_hint() -> Style {
        Style::default().fg(colors::FG_HINT)
    }

    /// Style for success messages
    pub fn success() -> Style {
        Style::default().fg(colors::GREEN)
    }

    /// Style for error messages
    pub fn error() -> Style {
        Style::default().fg(colors::RED)
    }

    /// Style for warning messages
    pub fn warning() -> Style {
        Style::default().fg(colors::YELLOW)
    }

    /// Style for info messages
    pub fn info() -> Style {
        Style::default().fg(colors::BLUE)
    }

    /// Style for block titles
    pub fn title() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for unfocused borders
    pub fn border() -> Style {
        Style::default().fg(colors::BORDER)
    }

    /// Style for dim borders
    pub fn border_dim() -> Style {
        Style::default().fg(colors::BORDER_DIM)
    }

    /// Style for modal content background
    pub fn modal_content_bg() -> Style {
        Style::default().bg(colors::BG_MEDIUM)
    }

    // === Grid cell styles ===

    /// Ordinary session cell
    pub fn cell() -> Style {
        Style::default().fg(colors::FG_PRIMARY).bg(colors::BG_MEDIUM)
    }

    /// Structural slot (break, reception, room change)
    pub fn cell_structural() -> Style {
        Style::default().fg(colors::FG_HINT).bg(colors::BG_DARK)
    }

    /// Session in the committed/pending checked set
    pub fn cell_checked() -> Style {
        Style::default().fg(colors::BG_DARK).bg(colors::GREEN)
    }

    /// Session that cannot be checked (overlaps a checked one) in edit mode
    pub fn cell_blocked() -> Style {
        Style::default()
            .fg(colors::RED)
            .bg(colors::BG_DARK)
            .add_modifier(Modifier::DIM)
    }

    /// Session running right now
    pub fn cell_current() -> Style {
        Style::default()
            .fg(colors::YELLOW)
            .bg(colors::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Cursor-selected session
    pub fn cell_selected() -> Style {
        Style::default()
            .fg(colors::BG_DARK)
            .bg(colors::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Edit-mode banner in the header
    pub fn edit_banner() -> Style {
        Style::default()
            .fg(colors::BG_DARK)
            .bg(colors::YELLOW)
            .add_modifier(Modifier::BOLD)
    }
}

//! Palette to terminal colour mapping and semantic styles.

use ratatui::style::{Color, Modifier, Style};

use baseline_core::{Palette, Rgb, Role, Segment};

// ── Fixed status colours ──────────────────────────────────────────────

pub const ERROR_RED: Color = Color::Rgb(255, 85, 85); // #ff5555
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b

pub const fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Foreground colour for a role under the active palette.
pub const fn role_color(role: Role, palette: &Palette) -> Color {
    match role {
        Role::Main => color(palette.main),
        Role::Dim => color(palette.dim),
        Role::Bright => color(palette.bright),
        Role::Error => ERROR_RED,
        Role::Success => SUCCESS_GREEN,
    }
}

pub fn segment_style(segment: &Segment, palette: &Palette) -> Style {
    let style = Style::default().fg(role_color(segment.role, palette));
    if segment.bold {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

// ── Semantic styles ───────────────────────────────────────────────────

pub fn border(palette: &Palette) -> Style {
    Style::default().fg(color(palette.dim))
}

pub fn title(palette: &Palette) -> Style {
    Style::default()
        .fg(color(palette.bright))
        .add_modifier(Modifier::BOLD)
}

/// The `> ` prompt in front of the command line.
pub fn prompt(palette: &Palette) -> Style {
    Style::default()
        .fg(color(palette.bright))
        .add_modifier(Modifier::BOLD)
}

pub fn input(palette: &Palette) -> Style {
    Style::default().fg(color(palette.main))
}

//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const ACCENT_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const INFO_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_PURPLE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Normal card / row text.
pub fn card_text() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected card.
pub fn card_selected() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Key hint text in the status bar.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key name within a hint.
pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT_CYAN)
}

/// A notification line at `level`, dimmed while fading out.
pub fn notification(level: wolhub_core::NotificationLevel, fading: bool) -> Style {
    let color = match level {
        wolhub_core::NotificationLevel::Success => SUCCESS_GREEN,
        wolhub_core::NotificationLevel::Error => ERROR_RED,
        wolhub_core::NotificationLevel::Info => INFO_YELLOW,
    };
    let style = Style::default().fg(color);
    if fading {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

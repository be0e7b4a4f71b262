//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Device States ─────────────────────────────────────────────────────

/// Button fill for a device that is on (or open).
pub const ON_GREEN: Color = Color::Rgb(34, 197, 94); // #22c55e
/// Button fill for a device that is off (or closed).
pub const OFF_RED: Color = Color::Rgb(239, 68, 68); // #ef4444
pub const BUTTON_TEXT: Color = Color::White;

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for the panel holding the focused control.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Body text.
pub fn text() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Toggle button fill for the given device state.
pub fn button(active: bool) -> Style {
    let bg = if active { ON_GREEN } else { OFF_RED };
    Style::default().fg(BUTTON_TEXT).bg(bg)
}

/// Focus marker and emphasis for the focused control.
pub fn focus_marker() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Warning text (fridge alert).
pub fn alert() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

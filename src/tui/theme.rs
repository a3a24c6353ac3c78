// src/tui/theme.rs — Color scheme and style definitions for the studio TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::engine::types::{Platform, Severity};

/// Pop-art palette lifted from the brand: loud orange on near-black, with
/// the four severity tints.
pub struct Theme;

impl Theme {
    // ── Brand colors ─────────────────────────────────────────────
    pub const POP_ORANGE: Color = Color::Rgb(240, 84, 60);
    pub const POP_CREAM: Color = Color::Rgb(255, 249, 240);
    pub const POP_DARK: Color = Color::Rgb(26, 26, 26);
    pub const POP_GRAY: Color = Color::Rgb(130, 130, 140);
    pub const POP_DIM: Color = Color::Rgb(75, 75, 85);
    pub const POP_GREEN: Color = Color::Rgb(123, 198, 92);

    // ── Severity tints ───────────────────────────────────────────
    pub const TIER_BLUE: Color = Color::Rgb(90, 160, 255);
    pub const TIER_YELLOW: Color = Color::Rgb(240, 200, 60);
    pub const TIER_ORANGE: Color = Color::Rgb(250, 140, 40);
    pub const TIER_RED: Color = Color::Rgb(235, 70, 60);

    // ── Platform accents ─────────────────────────────────────────
    pub const YOUTUBE_RED: Color = Color::Rgb(255, 60, 60);
    pub const SPOTIFY_GREEN: Color = Color::Rgb(30, 215, 96);

    /// Tint for one severity tier.
    pub fn severity_color(severity: Severity) -> Color {
        match severity {
            Severity::Blue => Theme::TIER_BLUE,
            Severity::Yellow => Theme::TIER_YELLOW,
            Severity::Orange => Theme::TIER_ORANGE,
            Severity::Red => Theme::TIER_RED,
        }
    }

    /// Severity chip on a flag card.
    pub fn severity(severity: Severity) -> Style {
        Style::default()
            .fg(Theme::severity_color(severity))
            .add_modifier(Modifier::BOLD)
    }

    /// Cosmetic accent for the selected platform preset.
    pub fn platform_accent(platform: Platform) -> Color {
        match platform {
            Platform::YouTube => Theme::YOUTUBE_RED,
            Platform::Spotify => Theme::SPOTIFY_GREEN,
            Platform::General => Theme::POP_ORANGE,
        }
    }

    // ── Semantic styles ──────────────────────────────────────────

    /// Active/selected tab header.
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::POP_ORANGE)
            .add_modifier(Modifier::BOLD)
    }

    /// Inactive tab header.
    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::POP_GRAY)
    }

    /// Main title / header bar.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::POP_ORANGE)
            .add_modifier(Modifier::BOLD)
    }

    /// Block border (normal).
    pub fn border() -> Style {
        Style::default().fg(Theme::POP_DIM)
    }

    /// Block border (focused / selected).
    pub fn border_focus() -> Style {
        Style::default().fg(Theme::POP_ORANGE)
    }

    /// Normal body text.
    pub fn text() -> Style {
        Style::default().fg(Theme::POP_CREAM)
    }

    /// Dimmed / secondary text.
    pub fn text_dim() -> Style {
        Style::default().fg(Theme::POP_GRAY)
    }

    /// SAFE badge and resolved rows.
    pub fn safe() -> Style {
        Style::default()
            .fg(Theme::POP_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    /// Danger / destructive emphasis (nuke modal, risk shield).
    pub fn danger() -> Style {
        Style::default()
            .fg(Theme::TIER_RED)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected flag card row.
    pub fn card_selected() -> Style {
        Style::default()
            .bg(Color::Rgb(45, 45, 55))
            .fg(Theme::POP_CREAM)
    }

    /// Key hint in the footer.
    pub fn key_hint() -> Style {
        Style::default().fg(Theme::POP_ORANGE)
    }

    /// Description next to key hint.
    pub fn key_desc() -> Style {
        Style::default().fg(Theme::POP_GRAY)
    }

    /// Risk-meter style, color-coded 0–100.
    pub fn risk(level: u8) -> Style {
        if level == 0 {
            Style::default().fg(Theme::POP_GREEN)
        } else if level < 60 {
            Style::default().fg(Theme::TIER_YELLOW)
        } else {
            Style::default().fg(Theme::TIER_RED)
        }
    }
}

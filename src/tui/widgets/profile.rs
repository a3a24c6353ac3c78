// src/tui/widgets/profile.rs — Creator hub tab: canned identity and stats.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::infra::config::ProfileConfig;
use crate::tui::theme::Theme;

/// Demo numbers; nothing is persisted, so the hub always shows the same
/// spotless track record.
pub const EPISODES_AUDITED: u32 = 42;
pub const FLAGS_RESOLVED: u32 = 182;
pub const PLATFORM_STRIKES: u32 = 0;

pub fn render(f: &mut Frame, area: Rect, profile: &ProfileConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);

    render_identity(f, chunks[0], profile);
    render_stats(f, chunks[1]);
}

fn render_identity(f: &mut Frame, area: Rect, profile: &ProfileConfig) {
    let block = Block::default()
        .title(" Creator hub ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(&profile.name, Theme::header())),
        Line::from(Span::styled(&profile.role, Theme::text_dim())),
        Line::from(Span::styled(
            "Latest: Episode 42 — \"The AI Gap\"",
            Theme::text_dim(),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_stats(f: &mut Frame, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let stats = [
        (EPISODES_AUDITED, "episodes audited", Theme::text()),
        (FLAGS_RESOLVED, "flags resolved", Theme::header()),
        (PLATFORM_STRIKES, "platform strikes", Theme::safe()),
    ];

    for ((value, label, style), col) in stats.iter().zip(cols.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                value.to_string(),
                style.add_modifier(ratatui::style::Modifier::BOLD),
            )),
            Line::from(Span::styled(*label, Theme::text_dim())),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, *col);
    }
}

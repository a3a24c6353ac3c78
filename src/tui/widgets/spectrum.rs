// src/tui/widgets/spectrum.rs — Risk spectrum tab: the four-tier reference.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::engine::pool::{TierProfile, TIER_PROFILES};
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (profile, chunk) in TIER_PROFILES.iter().zip(chunks.iter()) {
        render_tier(f, *chunk, profile);
    }
}

fn render_tier(f: &mut Frame, area: Rect, profile: &TierProfile) {
    let style = Theme::severity(profile.severity);
    let meter: String = (1..=10)
        .map(|i| if i <= profile.risk_meter { '█' } else { '░' })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            format!(" {} — {} ", profile.severity.category(), profile.title),
            style,
        ))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines = vec![
        Line::from(vec![
            Span::styled("risk ", Theme::text_dim()),
            Span::styled(meter, style),
            Span::styled(format!(" {}/10", profile.risk_meter), Theme::text_dim()),
        ]),
        Line::from(Span::styled(profile.desc, Theme::text())),
        Line::from(Span::styled(
            profile.bullets.join("  ·  "),
            Theme::text_dim(),
        )),
        Line::from(vec![
            Span::styled("before: ", Theme::text_dim()),
            Span::styled(profile.example_before, Theme::text()),
            Span::styled("   after: ", Theme::text_dim()),
            Span::styled(profile.example_after, Theme::safe()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

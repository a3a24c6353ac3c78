// src/tui/widgets/ledger.rs — Transparency ledger tab: resolved flags with a
// Public/Hidden toggle.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::engine::types::{AuditSession, Flag};
use crate::tui::theme::Theme;

/// Resolved flags stay visible here even after they stop counting toward
/// risk. Order follows the session's seconds-sorted flag list.
pub fn ledger_rows(session: &AuditSession) -> Vec<&Flag> {
    session.flags.iter().filter(|f| f.is_resolved()).collect()
}

pub fn render(f: &mut Frame, area: Rect, session: &AuditSession, selected: usize) {
    let rows = ledger_rows(session);
    let block = Block::default()
        .title(format!(" Transparency ledger ({} resolved) ", rows.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let mut lines = vec![
        Line::from(Span::styled(
            "Resolved flags, on the record. Toggle visibility with g.",
            Theme::text_dim(),
        )),
        Line::from(""),
    ];

    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing resolved yet. The ledger fills in as you fix flags.",
            Theme::text_dim(),
        )));
    }

    for (i, flag) in rows.iter().enumerate() {
        let marker = if i == selected { "▶ " } else { "  " };
        let visibility = if flag.public_in_ledger {
            Span::styled("PUBLIC", Theme::safe())
        } else {
            Span::styled("HIDDEN", Theme::text_dim())
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Theme::key_hint()),
            Span::styled(format!("{} ", flag.timestamp), Theme::text_dim()),
            Span::styled(format!("[{}] ", flag.severity), Theme::severity(flag.severity)),
            Span::styled(format!("{:<16} ", flag.category), Theme::text()),
            visibility,
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("fix: {}", flag.suggested_fix), Theme::text_dim()),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

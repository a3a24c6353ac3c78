// src/tui/widgets/studio.rs — Studio tab: upload, scan, triage, export.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::engine::types::{
    AuditSession, ExportKind, ExportState, Flag, FlagStatus, OverrideFlow, OverrideKind,
    OverrideStage, Platform, ScanStatus, Severity, TIMELINE_SECS,
};
use crate::tui::theme::Theme;

/// Interactive state owned by the app, not the engine: which flag card and
/// export preset the cursor is on.
#[derive(Default)]
pub struct StudioCursor {
    pub flag: usize,
    pub export: usize,
}

impl StudioCursor {
    pub fn clamp(&mut self, session: &AuditSession) {
        if !session.flags.is_empty() {
            self.flag = self.flag.min(session.flags.len() - 1);
        } else {
            self.flag = 0;
        }
        self.export = self.export.min(ExportKind::ALL.len() - 1);
    }

    pub fn selected_flag<'a>(&self, session: &'a AuditSession) -> Option<&'a Flag> {
        session.flags.get(self.flag)
    }

    pub fn selected_export(&self) -> ExportKind {
        ExportKind::ALL[self.export.min(ExportKind::ALL.len() - 1)]
    }
}

pub fn render(f: &mut Frame, area: Rect, session: &AuditSession, cursor: &StudioCursor) {
    match session.status {
        ScanStatus::Idle => render_idle(f, area, session),
        ScanStatus::Analyzing => render_analyzing(f, area, session),
        ScanStatus::Complete => render_complete(f, area, session, cursor),
    }

    if let Some(flow) = &session.override_flow {
        render_override_modal(f, area, flow);
    }
}

// ── Idle ─────────────────────────────────────────────────────────

fn render_idle(f: &mut Frame, area: Rect, session: &AuditSession) {
    let accent = Theme::platform_accent(session.platform);
    let block = Block::default()
        .title(" Upload ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let platform_line: Vec<Span> = Platform::ALL
        .iter()
        .flat_map(|&p| {
            let style = if p == session.platform {
                Theme::tab_active().fg(Theme::platform_accent(p))
            } else {
                Theme::text_dim()
            };
            vec![Span::styled(format!(" {p} "), style), Span::raw(" ")]
        })
        .collect();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "DROP YOUR EPISODE IN THE BOOTH",
            Theme::header().fg(accent),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "We audit your content for liability, cancellation risks,",
            Theme::text(),
        )),
        Line::from(Span::styled(
            "and advertiser safety before you hit publish.",
            Theme::text(),
        )),
        Line::from(""),
        Line::from(platform_line),
        Line::from(""),
        Line::from(vec![
            Span::styled("u", Theme::key_hint()),
            Span::styled(" start the scan   ", Theme::key_desc()),
            Span::styled("p", Theme::key_hint()),
            Span::styled(" switch platform", Theme::key_desc()),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

// ── Analyzing ────────────────────────────────────────────────────

fn render_analyzing(f: &mut Frame, area: Rect, session: &AuditSession) {
    let accent = Theme::platform_accent(session.platform);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let file_name = session
        .file
        .as_ref()
        .map(|f| f.name.as_str())
        .unwrap_or("—");
    let header = Paragraph::new(Line::from(vec![
        Span::styled("ANALYZING  ", Theme::header().fg(accent)),
        Span::styled(file_name, Theme::text()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(header, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" AI scan ")
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .gauge_style(ratatui::style::Style::default().fg(accent))
        .percent(u16::from(session.progress))
        .label(format!("{}%", session.progress));
    f.render_widget(gauge, chunks[1]);

    let hint = Paragraph::new(Span::styled(
        "listening for kill-switches, ad-risks, spicy takes and missing receipts...",
        Theme::text_dim(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}

// ── Complete ─────────────────────────────────────────────────────

fn render_complete(f: &mut Frame, area: Rect, session: &AuditSession, cursor: &StudioCursor) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // smart summary
            Constraint::Length(3), // waveform strip
            Constraint::Min(6),    // flag cards + shield
            Constraint::Length(4), // export presets / toast
        ])
        .split(area);

    render_summary(f, rows[0], session);
    render_waveform(f, rows[1], session);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows[2]);
    render_flag_cards(f, cols[0], session, cursor);
    render_risk_shield(f, cols[1], session);

    render_export_row(f, rows[3], session, cursor);
}

fn render_summary(f: &mut Frame, area: Rect, session: &AuditSession) {
    let paragraph = Paragraph::new(Span::styled(&session.summary, Theme::text()))
        .block(
            Block::default()
                .title(" Smart summary ")
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Bar glyphs for waveform heights in `[20, 80)`.
const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Highlight window around a flag position, as a fraction of the timeline.
const HIGHLIGHT_WINDOW: f64 = 0.015;

/// Severity of the unresolved flag covering a given bar, if any. Resolved
/// flags drop off the overlay.
pub fn bar_highlight(session: &AuditSession, bar: usize, bar_count: usize) -> Option<Severity> {
    let bar_pct = bar as f64 / bar_count as f64;
    session
        .flags
        .iter()
        .filter(|flag| !flag.is_resolved())
        .filter(|flag| {
            let flag_pct = f64::from(flag.seconds) / f64::from(TIMELINE_SECS);
            (bar_pct - flag_pct).abs() <= HIGHLIGHT_WINDOW
        })
        .map(|flag| flag.severity)
        .max()
}

fn render_waveform(f: &mut Frame, area: Rect, session: &AuditSession) {
    let bar_count = session.waveform.len().max(1);
    let spans: Vec<Span> = session
        .waveform
        .iter()
        .enumerate()
        .map(|(i, &height)| {
            let glyph = BAR_GLYPHS[((height.saturating_sub(20)) / 8).min(7) as usize];
            let style = match bar_highlight(session, i, bar_count) {
                Some(severity) => Theme::severity(severity),
                None => Theme::text_dim(),
            };
            Span::styled(glyph.to_string(), style)
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Waveform ")
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(paragraph, area);
}

fn render_flag_cards(f: &mut Frame, area: Rect, session: &AuditSession, cursor: &StudioCursor) {
    let block = Block::default()
        .title(format!(
            " Flags ({} active) ",
            session.active_count()
        ))
        .borders(Borders::ALL)
        .border_style(Theme::border_focus());

    let mut lines = Vec::new();
    for (i, flag) in session.flags.iter().enumerate() {
        let selected = i == cursor.flag;
        let marker = if selected { "▶ " } else { "  " };
        let status = match flag.status {
            FlagStatus::Active => Span::styled("ACTIVE    ", Theme::severity(flag.severity)),
            FlagStatus::Processing => Span::styled("FIXING... ", Theme::text_dim()),
            FlagStatus::Resolved => Span::styled("RESOLVED  ", Theme::safe()),
        };
        let row_style = if selected {
            Theme::card_selected()
        } else {
            Theme::text()
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Theme::key_hint()),
            Span::styled(format!("{} ", flag.timestamp), Theme::text_dim()),
            Span::styled(format!("[{}] ", flag.severity), Theme::severity(flag.severity)),
            Span::styled(format!("{:<16} ", flag.category), row_style),
            status,
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("\"{}\"", flag.transcript), row_style),
        ]));
        let mut detail = vec![
            Span::raw("    "),
            Span::styled(&flag.ai_reason, Theme::text_dim()),
            Span::styled("  fix: ", Theme::text_dim()),
            Span::styled(&flag.suggested_fix, Theme::key_hint()),
        ];
        if let Some(style) = flag.overlay {
            detail.push(Span::styled(
                format!("  overlay: {style:?}"),
                Theme::text_dim(),
            ));
        }
        lines.push(Line::from(detail));
    }
    if session.flags.is_empty() {
        lines.push(Line::from(Span::styled(
            "No flags left. Ship it.",
            Theme::safe(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((card_scroll(cursor.flag, area), 0));
    f.render_widget(paragraph, area);
}

/// Keep the selected card (3 lines tall) inside the viewport.
fn card_scroll(selected: usize, area: Rect) -> u16 {
    let visible = area.height.saturating_sub(2);
    let top = (selected as u16).saturating_mul(3);
    if top + 3 > visible {
        top + 3 - visible
    } else {
        0
    }
}

fn render_risk_shield(f: &mut Frame, area: Rect, session: &AuditSession) {
    let level = session.risk_level();
    let block = Block::default()
        .title(" Risk shield ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let verdict = if session.is_safe() {
        Line::from(Span::styled("✔ SAFE TO PUBLISH", Theme::safe()))
    } else {
        Line::from(Span::styled(
            format!("{} open threat(s)", session.open_threat_count()),
            Theme::danger(),
        ))
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{level}%"),
            Theme::risk(level).add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled("cancellation risk", Theme::text_dim())),
        Line::from(""),
        verdict,
        Line::from(""),
        Line::from(Span::styled(
            format!("{} resolved", session.resolved_count()),
            Theme::text_dim(),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_export_row(f: &mut Frame, area: Rect, session: &AuditSession, cursor: &StudioCursor) {
    let block = Block::default()
        .title(" Export ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let body = match &session.export {
        Some(job) if job.state == ExportState::Compiling => Line::from(Span::styled(
            format!("Compiling {}...", job.kind.label()),
            Theme::text_dim(),
        )),
        Some(job) if job.state == ExportState::Ready => Line::from(Span::styled(
            format!("Download Ready! {} (mock artifact)", job.kind.label()),
            Theme::safe(),
        )),
        _ if !session.download_ready => Line::from(Span::styled(
            "Resolve a flag to unlock export presets.",
            Theme::text_dim(),
        )),
        _ => {
            let mut spans = Vec::new();
            for (i, kind) in ExportKind::ALL.iter().enumerate() {
                let style = if i == cursor.export {
                    Theme::tab_active()
                } else {
                    Theme::text_dim()
                };
                spans.push(Span::styled(format!("[ {} ]", kind.label()), style));
                spans.push(Span::raw("  "));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(vec![Line::from(""), body])
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

// ── Override modal ───────────────────────────────────────────────

fn render_override_modal(f: &mut Frame, area: Rect, flow: &OverrideFlow) {
    let modal = centered_rect(50, 9, area);
    f.render_widget(Clear, modal);

    let (title, body): (&str, Vec<Line>) = match (&flow.kind, &flow.stage) {
        (OverrideKind::Nuke { .. }, OverrideStage::Confirm) => (
            " NUKE SEGMENT ",
            vec![
                Line::from(Span::styled(
                    "Cut this segment from the episode entirely?",
                    Theme::text(),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Enter", Theme::key_hint()),
                    Span::styled(" do it   ", Theme::key_desc()),
                    Span::styled("Esc", Theme::key_hint()),
                    Span::styled(" back out", Theme::key_desc()),
                ]),
            ],
        ),
        (OverrideKind::Lockdown, OverrideStage::Confirm) => (
            " LOCKDOWN MODE ",
            vec![
                Line::from(Span::styled(
                    "Auto-silence every open RED and ORANGE flag?",
                    Theme::text(),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Enter", Theme::key_hint()),
                    Span::styled(" engage   ", Theme::key_desc()),
                    Span::styled("Esc", Theme::key_hint()),
                    Span::styled(" back out", Theme::key_desc()),
                ]),
            ],
        ),
        (kind, OverrideStage::Processing { progress }) => {
            let gauge_area = centered_rect(46, 3, area);
            let label = match kind {
                OverrideKind::Nuke { .. } => "nuking segment",
                OverrideKind::Lockdown => "silencing threats",
            };
            let gauge = Gauge::default()
                .block(
                    Block::default()
                        .title(format!(" {label} "))
                        .borders(Borders::ALL)
                        .border_style(Theme::danger()),
                )
                .gauge_style(Theme::danger())
                .percent(u16::from(*progress));
            f.render_widget(gauge, gauge_area);
            return;
        }
        (OverrideKind::Nuke { .. }, OverrideStage::Done) => (
            " DONE ",
            vec![
                Line::from(Span::styled("Segment removed.", Theme::safe())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Enter", Theme::key_hint()),
                    Span::styled(" close", Theme::key_desc()),
                ]),
            ],
        ),
        (OverrideKind::Lockdown, OverrideStage::Done) => (
            " DONE ",
            vec![
                Line::from(Span::styled(
                    "All open threats auto-silenced.",
                    Theme::safe(),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Enter", Theme::key_hint()),
                    Span::styled(" close", Theme::key_desc()),
                ]),
            ],
        ),
    };

    let paragraph = Paragraph::new(body)
        .block(
            Block::default()
                .title(Span::styled(title, Theme::danger()))
                .borders(Borders::ALL)
                .border_style(Theme::border_focus()),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, modal);
}

/// Fixed-size rect centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

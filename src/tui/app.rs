// src/tui/app.rs — Studio TUI: application state, event loop, and rendering.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame, Terminal,
};
use tokio::sync::watch;

use crate::engine::types::{
    AuditSession, OverlayStyle, OverrideStage, ScanStatus,
};
use crate::engine::AuditEngine;
use crate::infra::config::{Config, ProfileConfig};
use crate::infra::errors::AuditPopError;

use super::theme::Theme;
use super::widgets::studio::{centered_rect, StudioCursor};
use super::widgets::{ledger, profile, spectrum, studio};

// ── Tab enum ─────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Studio,
    Spectrum,
    Ledger,
    Profile,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Studio, Tab::Spectrum, Tab::Ledger, Tab::Profile];

    fn label(&self) -> &'static str {
        match self {
            Tab::Studio => "Studio",
            Tab::Spectrum => "Spectrum",
            Tab::Ledger => "Ledger",
            Tab::Profile => "Profile",
        }
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn from_index(i: usize) -> Tab {
        *Tab::ALL.get(i).unwrap_or(&Tab::Studio)
    }
}

// ── App state ────────────────────────────────────────────────────

struct App {
    engine: AuditEngine,
    rx: watch::Receiver<AuditSession>,
    session: AuditSession,
    active_tab: Tab,
    cursor: StudioCursor,
    ledger_cursor: usize,
    show_help: bool,
    file: Option<String>,
    profile: ProfileConfig,
}

impl App {
    fn new(engine: AuditEngine, file: Option<String>, profile: ProfileConfig) -> Self {
        let rx = engine.subscribe();
        let session = engine.snapshot();
        Self {
            engine,
            rx,
            session,
            active_tab: Tab::Studio,
            cursor: StudioCursor::default(),
            ledger_cursor: 0,
            show_help: false,
            file,
            profile,
        }
    }

    /// Pull the latest snapshot if the engine published one.
    fn refresh(&mut self) {
        if self.rx.has_changed().unwrap_or(false) {
            self.session = self.rx.borrow_and_update().clone();
            self.cursor.clamp(&self.session);
            let resolved = ledger::ledger_rows(&self.session).len();
            self.ledger_cursor = self.ledger_cursor.min(resolved.saturating_sub(1));
        }
    }

    fn next_tab(&mut self) {
        self.active_tab = Tab::from_index((self.active_tab.index() + 1) % Tab::ALL.len());
    }

    fn prev_tab(&mut self) {
        self.active_tab =
            Tab::from_index((self.active_tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len());
    }

    fn scroll_down(&mut self) {
        match self.active_tab {
            Tab::Studio => {
                self.cursor.flag += 1;
                self.cursor.clamp(&self.session);
            }
            Tab::Ledger => {
                let max = ledger::ledger_rows(&self.session).len().saturating_sub(1);
                self.ledger_cursor = (self.ledger_cursor + 1).min(max);
            }
            _ => {}
        }
    }

    fn scroll_up(&mut self) {
        match self.active_tab {
            Tab::Studio => self.cursor.flag = self.cursor.flag.saturating_sub(1),
            Tab::Ledger => self.ledger_cursor = self.ledger_cursor.saturating_sub(1),
            _ => {}
        }
    }

    /// Keys while the override modal is up. Returns true if the key was
    /// consumed.
    fn handle_modal_key(&mut self, code: KeyCode) -> bool {
        let stage = match &self.session.override_flow {
            Some(flow) => flow.stage.clone(),
            None => return false,
        };
        match (stage, code) {
            (OverrideStage::Confirm, KeyCode::Enter) => self.engine.confirm_override(),
            (OverrideStage::Confirm, KeyCode::Esc) => self.engine.cancel_override(),
            (OverrideStage::Done, KeyCode::Enter | KeyCode::Esc) => {
                self.engine.dismiss_override()
            }
            // Mid-processing there is nothing to press.
            _ => {}
        }
        true
    }

    fn handle_studio_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('u') => self.engine.submit_file(self.file.clone()),
            KeyCode::Char('p') => self.engine.set_platform(self.session.platform.next()),
            KeyCode::Char('r') => self.engine.reset(),
            _ => {}
        }

        if self.session.status != ScanStatus::Complete {
            return;
        }
        match code {
            KeyCode::Char('f') => {
                if let Some(flag) = self.cursor.selected_flag(&self.session) {
                    self.engine.resolve_flag(&flag.id);
                }
            }
            KeyCode::Char('n') => {
                if let Some(flag) = self.cursor.selected_flag(&self.session) {
                    self.engine.request_remove(&flag.id);
                }
            }
            KeyCode::Char('l') => self.engine.request_lockdown(),
            KeyCode::Char('o') => {
                if let Some(flag) = self.cursor.selected_flag(&self.session) {
                    let next = match flag.overlay {
                        None => OverlayStyle::Minimal,
                        Some(OverlayStyle::Minimal) => OverlayStyle::Bold,
                        Some(OverlayStyle::Bold) => OverlayStyle::Context,
                        Some(OverlayStyle::Context) => OverlayStyle::Minimal,
                    };
                    self.engine.set_overlay(&flag.id, next);
                }
            }
            KeyCode::Char('g') => {
                if let Some(flag) = self.cursor.selected_flag(&self.session) {
                    self.engine.toggle_ledger(&flag.id);
                }
            }
            KeyCode::Char('e') => {
                self.cursor.export = (self.cursor.export + 1) % 3;
            }
            KeyCode::Enter => {
                if self.session.export.is_some() {
                    self.engine.dismiss_export();
                } else {
                    self.engine.start_export(self.cursor.selected_export());
                }
            }
            _ => {}
        }
    }

    fn handle_ledger_key(&mut self, code: KeyCode) {
        if code == KeyCode::Char('g') {
            let id = ledger::ledger_rows(&self.session)
                .get(self.ledger_cursor)
                .map(|f| f.id.clone());
            if let Some(id) = id {
                self.engine.toggle_ledger(&id);
            }
        }
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the studio TUI. Blocks until the user quits (q / Ctrl-C).
pub fn run_studio(
    engine: AuditEngine,
    config: &Config,
    file: Option<String>,
) -> anyhow::Result<()> {
    let mut app = App::new(engine, file, config.profile.clone());

    enable_raw_mode().map_err(|e| AuditPopError::Terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| AuditPopError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| AuditPopError::Terminal(e.to_string()))?;

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.refresh();
        terminal.draw(|f| render(f, app))?;

        // Short poll keeps progress gauges moving between key presses.
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        if key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Ok(());
        }

        if app.show_help {
            app.show_help = false;
            continue;
        }
        if app.active_tab == Tab::Studio && app.handle_modal_key(key.code) {
            continue;
        }

        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Tab | KeyCode::Right => app.next_tab(),
            KeyCode::BackTab | KeyCode::Left => app.prev_tab(),
            KeyCode::Char('1') => app.active_tab = Tab::Studio,
            KeyCode::Char('2') => app.active_tab = Tab::Spectrum,
            KeyCode::Char('3') => app.active_tab = Tab::Ledger,
            KeyCode::Char('4') => app.active_tab = Tab::Profile,
            KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
            KeyCode::Char('?') => app.show_help = true,
            code => match app.active_tab {
                Tab::Studio => app.handle_studio_key(code),
                Tab::Ledger => app.handle_ledger_key(code),
                _ => {}
            },
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Footer / key hints
        ])
        .split(size);

    render_header(f, chunks[0], app);
    render_tab_content(f, chunks[1], app);
    render_footer(f, chunks[2], app);

    if app.show_help {
        render_help_overlay(f, size);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let label = format!(" {} {} ", i + 1, tab.label());
            if *tab == app.active_tab {
                Line::from(Span::styled(label, Theme::tab_active()))
            } else {
                Line::from(Span::styled(label, Theme::tab_inactive()))
            }
        })
        .collect();

    let accent = Theme::platform_accent(app.session.platform);
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(Span::styled(" AUDIT-POP! ", Theme::header().fg(accent)))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .select(app.active_tab.index())
        .highlight_style(Theme::tab_active())
        .divider(Span::styled(" | ", Theme::text_dim()));

    f.render_widget(tabs, area);
}

fn render_tab_content(f: &mut Frame, area: Rect, app: &mut App) {
    match app.active_tab {
        Tab::Studio => studio::render(f, area, &app.session, &app.cursor),
        Tab::Spectrum => spectrum::render(f, area),
        Tab::Ledger => ledger::render(f, area, &app.session, app.ledger_cursor),
        Tab::Profile => profile::render(f, area, &app.profile),
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let hints = match app.active_tab {
        Tab::Studio => vec![
            ("q", "quit  "),
            ("u", "scan  "),
            ("p", "platform  "),
            ("j/k", "select  "),
            ("f", "fix  "),
            ("n", "nuke  "),
            ("l", "lockdown  "),
            ("?", "help"),
        ],
        Tab::Ledger => vec![
            ("q", "quit  "),
            ("j/k", "select  "),
            ("g", "public/hidden  "),
            ("?", "help"),
        ],
        _ => vec![("q", "quit  "), ("Tab", "switch  "), ("?", "help")],
    };

    let spans: Vec<Span> = hints
        .into_iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(format!(" {key}"), Theme::key_hint()),
                Span::styled(format!(" {desc}"), Theme::key_desc()),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let modal = centered_rect(56, 16, area);
    f.render_widget(Clear, modal);

    let rows: [(&str, &str); 12] = [
        ("u", "upload / rescan the loaded file"),
        ("p", "cycle platform preset (idle or complete)"),
        ("j/k", "move between flag cards"),
        ("f", "auto-fix the selected flag"),
        ("n", "nuke the selected RED/ORANGE segment"),
        ("l", "lockdown: silence all open threats"),
        ("o", "cycle censor overlay (BLUE/YELLOW)"),
        ("g", "toggle ledger visibility"),
        ("e / Enter", "pick / start an export preset"),
        ("r", "reset and queue the next episode"),
        ("1-4, Tab", "switch tabs"),
        ("q", "quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<10}"), Theme::key_hint()),
            Span::styled(desc, Theme::text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  any key to close",
        Theme::text_dim(),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" First time in the booth? ", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border_focus()),
    );
    f.render_widget(paragraph, modal);
}

// src/tui/mod.rs — Studio TUI module.
//
// Terminal front end for the audit engine, built with ratatui.
// Launch via `auditpop studio` (or just `auditpop`).

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::run_studio;

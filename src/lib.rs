// src/lib.rs — Library root for AuditPop

pub mod cli;
pub mod engine;
pub mod infra;
pub mod tui;

// src/engine/mod.rs — Simulated audit-session engine
//
// Nothing here analyzes audio. A scan is a timer-driven progress counter
// that, on completion, samples canned strings from the pool to fabricate
// flags. The reducer is the single pure transition function; the controller
// is the single writer and publishes whole-record snapshots.

pub mod controller;
pub mod generator;
pub mod pool;
pub mod reducer;
pub mod scheduler;
pub mod types;

pub use controller::AuditEngine;
pub use reducer::{reduce, Action, Followup, Outcome};
pub use types::{
    AuditEvent, AuditSession, EngineTiming, ExportJob, ExportKind, ExportState, Flag, FlagStatus,
    OverlayStyle, OverrideFlow, OverrideKind, OverrideStage, Platform, ScanStatus, Severity,
    SourceFile,
};

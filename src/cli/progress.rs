// src/cli/progress.rs — Terminal progress renderer for headless scans

use crate::engine::types::AuditEvent;

/// Build an event callback that writes formatted output to stderr.
///
/// All progress output goes to stderr so stdout stays clean for the report
/// (plain or `--json`). Returns a closure suitable for
/// `AuditEngine::with_observer()`.
pub fn terminal_progress() -> impl Fn(AuditEvent) + Send + Sync + 'static {
    move |event| {
        if let Some(line) = format_event(&event) {
            eprintln!("{line}");
        }
    }
}

/// One formatted line per noteworthy event; chatty per-tick progress is
/// thinned to every 20%.
pub fn format_event(event: &AuditEvent) -> Option<String> {
    match event {
        AuditEvent::ScanStarted { file } => Some(format!("[scan] analyzing {file}...")),
        AuditEvent::ScanProgress { progress } => {
            if progress % 20 == 0 {
                Some(format!("[scan] {progress}%"))
            } else {
                None
            }
        }
        AuditEvent::ScanCompleted { flags, risk_level } => Some(format!(
            "[scan] complete: {flags} flag(s), risk level {risk_level}%"
        )),
        AuditEvent::FlagResolving { id } => Some(format!("[fix]  processing {id}")),
        AuditEvent::FlagResolved { id } => Some(format!("[fix]  resolved {id}")),
        AuditEvent::FlagRemoved { id } => Some(format!("[nuke] removed {id}")),
        AuditEvent::LockdownEngaged { resolved } => {
            Some(format!("[lockdown] auto-silenced {resolved} flag(s)"))
        }
        AuditEvent::ExportStarted { kind } => {
            Some(format!("[export] compiling {}...", kind.label()))
        }
        AuditEvent::ExportReady { kind } => Some(format!("[export] {} ready", kind.label())),
        AuditEvent::SessionReset => Some("[studio] session reset".into()),
    }
}

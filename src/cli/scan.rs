// src/cli/scan.rs — Headless scan command
//
// Runs one simulated scan to completion and prints the flag report. The
// engine is the same one the studio uses; this just drives it without a
// screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::progress::terminal_progress;
use crate::engine::types::{
    AuditSession, EngineTiming, Flag, Platform, ScanStatus, PLACEHOLDER_FILE,
};
use crate::engine::AuditEngine;
use crate::infra::config::Config;
use crate::infra::errors::AuditPopError;

/// Serializable snapshot of one finished scan, printed by `scan --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub file: String,
    pub platform: Platform,
    pub scanned_at: DateTime<Utc>,
    pub risk_level: u8,
    pub safe: bool,
    pub summary: String,
    pub flags: Vec<Flag>,
}

impl ScanReport {
    pub fn from_session(session: &AuditSession) -> Self {
        Self {
            file: session
                .file
                .as_ref()
                .map(|f| f.name.clone())
                .unwrap_or_else(|| PLACEHOLDER_FILE.to_string()),
            platform: session.platform,
            scanned_at: Utc::now(),
            risk_level: session.risk_level(),
            safe: session.is_safe(),
            summary: session.summary.clone(),
            flags: session.flags.clone(),
        }
    }
}

pub async fn run_scan(
    file: Option<String>,
    platform: Platform,
    seed: Option<u64>,
    json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let timing = EngineTiming::from_config(&config.scan, &config.flow);
    let engine = match seed {
        Some(seed) => AuditEngine::with_seed(platform, timing, seed),
        None => AuditEngine::new(platform, timing),
    };
    let engine = if json {
        engine
    } else {
        engine.with_observer(terminal_progress())
    };

    let mut rx = engine.subscribe();
    engine.submit_file(file);

    // The scan ticker drives the session to Complete; just watch for it.
    loop {
        if rx.borrow_and_update().status == ScanStatus::Complete {
            break;
        }
        if rx.changed().await.is_err() {
            anyhow::bail!("engine dropped before the scan completed");
        }
    }

    let report = ScanReport::from_session(&rx.borrow());
    if json {
        let rendered =
            serde_json::to_string_pretty(&report).map_err(AuditPopError::Report)?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    println!();
    println!(
        "AUDIT REPORT — {} ({} preset)",
        report.file, report.platform
    );
    println!("{}", "─".repeat(60));

    if report.flags.is_empty() {
        println!("No flags. Suspiciously clean.");
    }
    for flag in &report.flags {
        println!(
            "{}  [{:>6}] {:<16} {}",
            flag.timestamp, flag.severity, flag.category, flag.transcript
        );
        println!("       reason: {}  fix: {}", flag.ai_reason, flag.suggested_fix);
    }

    println!("{}", "─".repeat(60));
    println!("summary: {}", report.summary);
    if report.safe {
        println!("verdict: SAFE — risk level {}%", report.risk_level);
    } else {
        println!(
            "verdict: {} open threat(s) — risk level {}%",
            report.flags.iter().filter(|f| f.is_open_threat()).count(),
            report.risk_level
        );
    }
}

// src/engine/types.rs — Audit domain types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Every episode is treated as a fixed 30-minute timeline; flag positions
/// are drawn from `[0, TIMELINE_SECS)`.
pub const TIMELINE_SECS: u32 = 1800;

/// Target platform preset. Cosmetic theme plus flag-count bias; General
/// audits are deliberately noisier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Spotify,
    General,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::YouTube, Platform::Spotify, Platform::General];

    /// Parse a user-supplied platform name (config value or CLI flag).
    pub fn parse(s: &str) -> Result<Self, crate::infra::errors::AuditPopError> {
        match s.to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::YouTube),
            "spotify" => Ok(Platform::Spotify),
            "general" => Ok(Platform::General),
            other => Err(crate::infra::errors::AuditPopError::UnknownPlatform(
                other.to_string(),
            )),
        }
    }

    /// Next preset in display order, for cycling in the studio.
    pub fn next(self) -> Self {
        match self {
            Platform::YouTube => Platform::Spotify,
            Platform::Spotify => Platform::General,
            Platform::General => Platform::YouTube,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::YouTube => write!(f, "YouTube"),
            Platform::Spotify => write!(f, "Spotify"),
            Platform::General => write!(f, "General"),
        }
    }
}

/// Four-tier impact hierarchy, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blue,
    Yellow,
    Orange,
    Red,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Blue,
        Severity::Yellow,
        Severity::Orange,
        Severity::Red,
    ];

    /// Impact-hierarchy category label shown on flag cards.
    pub fn category(self) -> &'static str {
        match self {
            Severity::Blue => "THE RECEIPT",
            Severity::Yellow => "THE SPICY TAKE",
            Severity::Orange => "THE AD-RISK",
            Severity::Red => "THE KILL-SWITCH",
        }
    }

    /// Default remediation label for a fresh flag.
    pub fn default_fix(self) -> &'static str {
        match self {
            Severity::Red => "Cut Segment",
            _ => "Add Disclaimer",
        }
    }

    /// Red and Orange drive the risk meter and the lockdown flow.
    pub fn is_high_risk(self) -> bool {
        matches!(self, Severity::Red | Severity::Orange)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Blue => write!(f, "BLUE"),
            Severity::Yellow => write!(f, "YELLOW"),
            Severity::Orange => write!(f, "ORANGE"),
            Severity::Red => write!(f, "RED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    Active,
    Processing,
    Resolved,
}

/// Censor-overlay style, selectable on Blue/Yellow flags only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayStyle {
    Minimal,
    Bold,
    Context,
}

/// One detected "risk" instance on the episode timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub id: String,
    pub timestamp: String,
    pub seconds: u32,
    pub severity: Severity,
    pub category: String,
    pub transcript: String,
    pub ai_reason: String,
    pub suggested_fix: String,
    pub status: FlagStatus,
    pub overlay: Option<OverlayStyle>,
    pub public_in_ledger: bool,
}

impl Flag {
    pub fn new(
        severity: Severity,
        seconds: u32,
        transcript: impl Into<String>,
        ai_reason: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: format_timestamp(seconds),
            seconds,
            severity,
            category: severity.category().to_string(),
            transcript: transcript.into(),
            ai_reason: ai_reason.into(),
            suggested_fix: severity.default_fix().to_string(),
            status: FlagStatus::Active,
            overlay: None,
            public_in_ledger: true,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == FlagStatus::Resolved
    }

    /// Counts toward the risk meter: high-risk tier and not yet resolved.
    pub fn is_open_threat(&self) -> bool {
        self.severity.is_high_risk() && !self.is_resolved()
    }
}

/// Render `seconds` as a zero-padded mm:ss position, e.g. `04:20`.
pub fn format_timestamp(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Idle,
    Analyzing,
    Complete,
}

/// Opaque reference to the user-selected input. Only the name is ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
}

/// Name used when a scan starts without a picked file.
pub const PLACEHOLDER_FILE: &str = "audio_file.mp3";

/// Destructive/bulk flows run as a confirm → processing → done sub-machine
/// rendered as a modal. At most one flow is in flight per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideFlow {
    pub kind: OverrideKind,
    pub stage: OverrideStage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    /// Remove one flag outright.
    Nuke { flag_id: String },
    /// Resolve every open Red/Orange flag at once.
    Lockdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStage {
    Confirm,
    Processing { progress: u8 },
    Done,
}

/// Export presets. No artifact is produced; the job only drives display
/// state ("Compiling…" card, then the ready toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Clean,
    Overlay,
    Meta,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Clean, ExportKind::Overlay, ExportKind::Meta];

    pub fn label(self) -> &'static str {
        match self {
            ExportKind::Clean => "Clean Audio",
            ExportKind::Overlay => "Audio + Overlay",
            ExportKind::Meta => "YouTube Meta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportState {
    Compiling,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    pub kind: ExportKind,
    pub state: ExportState,
    /// Monotonic per-session sequence; a finish/dismiss scheduled for an
    /// older job is discarded on mismatch.
    pub seq: u64,
}

/// Aggregate state for one upload-to-export cycle. Mutated only through the
/// engine controller; published to readers as whole-record snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSession {
    pub file: Option<SourceFile>,
    pub status: ScanStatus,
    pub progress: u8,
    pub flags: Vec<Flag>,
    pub platform: Platform,
    pub waveform: Vec<u8>,
    pub summary: String,
    pub download_ready: bool,
    pub override_flow: Option<OverrideFlow>,
    pub export: Option<ExportJob>,
    pub export_seq: u64,
    /// Bumped by submit/reset; scheduled actions tagged with an older
    /// generation are silently discarded.
    pub generation: u64,
}

impl AuditSession {
    pub fn new(platform: Platform) -> Self {
        Self {
            file: None,
            status: ScanStatus::Idle,
            progress: 0,
            flags: Vec::new(),
            platform,
            waveform: Vec::new(),
            summary: String::new(),
            download_ready: false,
            override_flow: None,
            export: None,
            export_seq: 0,
            generation: 0,
        }
    }

    pub fn find_flag(&self, id: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.id == id)
    }

    /// Flags still counting toward the risk meter.
    pub fn open_threat_count(&self) -> usize {
        self.flags.iter().filter(|f| f.is_open_threat()).count()
    }

    /// Non-resolved flags of any tier, shown as "active threats".
    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|f| !f.is_resolved()).count()
    }

    pub fn resolved_count(&self) -> usize {
        self.flags.iter().filter(|f| f.is_resolved()).count()
    }

    /// Risk meter percentage: 20 points per open Red/Orange flag, capped.
    pub fn risk_level(&self) -> u8 {
        (self.open_threat_count() as u8).saturating_mul(20).min(100)
    }

    pub fn is_safe(&self) -> bool {
        self.open_threat_count() == 0
    }
}

/// Engine-facing timing, converted from the config sections once at startup.
#[derive(Debug, Clone)]
pub struct EngineTiming {
    pub scan_tick: Duration,
    pub scan_step: u8,
    pub resolve_delay: Duration,
    pub nuke_tick: Duration,
    pub nuke_step: u8,
    pub lockdown_tick: Duration,
    pub lockdown_step: u8,
    pub export_delay: Duration,
    pub toast: Duration,
}

impl EngineTiming {
    /// Steps and periods are floored to 1; a zero-millisecond tick would
    /// panic `tokio::time::interval`, and a zero step would never finish.
    pub fn from_config(
        scan: &crate::infra::config::ScanConfig,
        flow: &crate::infra::config::FlowConfig,
    ) -> Self {
        Self {
            scan_tick: Duration::from_millis(scan.tick_ms.max(1)),
            scan_step: scan.step.max(1),
            resolve_delay: Duration::from_millis(flow.resolve_delay_ms.max(1)),
            nuke_tick: Duration::from_millis(flow.nuke_tick_ms.max(1)),
            nuke_step: flow.nuke_step.max(1),
            lockdown_tick: Duration::from_millis(flow.lockdown_tick_ms.max(1)),
            lockdown_step: flow.lockdown_step.max(1),
            export_delay: Duration::from_millis(flow.export_delay_ms.max(1)),
            toast: Duration::from_millis(flow.toast_ms.max(1)),
        }
    }
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self::from_config(
            &crate::infra::config::ScanConfig::default(),
            &crate::infra::config::FlowConfig::default(),
        )
    }
}

/// Notifications emitted by the engine for observers (CLI progress printer,
/// log lines). Renderers read the session snapshot instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    ScanStarted { file: String },
    ScanProgress { progress: u8 },
    ScanCompleted { flags: usize, risk_level: u8 },
    FlagResolving { id: String },
    FlagResolved { id: String },
    FlagRemoved { id: String },
    LockdownEngaged { resolved: usize },
    ExportStarted { kind: ExportKind },
    ExportReady { kind: ExportKind },
    SessionReset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ─── Platform ───────────────────────────────────────────────

    #[test]
    fn test_platform_parse() {
        assert_eq!(Platform::parse("youtube").unwrap(), Platform::YouTube);
        assert_eq!(Platform::parse("SPOTIFY").unwrap(), Platform::Spotify);
        assert_eq!(Platform::parse("General").unwrap(), Platform::General);
        assert!(Platform::parse("twitch").is_err());
    }

    #[test]
    fn test_platform_cycle_covers_all() {
        let mut p = Platform::YouTube;
        let mut seen = vec![p];
        for _ in 0..2 {
            p = p.next();
            seen.push(p);
        }
        assert_eq!(seen, Platform::ALL.to_vec());
        assert_eq!(p.next(), Platform::YouTube);
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::YouTube.to_string(), "YouTube");
        assert_eq!(Platform::General.to_string(), "General");
    }

    // ─── Severity ───────────────────────────────────────────────

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Blue < Severity::Yellow);
        assert!(Severity::Yellow < Severity::Orange);
        assert!(Severity::Orange < Severity::Red);
    }

    #[test]
    fn test_severity_category_labels() {
        assert_eq!(Severity::Blue.category(), "THE RECEIPT");
        assert_eq!(Severity::Yellow.category(), "THE SPICY TAKE");
        assert_eq!(Severity::Orange.category(), "THE AD-RISK");
        assert_eq!(Severity::Red.category(), "THE KILL-SWITCH");
    }

    #[test]
    fn test_severity_default_fix() {
        assert_eq!(Severity::Red.default_fix(), "Cut Segment");
        assert_eq!(Severity::Orange.default_fix(), "Add Disclaimer");
        assert_eq!(Severity::Yellow.default_fix(), "Add Disclaimer");
        assert_eq!(Severity::Blue.default_fix(), "Add Disclaimer");
    }

    #[test]
    fn test_severity_high_risk() {
        assert!(Severity::Red.is_high_risk());
        assert!(Severity::Orange.is_high_risk());
        assert!(!Severity::Yellow.is_high_risk());
        assert!(!Severity::Blue.is_high_risk());
    }

    // ─── Timestamps ─────────────────────────────────────────────

    #[test]
    fn test_format_timestamp_padding() {
        assert_eq!(format_timestamp(0), "00:00");
        assert_eq!(format_timestamp(65), "01:05");
        assert_eq!(format_timestamp(260), "04:20");
        assert_eq!(format_timestamp(1799), "29:59");
    }

    // ─── Flag ───────────────────────────────────────────────────

    #[test]
    fn test_flag_new_derives_fields() {
        let f = Flag::new(Severity::Red, 260, "quote", "reason");
        assert_eq!(f.timestamp, "04:20");
        assert_eq!(f.category, "THE KILL-SWITCH");
        assert_eq!(f.suggested_fix, "Cut Segment");
        assert_eq!(f.status, FlagStatus::Active);
        assert!(f.overlay.is_none());
        assert!(f.public_in_ledger);
        assert!(!f.id.is_empty());
    }

    #[test]
    fn test_flag_unique_ids() {
        let a = Flag::new(Severity::Blue, 1, "x", "y");
        let b = Flag::new(Severity::Blue, 1, "x", "y");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_flag_open_threat() {
        let mut f = Flag::new(Severity::Orange, 10, "x", "y");
        assert!(f.is_open_threat());
        f.status = FlagStatus::Processing;
        assert!(f.is_open_threat());
        f.status = FlagStatus::Resolved;
        assert!(!f.is_open_threat());

        let calm = Flag::new(Severity::Yellow, 10, "x", "y");
        assert!(!calm.is_open_threat());
    }

    // ─── AuditSession ───────────────────────────────────────────

    #[test]
    fn test_session_new_is_idle() {
        let s = AuditSession::new(Platform::Spotify);
        assert_eq!(s.status, ScanStatus::Idle);
        assert_eq!(s.progress, 0);
        assert!(s.flags.is_empty());
        assert_eq!(s.platform, Platform::Spotify);
        assert!(s.is_safe());
        assert_eq!(s.risk_level(), 0);
        assert_eq!(s.generation, 0);
    }

    #[test]
    fn test_session_risk_level_caps_at_100() {
        let mut s = AuditSession::new(Platform::General);
        for i in 0..7 {
            s.flags.push(Flag::new(Severity::Red, i, "x", "y"));
        }
        assert_eq!(s.open_threat_count(), 7);
        assert_eq!(s.risk_level(), 100);
    }

    #[test]
    fn test_session_risk_level_counts_only_open_high_risk() {
        let mut s = AuditSession::new(Platform::General);
        s.flags.push(Flag::new(Severity::Red, 1, "a", "r"));
        s.flags.push(Flag::new(Severity::Blue, 2, "b", "r"));
        let mut resolved = Flag::new(Severity::Orange, 3, "c", "r");
        resolved.status = FlagStatus::Resolved;
        s.flags.push(resolved);

        assert_eq!(s.risk_level(), 20);
        assert!(!s.is_safe());
        assert_eq!(s.active_count(), 2);
        assert_eq!(s.resolved_count(), 1);
    }

    #[test]
    fn test_session_find_flag() {
        let mut s = AuditSession::new(Platform::General);
        let f = Flag::new(Severity::Yellow, 5, "x", "y");
        let id = f.id.clone();
        s.flags.push(f);
        assert!(s.find_flag(&id).is_some());
        assert!(s.find_flag("missing").is_none());
    }

    // ─── ExportKind ─────────────────────────────────────────────

    #[test]
    fn test_export_labels() {
        assert_eq!(ExportKind::Clean.label(), "Clean Audio");
        assert_eq!(ExportKind::Overlay.label(), "Audio + Overlay");
        assert_eq!(ExportKind::Meta.label(), "YouTube Meta");
    }

    // ─── EngineTiming ───────────────────────────────────────────

    #[test]
    fn test_timing_defaults() {
        let t = EngineTiming::default();
        assert_eq!(t.scan_tick, Duration::from_millis(30));
        assert_eq!(t.scan_step, 2);
        assert_eq!(t.resolve_delay, Duration::from_millis(2000));
        assert_eq!(t.toast, Duration::from_millis(4000));
    }

    #[test]
    fn test_timing_step_floor() {
        let scan = crate::infra::config::ScanConfig { tick_ms: 5, step: 0 };
        let flow = crate::infra::config::FlowConfig::default();
        let t = EngineTiming::from_config(&scan, &flow);
        assert_eq!(t.scan_step, 1);
    }

    #[test]
    fn test_timing_zero_ms_floored() {
        let scan = crate::infra::config::ScanConfig { tick_ms: 0, step: 2 };
        let flow = crate::infra::config::FlowConfig {
            resolve_delay_ms: 0,
            nuke_tick_ms: 0,
            nuke_step: 1,
            lockdown_tick_ms: 0,
            lockdown_step: 2,
            export_delay_ms: 0,
            toast_ms: 0,
        };
        let t = EngineTiming::from_config(&scan, &flow);
        assert_eq!(t.scan_tick, Duration::from_millis(1));
        assert_eq!(t.resolve_delay, Duration::from_millis(1));
        assert_eq!(t.nuke_tick, Duration::from_millis(1));
        assert_eq!(t.lockdown_tick, Duration::from_millis(1));
        assert_eq!(t.export_delay, Duration::from_millis(1));
        assert_eq!(t.toast, Duration::from_millis(1));
    }

    // ─── Serialization ──────────────────────────────────────────

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Red).unwrap();
        assert_eq!(json, "\"red\"");
    }

    #[test]
    fn test_session_json_roundtrip() {
        let mut s = AuditSession::new(Platform::YouTube);
        s.flags.push(Flag::new(Severity::Orange, 42, "quote", "why"));
        s.status = ScanStatus::Complete;
        s.progress = 100;
        let json = serde_json::to_string(&s).unwrap();
        let back: AuditSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}

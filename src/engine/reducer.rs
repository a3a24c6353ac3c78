// src/engine/reducer.rs — Pure session transition function
//
// Every mutation of an AuditSession goes through `reduce`. The controller is
// the only caller: it hands in the current record and gets back a replacement
// record plus the events to emit and the follow-up work to schedule. Guards
// are total — an invalid call returns the input unchanged, never an error.

use rand::Rng;

use super::generator;
use super::types::{
    AuditEvent, AuditSession, EngineTiming, ExportJob, ExportKind, ExportState, FlagStatus,
    OverlayStyle, OverrideFlow, OverrideKind, OverrideStage, Platform, ScanStatus, Severity,
    SourceFile, PLACEHOLDER_FILE,
};

/// Fix label stamped on flags the lockdown flow force-resolves.
pub const LOCKDOWN_FIX: &str = "SILENCED (AUTO)";

/// Everything that can happen to a session. User-facing operations come from
/// the controller's public methods; `*Tick` / `Finish*` variants arrive from
/// scheduled tasks and carry the tag they were created under.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SubmitFile { name: Option<String> },
    ScanTick { generation: u64 },
    SetPlatform(Platform),
    ResolveFlag { id: String },
    FinishResolve { id: String, generation: u64 },
    RequestRemove { id: String },
    RequestLockdown,
    ConfirmOverride,
    CancelOverride,
    DismissOverride,
    OverrideTick { generation: u64 },
    SetOverlay { id: String, style: OverlayStyle },
    ToggleLedger { id: String },
    StartExport { kind: ExportKind },
    FinishExport { seq: u64, generation: u64 },
    DismissExport { seq: u64 },
    Reset,
}

/// Work the controller must schedule after applying an outcome. Delays and
/// periods come from `EngineTiming`; the generation tag is read off the new
/// session record.
#[derive(Debug, Clone, PartialEq)]
pub enum Followup {
    /// Abort every scheduled task. Emitted before a new scan starts and on
    /// reset, so no orphaned tick outlives the session it was made for.
    CancelAll,
    StartScanTicker,
    StopScanTicker,
    StartOverrideTicker { kind: OverrideKind },
    StopOverrideTicker,
    ResolveFinishAfterDelay { id: String },
    ExportFinishAfterDelay { seq: u64 },
    ExportDismissAfterDelay { seq: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub session: AuditSession,
    pub events: Vec<AuditEvent>,
    pub schedule: Vec<Followup>,
}

impl Outcome {
    /// Guard rejection: hand the record back untouched.
    fn unchanged(session: &AuditSession) -> Self {
        Self {
            session: session.clone(),
            events: Vec::new(),
            schedule: Vec::new(),
        }
    }
}

pub fn reduce<R: Rng>(
    session: &AuditSession,
    action: &Action,
    rng: &mut R,
    timing: &EngineTiming,
) -> Outcome {
    match action {
        Action::SubmitFile { name } => submit_file(session, name.as_deref(), rng),
        Action::ScanTick { generation } => scan_tick(session, *generation, rng, timing),
        Action::SetPlatform(platform) => set_platform(session, *platform),
        Action::ResolveFlag { id } => resolve_flag(session, id),
        Action::FinishResolve { id, generation } => finish_resolve(session, id, *generation),
        Action::RequestRemove { id } => request_remove(session, id),
        Action::RequestLockdown => request_lockdown(session),
        Action::ConfirmOverride => confirm_override(session),
        Action::CancelOverride => cancel_override(session),
        Action::DismissOverride => dismiss_override(session),
        Action::OverrideTick { generation } => override_tick(session, *generation, timing),
        Action::SetOverlay { id, style } => set_overlay(session, id, *style),
        Action::ToggleLedger { id } => toggle_ledger(session, id),
        Action::StartExport { kind } => start_export(session, *kind),
        Action::FinishExport { seq, generation } => finish_export(session, *seq, *generation),
        Action::DismissExport { seq } => dismiss_export(session, *seq),
        Action::Reset => reset(session),
    }
}

fn submit_file<R: Rng>(session: &AuditSession, name: Option<&str>, rng: &mut R) -> Outcome {
    if session.status == ScanStatus::Analyzing {
        return Outcome::unchanged(session);
    }

    let file_name = name.unwrap_or(PLACEHOLDER_FILE).to_string();
    let mut next = session.clone();
    next.file = Some(SourceFile {
        name: file_name.clone(),
    });
    next.status = ScanStatus::Analyzing;
    next.progress = 0;
    next.flags.clear();
    next.summary.clear();
    next.waveform = generator::generate_waveform(rng);
    next.download_ready = false;
    next.override_flow = None;
    next.export = None;
    next.generation += 1;

    Outcome {
        session: next,
        events: vec![AuditEvent::ScanStarted { file: file_name }],
        schedule: vec![Followup::CancelAll, Followup::StartScanTicker],
    }
}

fn scan_tick<R: Rng>(
    session: &AuditSession,
    generation: u64,
    rng: &mut R,
    timing: &EngineTiming,
) -> Outcome {
    // A stale tick must not emit StopScanTicker: the ticker slot may already
    // hold a newer scan's task.
    if generation != session.generation || session.status != ScanStatus::Analyzing {
        return Outcome::unchanged(session);
    }

    let mut next = session.clone();
    next.progress = session.progress.saturating_add(timing.scan_step).min(100);

    let mut events = vec![AuditEvent::ScanProgress {
        progress: next.progress,
    }];
    let mut schedule = Vec::new();

    if next.progress == 100 {
        next.flags = generator::generate_flags(next.platform, rng);
        next.summary = generator::smart_summary(&next.flags);
        next.status = ScanStatus::Complete;
        events.push(AuditEvent::ScanCompleted {
            flags: next.flags.len(),
            risk_level: next.risk_level(),
        });
        schedule.push(Followup::StopScanTicker);
    }

    Outcome {
        session: next,
        events,
        schedule,
    }
}

fn set_platform(session: &AuditSession, platform: Platform) -> Outcome {
    // Locked mid-scan; never regenerates an existing flag set.
    if session.status == ScanStatus::Analyzing {
        return Outcome::unchanged(session);
    }
    let mut next = session.clone();
    next.platform = platform;
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn resolve_flag(session: &AuditSession, id: &str) -> Outcome {
    match session.find_flag(id) {
        Some(flag) if flag.status == FlagStatus::Active => {}
        _ => return Outcome::unchanged(session),
    }

    let mut next = session.clone();
    if let Some(flag) = next.flags.iter_mut().find(|f| f.id == id) {
        flag.status = FlagStatus::Processing;
    }
    Outcome {
        session: next,
        events: vec![AuditEvent::FlagResolving { id: id.to_string() }],
        schedule: vec![Followup::ResolveFinishAfterDelay { id: id.to_string() }],
    }
}

fn finish_resolve(session: &AuditSession, id: &str, generation: u64) -> Outcome {
    if generation != session.generation {
        return Outcome::unchanged(session);
    }
    match session.find_flag(id) {
        Some(flag) if flag.status == FlagStatus::Processing => {}
        _ => return Outcome::unchanged(session),
    }

    let mut next = session.clone();
    if let Some(flag) = next.flags.iter_mut().find(|f| f.id == id) {
        flag.status = FlagStatus::Resolved;
    }
    next.download_ready = true;
    Outcome {
        session: next,
        events: vec![AuditEvent::FlagResolved { id: id.to_string() }],
        schedule: Vec::new(),
    }
}

fn request_remove(session: &AuditSession, id: &str) -> Outcome {
    if session.status != ScanStatus::Complete || session.override_flow.is_some() {
        return Outcome::unchanged(session);
    }
    // The nuke button only exists on Red/Orange cards.
    match session.find_flag(id) {
        Some(flag) if flag.severity.is_high_risk() => {}
        _ => return Outcome::unchanged(session),
    }

    let mut next = session.clone();
    next.override_flow = Some(OverrideFlow {
        kind: OverrideKind::Nuke {
            flag_id: id.to_string(),
        },
        stage: OverrideStage::Confirm,
    });
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn request_lockdown(session: &AuditSession) -> Outcome {
    if session.status != ScanStatus::Complete
        || session.override_flow.is_some()
        || session.is_safe()
    {
        return Outcome::unchanged(session);
    }

    let mut next = session.clone();
    next.override_flow = Some(OverrideFlow {
        kind: OverrideKind::Lockdown,
        stage: OverrideStage::Confirm,
    });
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn confirm_override(session: &AuditSession) -> Outcome {
    let kind = match &session.override_flow {
        Some(flow) if flow.stage == OverrideStage::Confirm => flow.kind.clone(),
        _ => return Outcome::unchanged(session),
    };

    let mut next = session.clone();
    next.override_flow = Some(OverrideFlow {
        kind: kind.clone(),
        stage: OverrideStage::Processing { progress: 0 },
    });
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: vec![Followup::StartOverrideTicker { kind }],
    }
}

fn cancel_override(session: &AuditSession) -> Outcome {
    match &session.override_flow {
        Some(flow) if flow.stage == OverrideStage::Confirm => {}
        _ => return Outcome::unchanged(session),
    }
    let mut next = session.clone();
    next.override_flow = None;
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn dismiss_override(session: &AuditSession) -> Outcome {
    match &session.override_flow {
        Some(flow) if flow.stage == OverrideStage::Done => {}
        _ => return Outcome::unchanged(session),
    }
    let mut next = session.clone();
    next.override_flow = None;
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn override_tick(session: &AuditSession, generation: u64, timing: &EngineTiming) -> Outcome {
    if generation != session.generation {
        return Outcome::unchanged(session);
    }
    let (kind, progress) = match &session.override_flow {
        Some(OverrideFlow {
            kind,
            stage: OverrideStage::Processing { progress },
        }) => (kind.clone(), *progress),
        _ => return Outcome::unchanged(session),
    };

    let step = match kind {
        OverrideKind::Nuke { .. } => timing.nuke_step,
        OverrideKind::Lockdown => timing.lockdown_step,
    };
    let advanced = progress.saturating_add(step).min(100);

    let mut next = session.clone();
    if advanced < 100 {
        next.override_flow = Some(OverrideFlow {
            kind,
            stage: OverrideStage::Processing { progress: advanced },
        });
        return Outcome {
            session: next,
            events: Vec::new(),
            schedule: Vec::new(),
        };
    }

    // Flow hit 100: apply the effect exactly once, park the modal at Done.
    let mut events = Vec::new();
    match &kind {
        OverrideKind::Nuke { flag_id } => {
            let before = next.flags.len();
            next.flags.retain(|f| f.id != *flag_id);
            if next.flags.len() < before {
                events.push(AuditEvent::FlagRemoved {
                    id: flag_id.clone(),
                });
            }
        }
        OverrideKind::Lockdown => {
            let mut resolved = 0usize;
            for flag in next.flags.iter_mut().filter(|f| f.is_open_threat()) {
                flag.status = FlagStatus::Resolved;
                flag.suggested_fix = LOCKDOWN_FIX.to_string();
                resolved += 1;
            }
            events.push(AuditEvent::LockdownEngaged { resolved });
        }
    }
    next.download_ready = true;
    next.override_flow = Some(OverrideFlow {
        kind,
        stage: OverrideStage::Done,
    });

    Outcome {
        session: next,
        events,
        schedule: vec![Followup::StopOverrideTicker],
    }
}

fn set_overlay(session: &AuditSession, id: &str, style: OverlayStyle) -> Outcome {
    if session.status != ScanStatus::Complete {
        return Outcome::unchanged(session);
    }
    // Overlays only make sense on the citation/disclaimer tiers.
    match session.find_flag(id) {
        Some(flag) if matches!(flag.severity, Severity::Blue | Severity::Yellow) => {}
        _ => return Outcome::unchanged(session),
    }

    let mut next = session.clone();
    if let Some(flag) = next.flags.iter_mut().find(|f| f.id == id) {
        flag.overlay = Some(style);
    }
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn toggle_ledger(session: &AuditSession, id: &str) -> Outcome {
    if session.find_flag(id).is_none() {
        return Outcome::unchanged(session);
    }
    let mut next = session.clone();
    if let Some(flag) = next.flags.iter_mut().find(|f| f.id == id) {
        flag.public_in_ledger = !flag.public_in_ledger;
    }
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn start_export(session: &AuditSession, kind: ExportKind) -> Outcome {
    if session.status != ScanStatus::Complete || !session.download_ready {
        return Outcome::unchanged(session);
    }
    if matches!(
        session.export,
        Some(ExportJob {
            state: ExportState::Compiling,
            ..
        })
    ) {
        return Outcome::unchanged(session);
    }

    let mut next = session.clone();
    next.export_seq += 1;
    let seq = next.export_seq;
    next.export = Some(ExportJob {
        kind,
        state: ExportState::Compiling,
        seq,
    });
    Outcome {
        session: next,
        events: vec![AuditEvent::ExportStarted { kind }],
        schedule: vec![Followup::ExportFinishAfterDelay { seq }],
    }
}

fn finish_export(session: &AuditSession, seq: u64, generation: u64) -> Outcome {
    if generation != session.generation {
        return Outcome::unchanged(session);
    }
    let kind = match &session.export {
        Some(job) if job.seq == seq && job.state == ExportState::Compiling => job.kind,
        _ => return Outcome::unchanged(session),
    };

    let mut next = session.clone();
    next.export = Some(ExportJob {
        kind,
        state: ExportState::Ready,
        seq,
    });
    Outcome {
        session: next,
        events: vec![AuditEvent::ExportReady { kind }],
        schedule: vec![Followup::ExportDismissAfterDelay { seq }],
    }
}

fn dismiss_export(session: &AuditSession, seq: u64) -> Outcome {
    match &session.export {
        Some(job) if job.seq == seq => {}
        _ => return Outcome::unchanged(session),
    }
    let mut next = session.clone();
    next.export = None;
    Outcome {
        session: next,
        events: Vec::new(),
        schedule: Vec::new(),
    }
}

fn reset(session: &AuditSession) -> Outcome {
    let mut next = session.clone();
    next.file = None;
    next.status = ScanStatus::Idle;
    next.progress = 0;
    next.flags.clear();
    next.waveform.clear();
    next.summary.clear();
    next.download_ready = false;
    next.override_flow = None;
    next.export = None;
    next.generation += 1;
    // platform survives reset

    Outcome {
        session: next,
        events: vec![AuditEvent::SessionReset],
        schedule: vec![Followup::CancelAll],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Flag;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn timing() -> EngineTiming {
        EngineTiming::default()
    }

    fn apply(session: &AuditSession, action: Action) -> Outcome {
        reduce(session, &action, &mut rng(), &timing())
    }

    /// Run a session through submit + ticks until the scan completes.
    fn completed_session() -> AuditSession {
        let mut session = AuditSession::new(Platform::General);
        session = apply(&session, Action::SubmitFile { name: None }).session;
        let generation = session.generation;
        while session.status == ScanStatus::Analyzing {
            session = apply(&session, Action::ScanTick { generation }).session;
        }
        session
    }

    /// A complete session with a hand-built flag set, for deterministic
    /// mutation tests.
    fn session_with_flags(flags: Vec<Flag>) -> AuditSession {
        let mut session = completed_session();
        session.flags = flags;
        session.flags.sort_by_key(|f| f.seconds);
        session
    }

    // ─── Submit / scan ──────────────────────────────────────────

    #[test]
    fn test_submit_from_idle() {
        let session = AuditSession::new(Platform::YouTube);
        let out = apply(&session, Action::SubmitFile { name: None });

        assert_eq!(out.session.status, ScanStatus::Analyzing);
        assert_eq!(out.session.progress, 0);
        assert_eq!(out.session.file.as_ref().unwrap().name, PLACEHOLDER_FILE);
        assert_eq!(out.session.generation, session.generation + 1);
        assert_eq!(out.session.waveform.len(), generator::WAVEFORM_BARS);
        assert_eq!(
            out.schedule,
            vec![Followup::CancelAll, Followup::StartScanTicker]
        );
        assert_eq!(
            out.events,
            vec![AuditEvent::ScanStarted {
                file: PLACEHOLDER_FILE.into()
            }]
        );
    }

    #[test]
    fn test_submit_named_file() {
        let session = AuditSession::new(Platform::YouTube);
        let out = apply(
            &session,
            Action::SubmitFile {
                name: Some("ep42.mp3".into()),
            },
        );
        assert_eq!(out.session.file.unwrap().name, "ep42.mp3");
    }

    #[test]
    fn test_submit_rejected_mid_scan() {
        let mut session = AuditSession::new(Platform::YouTube);
        session = apply(&session, Action::SubmitFile { name: None }).session;
        let out = apply(
            &session,
            Action::SubmitFile {
                name: Some("other.mp3".into()),
            },
        );
        assert_eq!(out.session, session);
        assert!(out.events.is_empty());
        assert!(out.schedule.is_empty());
    }

    #[test]
    fn test_resubmit_after_complete_clears_flags() {
        let session = completed_session();
        assert!(!session.flags.is_empty());
        let out = apply(&session, Action::SubmitFile { name: None });
        assert!(out.session.flags.is_empty());
        assert_eq!(out.session.status, ScanStatus::Analyzing);
        assert!(!out.session.download_ready);
    }

    #[test]
    fn test_scan_tick_advances_and_completes() {
        let mut session = AuditSession::new(Platform::General);
        session = apply(&session, Action::SubmitFile { name: None }).session;
        let generation = session.generation;

        let mut last = 0u8;
        let mut ticks = 0usize;
        while session.status == ScanStatus::Analyzing {
            let out = apply(&session, Action::ScanTick { generation });
            session = out.session;
            assert!(session.progress > last || session.progress == 100);
            last = session.progress;
            ticks += 1;
            assert!(ticks <= 100, "scan never completed");
        }

        assert_eq!(session.progress, 100);
        assert_eq!(session.status, ScanStatus::Complete);
        assert!(!session.flags.is_empty());
        assert!(!session.summary.is_empty());
    }

    #[test]
    fn test_scan_completion_emits_stop() {
        let mut session = AuditSession::new(Platform::General);
        session = apply(&session, Action::SubmitFile { name: None }).session;
        session.progress = 98;
        let out = apply(
            &session,
            Action::ScanTick {
                generation: session.generation,
            },
        );
        assert_eq!(out.session.status, ScanStatus::Complete);
        assert_eq!(out.schedule, vec![Followup::StopScanTicker]);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, AuditEvent::ScanCompleted { .. })));
    }

    #[test]
    fn test_stale_scan_tick_discarded() {
        let mut session = AuditSession::new(Platform::General);
        session = apply(&session, Action::SubmitFile { name: None }).session;
        let stale = session.generation - 1;
        let out = apply(&session, Action::ScanTick { generation: stale });
        assert_eq!(out.session, session);
        // Crucially: no StopScanTicker that could kill the live ticker.
        assert!(out.schedule.is_empty());
    }

    // ─── Platform ───────────────────────────────────────────────

    #[test]
    fn test_set_platform_locked_mid_scan() {
        let mut session = AuditSession::new(Platform::YouTube);
        session = apply(&session, Action::SubmitFile { name: None }).session;
        let out = apply(&session, Action::SetPlatform(Platform::Spotify));
        assert_eq!(out.session.platform, Platform::YouTube);
    }

    #[test]
    fn test_set_platform_keeps_flags() {
        let session = completed_session();
        let flags = session.flags.clone();
        let out = apply(&session, Action::SetPlatform(Platform::Spotify));
        assert_eq!(out.session.platform, Platform::Spotify);
        assert_eq!(out.session.flags, flags);
    }

    // ─── Resolve ────────────────────────────────────────────────

    #[test]
    fn test_resolve_then_finish() {
        let session = session_with_flags(vec![Flag::new(Severity::Red, 60, "x", "y")]);
        let id = session.flags[0].id.clone();

        let out = apply(&session, Action::ResolveFlag { id: id.clone() });
        assert_eq!(out.session.flags[0].status, FlagStatus::Processing);
        assert_eq!(
            out.schedule,
            vec![Followup::ResolveFinishAfterDelay { id: id.clone() }]
        );
        // Still counts as an open threat until resolution lands.
        assert!(!out.session.is_safe());

        let done = apply(
            &out.session,
            Action::FinishResolve {
                id: id.clone(),
                generation: out.session.generation,
            },
        );
        assert_eq!(done.session.flags[0].status, FlagStatus::Resolved);
        assert!(done.session.download_ready);
        assert!(done.session.is_safe());
        assert_eq!(done.events, vec![AuditEvent::FlagResolved { id }]);
    }

    #[test]
    fn test_resolve_idempotent() {
        let session = session_with_flags(vec![Flag::new(Severity::Orange, 60, "x", "y")]);
        let id = session.flags[0].id.clone();

        let first = apply(&session, Action::ResolveFlag { id: id.clone() });
        let second = apply(&first.session, Action::ResolveFlag { id: id.clone() });
        assert_eq!(second.session, first.session);
        assert!(second.schedule.is_empty());
    }

    #[test]
    fn test_resolve_unknown_id_noop() {
        let session = completed_session();
        let out = apply(
            &session,
            Action::ResolveFlag {
                id: "missing".into(),
            },
        );
        assert_eq!(out.session, session);
    }

    #[test]
    fn test_stale_finish_resolve_discarded() {
        let session = session_with_flags(vec![Flag::new(Severity::Red, 60, "x", "y")]);
        let id = session.flags[0].id.clone();
        let out = apply(&session, Action::ResolveFlag { id: id.clone() });
        let stale = apply(
            &out.session,
            Action::FinishResolve {
                id,
                generation: out.session.generation + 1,
            },
        );
        assert_eq!(stale.session, out.session);
    }

    // ─── Nuke flow ──────────────────────────────────────────────

    fn run_override_to_done(mut session: AuditSession) -> AuditSession {
        session = apply(&session, Action::ConfirmOverride).session;
        let generation = session.generation;
        let mut ticks = 0usize;
        loop {
            let out = apply(&session, Action::OverrideTick { generation });
            session = out.session;
            if matches!(
                session.override_flow,
                Some(OverrideFlow {
                    stage: OverrideStage::Done,
                    ..
                })
            ) {
                return session;
            }
            ticks += 1;
            assert!(ticks <= 200, "override flow never finished");
        }
    }

    #[test]
    fn test_nuke_removes_exactly_one() {
        let red = Flag::new(Severity::Red, 60, "bad", "why");
        let blue = Flag::new(Severity::Blue, 120, "meh", "why");
        let session = session_with_flags(vec![red.clone(), blue]);

        let out = apply(&session, Action::RequestRemove { id: red.id.clone() });
        assert_eq!(
            out.session.override_flow,
            Some(OverrideFlow {
                kind: OverrideKind::Nuke {
                    flag_id: red.id.clone()
                },
                stage: OverrideStage::Confirm,
            })
        );

        let done = run_override_to_done(out.session);
        assert_eq!(done.flags.len(), 1);
        assert!(done.find_flag(&red.id).is_none());
        assert!(done.download_ready);
        assert!(done.is_safe());
    }

    #[test]
    fn test_nuke_rejected_for_low_tiers() {
        let blue = Flag::new(Severity::Blue, 60, "meh", "why");
        let session = session_with_flags(vec![blue.clone()]);
        let out = apply(&session, Action::RequestRemove { id: blue.id });
        assert!(out.session.override_flow.is_none());
    }

    #[test]
    fn test_nuke_rejected_while_flow_in_flight() {
        let a = Flag::new(Severity::Red, 60, "a", "r");
        let b = Flag::new(Severity::Red, 90, "b", "r");
        let session = session_with_flags(vec![a.clone(), b.clone()]);
        let first = apply(&session, Action::RequestRemove { id: a.id });
        let second = apply(&first.session, Action::RequestRemove { id: b.id });
        assert_eq!(second.session, first.session);
    }

    #[test]
    fn test_cancel_override_at_confirm() {
        let red = Flag::new(Severity::Red, 60, "bad", "why");
        let session = session_with_flags(vec![red.clone()]);
        let out = apply(&session, Action::RequestRemove { id: red.id.clone() });
        let cancelled = apply(&out.session, Action::CancelOverride);
        assert!(cancelled.session.override_flow.is_none());
        // Nothing was removed.
        assert!(cancelled.session.find_flag(&red.id).is_some());
    }

    #[test]
    fn test_dismiss_override_only_at_done() {
        let red = Flag::new(Severity::Red, 60, "bad", "why");
        let session = session_with_flags(vec![red.clone()]);
        let confirm = apply(&session, Action::RequestRemove { id: red.id }).session;

        // Dismiss at Confirm is a no-op; Cancel is the exit there.
        let ignored = apply(&confirm, Action::DismissOverride);
        assert_eq!(ignored.session, confirm);

        let done = run_override_to_done(confirm);
        let dismissed = apply(&done, Action::DismissOverride);
        assert!(dismissed.session.override_flow.is_none());
    }

    #[test]
    fn test_override_progress_monotone() {
        let red = Flag::new(Severity::Red, 60, "bad", "why");
        let session = session_with_flags(vec![red.clone()]);
        let mut s = apply(&session, Action::RequestRemove { id: red.id }).session;
        s = apply(&s, Action::ConfirmOverride).session;
        let generation = s.generation;

        let mut last = 0u8;
        loop {
            s = apply(&s, Action::OverrideTick { generation }).session;
            match &s.override_flow {
                Some(OverrideFlow {
                    stage: OverrideStage::Processing { progress },
                    ..
                }) => {
                    assert!(*progress > last);
                    last = *progress;
                }
                Some(OverrideFlow {
                    stage: OverrideStage::Done,
                    ..
                }) => break,
                other => panic!("unexpected flow state: {other:?}"),
            }
        }
    }

    #[test]
    fn test_stale_override_tick_discarded() {
        let red = Flag::new(Severity::Red, 60, "bad", "why");
        let session = session_with_flags(vec![red.clone()]);
        let mut s = apply(&session, Action::RequestRemove { id: red.id }).session;
        s = apply(&s, Action::ConfirmOverride).session;
        let out = apply(
            &s,
            Action::OverrideTick {
                generation: s.generation + 1,
            },
        );
        assert_eq!(out.session, s);
    }

    // ─── Lockdown ───────────────────────────────────────────────

    #[test]
    fn test_lockdown_resolves_open_threats_only() {
        // Scenario: 3 open Red/Orange, 2 Blue/Yellow, 1 already-resolved Red.
        let mut already = Flag::new(Severity::Red, 10, "done", "r");
        already.status = FlagStatus::Resolved;
        let fix_before = already.suggested_fix.clone();

        let session = session_with_flags(vec![
            Flag::new(Severity::Red, 60, "a", "r"),
            Flag::new(Severity::Orange, 120, "b", "r"),
            Flag::new(Severity::Red, 180, "c", "r"),
            Flag::new(Severity::Blue, 240, "d", "r"),
            Flag::new(Severity::Yellow, 300, "e", "r"),
            already,
        ]);

        let out = apply(&session, Action::RequestLockdown);
        assert_eq!(
            out.session.override_flow.as_ref().map(|f| f.kind.clone()),
            Some(OverrideKind::Lockdown)
        );

        let done = run_override_to_done(out.session);
        assert!(done.is_safe());
        assert_eq!(done.flags.len(), 6);
        for flag in &done.flags {
            match (flag.severity.is_high_risk(), flag.transcript.as_str()) {
                (true, "done") => {
                    // Already resolved before lockdown: fix label untouched.
                    assert_eq!(flag.suggested_fix, fix_before);
                }
                (true, _) => {
                    assert_eq!(flag.status, FlagStatus::Resolved);
                    assert_eq!(flag.suggested_fix, LOCKDOWN_FIX);
                }
                (false, _) => {
                    assert_eq!(flag.status, FlagStatus::Active);
                    assert_ne!(flag.suggested_fix, LOCKDOWN_FIX);
                }
            }
        }
        assert!(done.download_ready);
    }

    #[test]
    fn test_lockdown_rejected_when_safe() {
        let session = session_with_flags(vec![Flag::new(Severity::Blue, 60, "x", "y")]);
        assert!(session.is_safe());
        let out = apply(&session, Action::RequestLockdown);
        assert!(out.session.override_flow.is_none());
    }

    // ─── Overlay / ledger ───────────────────────────────────────

    #[test]
    fn test_overlay_on_low_tiers_only() {
        let blue = Flag::new(Severity::Blue, 60, "a", "r");
        let red = Flag::new(Severity::Red, 120, "b", "r");
        let session = session_with_flags(vec![blue.clone(), red.clone()]);

        let ok = apply(
            &session,
            Action::SetOverlay {
                id: blue.id.clone(),
                style: OverlayStyle::Bold,
            },
        );
        assert_eq!(
            ok.session.find_flag(&blue.id).unwrap().overlay,
            Some(OverlayStyle::Bold)
        );

        let rejected = apply(
            &ok.session,
            Action::SetOverlay {
                id: red.id.clone(),
                style: OverlayStyle::Minimal,
            },
        );
        assert!(rejected.session.find_flag(&red.id).unwrap().overlay.is_none());
    }

    #[test]
    fn test_toggle_ledger_roundtrip() {
        let flag = Flag::new(Severity::Yellow, 60, "a", "r");
        let session = session_with_flags(vec![flag.clone()]);

        let hidden = apply(&session, Action::ToggleLedger { id: flag.id.clone() });
        assert!(!hidden.session.find_flag(&flag.id).unwrap().public_in_ledger);

        let shown = apply(&hidden.session, Action::ToggleLedger { id: flag.id.clone() });
        assert!(shown.session.find_flag(&flag.id).unwrap().public_in_ledger);
    }

    // ─── Export ─────────────────────────────────────────────────

    fn downloadable_session() -> AuditSession {
        let mut session = session_with_flags(vec![Flag::new(Severity::Blue, 60, "a", "r")]);
        session.download_ready = true;
        session
    }

    #[test]
    fn test_export_lifecycle() {
        let session = downloadable_session();

        let started = apply(
            &session,
            Action::StartExport {
                kind: ExportKind::Clean,
            },
        );
        let job = started.session.export.clone().unwrap();
        assert_eq!(job.state, ExportState::Compiling);
        assert_eq!(
            started.schedule,
            vec![Followup::ExportFinishAfterDelay { seq: job.seq }]
        );

        let ready = apply(
            &started.session,
            Action::FinishExport {
                seq: job.seq,
                generation: started.session.generation,
            },
        );
        assert_eq!(
            ready.session.export.as_ref().unwrap().state,
            ExportState::Ready
        );
        assert_eq!(
            ready.schedule,
            vec![Followup::ExportDismissAfterDelay { seq: job.seq }]
        );

        let cleared = apply(&ready.session, Action::DismissExport { seq: job.seq });
        assert!(cleared.session.export.is_none());
    }

    #[test]
    fn test_export_requires_download_ready() {
        let session = session_with_flags(vec![Flag::new(Severity::Blue, 60, "a", "r")]);
        assert!(!session.download_ready);
        let out = apply(
            &session,
            Action::StartExport {
                kind: ExportKind::Meta,
            },
        );
        assert!(out.session.export.is_none());
    }

    #[test]
    fn test_export_rejected_while_compiling() {
        let session = downloadable_session();
        let first = apply(
            &session,
            Action::StartExport {
                kind: ExportKind::Clean,
            },
        );
        let second = apply(
            &first.session,
            Action::StartExport {
                kind: ExportKind::Meta,
            },
        );
        assert_eq!(second.session, first.session);
    }

    #[test]
    fn test_stale_export_dismiss_keeps_newer_job() {
        let session = downloadable_session();
        let first = apply(
            &session,
            Action::StartExport {
                kind: ExportKind::Clean,
            },
        )
        .session;
        let first_seq = first.export.as_ref().unwrap().seq;

        // First job reaches Ready, then a second job supersedes it.
        let ready = apply(
            &first,
            Action::FinishExport {
                seq: first_seq,
                generation: first.generation,
            },
        )
        .session;
        let dismissed = apply(&ready, Action::DismissExport { seq: first_seq }).session;
        let second = apply(
            &dismissed,
            Action::StartExport {
                kind: ExportKind::Meta,
            },
        )
        .session;

        // The old job's auto-dismiss fires late: seq mismatch, no effect.
        let out = apply(&second, Action::DismissExport { seq: first_seq });
        assert_eq!(out.session.export, second.export);
    }

    // ─── Reset ──────────────────────────────────────────────────

    #[test]
    fn test_reset_clears_everything_but_platform() {
        let mut session = downloadable_session();
        session.platform = Platform::Spotify;
        let generation = session.generation;

        let out = apply(&session, Action::Reset);
        assert_eq!(out.session.status, ScanStatus::Idle);
        assert_eq!(out.session.progress, 0);
        assert!(out.session.file.is_none());
        assert!(out.session.flags.is_empty());
        assert!(out.session.waveform.is_empty());
        assert!(out.session.summary.is_empty());
        assert!(!out.session.download_ready);
        assert!(out.session.export.is_none());
        assert_eq!(out.session.platform, Platform::Spotify);
        assert_eq!(out.session.generation, generation + 1);
        assert_eq!(out.schedule, vec![Followup::CancelAll]);
    }

    #[test]
    fn test_reset_mid_scan_rejects_stale_ticks() {
        let mut session = AuditSession::new(Platform::General);
        session = apply(&session, Action::SubmitFile { name: None }).session;
        let old_generation = session.generation;

        // Tick to 40, then reset.
        for _ in 0..20 {
            session = apply(
                &session,
                Action::ScanTick {
                    generation: old_generation,
                },
            )
            .session;
        }
        assert_eq!(session.progress, 40);
        session = apply(&session, Action::Reset).session;
        assert_eq!(session.status, ScanStatus::Idle);
        assert_eq!(session.progress, 0);

        // A tick from the superseded scan changes nothing.
        let out = apply(
            &session,
            Action::ScanTick {
                generation: old_generation,
            },
        );
        assert_eq!(out.session, session);
    }

    // ─── Derived-state invariant ────────────────────────────────

    #[test]
    fn test_is_safe_tracks_open_threats_through_mutations() {
        let red = Flag::new(Severity::Red, 60, "a", "r");
        let orange = Flag::new(Severity::Orange, 120, "b", "r");
        let mut session = session_with_flags(vec![red.clone(), orange.clone()]);
        assert!(!session.is_safe());
        assert_eq!(session.risk_level(), 40);

        // Nuke the red flag.
        session = apply(&session, Action::RequestRemove { id: red.id }).session;
        session = run_override_to_done(session);
        assert!(!session.is_safe());
        assert_eq!(session.risk_level(), 20);

        // Resolve the orange flag.
        session = apply(&session, Action::DismissOverride).session;
        session = apply(
            &session,
            Action::ResolveFlag {
                id: orange.id.clone(),
            },
        )
        .session;
        let generation = session.generation;
        session = apply(
            &session,
            Action::FinishResolve {
                id: orange.id,
                generation,
            },
        )
        .session;
        assert!(session.is_safe());
        assert_eq!(session.risk_level(), 0);
    }
}

// src/engine/controller.rs — Audit engine: the single writer
//
// Owns the session record behind a mutex, funnels every mutation through
// `reduce`, and publishes whole-record snapshots over a watch channel.
// Readers (TUI widgets, the CLI progress printer) never see a half-applied
// update. Scheduled ticks re-enter through the same funnel, tagged with the
// generation they were created under.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tracing::debug;

use super::reducer::{reduce, Action, Followup};
use super::scheduler::Scheduler;
use super::types::{
    AuditEvent, AuditSession, EngineTiming, ExportKind, OverlayStyle, OverrideKind, Platform,
};

type EventCallback = Box<dyn Fn(AuditEvent) + Send + Sync>;

struct Core {
    session: AuditSession,
    rng: StdRng,
}

struct EngineInner {
    core: Mutex<Core>,
    tx: watch::Sender<AuditSession>,
    timing: EngineTiming,
    scheduler: Scheduler,
    on_event: Mutex<Option<EventCallback>>,
}

/// Handle to the simulated audit engine. Cheap to clone; all clones drive the
/// same session.
#[derive(Clone)]
pub struct AuditEngine {
    inner: Arc<EngineInner>,
}

impl AuditEngine {
    /// Create an engine with an entropy-seeded RNG. Must be called inside a
    /// tokio runtime (the scheduler captures the handle).
    pub fn new(platform: Platform, timing: EngineTiming) -> Self {
        Self::with_rng(platform, timing, StdRng::from_entropy())
    }

    /// Fixed seed for reproducible demo runs and tests.
    pub fn with_seed(platform: Platform, timing: EngineTiming, seed: u64) -> Self {
        Self::with_rng(platform, timing, StdRng::seed_from_u64(seed))
    }

    fn with_rng(platform: Platform, timing: EngineTiming, rng: StdRng) -> Self {
        let session = AuditSession::new(platform);
        let (tx, _) = watch::channel(session.clone());
        Self {
            inner: Arc::new(EngineInner {
                core: Mutex::new(Core { session, rng }),
                tx,
                timing,
                scheduler: Scheduler::new(),
                on_event: Mutex::new(None),
            }),
        }
    }

    /// Attach an observer for engine events (progress lines, log hooks).
    pub fn with_observer(self, cb: impl Fn(AuditEvent) + Send + Sync + 'static) -> Self {
        *self.inner.on_event.lock().unwrap() = Some(Box::new(cb));
        self
    }

    /// Snapshot channel for renderers.
    pub fn subscribe(&self) -> watch::Receiver<AuditSession> {
        self.inner.tx.subscribe()
    }

    /// Current whole-record snapshot.
    pub fn snapshot(&self) -> AuditSession {
        self.inner.core.lock().unwrap().session.clone()
    }

    // ── Operations ───────────────────────────────────────────────
    //
    // All guards live in the reducer; every method is a silent no-op when the
    // session is in the wrong state.

    pub fn submit_file(&self, name: Option<String>) {
        self.inner.apply(Action::SubmitFile { name });
    }

    pub fn set_platform(&self, platform: Platform) {
        self.inner.apply(Action::SetPlatform(platform));
    }

    pub fn resolve_flag(&self, id: &str) {
        self.inner.apply(Action::ResolveFlag { id: id.to_string() });
    }

    /// Open the nuke confirmation for one Red/Orange flag.
    pub fn request_remove(&self, id: &str) {
        self.inner.apply(Action::RequestRemove { id: id.to_string() });
    }

    /// Open the lockdown confirmation (bulk-resolve all open threats).
    pub fn request_lockdown(&self) {
        self.inner.apply(Action::RequestLockdown);
    }

    pub fn confirm_override(&self) {
        self.inner.apply(Action::ConfirmOverride);
    }

    pub fn cancel_override(&self) {
        self.inner.apply(Action::CancelOverride);
    }

    pub fn dismiss_override(&self) {
        self.inner.apply(Action::DismissOverride);
    }

    pub fn set_overlay(&self, id: &str, style: OverlayStyle) {
        self.inner.apply(Action::SetOverlay {
            id: id.to_string(),
            style,
        });
    }

    pub fn toggle_ledger(&self, id: &str) {
        self.inner.apply(Action::ToggleLedger { id: id.to_string() });
    }

    pub fn start_export(&self, kind: ExportKind) {
        self.inner.apply(Action::StartExport { kind });
    }

    /// Dismiss whatever export job is currently showing.
    pub fn dismiss_export(&self) {
        let seq = match self.snapshot().export {
            Some(job) => job.seq,
            None => return,
        };
        self.inner.apply(Action::DismissExport { seq });
    }

    pub fn reset(&self) {
        self.inner.apply(Action::Reset);
    }
}

impl EngineInner {
    fn apply(self: &Arc<Self>, action: Action) {
        let outcome = {
            let mut core = self.core.lock().unwrap();
            // Reborrow so the session and rng fields can be borrowed apart.
            let core = &mut *core;
            let outcome = reduce(&core.session, &action, &mut core.rng, &self.timing);
            if outcome.session == core.session {
                debug!("engine: ignored {action:?} in current state");
                return;
            }
            core.session = outcome.session.clone();
            // Publish while still holding the core lock so snapshots hit the
            // channel in mutation order.
            self.tx.send_replace(outcome.session.clone());
            outcome
        };

        if let Some(cb) = self.on_event.lock().unwrap().as_ref() {
            for event in &outcome.events {
                cb(event.clone());
            }
        }

        for followup in outcome.schedule {
            self.schedule(followup, &outcome.session);
        }
    }

    fn schedule(self: &Arc<Self>, followup: Followup, session: &AuditSession) {
        let generation = session.generation;
        match followup {
            Followup::CancelAll => self.scheduler.abort_all(),
            Followup::StartScanTicker => {
                let inner = self.clone();
                self.scheduler
                    .start_scan_ticker(self.timing.scan_tick, move || {
                        inner.apply(Action::ScanTick { generation });
                    });
            }
            Followup::StopScanTicker => self.scheduler.stop_scan_ticker(),
            Followup::StartOverrideTicker { kind } => {
                let period = match kind {
                    OverrideKind::Nuke { .. } => self.timing.nuke_tick,
                    OverrideKind::Lockdown => self.timing.lockdown_tick,
                };
                let inner = self.clone();
                self.scheduler.start_flow_ticker(period, move || {
                    inner.apply(Action::OverrideTick { generation });
                });
            }
            Followup::StopOverrideTicker => self.scheduler.stop_flow_ticker(),
            Followup::ResolveFinishAfterDelay { id } => {
                let inner = self.clone();
                self.scheduler
                    .spawn_after(self.timing.resolve_delay, move || {
                        inner.apply(Action::FinishResolve { id, generation });
                    });
            }
            Followup::ExportFinishAfterDelay { seq } => {
                let inner = self.clone();
                self.scheduler
                    .spawn_after(self.timing.export_delay, move || {
                        inner.apply(Action::FinishExport { seq, generation });
                    });
            }
            Followup::ExportDismissAfterDelay { seq } => {
                let inner = self.clone();
                self.scheduler.spawn_after(self.timing.toast, move || {
                    inner.apply(Action::DismissExport { seq });
                });
            }
        }
    }
}

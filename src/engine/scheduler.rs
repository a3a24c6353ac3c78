// src/engine/scheduler.rs — Cancellable timer tasks
//
// Two repeating slots (the scan ticker and the override-flow ticker) plus
// one-shot delays. Handles are aborted on invalidation; the generation tags
// inside the scheduled actions catch anything that already left the queue.

use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub struct Scheduler {
    handle: Handle,
    scan: Mutex<Option<JoinHandle<()>>>,
    flow: Mutex<Option<JoinHandle<()>>>,
    oneshots: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Must be created inside a tokio runtime; the captured handle lets the
    /// blocking TUI loop schedule work from its own thread.
    pub fn new() -> Self {
        Self {
            handle: Handle::current(),
            scan: Mutex::new(None),
            flow: Mutex::new(None),
            oneshots: Mutex::new(Vec::new()),
        }
    }

    /// Start the repeating scan ticker, replacing (and aborting) any previous
    /// one. The first interval tick fires immediately and is consumed, so
    /// `tick` first runs one full period after the call.
    pub fn start_scan_ticker(&self, period: Duration, tick: impl Fn() + Send + 'static) {
        let task = self.spawn_ticker(period, tick);
        if let Some(old) = self.scan.lock().unwrap().replace(task) {
            old.abort();
        }
    }

    pub fn stop_scan_ticker(&self) {
        if let Some(task) = self.scan.lock().unwrap().take() {
            task.abort();
        }
    }

    /// Start the override-flow ticker (nuke or lockdown progress).
    pub fn start_flow_ticker(&self, period: Duration, tick: impl Fn() + Send + 'static) {
        let task = self.spawn_ticker(period, tick);
        if let Some(old) = self.flow.lock().unwrap().replace(task) {
            old.abort();
        }
    }

    pub fn stop_flow_ticker(&self) {
        if let Some(task) = self.flow.lock().unwrap().take() {
            task.abort();
        }
    }

    /// Run `f` once after `delay`.
    pub fn spawn_after(&self, delay: Duration, f: impl FnOnce() + Send + 'static) {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        let mut oneshots = self.oneshots.lock().unwrap();
        oneshots.retain(|t| !t.is_finished());
        oneshots.push(task);
    }

    /// Abort everything in flight. Used when a new scan starts and on reset.
    pub fn abort_all(&self) {
        self.stop_scan_ticker();
        self.stop_flow_ticker();
        let mut oneshots = self.oneshots.lock().unwrap();
        for task in oneshots.drain(..) {
            task.abort();
        }
    }

    fn spawn_ticker(&self, period: Duration, tick: impl Fn() + Send + 'static) -> JoinHandle<()> {
        self.handle.spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval's first tick completes immediately
            timer.tick().await;
            loop {
                timer.tick().await;
                tick();
            }
        })
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.abort_all();
    }
}

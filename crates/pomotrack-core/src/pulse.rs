//! One-second pulse source for a running session.
//!
//! The controller never advances on its own; `PulseDriver` owns the single
//! repeating task that calls `AppState::pulse` once per second while the
//! session runs. Call `sync` after every command that may flip `running`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::app::SharedApp;
use crate::events::Event;

const PULSE_PERIOD: Duration = Duration::from_secs(1);

pub struct PulseDriver {
    app: SharedApp,
    events: UnboundedSender<Event>,
    handle: Option<JoinHandle<()>>,
    /// Bumped on every start and stop. A pulse task only acts while the
    /// value it was spawned with is current, so a cancelled task that is
    /// still waiting on the lock cannot deliver a stray second.
    generation: Arc<AtomicU64>,
}

impl PulseDriver {
    /// Completion events produced by pulses are sent on `events`.
    pub fn new(app: SharedApp, events: UnboundedSender<Event>) -> Self {
        Self {
            app,
            events,
            handle: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Match the pulse to the session's running flag.
    pub fn sync(&mut self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Start pulsing unless a pulse task is already live.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.is_active() {
            return;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, "pulse started");
        self.handle = Some(tokio::spawn(run_pulse(
            Arc::clone(&self.app),
            self.events.clone(),
            Arc::clone(&self.generation),
            generation,
        )));
    }

    /// Stop pulsing. Stopping an idle driver is a no-op.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("pulse stopped");
        }
    }
}

impl Drop for PulseDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_pulse(
    app: SharedApp,
    events: UnboundedSender<Event>,
    current: Arc<AtomicU64>,
    generation: u64,
) {
    let mut interval = interval_at(Instant::now() + PULSE_PERIOD, PULSE_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let (event, running) = {
            let Ok(mut state) = app.lock() else {
                tracing::error!("application state lock poisoned; pulse exiting");
                return;
            };
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            (state.pulse(), state.is_running())
        };

        if let Some(event) = event {
            if events.send(event).is_err() {
                return;
            }
        }
        if !running {
            tracing::debug!(generation, "session paused; pulse exiting");
            return;
        }
    }
}

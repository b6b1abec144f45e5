//! Session controller.
//!
//! A pure countdown state machine over whole seconds. It owns no thread and
//! reads no clock: the caller delivers one `tick()` per elapsed second while
//! the session is running.
//!
//! ## State Transitions
//!
//! ```text
//! Work --expire--> ShortBreak | LongBreak --expire--> Work
//!   ^                                                   |
//!   +------------- select_kind (any -> any) ------------+
//! ```
//!
//! Running/paused is orthogonal to the interval kind.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(Settings::default());
//! controller.toggle_running();
//! // Once per second:
//! controller.tick(&mut ledger); // Returns Some(Event) when the interval completes
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::kind::{format_time, IntervalKind};
use super::settings::Settings;
use crate::events::Event;
use crate::task::TaskId;

/// Receiver of completed work units.
///
/// The controller calls this exactly once per completed work interval and
/// never reads anything else from the receiver.
pub trait WorkUnitSink {
    /// Credit one work unit to the active task.
    ///
    /// Returns the id of the credited task, or `None` when nothing was
    /// credited.
    fn record_work_unit_completion(&mut self) -> Option<TaskId>;
}

/// Core session state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionController {
    settings: Settings,
    kind: IntervalKind,
    seconds_remaining: u64,
    running: bool,
    /// Completed work intervals over the process lifetime. Never reset.
    completed_work_count: u64,
}

impl SessionController {
    /// Create a paused controller at the start of a work interval.
    pub fn new(settings: Settings) -> Self {
        let seconds_remaining = settings.duration_secs(IntervalKind::Work);
        Self {
            settings,
            kind: IntervalKind::Work,
            seconds_remaining,
            running: false,
            completed_work_count: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn kind(&self) -> IntervalKind {
        self.kind
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_count(&self) -> u64 {
        self.completed_work_count
    }

    /// Full length of the current interval under the current settings.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.kind)
    }

    pub fn display_time(&self) -> String {
        format_time(self.seconds_remaining)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.seconds_remaining as f64 / total as f64).clamp(0.0, 1.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle_running(&mut self) -> Event {
        self.running = !self.running;
        tracing::debug!(kind = %self.kind, running = self.running, "toggled countdown");
        if self.running {
            Event::TimerStarted {
                kind: self.kind,
                seconds_remaining: self.seconds_remaining,
                at: Utc::now(),
            }
        } else {
            Event::TimerPaused {
                kind: self.kind,
                seconds_remaining: self.seconds_remaining,
                at: Utc::now(),
            }
        }
    }

    /// Stop and refill the current interval. The kind is kept.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.seconds_remaining = self.total_secs();
        Event::TimerReset {
            kind: self.kind,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        }
    }

    /// Jump to `kind`, abandoning the current countdown without crediting it.
    pub fn select_kind(&mut self, kind: IntervalKind) -> Event {
        let from = self.kind;
        self.running = false;
        self.kind = kind;
        self.seconds_remaining = self.total_secs();
        tracing::debug!(%from, to = %kind, "selected interval kind");
        Event::KindSelected {
            from,
            to: kind,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        }
    }

    /// Deliver one elapsed second.
    ///
    /// Does nothing while paused. Returns `Some(Event::IntervalCompleted)`
    /// when this second brings a running countdown to zero.
    pub fn tick(&mut self, sink: &mut dyn WorkUnitSink) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            return Some(self.on_expire(sink));
        }
        None
    }

    /// Complete the current interval and move to the next one.
    ///
    /// Normally reached through `tick()`. A finished work interval bumps the
    /// lifetime count and credits `sink`; the count after the increment
    /// decides between a short and a long break.
    pub fn on_expire(&mut self, sink: &mut dyn WorkUnitSink) -> Event {
        let finished = self.kind;
        let mut credited_task = None;

        let next = match finished {
            IntervalKind::Work => {
                self.completed_work_count += 1;
                credited_task = sink.record_work_unit_completion();
                let every = u64::from(self.settings.long_break_interval.max(1));
                if self.completed_work_count % every == 0 {
                    IntervalKind::LongBreak
                } else {
                    IntervalKind::ShortBreak
                }
            }
            IntervalKind::ShortBreak | IntervalKind::LongBreak => IntervalKind::Work,
        };

        self.kind = next;
        self.seconds_remaining = self.total_secs();
        self.running = self.settings.auto_starts_after(finished);

        tracing::info!(
            %finished,
            %next,
            completed_work_count = self.completed_work_count,
            auto_started = self.running,
            "interval completed"
        );

        Event::IntervalCompleted {
            finished,
            next,
            completed_work_count: self.completed_work_count,
            credited_task,
            auto_started: self.running,
            at: Utc::now(),
        }
    }

    /// Replace settings wholesale.
    ///
    /// The countdown in progress keeps its remaining seconds; new durations
    /// apply from the next reset, switch or completion.
    pub fn update_settings(&mut self, settings: Settings) -> Event {
        self.settings = settings;
        Event::SettingsUpdated {
            settings: self.settings.clone(),
            at: Utc::now(),
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

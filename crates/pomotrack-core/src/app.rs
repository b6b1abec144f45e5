//! Application state: the session controller and the task ledger behind a
//! single command surface.
//!
//! All mutation goes through the methods here. The controller reaches the
//! ledger only through the `WorkUnitSink` hook while completing a work
//! interval; the ledger never calls back.

use chrono::Utc;
use std::sync::{Arc, Mutex};

use crate::error::{ConfigError, ValidationError};
use crate::events::Event;
use crate::stats::Stats;
use crate::task::{NewTask, TaskId, TaskLedger, TaskPatch};
use crate::timer::{IntervalKind, SessionController, Settings, WorkUnitSink};

/// Shared handle for compositions where the pulse runs on another task.
/// Every mutation happens under the one lock.
pub type SharedApp = Arc<Mutex<AppState>>;

impl WorkUnitSink for TaskLedger {
    fn record_work_unit_completion(&mut self) -> Option<TaskId> {
        TaskLedger::record_work_unit_completion(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    controller: SessionController,
    ledger: TaskLedger,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            controller: SessionController::new(settings),
            ledger: TaskLedger::new(),
        }
    }

    pub fn into_shared(self) -> SharedApp {
        Arc::new(Mutex::new(self))
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.ledger
    }

    pub fn settings(&self) -> &Settings {
        self.controller.settings()
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn toggle_running(&mut self) -> Event {
        self.controller.toggle_running()
    }

    pub fn reset(&mut self) -> Event {
        self.controller.reset()
    }

    pub fn select_kind(&mut self, kind: IntervalKind) -> Event {
        self.controller.select_kind(kind)
    }

    /// Deliver one elapsed second. Returns the completion event when the
    /// countdown finishes on this pulse.
    pub fn pulse(&mut self) -> Option<Event> {
        self.controller.tick(&mut self.ledger)
    }

    /// Validate and apply new settings.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the current settings are kept.
    pub fn update_settings(&mut self, settings: Settings) -> Result<Event, ConfigError> {
        if let Err(e) = settings.validate() {
            tracing::warn!(error = %e, "rejected settings update");
            return Err(e);
        }
        tracing::info!(?settings, "settings updated");
        Ok(self.controller.update_settings(settings))
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ValidationError::EmptyTitle` for a blank title.
    pub fn add_task(&mut self, new: NewTask) -> Result<Event, ValidationError> {
        let task = self.ledger.add_task(new)?;
        Ok(Event::TaskAdded {
            task,
            at: Utc::now(),
        })
    }

    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Option<Event> {
        let task = self.ledger.update_task(id, patch)?.clone();
        Some(Event::TaskUpdated {
            task,
            at: Utc::now(),
        })
    }

    pub fn delete_task(&mut self, id: &TaskId) -> Option<Event> {
        let was_active = self.ledger.active_task_id().as_ref() == Some(id);
        let removed = self.ledger.delete_task(id)?;
        Some(Event::TaskDeleted {
            id: removed.id,
            cleared_active: was_active,
            at: Utc::now(),
        })
    }

    pub fn toggle_completion(&mut self, id: &TaskId) -> Option<Event> {
        let completed = self.ledger.toggle_completion(id)?;
        Some(Event::TaskCompletionToggled {
            id: *id,
            completed,
            at: Utc::now(),
        })
    }

    pub fn set_active_task(&mut self, id: Option<TaskId>) -> Event {
        self.ledger.set_active_task(id);
        Event::ActiveTaskChanged { id, at: Utc::now() }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            kind: self.controller.kind(),
            seconds_remaining: self.controller.seconds_remaining(),
            display: self.controller.display_time(),
            running: self.controller.is_running(),
            completed_work_count: self.controller.completed_work_count(),
            active_task_id: self.ledger.active_task_id(),
            at: Utc::now(),
        }
    }

    pub fn stats(&self) -> Stats {
        Stats::collect(&self.ledger, &self.controller)
    }
}

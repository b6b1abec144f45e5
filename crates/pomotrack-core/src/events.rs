use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};
use crate::timer::{IntervalKind, Settings};

/// Every state change in the core produces an Event.
/// The presentation layer renders them; nothing inside the core consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        kind: IntervalKind,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        kind: IntervalKind,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        kind: IntervalKind,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// Manual switch; the abandoned countdown is not counted as completed.
    KindSelected {
        from: IntervalKind,
        to: IntervalKind,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero while running.
    IntervalCompleted {
        finished: IntervalKind,
        next: IntervalKind,
        completed_work_count: u64,
        /// Task credited with the work unit, if a work interval finished
        /// while a live task was active.
        credited_task: Option<TaskId>,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: Settings,
        at: DateTime<Utc>,
    },
    TaskAdded {
        task: Task,
        at: DateTime<Utc>,
    },
    TaskUpdated {
        task: Task,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        id: TaskId,
        cleared_active: bool,
        at: DateTime<Utc>,
    },
    TaskCompletionToggled {
        id: TaskId,
        completed: bool,
        at: DateTime<Utc>,
    },
    ActiveTaskChanged {
        id: Option<TaskId>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        kind: IntervalKind,
        seconds_remaining: u64,
        /// `seconds_remaining` rendered as `mm:ss`.
        display: String,
        running: bool,
        completed_work_count: u64,
        active_task_id: Option<TaskId>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Serialized `type` tag of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::KindSelected { .. } => "KindSelected",
            Event::IntervalCompleted { .. } => "IntervalCompleted",
            Event::SettingsUpdated { .. } => "SettingsUpdated",
            Event::TaskAdded { .. } => "TaskAdded",
            Event::TaskUpdated { .. } => "TaskUpdated",
            Event::TaskDeleted { .. } => "TaskDeleted",
            Event::TaskCompletionToggled { .. } => "TaskCompletionToggled",
            Event::ActiveTaskChanged { .. } => "ActiveTaskChanged",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}

//! Tasks credited with completed work intervals.
//!
//! A task's `completed` flag is set only by the user and is independent of
//! how many work units it has consumed against its estimate.

mod ledger;

pub use ledger::TaskLedger;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Estimate bounds the presentation layer clamps to. The ledger stores
/// whatever it is given.
pub const MIN_ESTIMATE: u32 = 1;
pub const MAX_ESTIMATE: u32 = 10;

/// Opaque task identifier, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(TaskId)
            .map_err(|e| ValidationError::InvalidValue {
                field: "task_id".into(),
                message: e.to_string(),
            })
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Task title, never blank
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Estimated number of work intervals
    pub estimated_work_units: u32,
    /// Work intervals completed while this task was active
    pub completed_work_units: u32,
    /// Whether the user has marked the task done
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Remaining estimate; zero once consumption meets or exceeds it.
    pub fn remaining_work_units(&self) -> u32 {
        self.estimated_work_units
            .saturating_sub(self.completed_work_units)
    }

    pub fn is_over_estimate(&self) -> bool {
        self.completed_work_units > self.estimated_work_units
    }
}

/// Input for `TaskLedger::add_task`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to 1 when omitted.
    #[serde(default)]
    pub estimated_work_units: Option<u32>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_estimate(mut self, units: u32) -> Self {
        self.estimated_work_units = Some(units);
        self
    }
}

/// Partial update merged into an existing task. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub estimated_work_units: Option<u32>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.estimated_work_units.is_none()
            && self.completed.is_none()
    }
}

/// Task list view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    /// Not yet marked completed.
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" | "done" => Ok(TaskFilter::Completed),
            other => Err(ValidationError::InvalidValue {
                field: "filter".into(),
                message: format!("unknown filter '{other}' (expected all, active or completed)"),
            }),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        })
    }
}

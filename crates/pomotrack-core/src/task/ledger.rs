use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{NewTask, Task, TaskFilter, TaskId, TaskPatch};
use crate::error::ValidationError;

/// Ordered task collection plus the active-task selection.
///
/// Tasks keep insertion order. `active_task_id` is a lookup key only; it may
/// name a task that no longer exists, in which case nothing gets credited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskLedger {
    tasks: Vec<Task>,
    active_task_id: Option<TaskId>,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    pub fn active_task_id(&self) -> Option<TaskId> {
        self.active_task_id
    }

    /// The active task, if the selection still points at a live task.
    pub fn active_task(&self) -> Option<&Task> {
        self.active_task_id.as_ref().and_then(|id| self.get(id))
    }

    pub fn filtered(&self, filter: TaskFilter) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    /// Append a new task.
    ///
    /// The estimate defaults to 1 and is not range-checked here.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyTitle` if the title is blank after
    /// trimming; the ledger is left untouched.
    pub fn add_task(&mut self, new: NewTask) -> Result<Task, ValidationError> {
        let title = new.title.trim();
        if title.is_empty() {
            tracing::warn!("rejected task with empty title");
            return Err(ValidationError::EmptyTitle);
        }

        let task = Task {
            id: TaskId::new(),
            title: title.to_string(),
            description: normalize_description(new.description),
            estimated_work_units: new.estimated_work_units.unwrap_or(1),
            completed_work_units: 0,
            completed: false,
            created_at: Utc::now(),
        };
        tracing::info!(id = %task.id, title = %task.title, "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Merge `patch` into the task with `id`. Returns the updated task, or
    /// `None` if no such task exists.
    ///
    /// A blank title in the patch is ignored so titles stay non-empty.
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == *id)?;

        if let Some(title) = patch.title {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                tracing::warn!(%id, "ignored blank title in task update");
            } else {
                task.title = trimmed.to_string();
            }
        }
        if let Some(description) = patch.description {
            task.description = normalize_description(description);
        }
        if let Some(units) = patch.estimated_work_units {
            task.estimated_work_units = units;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        Some(&*task)
    }

    /// Remove the task with `id`, clearing the active selection if it
    /// pointed at it. Returns the removed task.
    pub fn delete_task(&mut self, id: &TaskId) -> Option<Task> {
        if self.active_task_id.as_ref() == Some(id) {
            self.active_task_id = None;
        }
        let index = self.tasks.iter().position(|t| t.id == *id)?;
        let removed = self.tasks.remove(index);
        tracing::info!(%id, "task deleted");
        Some(removed)
    }

    /// Flip the completion flag. Returns the new value.
    pub fn toggle_completion(&mut self, id: &TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == *id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Select the task that receives credit for completed work intervals.
    /// The id is not checked against the ledger.
    pub fn set_active_task(&mut self, id: Option<TaskId>) {
        self.active_task_id = id;
    }

    /// Credit one completed work unit to the active task.
    ///
    /// No-op when nothing is selected or the selection is stale.
    pub fn record_work_unit_completion(&mut self) -> Option<TaskId> {
        let id = self.active_task_id?;
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed_work_units = task.completed_work_units.saturating_add(1);
        tracing::debug!(%id, units = task.completed_work_units, "credited work unit");
        Some(id)
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

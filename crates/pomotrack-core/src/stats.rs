//! Session statistics derived from the live state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::task::TaskLedger;
use crate::timer::SessionController;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Work intervals completed since the process started.
    pub completed_work_intervals: u64,
    pub completed_tasks: usize,
    /// Tasks not yet marked completed.
    pub active_tasks: usize,
    /// Number of tasks per estimated work-unit count.
    pub tasks_by_estimate: BTreeMap<u32, usize>,
    pub estimated_work_units: u64,
    /// Work units credited to tasks still in the ledger.
    pub credited_work_units: u64,
}

impl Stats {
    pub fn collect(ledger: &TaskLedger, controller: &SessionController) -> Self {
        let mut stats = Stats {
            completed_work_intervals: controller.completed_work_count(),
            ..Stats::default()
        };

        for task in ledger.tasks() {
            if task.completed {
                stats.completed_tasks += 1;
            } else {
                stats.active_tasks += 1;
            }
            *stats
                .tasks_by_estimate
                .entry(task.estimated_work_units)
                .or_insert(0) += 1;
            stats.estimated_work_units += u64::from(task.estimated_work_units);
            stats.credited_work_units += u64::from(task.completed_work_units);
        }
        stats
    }

    pub fn total_tasks(&self) -> usize {
        self.completed_tasks + self.active_tasks
    }

    /// Share of tasks marked completed, 0.0 when there are none.
    pub fn completion_ratio(&self) -> f64 {
        let total = self.total_tasks();
        if total == 0 {
            return 0.0;
        }
        self.completed_tasks as f64 / total as f64
    }
}

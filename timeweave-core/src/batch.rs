//! Batch Scheduler: place many tasks, highest priority first.
//!
//! Strategy is greedy first-fit by descending priority. Each placement becomes an
//! obstacle for the tasks after it, so one batch never double-books. It is not a
//! global optimum: a long high-priority task can push shorter ones to later days.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::slot_finder::SlotFinder;
use crate::task::{ScheduledItem, Task, TaskType};
use crate::time::format_duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    /// Copies of the input tasks with `scheduled_time` set, in placement order.
    pub scheduled: Vec<Task>,
    /// Input tasks that found no slot, unchanged.
    pub unscheduled: Vec<Task>,
}

impl ScheduleOutcome {
    pub fn summary(&self) -> String {
        let placed: u32 = self.scheduled.iter().map(|t| t.duration).sum();
        format!(
            "scheduled {} task(s) ({}), {} left unscheduled",
            self.scheduled.len(),
            format_duration(placed),
            self.unscheduled.len()
        )
    }
}

#[derive(Debug, Clone)]
pub struct BatchScheduler {
    finder: SlotFinder,
}

impl BatchScheduler {
    pub fn new(finder: SlotFinder) -> Self {
        Self { finder }
    }

    pub fn finder(&self) -> &SlotFinder {
        &self.finder
    }

    /// Place `tasks` around `existing`. Ties in priority keep input order.
    pub fn schedule_tasks(
        &self,
        tasks: &[Task],
        existing: &[ScheduledItem],
        task_types: &[TaskType],
    ) -> ScheduleOutcome {
        let mut order: Vec<&Task> = tasks.iter().collect();
        // `sort_by_key` is stable, which keeps equal priorities in input order.
        order.sort_by_key(|t| Reverse(t.priority.weight()));

        let mut obstacles: Vec<ScheduledItem> = existing.to_vec();
        let mut outcome = ScheduleOutcome::default();

        for task in order {
            let slot = self.finder.find_first_available_slot(
                task,
                &obstacles,
                task_types,
                self.finder.now(),
            );
            match slot {
                Some(at) => {
                    let placed = task.clone().scheduled_at(at);
                    obstacles.push(ScheduledItem::from(&placed));
                    outcome.scheduled.push(placed);
                }
                None => outcome.unscheduled.push(task.clone()),
            }
        }

        info!(
            scheduled = outcome.scheduled.len(),
            unscheduled = outcome.unscheduled.len(),
            "batch scheduling finished"
        );
        outcome
    }
}

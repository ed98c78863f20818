//! Slot Finder: first conflict-free start time for a single task.
//!
//! Search runs forward day by day from the task's anchor, up to the configured
//! horizon, stepping through the work window in `min_slot_size` increments.
//! All wall-clock reasoning happens in the configured local zone; results are UTC.

use chrono::{DateTime, Datelike, Days, Duration, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::config::EngineConfig;
use crate::conflict::conflicts;
use crate::task::{ScheduledItem, SchedulingPreference, Task, TaskType};
use crate::time::{local_to_utc, parse_hhmm, weekday_name};

#[derive(Debug, Clone)]
pub struct SlotFinder {
    config: EngineConfig,
    tz: Tz,
    now: DateTime<Utc>,
}

impl SlotFinder {
    /// `now` is injected so that identical inputs give identical placements.
    pub fn new(tz: Tz, now: DateTime<Utc>) -> Self {
        Self {
            config: EngineConfig::default(),
            tz,
            now,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Where the search for `task` begins.
    ///
    /// A `specific_day` wins over `start_from`; its time is `specific_time`, or the
    /// work-day start when that is absent or unparsable. `delay` adds its offset.
    /// The result is never earlier than `now`.
    pub fn search_start(&self, task: &Task, start_from: DateTime<Utc>) -> DateTime<Utc> {
        let (work_start, _) = self.config.work_window_minutes();

        let base = match task.specific_day {
            Some(day) => {
                let minute = task
                    .specific_time
                    .as_deref()
                    .and_then(parse_hhmm)
                    .unwrap_or(work_start);
                local_to_utc(day, minute, self.tz).unwrap_or(start_from)
            }
            None => start_from,
        };

        let base = match task.scheduling_preference {
            SchedulingPreference::Delay => base + Duration::minutes(task.delay_minutes as i64),
            _ => base,
        };

        base.max(self.now)
    }

    /// First instant at which `task` fits without overlapping an active item, or
    /// `None` when the task type is unknown or the horizon holds no free window.
    pub fn find_first_available_slot(
        &self,
        task: &Task,
        existing: &[ScheduledItem],
        task_types: &[TaskType],
        start_from: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let Some(task_type) = task_types.iter().find(|tt| tt.id == task.task_type) else {
            debug!(task_id = %task.id, task_type = %task.task_type, "unknown task type; not schedulable");
            return None;
        };

        let Some((window_open, window_close)) = self.window_for(task_type) else {
            debug!(task_id = %task.id, task_type = %task_type.id, "preferred hours leave no work window");
            return None;
        };

        let start = self.search_start(task, start_from);
        let first_day = start.with_timezone(&self.tz).date_naive();
        let (work_start, _) = self.config.work_window_minutes();
        let step = Duration::minutes(self.config.min_slot_size as i64);
        let length = Duration::minutes(task.duration as i64);

        for attempt in 0..self.config.horizon_days {
            let Some(date) = first_day.checked_add_days(Days::new(attempt as u64)) else {
                break;
            };
            let day_name = weekday_name(date.weekday());
            if !task_type.allows(day_name) {
                debug!(task_id = %task.id, day = day_name, "day not allowed for task type");
                continue;
            }

            let anchor = if attempt == 0 {
                self.ceil_to_minute(start)
            } else {
                match local_to_utc(date, work_start, self.tz) {
                    Some(at) => at,
                    None => continue,
                }
            };

            let (Some(open), Some(close)) = (
                local_to_utc(date, window_open, self.tz),
                local_to_utc(date, window_close, self.tz),
            ) else {
                continue;
            };

            let mut cursor = anchor.max(open);
            while cursor + length <= close {
                if !conflicts(cursor, task.duration, existing) {
                    debug!(task_id = %task.id, day = day_name, at = %cursor, "slot found");
                    return Some(cursor);
                }
                cursor += step;
            }
        }

        debug!(
            task_id = %task.id,
            horizon_days = self.config.horizon_days,
            "no free slot within horizon"
        );
        None
    }

    /// Work window in local minutes, narrowed by the type's preferred hours.
    fn window_for(&self, task_type: &TaskType) -> Option<(u32, u32)> {
        let (work_start, work_end) = self.config.work_window_minutes();
        let (pref_start, pref_end) = task_type.preferred_window();
        let open = pref_start.map_or(work_start, |p| p.max(work_start));
        let close = pref_end.map_or(work_end, |p| p.min(work_end));
        (open < close).then_some((open, close))
    }

    /// Round `instant` up to the next whole local minute.
    fn ceil_to_minute(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let local = instant.with_timezone(&self.tz);
        let secs = local.num_seconds_from_midnight() + u32::from(local.nanosecond() > 0);
        let minute = secs.div_ceil(60);
        local_to_utc(local.date_naive(), minute, self.tz)
            .map_or(instant, |at| at.max(instant))
    }
}

//! Task, task-type, and scheduled-item records.
//!
//! These mirror the shapes the planner app persists (camelCase JSON). The engine
//! receives copies and hands back new copies; it never keeps them.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{is_weekday_name, parse_hhmm, WEEKDAY_NAMES};

pub const MIN_TASK_MINUTES: u32 = 5;
pub const MAX_TASK_MINUTES: u32 = 480;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight; larger is scheduled first.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingPreference {
    /// Earliest available time from now.
    #[default]
    Immediate,
    /// Offset from now by `delay_minutes`.
    Delay,
    /// Explicit `specific_day` / `specific_time`.
    Specific,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTypeConstraints {
    #[serde(default)]
    pub preferred_time_start: Option<String>,
    #[serde(default)]
    pub preferred_time_end: Option<String>,
}

/// A user-managed category of work. Identity is immutable once tasks or slots
/// reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskType {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub default_duration: u32,
    /// English full weekday names. Anything else never matches.
    pub allowed_days: Vec<String>,
    #[serde(default)]
    pub constraints: TaskTypeConstraints,
    #[serde(default)]
    pub color: String,
}

impl TaskType {
    /// A type allowed on every day, with no preferred hours.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_duration: 60,
            allowed_days: WEEKDAY_NAMES.iter().map(|d| d.to_string()).collect(),
            constraints: TaskTypeConstraints::default(),
            color: "#6366f1".to_string(),
        }
    }

    pub fn with_allowed_days(mut self, days: &[&str]) -> Self {
        self.allowed_days = days.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_preferred_hours(mut self, start: &str, end: &str) -> Self {
        self.constraints.preferred_time_start = Some(start.to_string());
        self.constraints.preferred_time_end = Some(end.to_string());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn allows(&self, day_name: &str) -> bool {
        self.allowed_days.iter().any(|d| d == day_name)
    }

    /// Preferred hours as minutes since midnight. Unparsable values are `None`.
    pub fn preferred_window(&self) -> (Option<u32>, Option<u32>) {
        (
            self.constraints.preferred_time_start.as_deref().and_then(parse_hhmm),
            self.constraints.preferred_time_end.as_deref().and_then(parse_hhmm),
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(bad) = self.allowed_days.iter().find(|d| !is_weekday_name(d)) {
            return Err(ValidationError::UnknownWeekday(bad.clone()));
        }
        let times = [
            ("preferredTimeStart", &self.constraints.preferred_time_start),
            ("preferredTimeEnd", &self.constraints.preferred_time_end),
        ];
        for (field, value) in times {
            if let Some(v) = value {
                if parse_hhmm(v).is_none() {
                    return Err(ValidationError::InvalidTimeOfDay {
                        field: field.to_string(),
                        value: v.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Core task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "key")]
    pub id: String,
    pub text: String,

    /// Minutes, 5..=480.
    pub duration: u32,
    #[serde(default)]
    pub priority: Priority,
    /// `TaskType::id`.
    pub task_type: String,
    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub scheduling_preference: SchedulingPreference,
    #[serde(default)]
    pub delay_minutes: u32,
    #[serde(default)]
    pub specific_day: Option<NaiveDate>,
    /// `"HH:MM"` local time on `specific_day`.
    #[serde(default)]
    pub specific_time: Option<String>,

    /// Absolute placement, `None` while in the unscheduled pool.
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>, task_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            duration: 30,
            priority: Priority::Medium,
            task_type: task_type.into(),
            status: TaskStatus::Pending,
            scheduling_preference: SchedulingPreference::Immediate,
            delay_minutes: 0,
            specific_day: None,
            specific_time: None,
            scheduled_time: None,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = minutes;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_delay(mut self, minutes: u32) -> Self {
        self.scheduling_preference = SchedulingPreference::Delay;
        self.delay_minutes = minutes;
        self
    }

    pub fn with_specific(mut self, day: NaiveDate, time: Option<&str>) -> Self {
        self.scheduling_preference = SchedulingPreference::Specific;
        self.specific_day = Some(day);
        self.specific_time = time.map(str::to_string);
        self
    }

    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_time = Some(at);
        self
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_time.is_some()
    }

    /// Return the task to the unscheduled pool.
    pub fn unschedule(&mut self) {
        self.scheduled_time = None;
    }

    /// Boundary check run by the caller before handing the task to the engine.
    pub fn validate(&self, task_types: &[TaskType]) -> Result<(), ValidationError> {
        if !(MIN_TASK_MINUTES..=MAX_TASK_MINUTES).contains(&self.duration) {
            return Err(ValidationError::DurationOutOfRange {
                task_id: self.id.clone(),
                minutes: self.duration,
                min: MIN_TASK_MINUTES,
                max: MAX_TASK_MINUTES,
            });
        }
        if let Some(t) = &self.specific_time {
            if parse_hhmm(t).is_none() {
                return Err(ValidationError::InvalidTimeOfDay {
                    field: "specificTime".to_string(),
                    value: t.clone(),
                });
            }
        }
        if !task_types.iter().any(|tt| tt.id == self.task_type) {
            return Err(ValidationError::UnknownTaskType {
                task_id: self.id.clone(),
                task_type: self.task_type.clone(),
            });
        }
        Ok(())
    }
}

/// The part of a task that matters for conflict checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledItem {
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub status: TaskStatus,
}

impl ScheduledItem {
    pub fn new(start: DateTime<Utc>, duration: u32) -> Self {
        Self {
            scheduled_time: Some(start),
            duration,
            status: TaskStatus::Pending,
        }
    }

    /// `[start, end)` if the item is placed and still blocks time.
    pub fn active_interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if self.status == TaskStatus::Completed {
            return None;
        }
        let start = self.scheduled_time?;
        Some((start, start + Duration::minutes(self.duration as i64)))
    }
}

impl From<&Task> for ScheduledItem {
    fn from(task: &Task) -> Self {
        Self {
            scheduled_time: task.scheduled_time,
            duration: task.duration,
            status: task.status,
        }
    }
}

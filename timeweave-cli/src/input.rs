use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::Path;
use timeweave_core::time::is_weekday_name;
use timeweave_core::{DaySlot, ScheduledItem, Task, TaskType, parse_hhmm};

/// `schedule` / `find-slot` input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInput {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub existing_items: Vec<ScheduledItem>,
    pub task_types: Vec<TaskType>,
}

impl BatchInput {
    pub fn validate(&self) -> Result<()> {
        for tt in &self.task_types {
            tt.validate()
                .with_context(|| format!("task type {}", tt.id))?;
        }
        for task in &self.tasks {
            task.validate(&self.task_types)
                .with_context(|| format!("task {}", task.id))?;
        }
        Ok(())
    }

    pub fn task(&self, id: &str) -> Result<&Task> {
        match self.tasks.iter().find(|t| t.id == id) {
            Some(t) => Ok(t),
            None => bail!("no task with id {id} in input"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferredRange {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// `template` input file: the whole week's slots plus the editing context.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    #[serde(default)]
    pub slots: Vec<DaySlot>,
    #[serde(default)]
    pub task_types: Vec<TaskType>,
    #[serde(default)]
    pub preferred_range: PreferredRange,
}

impl TemplateInput {
    pub fn validate(&self) -> Result<()> {
        for tt in &self.task_types {
            tt.validate()
                .with_context(|| format!("task type {}", tt.id))?;
        }
        let range = &self.preferred_range;
        for (field, value) in [("start", &range.start), ("end", &range.end)] {
            if !value.is_empty() && parse_hhmm(value).is_none() {
                bail!("preferredRange.{field} {value:?} is not HH:MM");
            }
        }
        for slot in &self.slots {
            if !is_weekday_name(&slot.day) {
                bail!("slot {} has unknown day {:?}", slot.id, slot.day);
            }
            if parse_hhmm(&slot.start_time).is_none() || parse_hhmm(&slot.end_time).is_none() {
                bail!(
                    "slot {} has malformed times {:?}-{:?}",
                    slot.id,
                    slot.start_time,
                    slot.end_time
                );
            }
        }
        Ok(())
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn require_weekday(day: &str) -> Result<()> {
    if !is_weekday_name(day) {
        bail!("unknown weekday {day:?} (expected Monday..Sunday)");
    }
    Ok(())
}

/// `--now` override, or the wall clock.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("parse --now {s:?} as RFC 3339"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

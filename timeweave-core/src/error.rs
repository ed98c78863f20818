//! Error types for timeweave-core.
//!
//! Scheduling itself never fails: an unplaceable task is data (`None` or the
//! `unscheduled` list). Errors here cover boundary validation of caller input and
//! rejected template edits, which leave the caller's slot list untouched.

use thiserror::Error;

/// Caller input that does not conform to the record schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Time-of-day field is not `HH:MM`, 24-hour, zero-padded
    #[error("Invalid time of day for '{field}': {value:?} (expected HH:MM)")]
    InvalidTimeOfDay { field: String, value: String },

    /// Weekday name outside "Monday".."Sunday"
    #[error("Unknown weekday name: {0:?}")]
    UnknownWeekday(String),

    /// Task duration outside the accepted range
    #[error("Task '{task_id}' duration {minutes} is outside {min}..={max} minutes")]
    DurationOutOfRange {
        task_id: String,
        minutes: u32,
        min: u32,
        max: u32,
    },

    /// Task references a task type that is not in the catalog
    #[error("Task '{task_id}' references unknown task type '{task_type}'")]
    UnknownTaskType { task_id: String, task_type: String },

    /// Invalid engine configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },
}

/// A template edit that would break the day's invariants. The edit is not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("No slot with id '{0}' on this day")]
    SlotNotFound(String),

    #[error("Cannot delete the only slot of the day; reset the day instead")]
    LastSlot,

    #[error("Slot '{0}' has no neighbor to merge with")]
    NoNeighbor(String),

    #[error("Minute {minute} is within {min_gap} minutes of an existing boundary")]
    TooCloseToBoundary { minute: u32, min_gap: u32 },

    #[error("Minute {minute} is outside the day range {start}..{end}")]
    OutsideRange { minute: u32, start: u32, end: u32 },

    #[error("Boundary {index} cannot be dragged (only interior boundaries move)")]
    NotDraggable { index: usize },

    #[error("Invalid split parameter: {0}")]
    InvalidSplit(String),
}

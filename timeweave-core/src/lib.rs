//! timeweave-core: the time allocation engine behind the timeweave planner.
//!
//! Pure functions over plain records: callers hand in tasks, task types, placed
//! items, and day-template slots, and get new copies back. Nothing here touches
//! storage, the UI, or a clock of its own (`now` is always injected).
//!
//! - [`conflict`]: half-open overlap checks against placed items
//! - [`slot_finder`]: first free start time for one task within a 14-day horizon
//! - [`batch`]: priority-ordered greedy placement of many tasks
//! - [`template`]: per-weekday slot partitions and their invariant-preserving edits

pub mod batch;
pub mod config;
pub mod conflict;
pub mod error;
pub mod slot_finder;
pub mod task;
pub mod template;
pub mod time;

pub use batch::{BatchScheduler, ScheduleOutcome};
pub use config::EngineConfig;
pub use conflict::{conflicting_items, conflicts};
pub use error::{TemplateError, ValidationError};
pub use slot_finder::SlotFinder;
pub use task::{
    Priority, ScheduledItem, SchedulingPreference, Task, TaskStatus, TaskType, TaskTypeConstraints,
};
pub use template::{
    clean_boundaries, replace_day, BoundaryDrag, DayRange, DaySlot, Flexibility, TemplateEditor,
};
pub use time::{format_duration, format_hhmm, parse_hhmm, weekday_name};

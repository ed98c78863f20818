//! Engine constants and their configurable form.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const WORK_DAY_START: u32 = 9;
pub const WORK_DAY_END: u32 = 17;
/// Scheduling granularity for candidate start times (minutes).
pub const MIN_SLOT_SIZE: u32 = 30;
/// Shortest slot a day template may contain (minutes).
pub const MIN_SLOT_MINUTES: u32 = 15;
pub const SNAP_MINUTES: u32 = 15;
pub const SEARCH_HORIZON_DAYS: u32 = 14;

pub const DEFAULT_RANGE_START: &str = "06:00";
pub const DEFAULT_RANGE_END: &str = "23:00";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub work_day_start_hour: u32,
    pub work_day_end_hour: u32,
    pub min_slot_size: u32,
    pub min_slot_minutes: u32,
    pub snap_minutes: u32,
    pub horizon_days: u32,
    pub default_range_start: String,
    pub default_range_end: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_day_start_hour: WORK_DAY_START,
            work_day_end_hour: WORK_DAY_END,
            min_slot_size: MIN_SLOT_SIZE,
            min_slot_minutes: MIN_SLOT_MINUTES,
            snap_minutes: SNAP_MINUTES,
            horizon_days: SEARCH_HORIZON_DAYS,
            default_range_start: DEFAULT_RANGE_START.to_string(),
            default_range_end: DEFAULT_RANGE_END.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn work_window_minutes(&self) -> (u32, u32) {
        (self.work_day_start_hour * 60, self.work_day_end_hour * 60)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |key: &str, message: &str| ValidationError::InvalidConfig {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.work_day_end_hour > 24 {
            return Err(invalid("work_day_end_hour", "must be at most 24"));
        }
        if self.work_day_start_hour >= self.work_day_end_hour {
            return Err(invalid(
                "work_day_start_hour",
                "must be before work_day_end_hour",
            ));
        }
        if self.min_slot_size == 0 {
            return Err(invalid("min_slot_size", "must be positive"));
        }
        if self.min_slot_minutes == 0 {
            return Err(invalid("min_slot_minutes", "must be positive"));
        }
        if self.snap_minutes == 0 {
            return Err(invalid("snap_minutes", "must be positive"));
        }
        if self.horizon_days == 0 {
            return Err(invalid("horizon_days", "must be positive"));
        }
        for (key, value) in [
            ("default_range_start", &self.default_range_start),
            ("default_range_end", &self.default_range_end),
        ] {
            if crate::time::parse_hhmm(value).is_none() {
                return Err(invalid(key, "must be HH:MM"));
            }
        }
        Ok(())
    }
}

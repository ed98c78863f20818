//! Day-template boundary model.
//!
//! Each weekday's template is a partition of a preferred daily range into labeled
//! slots. The canonical form is the boundary set `[start, b1, .., end]`; slots are
//! rebuilt from it. Every edit computes a full next slot list for the day and runs
//! it through [`TemplateEditor::sanitize`], so there is no partial-update path.
//!
//! Invariants of a sanitized day:
//! - slots tile `[range.start, range.end)` with no gaps or overlaps
//! - every slot lasts at least `min_slot_minutes`

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::TemplateError;
use crate::task::TaskType;
use crate::time::{format_hhmm, parse_hhmm, snap_minutes, WEEKDAY_NAMES};

pub const MERGED_SLOT_LABEL: &str = "Merged slot";
pub const PLACEHOLDER_LABEL: &str = "Open slot";
pub const PLACEHOLDER_COLOR: &str = "#94a3b8";

const NOON: u32 = 12 * 60;
const EVENING: u32 = 17 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flexibility {
    #[default]
    Fixed,
}

/// One labeled interval of a weekday template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    pub id: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub slot_type: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub flexibility: Flexibility,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub allowed_tags: BTreeSet<String>,
}

impl DaySlot {
    /// `(start, end)` in minutes, or `None` if either time is malformed or the
    /// interval is empty.
    pub fn minutes(&self) -> Option<(u32, u32)> {
        let start = parse_hhmm(&self.start_time)?;
        let end = parse_hhmm(&self.end_time)?;
        (start < end).then_some((start, end))
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.minutes().map(|(s, e)| e - s)
    }

    /// Same metadata, new identity and placement.
    fn respan(&self, day: &str, start: u32, end: u32) -> DaySlot {
        DaySlot {
            id: new_slot_id(),
            day: day.to_string(),
            start_time: format_hhmm(start),
            end_time: format_hhmm(end),
            ..self.clone()
        }
    }
}

pub fn new_slot_id() -> String {
    format!("slot-{}", Uuid::new_v4())
}

/// A weekday's preferred range, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: u32,
    pub end: u32,
}

impl DayRange {
    /// Build from `"HH:MM"` strings. A malformed side falls back to the configured
    /// default; a range too short for one minimum slot falls back entirely.
    pub fn from_hhmm(start: &str, end: &str, config: &EngineConfig) -> Self {
        let default = Self::default_for(config);
        let start = parse_hhmm(start).unwrap_or(default.start);
        let end = parse_hhmm(end).unwrap_or(default.end);
        if end < start + config.min_slot_minutes {
            debug!(start, end, "preferred range too short; using default");
            return default;
        }
        Self { start, end }
    }

    pub fn default_for(config: &EngineConfig) -> Self {
        let start = parse_hhmm(&config.default_range_start).unwrap_or(6 * 60);
        let end = parse_hhmm(&config.default_range_end).unwrap_or(23 * 60);
        Self { start, end }
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Restore the boundary invariant.
///
/// Dedupes, clips to `[start, end]`, sorts, and forces the first and last values
/// to `start` and `end`. Walking left to right, each interior boundary is pushed
/// to at least `min_gap` past its predecessor; boundaries that would leave the
/// final slot shorter than `min_gap` are dropped. The output is strictly
/// increasing whenever `start < end`.
pub fn clean_boundaries(raw: &[u32], start: u32, end: u32, min_gap: u32) -> Vec<u32> {
    if end <= start {
        return vec![start];
    }

    let mut interior: Vec<u32> = raw
        .iter()
        .copied()
        .filter(|b| *b > start && *b < end)
        .collect();
    interior.sort_unstable();
    interior.dedup();

    let mut out = Vec::with_capacity(interior.len() + 2);
    out.push(start);
    let mut prev = start;
    for b in interior {
        let b = b.max(prev + min_gap);
        if b + min_gap > end {
            break;
        }
        out.push(b);
        prev = b;
    }
    out.push(end);
    out
}

/// Replace one weekday's slots inside a week-wide list, keeping other days.
/// The result is ordered by weekday, then start time.
pub fn replace_day(all: &[DaySlot], day: &str, new_slots: Vec<DaySlot>) -> Vec<DaySlot> {
    let mut out: Vec<DaySlot> = all.iter().filter(|s| s.day != day).cloned().collect();
    out.extend(new_slots);
    out.sort_by_key(|s| {
        let day_idx = WEEKDAY_NAMES
            .iter()
            .position(|d| *d == s.day)
            .unwrap_or(WEEKDAY_NAMES.len());
        (day_idx, parse_hhmm(&s.start_time).unwrap_or(u32::MAX))
    });
    out
}

/// Stateless editor for weekday templates sharing one preferred range.
#[derive(Debug, Clone)]
pub struct TemplateEditor {
    range: DayRange,
    task_types: Vec<TaskType>,
    config: EngineConfig,
}

impl TemplateEditor {
    pub fn new(range: DayRange, task_types: Vec<TaskType>) -> Self {
        Self {
            range,
            task_types,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn range(&self) -> DayRange {
        self.range
    }

    fn min_gap(&self) -> u32 {
        self.config.min_slot_minutes
    }

    /// Canonical slot list for `day` from arbitrary raw records.
    ///
    /// Records for other days, malformed times, and empty intervals are ignored.
    /// Each rebuilt slot inherits metadata from the first record that exactly
    /// matches its interval, else from the first record that contains it, else
    /// gets defaults. Only exact matches keep their id.
    pub fn sanitize(&self, raw: &[DaySlot], day: &str) -> Vec<DaySlot> {
        let parsed: Vec<(u32, u32, &DaySlot)> = raw
            .iter()
            .filter(|s| s.day == day)
            .filter_map(|s| s.minutes().map(|(a, b)| (a, b, s)))
            .collect();

        let mut edges = vec![self.range.start, self.range.end];
        for (a, b, _) in &parsed {
            edges.push(*a);
            edges.push(*b);
        }
        let bounds = clean_boundaries(&edges, self.range.start, self.range.end, self.min_gap());

        bounds
            .windows(2)
            .map(|w| {
                let (start, end) = (w[0], w[1]);
                if let Some((_, _, slot)) = parsed.iter().find(|(a, b, _)| *a == start && *b == end) {
                    return DaySlot {
                        day: day.to_string(),
                        start_time: format_hhmm(start),
                        end_time: format_hhmm(end),
                        ..(*slot).clone()
                    };
                }
                match parsed.iter().find(|(a, b, _)| *a <= start && *b >= end) {
                    Some((_, _, slot)) => slot.respan(day, start, end),
                    None => self.default_slot(day, start, end),
                }
            })
            .collect()
    }

    /// Boundary set of the sanitized day.
    pub fn boundaries(&self, slots: &[DaySlot], day: &str) -> Vec<u32> {
        boundaries_of(&self.sanitize(slots, day))
    }

    /// One slot spanning the whole range.
    pub fn reset_day(&self, day: &str) -> Vec<DaySlot> {
        self.sanitize(&[], day)
    }

    /// Split the slot under `minute` at that point.
    ///
    /// `minute` is snapped to the 15-minute grid first; the range check uses the
    /// raw value, the proximity check and the cut use the snapped one.
    pub fn insert_boundary(
        &self,
        slots: &[DaySlot],
        day: &str,
        minute: u32,
    ) -> Result<Vec<DaySlot>, TemplateError> {
        let current = self.sanitize(slots, day);
        if minute <= self.range.start || minute >= self.range.end {
            debug!(day, minute, "boundary insert outside range");
            return Err(TemplateError::OutsideRange {
                minute,
                start: self.range.start,
                end: self.range.end,
            });
        }

        let minute = snap_minutes(minute, self.config.snap_minutes);
        let bounds = boundaries_of(&current);
        if bounds.iter().any(|b| b.abs_diff(minute) < self.min_gap()) {
            debug!(day, minute, "boundary insert too close to existing boundary");
            return Err(TemplateError::TooCloseToBoundary {
                minute,
                min_gap: self.min_gap(),
            });
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        for slot in &current {
            match slot.minutes() {
                Some((a, b)) if a < minute && minute < b => {
                    next.push(slot.respan(day, a, minute));
                    next.push(slot.respan(day, minute, b));
                }
                _ => next.push(slot.clone()),
            }
        }
        Ok(self.sanitize(&next, day))
    }

    /// Start dragging interior boundary `index` (1..len-1 of [`Self::boundaries`]).
    pub fn begin_drag(
        &self,
        slots: &[DaySlot],
        day: &str,
        index: usize,
    ) -> Result<BoundaryDrag<'_>, TemplateError> {
        let current = self.sanitize(slots, day);
        let bounds = boundaries_of(&current);
        if index == 0 || index + 1 >= bounds.len() {
            return Err(TemplateError::NotDraggable { index });
        }
        Ok(BoundaryDrag {
            editor: self,
            day: day.to_string(),
            index,
            lower: bounds[index - 1] + self.min_gap(),
            upper: bounds[index + 1] - self.min_gap(),
            preview: bounds[index],
            slots: current,
        })
    }

    /// Combine a slot with its successor, or its predecessor if it is the last.
    pub fn merge_slot(
        &self,
        slots: &[DaySlot],
        day: &str,
        slot_id: &str,
    ) -> Result<Vec<DaySlot>, TemplateError> {
        let current = self.sanitize(slots, day);
        let idx = position_of(&current, slot_id)?;
        if current.len() < 2 {
            return Err(TemplateError::NoNeighbor(slot_id.to_string()));
        }
        let (i, j) = if idx + 1 < current.len() {
            (idx, idx + 1)
        } else {
            (idx - 1, idx)
        };

        let merged = merge_pair(&current[i], &current[j]);
        let mut next = Vec::with_capacity(current.len() - 1);
        next.extend_from_slice(&current[..i]);
        next.push(merged);
        next.extend_from_slice(&current[j + 1..]);
        Ok(self.sanitize(&next, day))
    }

    /// Remove a slot; its predecessor (or successor, for the first slot) absorbs
    /// the freed interval. The only slot of a day cannot be deleted.
    pub fn delete_slot(
        &self,
        slots: &[DaySlot],
        day: &str,
        slot_id: &str,
    ) -> Result<Vec<DaySlot>, TemplateError> {
        let mut next = self.sanitize(slots, day);
        let idx = position_of(&next, slot_id)?;
        if next.len() == 1 {
            debug!(day, slot_id, "refusing to delete the only slot");
            return Err(TemplateError::LastSlot);
        }

        let removed = next.remove(idx);
        if idx > 0 {
            next[idx - 1].end_time = removed.end_time;
        } else {
            next[0].start_time = removed.start_time;
        }
        Ok(self.sanitize(&next, day))
    }

    /// `n` evenly spaced slots, cut points snapped and kept a minimum slot apart.
    pub fn split_equal(
        &self,
        slots: &[DaySlot],
        day: &str,
        n: u32,
    ) -> Result<Vec<DaySlot>, TemplateError> {
        if n == 0 {
            return Err(TemplateError::InvalidSplit("slot count must be at least 1".into()));
        }
        let current = self.sanitize(slots, day);
        let cuts = self.equal_cuts(n);
        Ok(self.apply_boundaries(&current, day, &cuts))
    }

    /// Slots of `minutes` each from the range start; the remainder forms the last slot.
    pub fn split_interval(
        &self,
        slots: &[DaySlot],
        day: &str,
        minutes: u32,
    ) -> Result<Vec<DaySlot>, TemplateError> {
        if minutes == 0 {
            return Err(TemplateError::InvalidSplit("interval must be positive".into()));
        }
        let current = self.sanitize(slots, day);
        let minutes = minutes.min(self.range.duration());
        let step = snap_minutes(minutes, self.config.snap_minutes).max(self.min_gap());

        let mut cuts = vec![self.range.start];
        let mut b = self.range.start + step;
        while b < self.range.end {
            cuts.push(b);
            b += step;
        }
        cuts.push(self.range.end);
        Ok(self.apply_boundaries(&current, day, &cuts))
    }

    /// Morning / Afternoon / Evening at 12:00 and 17:00, or a 3-way equal split
    /// when those cut points leave no room. Slots already spanning one of the
    /// three parts keep their label.
    pub fn natural_day(&self, slots: &[DaySlot], day: &str) -> Vec<DaySlot> {
        let current = self.sanitize(slots, day);
        let (start, end, min) = (self.range.start, self.range.end, self.min_gap());

        let fits = start + min <= NOON && NOON + min <= EVENING && EVENING + min <= end;
        if !fits {
            debug!(day, start, end, "natural-day cuts do not fit; splitting in three");
            let cuts = self.equal_cuts(3);
            return self.apply_boundaries(&current, day, &cuts);
        }

        let mut next = self.apply_boundaries(&current, day, &[start, NOON, EVENING, end]);
        for (slot, label) in next.iter_mut().zip(["Morning", "Afternoon", "Evening"]) {
            let kept = current
                .iter()
                .any(|c| c.id == slot.id && c.minutes() == slot.minutes());
            if !kept {
                slot.label = label.to_string();
            }
        }
        next
    }

    /// Sanitized copy of `from`'s slots onto `to`, with fresh ids.
    pub fn copy_day(&self, slots: &[DaySlot], from: &str, to: &str) -> Vec<DaySlot> {
        self.sanitize(slots, from)
            .into_iter()
            .map(|s| DaySlot {
                id: new_slot_id(),
                day: to.to_string(),
                ..s
            })
            .collect()
    }

    fn equal_cuts(&self, n: u32) -> Vec<u32> {
        let (start, end, min) = (self.range.start, self.range.end, self.min_gap());
        let total = self.range.duration();
        let n = n.min(total / min).max(1);

        let mut cuts = vec![start];
        let mut prev = start;
        for i in 1..n {
            let ideal = start + total * i / n;
            let b = snap_minutes(ideal, self.config.snap_minutes)
                .max(prev + min)
                .min(end.saturating_sub((n - i) * min));
            if b <= prev || b + min > end {
                break;
            }
            cuts.push(b);
            prev = b;
        }
        cuts.push(end);
        cuts
    }

    /// Rebuild the day from `raw` boundaries. Slots that keep their exact interval
    /// keep everything; others take metadata from the slot covering their start.
    fn apply_boundaries(&self, current: &[DaySlot], day: &str, raw: &[u32]) -> Vec<DaySlot> {
        let bounds = clean_boundaries(raw, self.range.start, self.range.end, self.min_gap());
        let next: Vec<DaySlot> = bounds
            .windows(2)
            .map(|w| {
                let (start, end) = (w[0], w[1]);
                let exact = current.iter().find(|s| s.minutes() == Some((start, end)));
                if let Some(slot) = exact {
                    return slot.clone();
                }
                let covering = current
                    .iter()
                    .find(|s| s.minutes().is_some_and(|(a, b)| a <= start && start < b));
                match covering {
                    Some(slot) => slot.respan(day, start, end),
                    None => self.default_slot(day, start, end),
                }
            })
            .collect();
        self.sanitize(&next, day)
    }

    fn default_slot(&self, day: &str, start: u32, end: u32) -> DaySlot {
        let (slot_type, label, color) = match self.task_types.first() {
            Some(tt) => (Some(tt.id.clone()), tt.name.clone(), tt.color.clone()),
            None => (None, PLACEHOLDER_LABEL.to_string(), PLACEHOLDER_COLOR.to_string()),
        };
        DaySlot {
            id: new_slot_id(),
            day: day.to_string(),
            start_time: format_hhmm(start),
            end_time: format_hhmm(end),
            slot_type,
            label,
            flexibility: Flexibility::Fixed,
            color,
            allowed_tags: BTreeSet::new(),
        }
    }
}

/// An in-progress boundary drag.
///
/// The preview value lives here, outside the canonical slot list. Nothing is
/// written back until [`BoundaryDrag::commit`]; dropping the drag discards it.
#[derive(Debug)]
pub struct BoundaryDrag<'a> {
    editor: &'a TemplateEditor,
    day: String,
    index: usize,
    lower: u32,
    upper: u32,
    preview: u32,
    slots: Vec<DaySlot>,
}

impl BoundaryDrag<'_> {
    /// Move the pointer; returns the snapped, clamped preview minute.
    pub fn preview(&mut self, minute: u32) -> u32 {
        let snapped = snap_minutes(minute, self.editor.config.snap_minutes);
        self.preview = snapped.clamp(self.lower, self.upper);
        self.preview
    }

    pub fn current(&self) -> u32 {
        self.preview
    }

    /// Allowed `(lower, upper)` positions for the dragged boundary.
    pub fn limits(&self) -> (u32, u32) {
        (self.lower, self.upper)
    }

    /// Pointer released: the day's new slot list.
    pub fn commit(self) -> Vec<DaySlot> {
        let mut next = self.slots;
        let at = format_hhmm(self.preview);
        next[self.index - 1].end_time = at.clone();
        next[self.index].start_time = at;
        self.editor.sanitize(&next, &self.day)
    }
}

fn boundaries_of(slots: &[DaySlot]) -> Vec<u32> {
    let mut out = Vec::with_capacity(slots.len() + 1);
    for (i, slot) in slots.iter().enumerate() {
        if let Some((a, b)) = slot.minutes() {
            if i == 0 {
                out.push(a);
            }
            out.push(b);
        }
    }
    out
}

fn position_of(slots: &[DaySlot], slot_id: &str) -> Result<usize, TemplateError> {
    slots
        .iter()
        .position(|s| s.id == slot_id)
        .ok_or_else(|| TemplateError::SlotNotFound(slot_id.to_string()))
}

fn merge_pair(first: &DaySlot, second: &DaySlot) -> DaySlot {
    let (slot_type, label, color) = if first.slot_type == second.slot_type {
        (first.slot_type.clone(), first.label.clone(), first.color.clone())
    } else if first.slot_type.is_some() {
        (first.slot_type.clone(), MERGED_SLOT_LABEL.to_string(), first.color.clone())
    } else {
        (second.slot_type.clone(), MERGED_SLOT_LABEL.to_string(), second.color.clone())
    };

    DaySlot {
        id: first.id.clone(),
        day: first.day.clone(),
        start_time: first.start_time.clone(),
        end_time: second.end_time.clone(),
        slot_type,
        label,
        flexibility: Flexibility::Fixed,
        color,
        allowed_tags: first.allowed_tags.union(&second.allowed_tags).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: &str = "Monday";

    fn editor() -> TemplateEditor {
        let cfg = EngineConfig::default();
        TemplateEditor::new(DayRange::from_hhmm("06:00", "23:00", &cfg), vec![
            TaskType::new("deep", "Deep work").with_color("#111111"),
            TaskType::new("admin", "Admin").with_color("#222222"),
        ])
    }

    fn slot(id: &str, start: &str, end: &str, slot_type: Option<&str>, label: &str) -> DaySlot {
        DaySlot {
            id: id.to_string(),
            day: DAY.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            slot_type: slot_type.map(str::to_string),
            label: label.to_string(),
            flexibility: Flexibility::Fixed,
            color: String::new(),
            allowed_tags: BTreeSet::new(),
        }
    }

    fn spans(slots: &[DaySlot]) -> Vec<(String, String)> {
        slots
            .iter()
            .map(|s| (s.start_time.clone(), s.end_time.clone()))
            .collect()
    }

    fn span(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_clean_boundaries_sorts_dedupes_and_forces_ends() {
        let out = clean_boundaries(&[700, 100, 700, 2000, 500], 360, 1380, 15);
        assert_eq!(out, vec![360, 500, 700, 1380]);
    }

    #[test]
    fn test_clean_boundaries_pushes_crowded_cuts_forward() {
        let out = clean_boundaries(&[365, 370, 400], 360, 1380, 15);
        assert_eq!(out, vec![360, 375, 390, 405, 1380]);
    }

    #[test]
    fn test_clean_boundaries_drops_cuts_that_starve_the_last_slot() {
        let out = clean_boundaries(&[1370, 1375], 360, 1380, 15);
        assert_eq!(out, vec![360, 1380]);
    }

    #[test]
    fn test_clean_boundaries_leaves_valid_input_alone() {
        let valid = vec![360, 600, 615, 1380];
        assert_eq!(clean_boundaries(&valid, 360, 1380, 15), valid);
    }

    #[test]
    fn test_range_falls_back_on_malformed_or_short_input() {
        let cfg = EngineConfig::default();
        assert_eq!(DayRange::from_hhmm("7am", "22:00", &cfg), DayRange { start: 360, end: 1320 });
        assert_eq!(DayRange::from_hhmm("12:00", "12:10", &cfg), DayRange { start: 360, end: 1380 });
    }

    #[test]
    fn test_empty_day_becomes_one_full_slot_of_first_type() {
        let out = editor().sanitize(&[], DAY);
        assert_eq!(spans(&out), vec![span("06:00", "23:00")]);
        assert_eq!(out[0].slot_type.as_deref(), Some("deep"));
        assert_eq!(out[0].label, "Deep work");
        assert_eq!(out[0].color, "#111111");
    }

    #[test]
    fn test_placeholder_when_no_task_types() {
        let ed = TemplateEditor::new(DayRange { start: 480, end: 1020 }, vec![]);
        let out = ed.reset_day(DAY);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].slot_type, None);
        assert_eq!(out[0].label, PLACEHOLDER_LABEL);
    }

    #[test]
    fn test_sanitize_fills_gaps_and_inherits_from_exact_or_containing() {
        let raw = vec![
            slot("a", "08:00", "10:00", Some("admin"), "Email"),
            slot("b", "09:00", "12:00", Some("deep"), "Focus"),
            slot("bad", "9:00", "10:00", None, "Malformed"),
            slot("zero", "13:00", "13:00", None, "Empty"),
            DaySlot {
                day: "Tuesday".into(),
                ..slot("other", "06:00", "07:00", None, "Other day")
            },
        ];
        let out = editor().sanitize(&raw, DAY);

        assert_eq!(
            spans(&out),
            vec![
                span("06:00", "08:00"),
                span("08:00", "09:00"),
                span("09:00", "10:00"),
                span("10:00", "12:00"),
                span("12:00", "23:00"),
            ]
        );
        // gap before first slot gets defaults
        assert_eq!(out[0].label, "Deep work");
        // [08:00, 09:00) and [09:00, 10:00) are contained in "a"; first match wins
        assert_eq!(out[1].label, "Email");
        assert_eq!(out[2].label, "Email");
        assert_ne!(out[1].id, "a");
        // [10:00, 12:00) is contained only in "b"
        assert_eq!(out[3].label, "Focus");
        assert_eq!(out[4].label, "Deep work");
    }

    #[test]
    fn test_sanitize_keeps_exact_matches_and_is_idempotent() {
        let raw = vec![
            slot("a", "06:00", "09:00", Some("admin"), "Morning admin"),
            slot("b", "09:00", "09:10", Some("deep"), "Too short"),
            slot("c", "09:10", "23:00", Some("deep"), "Rest"),
        ];
        let ed = editor();
        let once = ed.sanitize(&raw, DAY);
        assert_eq!(once[0].id, "a");
        assert_eq!(spans(&once), vec![span("06:00", "09:00"), span("09:00", "09:15"), span("09:15", "23:00")]);
        assert_eq!(ed.sanitize(&once, DAY), once);
    }

    #[test]
    fn test_insert_splits_the_containing_slot() {
        let ed = editor();
        let base = vec![slot("a", "06:00", "23:00", Some("admin"), "Admin")];
        let out = ed.insert_boundary(&base, DAY, 12 * 60 + 4).unwrap();
        assert_eq!(spans(&out), vec![span("06:00", "12:00"), span("12:00", "23:00")]);
        assert!(out.iter().all(|s| s.label == "Admin"));
        assert_ne!(out[0].id, out[1].id);
    }

    #[test]
    fn test_insert_near_existing_boundary_is_rejected() {
        let ed = editor();
        let base = vec![
            slot("a", "06:00", "12:00", None, "A"),
            slot("b", "12:00", "23:00", None, "B"),
        ];
        assert_eq!(
            ed.insert_boundary(&base, DAY, 12 * 60 + 5),
            Err(TemplateError::TooCloseToBoundary { minute: 720, min_gap: 15 })
        );
        assert!(matches!(
            ed.insert_boundary(&base, DAY, 6 * 60 + 5),
            Err(TemplateError::TooCloseToBoundary { .. })
        ));
        assert!(matches!(
            ed.insert_boundary(&base, DAY, 23 * 60 + 30),
            Err(TemplateError::OutsideRange { .. })
        ));
    }

    #[test]
    fn test_drag_clamps_between_neighbors_and_commits_on_release() {
        let ed = editor();
        let base = vec![
            slot("a", "06:00", "09:00", Some("admin"), "A"),
            slot("b", "09:00", "12:00", Some("deep"), "B"),
            slot("c", "12:00", "23:00", Some("deep"), "C"),
        ];
        let mut drag = ed.begin_drag(&base, DAY, 1).unwrap();
        assert_eq!(drag.limits(), (375, 705));
        assert_eq!(drag.preview(200), 375);
        assert_eq!(drag.preview(2000), 705);
        assert_eq!(drag.preview(10 * 60 + 8), 615);

        let out = drag.commit();
        assert_eq!(
            spans(&out),
            vec![span("06:00", "10:15"), span("10:15", "12:00"), span("12:00", "23:00")]
        );
        assert_eq!((out[0].id.as_str(), out[1].id.as_str()), ("a", "b"));
        assert_eq!(out[1].label, "B");
    }

    #[test]
    fn test_drag_preview_saturates_on_huge_pointer_minute() {
        let ed = editor();
        let base = ed.split_equal(&[], DAY, 2).unwrap();
        let mut drag = ed.begin_drag(&base, DAY, 1).unwrap();
        let (_, upper) = drag.limits();
        assert_eq!(drag.preview(u32::MAX), upper);
        assert_eq!(drag.commit()[1].start_time, format_hhmm(upper));
    }

    #[test]
    fn test_dropped_drag_leaves_state_untouched() {
        let ed = editor();
        let base = ed.insert_boundary(&ed.reset_day(DAY), DAY, 600).unwrap();
        {
            let mut drag = ed.begin_drag(&base, DAY, 1).unwrap();
            drag.preview(700);
        }
        assert_eq!(ed.boundaries(&base, DAY), vec![360, 600, 1380]);
        assert!(matches!(ed.begin_drag(&base, DAY, 0), Err(TemplateError::NotDraggable { index: 0 })));
        assert!(matches!(ed.begin_drag(&base, DAY, 2), Err(TemplateError::NotDraggable { index: 2 })));
    }

    #[test]
    fn test_merge_same_type_keeps_label_and_unions_tags() {
        let ed = editor();
        let mut a = slot("a", "06:00", "12:00", Some("deep"), "Focus");
        a.allowed_tags = BTreeSet::from(["x".to_string()]);
        let mut b = slot("b", "12:00", "23:00", Some("deep"), "Focus 2");
        b.allowed_tags = BTreeSet::from(["y".to_string()]);
        let out = ed.merge_slot(&[a, b], DAY, "a").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
        assert_eq!(out[0].label, "Focus");
        assert_eq!(out[0].allowed_tags, BTreeSet::from(["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_merge_last_slot_uses_predecessor_and_mixed_types_fall_back() {
        let ed = editor();
        let base = vec![
            slot("a", "06:00", "09:00", Some("admin"), "A"),
            slot("b", "09:00", "12:00", None, "B"),
            slot("c", "12:00", "23:00", Some("deep"), "C"),
        ];
        let out = ed.merge_slot(&base, DAY, "c").unwrap();
        assert_eq!(spans(&out), vec![span("06:00", "09:00"), span("09:00", "23:00")]);
        assert_eq!(out[1].slot_type.as_deref(), Some("deep"));
        assert_eq!(out[1].label, MERGED_SLOT_LABEL);

        let only = ed.reset_day(DAY);
        let id = only[0].id.clone();
        assert_eq!(ed.merge_slot(&only, DAY, &id), Err(TemplateError::NoNeighbor(id)));
    }

    #[test]
    fn test_deleting_the_only_slot_is_a_no_op_failure() {
        let ed = editor();
        let only = ed.reset_day(DAY);
        let before = only.clone();
        assert_eq!(ed.delete_slot(&only, DAY, &only[0].id), Err(TemplateError::LastSlot));
        assert_eq!(only, before);
    }

    #[test]
    fn test_delete_gives_time_to_predecessor_or_successor() {
        let ed = editor();
        let base = vec![
            slot("a", "06:00", "09:00", None, "A"),
            slot("b", "09:00", "12:00", None, "B"),
            slot("c", "12:00", "23:00", None, "C"),
        ];
        let out = ed.delete_slot(&base, DAY, "b").unwrap();
        assert_eq!(spans(&out), vec![span("06:00", "12:00"), span("12:00", "23:00")]);
        assert_eq!(out[0].id, "a");

        let out = ed.delete_slot(&base, DAY, "a").unwrap();
        assert_eq!(spans(&out), vec![span("06:00", "12:00"), span("12:00", "23:00")]);
        assert_eq!(out[0].id, "b");

        assert_eq!(ed.delete_slot(&base, DAY, "zz"), Err(TemplateError::SlotNotFound("zz".into())));
    }

    #[test]
    fn test_split_equal_three_uses_snapped_cuts() {
        let ed = editor();
        let out = ed.split_equal(&[], DAY, 3).unwrap();
        assert_eq!(ed.boundaries(&out, DAY), vec![360, 705, 1035, 1380]);
        assert_eq!(
            spans(&out),
            vec![span("06:00", "11:45"), span("11:45", "17:15"), span("17:15", "23:00")]
        );
    }

    #[test]
    fn test_split_equal_is_bounded_by_minimum_duration() {
        let ed = TemplateEditor::new(DayRange { start: 540, end: 600 }, vec![]);
        let out = ed.split_equal(&[], DAY, 10).unwrap();
        assert_eq!(ed.boundaries(&out, DAY), vec![540, 555, 570, 585, 600]);
        assert!(matches!(ed.split_equal(&[], DAY, 0), Err(TemplateError::InvalidSplit(_))));
    }

    #[test]
    fn test_split_interval_leaves_remainder_in_last_slot() {
        let ed = editor();
        let base = vec![slot("a", "06:00", "23:00", Some("admin"), "Admin")];
        let out = ed.split_interval(&base, DAY, 120).unwrap();
        assert_eq!(out.len(), 9);
        assert_eq!(out[8].duration_minutes(), Some(60));
        assert!(out.iter().all(|s| s.slot_type.as_deref() == Some("admin")));
    }

    #[test]
    fn test_split_interval_longer_than_range_keeps_one_slot() {
        let ed = editor();
        let out = ed.split_interval(&[], DAY, u32::MAX).unwrap();
        assert_eq!(spans(&out), vec![span("06:00", "23:00")]);
        let out = ed.split_interval(&[], DAY, 1020).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_natural_day_keeps_labels_of_exact_parts() {
        let ed = editor();
        let base = vec![
            slot("a", "06:00", "10:00", Some("admin"), "Inbox"),
            slot("b", "10:00", "12:00", Some("deep"), "Focus"),
            slot("c", "12:00", "17:00", Some("deep"), "Lunch and build"),
            slot("d", "17:00", "23:00", None, "Free"),
        ];
        let out = ed.natural_day(&base, DAY);
        let labels: Vec<_> = out.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Morning", "Lunch and build", "Free"]);
        assert_eq!((out[1].id.as_str(), out[2].id.as_str()), ("c", "d"));
        assert_eq!(ed.natural_day(&out, DAY), out);
    }

    #[test]
    fn test_natural_day_labels_three_parts() {
        let ed = editor();
        let out = ed.natural_day(&[], DAY);
        assert_eq!(
            spans(&out),
            vec![span("06:00", "12:00"), span("12:00", "17:00"), span("17:00", "23:00")]
        );
        let labels: Vec<_> = out.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Morning", "Afternoon", "Evening"]);
    }

    #[test]
    fn test_natural_day_falls_back_to_equal_split() {
        let ed = TemplateEditor::new(DayRange { start: 780, end: 1380 }, vec![]);
        let out = ed.natural_day(&[], DAY);
        assert_eq!(ed.boundaries(&out, DAY), vec![780, 975, 1185, 1380]);
    }

    #[test]
    fn test_copy_day_allocates_new_ids() {
        let ed = editor();
        let monday = ed.natural_day(&[], DAY);
        let tuesday = ed.copy_day(&monday, DAY, "Tuesday");
        assert_eq!(spans(&tuesday), spans(&monday));
        assert!(tuesday.iter().all(|s| s.day == "Tuesday"));
        assert!(tuesday.iter().zip(&monday).all(|(t, m)| t.id != m.id && t.label == m.label));
    }

    #[test]
    fn test_replace_day_swaps_one_day_and_orders_the_week() {
        let ed = editor();
        let tuesday = ed.reset_day("Tuesday");
        let monday = ed.natural_day(&[], DAY);
        let week = replace_day(&tuesday, DAY, monday.clone());
        assert_eq!(week.len(), 4);
        assert_eq!(week[..3], monday[..]);
        assert_eq!(week[3].day, "Tuesday");

        let week = replace_day(&week, DAY, ed.reset_day(DAY));
        assert_eq!(week.len(), 2);
    }
}

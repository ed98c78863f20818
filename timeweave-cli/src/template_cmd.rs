use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use timeweave_core::time::MINUTES_PER_DAY;
use timeweave_core::{DayRange, DaySlot, TemplateEditor, parse_hhmm, replace_day};
use tracing::info;

use crate::config::load_config;
use crate::input::{TemplateInput, read_json, require_weekday};

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template JSON: {slots, taskTypes, preferredRange: {start, end}}
    #[arg(long)]
    pub input: PathBuf,

    /// Weekday to edit (Monday..Sunday)
    #[arg(long)]
    pub day: String,

    #[command(subcommand)]
    pub op: TemplateCommand,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Normalize the day's slots so they tile the preferred range
    Sanitize,

    /// Replace the day with one slot spanning the whole range
    Reset,

    /// Split the slot under a minute of the day (snapped to 15)
    Insert {
        /// Minute of day, or HH:MM
        #[arg(long)]
        at: String,
    },

    /// Move an interior boundary; the position is snapped and clamped
    Drag {
        /// Boundary index (1 = between first and second slot)
        #[arg(long)]
        index: usize,

        /// Target minute of day, or HH:MM
        #[arg(long)]
        to: String,
    },

    /// Merge a slot with its neighbour
    Merge {
        #[arg(long)]
        slot: String,
    },

    /// Delete a slot; a neighbour absorbs its time
    Delete {
        #[arg(long)]
        slot: String,
    },

    /// Rebuild the day as N roughly equal slots
    SplitEqual {
        #[arg(long)]
        count: u32,
    },

    /// Rebuild the day as fixed-length slots
    SplitInterval {
        /// Slot length in minutes
        #[arg(long)]
        minutes: u32,
    },

    /// Morning / Afternoon / Evening
    NaturalDay,

    /// Copy this day's slots onto another weekday
    Copy {
        /// Target weekday
        #[arg(long)]
        to: String,
    },
}

pub fn run(args: TemplateArgs) -> Result<()> {
    require_weekday(&args.day)?;
    let input: TemplateInput = read_json(&args.input)?;
    input.validate().context("invalid template input")?;

    let cfg = load_config()?;
    let range = DayRange::from_hhmm(
        &input.preferred_range.start,
        &input.preferred_range.end,
        &cfg.engine,
    );
    let editor = TemplateEditor::new(range, input.task_types.clone()).with_config(cfg.engine);

    let week = apply(&editor, &input.slots, &args.day, args.op)?;
    println!("{}", serde_json::to_string_pretty(&week)?);
    Ok(())
}

/// Run one edit and return the full week with the touched day replaced.
fn apply(
    editor: &TemplateEditor,
    week: &[DaySlot],
    day: &str,
    op: TemplateCommand,
) -> Result<Vec<DaySlot>> {
    let (target, next) = match op {
        TemplateCommand::Sanitize => (day.to_string(), editor.sanitize(week, day)),
        TemplateCommand::Reset => (day.to_string(), editor.reset_day(day)),
        TemplateCommand::Insert { at } => {
            let minute = parse_minute(&at)?;
            let next = editor
                .insert_boundary(week, day, minute)
                .with_context(|| format!("insert boundary at {at} on {day}"))?;
            (day.to_string(), next)
        }
        TemplateCommand::Drag { index, to } => {
            let minute = parse_minute(&to)?;
            let mut drag = editor
                .begin_drag(week, day, index)
                .with_context(|| format!("drag boundary {index} on {day}"))?;
            let landed = drag.preview(minute);
            let (lower, upper) = drag.limits();
            info!(day, index, requested = minute, landed, lower, upper, "boundary dragged");
            (day.to_string(), drag.commit())
        }
        TemplateCommand::Merge { slot } => {
            let next = editor
                .merge_slot(week, day, &slot)
                .with_context(|| format!("merge slot {slot} on {day}"))?;
            (day.to_string(), next)
        }
        TemplateCommand::Delete { slot } => {
            let next = editor
                .delete_slot(week, day, &slot)
                .with_context(|| format!("delete slot {slot} on {day}"))?;
            (day.to_string(), next)
        }
        TemplateCommand::SplitEqual { count } => {
            let next = editor
                .split_equal(week, day, count)
                .with_context(|| format!("split {day} into {count}"))?;
            (day.to_string(), next)
        }
        TemplateCommand::SplitInterval { minutes } => {
            let next = editor
                .split_interval(week, day, minutes)
                .with_context(|| format!("split {day} every {minutes} minutes"))?;
            (day.to_string(), next)
        }
        TemplateCommand::NaturalDay => (day.to_string(), editor.natural_day(week, day)),
        TemplateCommand::Copy { to } => {
            require_weekday(&to)?;
            let next = editor.copy_day(week, day, &to);
            (to, next)
        }
    };
    Ok(replace_day(week, &target, next))
}

/// Accepts a bare minute count or `HH:MM`.
fn parse_minute(s: &str) -> Result<u32> {
    if let Some(m) = parse_hhmm(s) {
        return Ok(m);
    }
    let m = s
        .parse::<u32>()
        .with_context(|| format!("{s:?} is neither HH:MM nor a minute of the day"))?;
    if m > MINUTES_PER_DAY {
        bail!("minute {m} is past the end of the day");
    }
    Ok(m)
}

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use timeweave_core::{BatchScheduler, SlotFinder};
use tracing::debug;

mod config;
mod input;
mod logging;
mod state;
mod template_cmd;

use crate::config::{Config, config_path, init_config, load_config};
use crate::input::{BatchInput, read_json, resolve_now};

#[derive(Parser, Debug)]
#[command(
    name = "timeweave",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TIMEWEAVE_BUILD_SHA"), ")"),
    about = "Timeweave scheduling engine CLI (JSON in, JSON out)"
)]
struct Cli {
    /// Verbose engine logs on stderr (TIMEWEAVE_LOG overrides)
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place every task of the input in priority order
    Schedule {
        /// Batch JSON: {tasks, existingItems, taskTypes}
        #[arg(long)]
        input: PathBuf,

        /// Reference instant (RFC 3339); defaults to the wall clock
        #[arg(long)]
        now: Option<String>,

        /// IANA timezone; defaults to config.locale.timezone
        #[arg(long)]
        tz: Option<String>,
    },

    /// Earliest free start for one task of the input
    FindSlot {
        #[arg(long)]
        input: PathBuf,

        /// Task id to place
        #[arg(long)]
        task: String,

        #[arg(long)]
        now: Option<String>,

        #[arg(long)]
        tz: Option<String>,
    },

    /// Edit a weekday template
    Template(template_cmd::TemplateArgs),

    /// Engine and locale settings (~/.timeweave/config.toml)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug)?;

    match cli.command {
        Command::Schedule { input, now, tz } => schedule(&input, now.as_deref(), tz.as_deref()),
        Command::FindSlot {
            input,
            task,
            now,
            tz,
        } => find_slot(&input, &task, now.as_deref(), tz.as_deref()),
        Command::Template(args) => template_cmd::run(args),
        Command::Config { command } => match command {
            ConfigCommand::Init => init_config(),
            ConfigCommand::Show => {
                let cfg = load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                Ok(())
            }
            ConfigCommand::Path => {
                println!("{}", config_path()?.display());
                Ok(())
            }
        },
    }
}

fn finder_for(cfg: &Config, now: Option<&str>, tz: Option<&str>) -> Result<SlotFinder> {
    let tz: Tz = match tz {
        Some(name) => name
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown timezone {name:?}"))?,
        None => cfg.tz()?,
    };
    let now = resolve_now(now)?;
    debug!(%now, %tz, "slot finder ready");
    Ok(SlotFinder::new(tz, now).with_config(cfg.engine.clone()))
}

fn load_batch(path: &Path) -> Result<BatchInput> {
    let input: BatchInput = read_json(path)?;
    input.validate().context("invalid batch input")?;
    Ok(input)
}

fn schedule(path: &Path, now: Option<&str>, tz: Option<&str>) -> Result<()> {
    let cfg = load_config()?;
    let input = load_batch(path)?;
    let scheduler = BatchScheduler::new(finder_for(&cfg, now, tz)?);

    let outcome = scheduler.schedule_tasks(&input.tasks, &input.existing_items, &input.task_types);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn find_slot(path: &Path, task_id: &str, now: Option<&str>, tz: Option<&str>) -> Result<()> {
    let cfg = load_config()?;
    let input = load_batch(path)?;
    let task = input.task(task_id)?;
    let finder = finder_for(&cfg, now, tz)?;

    let at = finder.find_first_available_slot(
        task,
        &input.existing_items,
        &input.task_types,
        finder.now(),
    );
    println!("{}", serde_json::to_string(&at)?);
    Ok(())
}

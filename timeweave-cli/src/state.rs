use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$TIMEWEAVE_HOME`, or `~/.timeweave`.
pub fn timeweave_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TIMEWEAVE_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".timeweave"))
}

pub fn ensure_timeweave_home() -> Result<PathBuf> {
    let dir = timeweave_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

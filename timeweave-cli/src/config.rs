use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use timeweave_core::EngineConfig;

use crate::state::{ensure_timeweave_home, timeweave_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub locale: LocaleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleSection {
    /// IANA zone used as "local" for work hours and `HH:MM` fields.
    pub timezone: String,
}

impl Default for LocaleSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        self.locale
            .timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone in config: {}", self.locale.timezone))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(timeweave_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).context("parse config.toml")?;
    cfg.engine
        .validate()
        .with_context(|| format!("validate {}", p.display()))?;
    cfg.tz()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_timeweave_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.engine, EngineConfig::default());
        assert_eq!(cfg.locale.timezone, "UTC");
    }

    #[test]
    fn test_partial_engine_section_overrides_only_given_keys() {
        let cfg: Config = toml::from_str(
            "[engine]\nwork_day_start_hour = 8\n\n[locale]\ntimezone = \"America/Chicago\"\n",
        )
        .unwrap();
        assert_eq!(cfg.engine.work_day_start_hour, 8);
        assert_eq!(cfg.engine.work_day_end_hour, 17);
        assert_eq!(cfg.tz().unwrap(), chrono_tz::America::Chicago);
    }

    #[test]
    fn test_bad_timezone_is_an_error() {
        let mut cfg = Config::default();
        cfg.locale.timezone = "Mars/Olympus".to_string();
        assert!(cfg.tz().is_err());
    }
}

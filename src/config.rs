use crate::error::ConfigError;
use crate::prelude::*;
use crate::service::{DEFAULT_DAYS_TO_KEEP, DEFAULT_RECENT_LIMIT};
use chrono::{FixedOffset, Offset, Utc};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// UTC offset used for every formatted timestamp, e.g. `+00:00` or `-05:00`.
    pub timezone: String,
    pub server: ServerSettings,
    pub sheet: SheetSettings,
    pub recent: RecentSettings,
    pub retention: RetentionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Use 400/500 for error responses instead of always answering 200.
    pub strict_status_codes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentSettings {
    pub default_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionSettings {
    pub enabled: bool,
    pub days_to_keep: u32,
    pub interval_secs: u64,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            .add_source(File::new("config/default", FileFormat::Toml).required(false))
            // Per-environment overrides are optional
            .add_source(File::new(&format!("config/{}", env), FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("STATUS_LOG")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Builds settings from a TOML string layered over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::from_builder(Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("timezone", "+00:00")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("server.strict_status_codes", false)?
            .set_default("sheet.path", "data/status_log.jsonl")?
            .set_default("recent.default_limit", DEFAULT_RECENT_LIMIT as i64)?
            .set_default("retention.enabled", false)?
            .set_default("retention.days_to_keep", i64::from(DEFAULT_DAYS_TO_KEEP))?
            .set_default("retention.interval_secs", 86_400_i64)?)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.utc_offset()?;
        if settings.retention.interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "retention.interval_secs must be greater than zero".into(),
            )
            .into());
        }
        Ok(settings)
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.timezone)
    }
}

pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return Ok(Utc.fix());
    }
    trimmed.parse::<FixedOffset>().map_err(|e| {
        ConfigError::InvalidValue(format!("timezone {:?}: {}", value, e)).into()
    })
}

//! `newmoon.toml` loading.
//!
//! Every section and field is optional; missing values take the defaults
//! below. An explicit `--config` path must exist, while the implicit
//! `newmoon.toml` in the working directory is used only when present.

use std::f64::consts::{FRAC_PI_4, PI};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use luna_core::DEFAULT_SOURCES;
use luna_search::SearchConfig;
use luna_time::{DeltaTModel, SECONDS_PER_DAY, TimeConverter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "newmoon.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ephemeris: EphemerisSection,
    pub search: SearchSection,
    pub poll: PollSection,
    pub time: TimeSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EphemerisSection {
    /// DE files tried in order.
    pub sources: Vec<PathBuf>,
}

impl Default for EphemerisSection {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(PathBuf::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub step_seconds: f64,
    pub tight_threshold_rad: f64,
    pub coarse_threshold_rad: f64,
    pub refine: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            step_seconds: 60.0,
            tight_threshold_rad: PI / 16.0,
            coarse_threshold_rad: FRAC_PI_4,
            refine: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollSection {
    /// Pause between watch cycles.
    pub interval_secs: u64,
    /// Each watch cycle resumes this long after the last new moon.
    pub resume_offset_hours: f64,
}

impl Default for PollSection {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            resume_offset_hours: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeSection {
    pub delta_t: DeltaTSetting,
}

/// `delta_t = "table"` or a fixed number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DeltaTSetting {
    Seconds(f64),
    Named(DeltaTName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaTName {
    Table,
}

impl Default for DeltaTSetting {
    fn default() -> Self {
        Self::Seconds(luna_time::DEFAULT_DELTA_T_SECONDS)
    }
}

impl Config {
    /// Load from `explicit`, else `newmoon.toml` if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ephemeris.sources.is_empty() {
            return Err(ConfigError::Invalid("ephemeris.sources must not be empty"));
        }
        if self.ephemeris.sources.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("ephemeris.sources must not contain empty paths"));
        }
        if !self.poll.resume_offset_hours.is_finite() || self.poll.resume_offset_hours < 0.0 {
            return Err(ConfigError::Invalid("poll.resume_offset_hours must be >= 0"));
        }
        if let DeltaTSetting::Seconds(s) = self.time.delta_t {
            if !s.is_finite() {
                return Err(ConfigError::Invalid("time.delta_t must be finite"));
            }
        }
        self.search_config()
            .validate()
            .map_err(ConfigError::Invalid)
    }

    /// New-moon search parameters with this file's step and thresholds.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::new_moon()
            .with_step_days(self.search.step_seconds / SECONDS_PER_DAY)
            .with_time(self.time_converter());
        config.tight_threshold = self.search.tight_threshold_rad;
        config.coarse_threshold = self.search.coarse_threshold_rad;
        config.refine = self.search.refine;
        config
    }

    /// Full-moon parameters: this file's step, the preset thresholds.
    pub fn full_moon_config(&self) -> SearchConfig {
        let mut config = SearchConfig::full_moon()
            .with_step_days(self.search.step_seconds / SECONDS_PER_DAY)
            .with_time(self.time_converter());
        config.refine = self.search.refine;
        config
    }

    pub fn time_converter(&self) -> TimeConverter {
        match self.time.delta_t {
            DeltaTSetting::Seconds(s) => TimeConverter::new(DeltaTModel::Fixed(s)),
            DeltaTSetting::Named(DeltaTName::Table) => TimeConverter::with_table(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn resume_offset_days(&self) -> f64 {
        self.poll.resume_offset_hours / 24.0
    }
}

//! Scenario configuration.
//!
//! A scenario is a TOML file declaring the categories, whether connections
//! are directed, the incompatibility rules, and how the transcript is played
//! back. Structural validation (names, counts, rule ids) happens when the
//! scenario is handed to a stage; this crate only reads and parses.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use stagewalk_types::{CategorySpec, Direction};

/// Environment variable naming a scenario file when no path argument is given.
pub const SCENARIO_ENV: &str = "STAGEWALK_SCENARIO";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse scenario at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    /// One human-readable line per batch.
    #[default]
    Text,
    /// One JSON object per batch.
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Pause after each batch, in milliseconds. Default: 0.
    #[serde(default)]
    pub settle_ms: u64,
    #[serde(default)]
    pub format: TranscriptFormat,
}

impl PlaybackConfig {
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Forward-only connections. Default: false (undirected).
    #[serde(default)]
    pub directed: bool,
    pub categories: Vec<CategorySpec>,
    /// Trigger utility id → utility ids it excludes while active.
    #[serde(default)]
    pub incompatibilities: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// Where a loaded scenario came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioSource {
    File(PathBuf),
    BuiltIn,
}

impl ScenarioConfig {
    /// Four categories A3, B2, C4, D3, undirected, with the
    /// `{A1: [B2, C1], B2: [D1, D2]}` rule set.
    #[must_use]
    pub fn builtin() -> Self {
        let incompatibilities = BTreeMap::from([
            ("A1".to_owned(), vec!["B2".to_owned(), "C1".to_owned()]),
            ("B2".to_owned(), vec!["D1".to_owned(), "D2".to_owned()]),
        ]);
        Self {
            directed: false,
            categories: vec![
                CategorySpec::new("A", 3),
                CategorySpec::new("B", 2),
                CategorySpec::new("C", 4),
                CategorySpec::new("D", 3),
            ],
            incompatibilities,
            playback: PlaybackConfig::default(),
        }
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        Direction::from_directed(self.directed)
    }
}

/// `~/.stagewalk`, if a home directory can be determined.
#[must_use]
pub fn stagewalk_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".stagewalk"))
}

#[must_use]
pub fn default_scenario_path() -> Option<PathBuf> {
    stagewalk_home().map(|home| home.join("scenario.toml"))
}

/// Where the log file may live, most preferred first: under
/// [`stagewalk_home`], then under `.stagewalk/` in the working directory.
#[must_use]
pub fn log_file_candidates() -> Vec<PathBuf> {
    log_file_candidates_from(stagewalk_home())
}

fn log_file_candidates_from(home: Option<PathBuf>) -> Vec<PathBuf> {
    home.into_iter()
        .chain([PathBuf::from(".stagewalk")])
        .map(|base| base.join("logs").join("stagewalk.log"))
        .collect()
}

/// Load the scenario named by `explicit`, else by `STAGEWALK_SCENARIO`, else
/// `~/.stagewalk/scenario.toml` if it exists, else the built-in scenario.
///
/// An explicitly named file that cannot be read is an error; a missing
/// default file is not.
pub fn load_scenario(
    explicit: Option<PathBuf>,
) -> Result<(ScenarioConfig, ScenarioSource), ConfigError> {
    let named = explicit.or_else(|| {
        env::var_os(SCENARIO_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });
    resolve_scenario(named, default_scenario_path())
}

fn resolve_scenario(
    named: Option<PathBuf>,
    fallback: Option<PathBuf>,
) -> Result<(ScenarioConfig, ScenarioSource), ConfigError> {
    if let Some(path) = named {
        let config = ScenarioConfig::load(&path)?;
        return Ok((config, ScenarioSource::File(path)));
    }

    if let Some(path) = fallback.filter(|p| p.exists()) {
        let config = ScenarioConfig::load(&path)?;
        return Ok((config, ScenarioSource::File(path)));
    }

    tracing::debug!("No scenario file found; using built-in scenario");
    Ok((ScenarioConfig::builtin(), ScenarioSource::BuiltIn))
}

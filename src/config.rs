use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid period: {0}")]
    Period(#[from] humantime::DurationError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// JSON-lines file of raw snapshots to replay.
    pub source: PathBuf,
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default)]
    pub pretty: bool,
}

fn default_period() -> String {
    "1s".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn period(&self) -> Result<Duration, ConfigError> {
        Ok(humantime::parse_duration(&self.period)?)
    }
}

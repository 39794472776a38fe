//! Pipeline configuration.
//!
//! Window sizes, forecast horizon and tie policy are defaults, not
//! constants: every field can be overridden from TOML or by the caller.
//!
//! ```toml
//! window = "1Y"
//!
//! [trend]
//! short_window = 10
//! long_window = 50
//! tie_policy = "three_way"
//!
//! [forecast]
//! horizon_days = 30
//! ```

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::forecast::ForecastConfig;
use crate::trend::TrendConfig;
use crate::window::TimeWindow;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Everything [`crate::pipeline::analyze`] needs besides the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub window: TimeWindow,
    pub trend: TrendConfig,
    pub forecast: ForecastConfig,
}

impl PipelineConfig {
    /// Load a config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

pub(crate) const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(v) => v,
        None => panic!("value must be non-zero"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::TiePolicy;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.window, TimeWindow::Max);
        assert_eq!(config.forecast.horizon_days.get(), 30);
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = PipelineConfig::from_toml(
            r#"
window = "6M"

[trend]
long_window = 20
tie_policy = "collapse_to_bearish"
"#,
        )
        .unwrap();
        assert_eq!(config.window, TimeWindow::SixMonths);
        assert_eq!(config.trend.short_window.get(), 10);
        assert_eq!(config.trend.long_window.get(), 20);
        assert_eq!(config.trend.tie_policy, TiePolicy::CollapseToBearish);
        assert_eq!(config.forecast.horizon_days.get(), 30);
    }

    #[test]
    fn zero_horizon_is_a_parse_error() {
        let err = PipelineConfig::from_toml("[forecast]\nhorizon_days = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_window_is_a_parse_error() {
        assert!(PipelineConfig::from_toml("window = \"2W\"").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let mut config = PipelineConfig::default();
        config.window = TimeWindow::OneYear;
        let text = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn from_file_reports_missing_path() {
        let err = PipelineConfig::from_file(Path::new("/nonexistent/trendcast.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trendcast.toml");
        std::fs::write(&path, "[forecast]\nhorizon_days = 7\n").unwrap();
        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.forecast.horizon_days.get(), 7);
    }
}

//! Dashboard configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::input::{DataSource, ParserConfig};
use crate::schema::ColumnMapping;

/// Environment variable overriding the data source.
pub const DATA_ENV: &str = "BIKESHARE_DATA";
/// Environment variable overriding the model directory.
pub const MODELS_ENV: &str = "BIKESHARE_MODELS";

/// Default data source: the merged day/hour file.
pub const DEFAULT_DATA: &str = "main_data.csv";

/// Everything a [`Dashboard`](crate::Dashboard) needs to load its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// The merged table, or the daily table when `hourly_source` is set.
    pub data_source: DataSource,
    /// Separate hourly table. When set, the two tables are normalized
    /// independently instead of from one merged file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_source: Option<DataSource>,
    /// Directory holding the four model artifacts.
    pub models_dir: PathBuf,
    pub columns: ColumnMapping,
    pub parser: ParserConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::parse(DEFAULT_DATA),
            hourly_source: None,
            models_dir: PathBuf::from("."),
            columns: ColumnMapping::default(),
            parser: ParserConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn new(data_source: impl Into<DataSource>) -> Self {
        Self {
            data_source: data_source.into(),
            ..Self::default()
        }
    }

    /// Read a JSON config file. Absent fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| BikeshareError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| BikeshareError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply `BIKESHARE_DATA` and `BIKESHARE_MODELS` when set.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var(DATA_ENV).ok().as_deref(),
            std::env::var(MODELS_ENV).ok().map(PathBuf::from),
        )
    }

    /// Apply explicit overrides; `None` keeps the current value.
    pub fn with_overrides(mut self, data: Option<&str>, models_dir: Option<PathBuf>) -> Self {
        if let Some(data) = data.filter(|d| !d.trim().is_empty()) {
            self.data_source = DataSource::parse(data.trim());
        }
        if let Some(dir) = models_dir {
            self.models_dir = dir;
        }
        self
    }

    pub fn with_hourly_source(mut self, source: impl Into<DataSource>) -> Self {
        self.hourly_source = Some(source.into());
        self
    }

    pub fn with_models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.models_dir = dir.into();
        self
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }
}

//! CLI command implementations.

pub mod models;
pub mod predict;
pub mod serve;
pub mod views;

use std::path::{Path, PathBuf};

use bikeshare::DashboardConfig;
use tracing::debug;

/// Resolve the dashboard configuration: the `--config` file (or defaults),
/// then the environment, then command-line flags.
pub fn resolve_config(
    config_file: Option<&Path>,
    source: Option<&str>,
    models_dir: Option<PathBuf>,
) -> Result<DashboardConfig, Box<dyn std::error::Error>> {
    let config = match config_file {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    }
    .with_env()
    .with_overrides(source, models_dir);

    debug!(
        source = %config.data_source,
        models_dir = %config.models_dir.display(),
        "Resolved configuration"
    );
    Ok(config)
}

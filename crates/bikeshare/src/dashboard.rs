//! The dashboard application context and public API.

use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::aggregate::DashboardViews;
use crate::cache::SourceCache;
use crate::config::DashboardConfig;
use crate::error::{BikeshareError, Result};
use crate::filter::FilterSpec;
use crate::input::{DataSource, Parser, SourceMetadata};
use crate::predict::{ARTIFACT_FILES, ModelBundle, Prediction, PredictionInput, PredictionMode, Predictor};
use crate::schema::{BikeTables, Normalizer, Season};

/// Dataset summary for building filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMeta {
    pub source: String,
    pub daily_rows: usize,
    pub hourly_rows: usize,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    /// Season code to label, for every labelled season.
    pub seasons: IndexMap<u8, String>,
    /// Weather code to label, for codes present in the daily table.
    pub weathers: IndexMap<u8, String>,
    /// Hash, format and load time of each parsed source.
    pub files: Vec<SourceMetadata>,
}

/// Owns the configuration and the process-wide caches of the normalized
/// tables and the loaded models.
///
/// All methods take `&self`; share one `Dashboard` behind an `Arc` to serve
/// concurrent readers from the same snapshots.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    parser: Parser,
    normalizer: Normalizer,
    tables: SourceCache<BikeTables>,
    models: SourceCache<Predictor>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let normalizer = Normalizer::with_columns(config.columns.clone());
        Self {
            config,
            parser,
            normalizer,
            tables: SourceCache::new(),
            models: SourceCache::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The normalized tables, loaded once per source and reused until the
    /// source changes.
    pub fn tables(&self) -> Result<Arc<BikeTables>> {
        let primary = &self.config.data_source;
        let (key, fingerprint) = match &self.config.hourly_source {
            Some(hourly) => (
                format!("{}+{}", primary.identity(), hourly.identity()),
                format!("{}+{}", primary.fingerprint()?, hourly.fingerprint()?),
            ),
            None => (primary.identity(), primary.fingerprint()?),
        };

        self.tables
            .get_or_try_load(&key, &fingerprint, || self.load_tables())
    }

    fn load_tables(&self) -> Result<BikeTables> {
        let tables = match &self.config.hourly_source {
            Some(hourly) => {
                let (day, day_meta) = self.parser.parse_source(&self.config.data_source)?;
                let (hour, hour_meta) = self.parser.parse_source(hourly)?;
                self.normalizer
                    .from_split(&day, &hour)?
                    .with_sources(vec![day_meta, hour_meta])
            }
            None => {
                let (table, meta) = self.parser.parse_source(&self.config.data_source)?;
                self.normalizer.from_merged(&table)?.with_sources(vec![meta])
            }
        };
        info!(
            source = %self.config.data_source,
            daily_rows = tables.daily.len(),
            hourly_rows = tables.hourly.len(),
            hash = tables.sources.first().map(|m| m.hash.as_str()).unwrap_or("-"),
            "Loaded bike-sharing tables"
        );
        Ok(tables)
    }

    /// Load all four model artifacts, or fail naming every missing one.
    pub fn load_models(&self) -> Result<Arc<Predictor>> {
        let dir = &self.config.models_dir;
        let fingerprint = ARTIFACT_FILES
            .iter()
            .map(|file| {
                DataSource::File(dir.join(file))
                    .fingerprint()
                    .unwrap_or_else(|_| "-".to_string())
            })
            .collect::<Vec<_>>()
            .join("|");

        self.models
            .get_or_try_load(&self.models_key(), &fingerprint, || {
                ModelBundle::load(dir)?.into_predictor()
            })
    }

    /// Whether a predictor has been loaded from the models directory.
    ///
    /// Reads the cache only; no artifact is touched.
    pub fn models_loaded(&self) -> bool {
        self.models.peek(&self.models_key()).is_some()
    }

    fn models_key(&self) -> String {
        self.config.models_dir.display().to_string()
    }

    /// The widest filter for the loaded data.
    pub fn default_filter(&self) -> Result<FilterSpec> {
        let tables = self.tables()?;
        FilterSpec::full(&tables).ok_or_else(|| {
            BikeshareError::EmptyData(format!("no daily rows in {}", self.config.data_source))
        })
    }

    pub fn meta(&self) -> Result<DashboardMeta> {
        let tables = self.tables()?;
        let bounds = tables.date_bounds();
        Ok(DashboardMeta {
            source: self.config.data_source.identity(),
            daily_rows: tables.daily.len(),
            hourly_rows: tables.hourly.len(),
            date_start: bounds.map(|(start, _)| start),
            date_end: bounds.map(|(_, end)| end),
            seasons: Season::ALL
                .iter()
                .map(|s| (s.code(), s.label().into_owned()))
                .collect(),
            weathers: tables
                .weather_codes()
                .iter()
                .map(|w| (w.code(), w.label().into_owned()))
                .collect(),
            files: tables.sources.clone(),
        })
    }

    /// Filter both tables independently and compute the six views.
    pub fn views(&self, filter: &FilterSpec) -> Result<DashboardViews> {
        let tables = self.tables()?;
        Ok(DashboardViews::compute(&tables, filter))
    }

    pub fn predict(&self, mode: PredictionMode, input: &PredictionInput) -> Result<Prediction> {
        self.load_models()?.predict(mode, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MERGED: &str = "\
dteday,season,hr,weathersit_x,cnt_x,weathersit_y,cnt_y,Level_deman_x
2011-01-03,1,0,1,100,1,4,Low
2011-01-03,1,1,1,100,2,6,Low
2011-01-10,1,0,2,200,1,8,Low
";

    fn dashboard(dir: &TempDir) -> Dashboard {
        let path = dir.path().join("main_data.csv");
        fs::write(&path, MERGED).unwrap();
        Dashboard::new(
            DashboardConfig::new(DataSource::File(path)).with_models_dir(dir.path()),
        )
    }

    #[test]
    fn test_tables_are_memoized() {
        let dir = TempDir::new().unwrap();
        let dashboard = dashboard(&dir);
        let first = dashboard.tables().unwrap();
        let second = dashboard.tables().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.daily.len(), 2);
        assert_eq!(first.hourly.len(), 3);
    }

    #[test]
    fn test_meta_and_default_filter() {
        let dir = TempDir::new().unwrap();
        let dashboard = dashboard(&dir);
        let meta = dashboard.meta().unwrap();
        assert_eq!(meta.date_start, NaiveDate::from_ymd_opt(2011, 1, 3));
        assert_eq!(meta.date_end, NaiveDate::from_ymd_opt(2011, 1, 10));
        assert_eq!(meta.seasons.len(), 4);
        assert_eq!(meta.weathers.get(&2).map(String::as_str), Some("Mist/Cloudy"));

        let filter = dashboard.default_filter().unwrap();
        let views = dashboard.views(&filter).unwrap();
        assert_eq!(views.weekday_average.data.len(), 1);
        assert_eq!(views.weekday_average.data[0].mean, 150.0);
    }

    #[test]
    fn test_meta_reports_source_hash() {
        use sha2::{Digest, Sha256};

        let dir = TempDir::new().unwrap();
        let dashboard = dashboard(&dir);
        let meta = dashboard.meta().unwrap();

        assert_eq!(meta.files.len(), 1);
        let file = &meta.files[0];
        assert_eq!(file.file, "main_data.csv");
        assert_eq!(file.format, "csv");
        assert_eq!(file.size_bytes, MERGED.len() as u64);
        assert_eq!(file.row_count, 3);
        assert_eq!(
            file.hash,
            format!("sha256:{:x}", Sha256::digest(MERGED.as_bytes()))
        );

        // Served from the cached snapshot, so the load time is stable
        assert_eq!(dashboard.meta().unwrap().files[0].loaded_at, file.loaded_at);
    }

    #[test]
    fn test_prediction_without_artifacts_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let dashboard = dashboard(&dir);
        let err = dashboard
            .predict(PredictionMode::Day, &PredictionInput::default())
            .unwrap_err();
        assert!(matches!(err, BikeshareError::ArtifactMissing { ref artifacts } if artifacts.len() == 4));

        // Views are unaffected by the prediction failure
        let filter = dashboard.default_filter().unwrap();
        assert!(dashboard.views(&filter).is_ok());
    }

    #[test]
    fn test_models_loaded_tracks_successful_loads_only() {
        use crate::predict::{
            LinearRegressor, MinMaxScaler, RegressorArtifact, ScalerArtifact, StandardScaler,
        };

        let dir = TempDir::new().unwrap();
        let dashboard = dashboard(&dir);
        assert!(!dashboard.models_loaded());
        assert!(dashboard.load_models().is_err());
        assert!(!dashboard.models_loaded());

        ModelBundle {
            dir: dir.path().to_path_buf(),
            day_scaler: ScalerArtifact::Standard(StandardScaler::new(vec![0.0; 11], vec![1.0; 11])),
            hour_scaler: ScalerArtifact::MinMax(MinMaxScaler::new(vec![0.0; 12], vec![1.0; 12])),
            day_model: RegressorArtifact::Linear(LinearRegressor::new(vec![0.0; 11], 10.0)),
            hour_model: RegressorArtifact::Linear(LinearRegressor::new(vec![0.0; 12], 1.0)),
        }
        .save(dir.path())
        .unwrap();

        dashboard.load_models().unwrap();
        assert!(dashboard.models_loaded());
    }

    #[test]
    fn test_missing_source_names_path() {
        let dir = TempDir::new().unwrap();
        let dashboard = Dashboard::new(DashboardConfig::new(DataSource::File(
            dir.path().join("absent.csv"),
        )));
        let err = dashboard.tables().unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}

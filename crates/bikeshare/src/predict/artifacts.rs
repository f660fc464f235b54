//! Loading the four model artifacts from a directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::builder::Predictor;
use super::features::PredictionMode;
use super::regressor::{Regressor, RegressorArtifact};
use super::scaler::{Scaler, ScalerArtifact};
use crate::error::{BikeshareError, Result};

pub const DAY_SCALER: &str = "day_scaler.json";
pub const HOUR_SCALER: &str = "hour_scaler.json";
pub const DAY_MODEL: &str = "rf_day_model.json";
pub const HOUR_MODEL: &str = "rf_hour_model.json";

/// Every artifact file, in the order they are checked.
pub const ARTIFACT_FILES: [&str; 4] = [DAY_SCALER, HOUR_SCALER, DAY_MODEL, HOUR_MODEL];

/// Presence of one artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
    pub file: String,
    pub path: PathBuf,
    pub present: bool,
}

/// Summary of one loaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub file: String,
    pub mode: PredictionMode,
    pub kind: String,
    pub n_features: Option<usize>,
}

/// The two scalers and two regressors, loaded together.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    pub dir: PathBuf,
    pub day_scaler: ScalerArtifact,
    pub hour_scaler: ScalerArtifact,
    pub day_model: RegressorArtifact,
    pub hour_model: RegressorArtifact,
}

impl ModelBundle {
    /// Report which artifacts exist under `dir` without parsing them.
    pub fn check(dir: impl AsRef<Path>) -> Vec<ArtifactStatus> {
        let dir = dir.as_ref();
        ARTIFACT_FILES
            .iter()
            .map(|file| {
                let path = dir.join(file);
                ArtifactStatus {
                    file: file.to_string(),
                    present: path.is_file(),
                    path,
                }
            })
            .collect()
    }

    /// Load all four artifacts or none.
    ///
    /// Existence of every file is checked before any is parsed, and a
    /// failure names every missing file at once.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let missing: Vec<String> = Self::check(dir)
            .into_iter()
            .filter(|status| !status.present)
            .map(|status| status.file)
            .collect();
        if !missing.is_empty() {
            return Err(BikeshareError::ArtifactMissing { artifacts: missing });
        }

        let day_scaler: ScalerArtifact = read_artifact(dir, DAY_SCALER)?;
        let hour_scaler: ScalerArtifact = read_artifact(dir, HOUR_SCALER)?;
        let day_model: RegressorArtifact = read_artifact(dir, DAY_MODEL)?;
        let hour_model: RegressorArtifact = read_artifact(dir, HOUR_MODEL)?;

        in_artifact(DAY_SCALER, day_scaler.validate())?;
        in_artifact(HOUR_SCALER, hour_scaler.validate())?;
        in_artifact(DAY_MODEL, day_model.validate())?;
        in_artifact(HOUR_MODEL, hour_model.validate())?;

        info!(dir = %dir.display(), "Loaded model artifacts");
        Ok(Self {
            dir: dir.to_path_buf(),
            day_scaler,
            hour_scaler,
            day_model,
            hour_model,
        })
    }

    /// Write the bundle as the four JSON artifact files.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        write_artifact(dir, DAY_SCALER, &self.day_scaler)?;
        write_artifact(dir, HOUR_SCALER, &self.hour_scaler)?;
        write_artifact(dir, DAY_MODEL, &self.day_model)?;
        write_artifact(dir, HOUR_MODEL, &self.hour_model)
    }

    pub fn describe(&self) -> Vec<ArtifactInfo> {
        let scaler = |file: &str, mode, s: &ScalerArtifact| ArtifactInfo {
            file: file.to_string(),
            mode,
            kind: s.kind().to_string(),
            n_features: s.n_features(),
        };
        let model = |file: &str, mode, r: &RegressorArtifact| ArtifactInfo {
            file: file.to_string(),
            mode,
            kind: r.kind().to_string(),
            n_features: r.n_features(),
        };
        vec![
            scaler(DAY_SCALER, PredictionMode::Day, &self.day_scaler),
            scaler(HOUR_SCALER, PredictionMode::Hour, &self.hour_scaler),
            model(DAY_MODEL, PredictionMode::Day, &self.day_model),
            model(HOUR_MODEL, PredictionMode::Hour, &self.hour_model),
        ]
    }

    /// Build a predictor holding both pairs, checking each against its
    /// mode's column order.
    pub fn into_predictor(self) -> Result<Predictor> {
        Predictor::new()
            .with_model(PredictionMode::Day, self.day_scaler, self.day_model)?
            .with_model(PredictionMode::Hour, self.hour_scaler, self.hour_model)
    }
}

fn in_artifact(file: &str, result: Result<()>) -> Result<()> {
    result.map_err(|e| match e {
        BikeshareError::Artifact { message, .. } => BikeshareError::Artifact {
            artifact: file.to_string(),
            message,
        },
        other => other,
    })
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    debug!(path = %path.display(), "Reading model artifact");
    let contents = fs::read_to_string(&path).map_err(|e| BikeshareError::Io {
        path: path.clone(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| BikeshareError::Artifact {
        artifact: file.to_string(),
        message: e.to_string(),
    })
}

fn write_artifact<T: Serialize>(dir: &Path, file: &str, artifact: &T) -> Result<()> {
    let path = dir.join(file);
    let json = serde_json::to_string_pretty(artifact)?;
    fs::write(&path, json).map_err(|e| BikeshareError::Io { path, source: e })
}

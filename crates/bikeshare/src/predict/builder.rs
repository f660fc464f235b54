//! Assemble a feature row, scale it, and run the regressor.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::features::{PredictionInput, PredictionMode};
use super::regressor::Regressor;
use super::scaler::Scaler;
use crate::error::{BikeshareError, Result};

/// Result of one inference call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub mode: PredictionMode,
    /// The assembled (unscaled) row, in column order.
    pub features: IndexMap<String, f64>,
    /// Unclamped model output.
    pub raw: f64,
    /// Display value: `raw` clamped at zero, then truncated.
    pub rentals: u64,
}

/// Display policy applied to a raw model output.
pub fn display_rentals(raw: f64) -> u64 {
    raw.max(0.0).trunc() as u64
}

struct ModelPair {
    scaler: Box<dyn Scaler>,
    regressor: Box<dyn Regressor>,
}

/// Scaler/regressor pairs per prediction mode.
#[derive(Default)]
pub struct Predictor {
    day: Option<ModelPair>,
    hour: Option<ModelPair>,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let describe = |pair: &Option<ModelPair>| {
            pair.as_ref()
                .map(|p| format!("{} + {}", p.scaler.kind(), p.regressor.kind()))
        };
        f.debug_struct("Predictor")
            .field("day", &describe(&self.day))
            .field("hour", &describe(&self.hour))
            .finish()
    }
}

/// Check an artifact's recorded column names and width against `mode`.
fn check_fitted_order(
    mode: PredictionMode,
    kind: &str,
    names: Option<&[String]>,
    width: Option<usize>,
) -> Result<()> {
    let expected = mode.feature_names();
    if let Some(names) = names {
        if names.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(BikeshareError::FeatureOrder {
                expected: expected.iter().map(|s| s.to_string()).collect(),
                found: names.to_vec(),
            });
        }
    }
    if let Some(width) = width {
        if width != expected.len() {
            return Err(BikeshareError::Artifact {
                artifact: kind.to_string(),
                message: format!(
                    "fitted on {} features, {} prediction uses {}",
                    width,
                    mode,
                    expected.len()
                ),
            });
        }
    }
    Ok(())
}

impl Predictor {
    /// A predictor with no models; every call fails with `ModelUnavailable`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the pair for `mode`, replacing any previous one.
    ///
    /// Both artifacts are validated, and those that record their fitted
    /// column names or width are checked against the mode's column order
    /// here, once, rather than per call.
    pub fn with_model(
        mut self,
        mode: PredictionMode,
        scaler: impl Scaler + 'static,
        regressor: impl Regressor + 'static,
    ) -> Result<Self> {
        scaler.validate()?;
        regressor.validate()?;
        check_fitted_order(mode, scaler.kind(), scaler.feature_names(), scaler.n_features())?;
        check_fitted_order(
            mode,
            regressor.kind(),
            regressor.feature_names(),
            regressor.n_features(),
        )?;

        let pair = ModelPair {
            scaler: Box::new(scaler),
            regressor: Box::new(regressor),
        };
        match mode {
            PredictionMode::Day => self.day = Some(pair),
            PredictionMode::Hour => self.hour = Some(pair),
        }
        Ok(self)
    }

    pub fn has_model(&self, mode: PredictionMode) -> bool {
        self.pair(mode).is_some()
    }

    fn pair(&self, mode: PredictionMode) -> Option<&ModelPair> {
        match mode {
            PredictionMode::Day => self.day.as_ref(),
            PredictionMode::Hour => self.hour.as_ref(),
        }
    }

    /// Validate the input, assemble the row in column order, scale, predict.
    pub fn predict(&self, mode: PredictionMode, input: &PredictionInput) -> Result<Prediction> {
        let features = input.to_named_row(mode)?;
        let pair = self
            .pair(mode)
            .ok_or(BikeshareError::ModelUnavailable { mode })?;

        let row: Vec<f64> = features.values().copied().collect();
        let scaled = pair.scaler.transform(&row)?;
        let raw = pair.regressor.predict(&scaled)?;
        if !raw.is_finite() {
            return Err(BikeshareError::Artifact {
                artifact: pair.regressor.kind().to_string(),
                message: format!("non-finite prediction {}", raw),
            });
        }

        let rentals = display_rentals(raw);
        debug!(%mode, raw, rentals, "Prediction computed");
        Ok(Prediction {
            mode,
            features,
            raw,
            rentals,
        })
    }
}

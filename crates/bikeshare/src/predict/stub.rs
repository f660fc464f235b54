//! Deterministic scalers and regressors for testing.

use super::regressor::Regressor;
use super::scaler::{Scaler, check_width};
use crate::error::Result;

/// Scaler that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScaler;

impl IdentityScaler {
    pub fn new() -> Self {
        Self
    }
}

impl Scaler for IdentityScaler {
    fn kind(&self) -> &'static str {
        "identity_scaler"
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        Ok(row.to_vec())
    }
}

/// Per-column `x * weight + offset` with caller-chosen coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineScaler {
    weights: Vec<f64>,
    offsets: Vec<f64>,
}

impl AffineScaler {
    pub fn new(weights: Vec<f64>, offsets: Vec<f64>) -> Self {
        Self { weights, offsets }
    }

    /// Weights `1, 2, ..., n` and zero offsets, so every column is scaled
    /// differently.
    pub fn ascending(n: usize) -> Self {
        Self::new((1..=n).map(|w| w as f64).collect(), vec![0.0; n])
    }
}

impl Scaler for AffineScaler {
    fn kind(&self) -> &'static str {
        "affine_scaler"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.weights.len())
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.kind(), self.weights.len(), row)?;
        Ok(row
            .iter()
            .zip(self.weights.iter().zip(&self.offsets))
            .map(|(x, (w, b))| x * w + b)
            .collect())
    }
}

/// Regressor that predicts the same value for every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRegressor {
    value: f64,
}

impl ConstantRegressor {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Regressor for ConstantRegressor {
    fn kind(&self) -> &'static str {
        "constant_regressor"
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict(&self, _row: &[f64]) -> Result<f64> {
        Ok(self.value)
    }
}

//! Fitted feature scalers.

use serde::{Deserialize, Serialize};

use crate::error::{BikeshareError, Result};

/// Forward transform of a fitted scaler. No fitting happens at inference.
pub trait Scaler: Send + Sync {
    /// Kind name used in error messages and model descriptions.
    fn kind(&self) -> &'static str;

    /// Number of columns the scaler was fitted on, if fixed.
    fn n_features(&self) -> Option<usize>;

    /// Column names the scaler was fitted on, when the artifact records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Check internal consistency of the fitted parameters.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>>;
}

/// Fail with an artifact error when `row` does not have `expected` columns.
pub(crate) fn check_width(kind: &str, expected: usize, row: &[f64]) -> Result<()> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(BikeshareError::Artifact {
            artifact: kind.to_string(),
            message: format!("expects {} features, got {}", expected, row.len()),
        })
    }
}

fn check_parameters(kind: &str, lengths: &[usize], names: Option<&[String]>) -> Result<()> {
    let width = lengths.first().copied().unwrap_or(0);
    if width == 0 || lengths.iter().any(|&n| n != width) {
        return Err(BikeshareError::Artifact {
            artifact: kind.to_string(),
            message: format!("inconsistent parameter lengths {:?}", lengths),
        });
    }
    if let Some(names) = names {
        if names.len() != width {
            return Err(BikeshareError::Artifact {
                artifact: kind.to_string(),
                message: format!("{} feature names for {} parameters", names.len(), width),
            });
        }
    }
    Ok(())
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(alias = "mean_")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
    #[serde(
        default,
        alias = "feature_names_in_",
        skip_serializing_if = "Option::is_none"
    )]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            feature_names: None,
        }
    }
}

impl Scaler for StandardScaler {
    fn kind(&self) -> &'static str {
        "standard_scaler"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.mean.len())
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn validate(&self) -> Result<()> {
        check_parameters(
            self.kind(),
            &[self.mean.len(), self.scale.len()],
            self.feature_names.as_deref(),
        )?;
        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(BikeshareError::Artifact {
                artifact: self.kind().to_string(),
                message: "scale contains zero or non-finite values".to_string(),
            });
        }
        Ok(())
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.kind(), self.mean.len(), row)?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

/// Range scaling: `x * scale + min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    #[serde(alias = "min_")]
    pub min: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
    #[serde(
        default,
        alias = "feature_names_in_",
        skip_serializing_if = "Option::is_none"
    )]
    pub feature_names: Option<Vec<String>>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            min,
            scale,
            feature_names: None,
        }
    }
}

impl Scaler for MinMaxScaler {
    fn kind(&self) -> &'static str {
        "min_max_scaler"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.min.len())
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn validate(&self) -> Result<()> {
        check_parameters(
            self.kind(),
            &[self.min.len(), self.scale.len()],
            self.feature_names.as_deref(),
        )
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.kind(), self.min.len(), row)?;
        Ok(row
            .iter()
            .zip(self.min.iter().zip(&self.scale))
            .map(|(x, (min, scale))| x * scale + min)
            .collect())
    }
}

/// A scaler artifact as stored on disk, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    #[serde(alias = "StandardScaler")]
    Standard(StandardScaler),
    #[serde(alias = "MinMaxScaler")]
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    fn inner(&self) -> &dyn Scaler {
        match self {
            ScalerArtifact::Standard(s) => s,
            ScalerArtifact::MinMax(s) => s,
        }
    }
}

impl Scaler for ScalerArtifact {
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }

    fn n_features(&self) -> Option<usize> {
        self.inner().n_features()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.inner().feature_names()
    }

    fn validate(&self) -> Result<()> {
        self.inner().validate()
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.inner().transform(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler_transform() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]);
        assert_eq!(scaler.transform(&[3.0, 0.0]).unwrap(), vec![1.0, -2.0]);
    }

    #[test]
    fn test_min_max_scaler_transform() {
        let scaler = MinMaxScaler::new(vec![-0.25, 0.0], vec![0.25, 2.0]);
        assert_eq!(scaler.transform(&[1.0, 0.5]).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_width_mismatch_is_artifact_error() {
        let scaler = StandardScaler::new(vec![0.0; 11], vec![1.0; 11]);
        let err = scaler.transform(&[0.0; 12]).unwrap_err();
        assert!(matches!(err, BikeshareError::Artifact { .. }));
        assert!(err.to_string().contains("expects 11 features, got 12"));
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(StandardScaler::new(vec![0.0; 3], vec![1.0; 2]).validate().is_err());
        assert!(StandardScaler::new(vec![0.0; 2], vec![1.0, 0.0]).validate().is_err());
        assert!(MinMaxScaler::new(Vec::new(), Vec::new()).validate().is_err());

        let mut named = MinMaxScaler::new(vec![0.0; 2], vec![1.0; 2]);
        named.feature_names = Some(vec!["temp".to_string()]);
        assert!(named.validate().is_err());
    }

    #[test]
    fn test_artifact_json_with_fitted_attribute_names() {
        let json = r#"{
            "kind": "StandardScaler",
            "mean_": [0.5, 0.5],
            "scale_": [0.25, 0.5],
            "feature_names_in_": ["temp", "hum"]
        }"#;
        let artifact: ScalerArtifact = serde_json::from_str(json).unwrap();
        artifact.validate().unwrap();
        assert_eq!(artifact.kind(), "standard_scaler");
        assert_eq!(artifact.n_features(), Some(2));
        assert_eq!(
            artifact.feature_names().unwrap(),
            &["temp".to_string(), "hum".to_string()]
        );
        assert_eq!(artifact.transform(&[1.0, 1.0]).unwrap(), vec![2.0, 1.0]);
    }
}

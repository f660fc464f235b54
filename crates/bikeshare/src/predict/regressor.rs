//! Pre-trained regressors.

use serde::{Deserialize, Serialize};

use super::scaler::check_width;
use crate::error::{BikeshareError, Result};

/// Inference half of a trained regression model.
pub trait Regressor: Send + Sync {
    fn kind(&self) -> &'static str;

    fn n_features(&self) -> Option<usize>;

    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Check internal consistency of the fitted parameters.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// One scalar for one scaled row.
    fn predict(&self, row: &[f64]) -> Result<f64>;
}

fn invalid(kind: &str, message: impl Into<String>) -> BikeshareError {
    BikeshareError::Artifact {
        artifact: kind.to_string(),
        message: message.into(),
    }
}

/// `intercept + Σ coefficient_i · x_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(alias = "coef_")]
    pub coefficients: Vec<f64>,
    #[serde(alias = "intercept_")]
    pub intercept: f64,
    #[serde(
        default,
        alias = "feature_names_in_",
        skip_serializing_if = "Option::is_none"
    )]
    pub feature_names: Option<Vec<String>>,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            feature_names: None,
        }
    }
}

impl Regressor for LinearRegressor {
    fn kind(&self) -> &'static str {
        "linear_regressor"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(invalid(self.kind(), "no coefficients"));
        }
        match &self.feature_names {
            Some(names) if names.len() != self.coefficients.len() => Err(invalid(
                self.kind(),
                format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    self.coefficients.len()
                ),
            )),
            _ => Ok(()),
        }
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        check_width(self.kind(), self.coefficients.len(), row)?;
        Ok(self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, c)| x * c)
                .sum::<f64>())
    }
}

/// Sentinel child index marking a leaf node.
pub const LEAF: i64 = -1;

/// One fitted decision tree in flat array form.
///
/// Node `i` splits on `feature[i]` at `threshold[i]`: rows with
/// `x[feature] <= threshold` go to `children_left[i]`, others to
/// `children_right[i]`. A node whose left child is [`LEAF`] is a leaf and
/// predicts `value[i]`. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    /// A single-leaf tree.
    pub fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    pub fn node_count(&self) -> usize {
        self.value.len()
    }

    /// Check array lengths, child indices, and split features.
    ///
    /// Children must point strictly forward, which rules out cycles.
    pub fn validate(&self, n_features: Option<usize>) -> std::result::Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(format!("tree arrays disagree on node count {}", n));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || n_features.is_some_and(|width| feature as usize >= width) {
                return Err(format!("node {} splits on invalid feature {}", node, feature));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    pub fn predict(&self, row: &[f64]) -> std::result::Result<f64, String> {
        let mut node = 0usize;
        // Each step moves to a strictly larger index in a validated tree.
        for _ in 0..=self.node_count() {
            let left = *self
                .children_left
                .get(node)
                .ok_or_else(|| format!("node {} out of bounds", node))?;
            if left == LEAF {
                return at(&self.value, node, "value");
            }
            let feature = at(&self.feature, node, "feature")?;
            let x = usize::try_from(feature)
                .ok()
                .and_then(|f| row.get(f))
                .ok_or_else(|| format!("node {} splits on missing feature {}", node, feature))?;
            let next = if *x <= at(&self.threshold, node, "threshold")? {
                left
            } else {
                at(&self.children_right, node, "children_right")?
            };
            node = usize::try_from(next).map_err(|_| format!("node {} has invalid child", node))?;
        }
        Err("tree traversal did not reach a leaf".to_string())
    }
}

fn at<T: Copy>(values: &[T], node: usize, array: &str) -> std::result::Result<T, String> {
    values
        .get(node)
        .copied()
        .ok_or_else(|| format!("node {} missing from {}", node, array))
}

/// Mean of the predictions of its trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    #[serde(alias = "n_features_in_")]
    pub n_features: usize,
    #[serde(alias = "estimators_")]
    pub trees: Vec<DecisionTree>,
    #[serde(
        default,
        alias = "feature_names_in_",
        skip_serializing_if = "Option::is_none"
    )]
    pub feature_names: Option<Vec<String>>,
}

impl RandomForestRegressor {
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Self {
        Self {
            n_features,
            trees,
            feature_names: None,
        }
    }
}

impl Regressor for RandomForestRegressor {
    fn kind(&self) -> &'static str {
        "random_forest_regressor"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(invalid(self.kind(), "forest has no trees"));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(Some(self.n_features))
                .map_err(|message| invalid(self.kind(), format!("tree {}: {}", i, message)))?;
        }
        match &self.feature_names {
            Some(names) if names.len() != self.n_features => Err(invalid(
                self.kind(),
                format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                ),
            )),
            _ => Ok(()),
        }
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        check_width(self.kind(), self.n_features, row)?;
        if self.trees.is_empty() {
            return Err(invalid(self.kind(), "forest has no trees"));
        }
        let mut sum = 0.0;
        for (i, tree) in self.trees.iter().enumerate() {
            sum += tree
                .predict(row)
                .map_err(|message| invalid(self.kind(), format!("tree {}: {}", i, message)))?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

/// A regressor artifact as stored on disk, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    #[serde(alias = "LinearRegression")]
    Linear(LinearRegressor),
    #[serde(alias = "RandomForestRegressor")]
    RandomForest(RandomForestRegressor),
}

impl RegressorArtifact {
    fn inner(&self) -> &dyn Regressor {
        match self {
            RegressorArtifact::Linear(r) => r,
            RegressorArtifact::RandomForest(r) => r,
        }
    }
}

impl Regressor for RegressorArtifact {
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

    fn predict(&self, row: &[f64]) -> Result<f64> {
        self.inner().predict(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x[0] <= 0.5 ? 10 : (x[1] <= 0.0 ? 20 : 30)
    fn stump() -> DecisionTree {
        DecisionTree {
            children_left: vec![1, LEAF, 3, LEAF, LEAF],
            children_right: vec![2, LEAF, 4, LEAF, LEAF],
            feature: vec![0, -2, 1, -2, -2],
            threshold: vec![0.5, -2.0, 0.0, -2.0, -2.0],
            value: vec![20.0, 10.0, 25.0, 20.0, 30.0],
        }
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressor::new(vec![2.0, -1.0], 5.0);
        assert_eq!(model.predict(&[3.0, 4.0]).unwrap(), 7.0);
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_tree_traversal() {
        let tree = stump();
        tree.validate(Some(2)).unwrap();
        assert_eq!(tree.predict(&[0.5, 9.0]).unwrap(), 10.0);
        assert_eq!(tree.predict(&[0.6, 0.0]).unwrap(), 20.0);
        assert_eq!(tree.predict(&[0.6, 0.1]).unwrap(), 30.0);
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForestRegressor::new(2, vec![stump(), DecisionTree::leaf(40.0)]);
        forest.validate().unwrap();
        assert_eq!(forest.predict(&[0.0, 0.0]).unwrap(), 25.0);
        assert_eq!(forest.predict(&[1.0, 1.0]).unwrap(), 35.0);
    }

    #[test]
    fn test_invalid_trees_rejected() {
        let mut backwards = stump();
        backwards.children_left[2] = 0;
        assert!(backwards.validate(Some(2)).is_err());

        let mut short = stump();
        short.threshold.pop();
        assert!(short.validate(Some(2)).is_err());

        // Splits on a column the forest was not fitted with
        assert!(stump().validate(Some(1)).is_err());
        let forest = RandomForestRegressor::new(1, vec![stump()]);
        assert!(matches!(
            forest.validate(),
            Err(BikeshareError::Artifact { .. })
        ));

        assert!(RandomForestRegressor::new(2, Vec::new()).validate().is_err());
    }

    #[test]
    fn test_unvalidated_short_tree_errors_instead_of_panicking() {
        let tree = DecisionTree {
            children_left: vec![1, LEAF],
            children_right: vec![1, LEAF],
            feature: vec![0, -2],
            threshold: vec![5.0, -2.0],
            value: vec![1.0],
        };
        assert!(tree.predict(&[0.0]).unwrap_err().contains("value"));

        let forest = RandomForestRegressor::new(1, vec![tree]);
        assert!(matches!(
            forest.predict(&[0.0]),
            Err(BikeshareError::Artifact { .. })
        ));
    }

    #[test]
    fn test_artifact_json() {
        let json = r#"{
            "kind": "random_forest",
            "n_features": 2,
            "trees": [{
                "children_left": [-1],
                "children_right": [-1],
                "feature": [-2],
                "threshold": [-2.0],
                "value": [12.5]
            }]
        }"#;
        let artifact: RegressorArtifact = serde_json::from_str(json).unwrap();
        artifact.validate().unwrap();
        assert_eq!(artifact.kind(), "random_forest_regressor");
        assert_eq!(artifact.predict(&[0.0, 0.0]).unwrap(), 12.5);

        let linear: RegressorArtifact =
            serde_json::from_str(r#"{"kind": "LinearRegression", "coef_": [1.0], "intercept_": 2.0}"#)
                .unwrap();
        assert_eq!(linear.predict(&[3.0]).unwrap(), 5.0);
    }
}

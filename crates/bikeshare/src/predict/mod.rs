//! Rental-count prediction from user-supplied feature values.
//!
//! A [`PredictionInput`] is assembled into a single row in the exact column
//! order of its [`PredictionMode`], passed through the mode's fitted
//! [`Scaler`], and then through its [`Regressor`]. The column order is what
//! the artifacts were fitted against; a reordered row is not an error to the
//! models, only a wrong answer.

mod artifacts;
mod builder;
mod features;
mod regressor;
mod scaler;
mod stub;

pub use artifacts::{
    ARTIFACT_FILES, ArtifactInfo, ArtifactStatus, DAY_MODEL, DAY_SCALER, HOUR_MODEL,
    HOUR_SCALER, ModelBundle,
};
pub use builder::{Prediction, Predictor, display_rentals};
pub use features::{Domain, Feature, PredictionInput, PredictionMode};
pub use regressor::{
    DecisionTree, LEAF, LinearRegressor, RandomForestRegressor, Regressor, RegressorArtifact,
};
pub use scaler::{MinMaxScaler, Scaler, ScalerArtifact, StandardScaler};
pub use stub::{AffineScaler, ConstantRegressor, IdentityScaler};

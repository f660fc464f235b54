//! Prediction modes, feature domains, and the user-facing input record.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{BikeshareError, Result};

/// Which model pair a prediction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    Day,
    Hour,
}

const DAY_FEATURES: [Feature; 11] = [
    Feature::Season,
    Feature::Year,
    Feature::Month,
    Feature::Holiday,
    Feature::Weekday,
    Feature::WorkingDay,
    Feature::Weather,
    Feature::Temp,
    Feature::FeelsLikeTemp,
    Feature::Humidity,
    Feature::Windspeed,
];

const HOUR_FEATURES: [Feature; 12] = [
    Feature::Season,
    Feature::Year,
    Feature::Month,
    Feature::Hour,
    Feature::Holiday,
    Feature::Weekday,
    Feature::WorkingDay,
    Feature::Weather,
    Feature::Temp,
    Feature::FeelsLikeTemp,
    Feature::Humidity,
    Feature::Windspeed,
];

impl PredictionMode {
    pub const ALL: [PredictionMode; 2] = [PredictionMode::Day, PredictionMode::Hour];

    /// Features in the column order the artifacts were fitted against.
    pub fn features(&self) -> &'static [Feature] {
        match self {
            PredictionMode::Day => &DAY_FEATURES,
            PredictionMode::Hour => &HOUR_FEATURES,
        }
    }

    /// Canonical feature names in column order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features().iter().map(Feature::name).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMode::Day => "day",
            PredictionMode::Hour => "hour",
        }
    }
}

impl fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PredictionMode {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(PredictionMode::Day),
            "hour" | "hourly" => Ok(PredictionMode::Hour),
            other => Err(BikeshareError::Config(format!(
                "unknown prediction mode '{}' (expected 'day' or 'hour')",
                other
            ))),
        }
    }
}

/// Declared value domain of a feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Whole numbers in `min..=max`.
    Integer { min: i64, max: i64 },
    /// Reals in `min..=max`.
    Continuous { min: f64, max: f64 },
}

impl Domain {
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match *self {
            Domain::Integer { min, max } => {
                value.fract() == 0.0 && value >= min as f64 && value <= max as f64
            }
            Domain::Continuous { min, max } => value >= min && value <= max,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Integer { min, max } => write!(f, "integer {}..={}", min, max),
            Domain::Continuous { min, max } => write!(f, "{}..={}", min, max),
        }
    }
}

/// One model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "season")]
    Season,
    #[serde(rename = "yr")]
    Year,
    #[serde(rename = "mnth")]
    Month,
    #[serde(rename = "hr")]
    Hour,
    #[serde(rename = "holiday")]
    Holiday,
    #[serde(rename = "weekday")]
    Weekday,
    #[serde(rename = "workingday")]
    WorkingDay,
    #[serde(rename = "weathersit")]
    Weather,
    #[serde(rename = "temp")]
    Temp,
    #[serde(rename = "atemp")]
    FeelsLikeTemp,
    #[serde(rename = "hum")]
    Humidity,
    #[serde(rename = "windspeed")]
    Windspeed,
}

impl Feature {
    /// Column name used by the fitted artifacts.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Season => "season",
            Feature::Year => "yr",
            Feature::Month => "mnth",
            Feature::Hour => "hr",
            Feature::Holiday => "holiday",
            Feature::Weekday => "weekday",
            Feature::WorkingDay => "workingday",
            Feature::Weather => "weathersit",
            Feature::Temp => "temp",
            Feature::FeelsLikeTemp => "atemp",
            Feature::Humidity => "hum",
            Feature::Windspeed => "windspeed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Feature::Season => "season code (1=Spring .. 4=Winter)",
            Feature::Year => "year index (0=2011, 1=2012)",
            Feature::Month => "month of year",
            Feature::Hour => "hour of day",
            Feature::Holiday => "public holiday flag",
            Feature::Weekday => "day of week (0=Sunday)",
            Feature::WorkingDay => "working day flag",
            Feature::Weather => "weather code (1=Clear .. 4=Heavy Rain/Snow)",
            Feature::Temp => "normalized temperature",
            Feature::FeelsLikeTemp => "normalized feels-like temperature",
            Feature::Humidity => "normalized humidity",
            Feature::Windspeed => "normalized wind speed",
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            Feature::Season | Feature::Weather => Domain::Integer { min: 1, max: 4 },
            Feature::Year | Feature::Holiday | Feature::WorkingDay => {
                Domain::Integer { min: 0, max: 1 }
            }
            Feature::Month => Domain::Integer { min: 1, max: 12 },
            Feature::Hour => Domain::Integer { min: 0, max: 23 },
            Feature::Weekday => Domain::Integer { min: 0, max: 6 },
            Feature::Temp | Feature::FeelsLikeTemp | Feature::Humidity | Feature::Windspeed => {
                Domain::Continuous { min: 0.0, max: 1.0 }
            }
        }
    }

    /// Reject values outside the declared domain.
    pub fn check(&self, value: f64) -> Result<f64> {
        if self.domain().contains(value) {
            Ok(value)
        } else {
            Err(BikeshareError::FeatureOutOfRange {
                feature: self.name().to_string(),
                value,
            })
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flat record of user-supplied scalars.
///
/// Every field is optional so one record type serves both modes; which
/// fields are required depends on the mode it is assembled for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionInput {
    pub season: Option<f64>,
    #[serde(alias = "year")]
    pub yr: Option<f64>,
    #[serde(alias = "month")]
    pub mnth: Option<f64>,
    #[serde(alias = "hour")]
    pub hr: Option<f64>,
    pub holiday: Option<f64>,
    pub weekday: Option<f64>,
    pub workingday: Option<f64>,
    #[serde(alias = "weather")]
    pub weathersit: Option<f64>,
    pub temp: Option<f64>,
    #[serde(alias = "feels_like_temp")]
    pub atemp: Option<f64>,
    #[serde(alias = "humidity")]
    pub hum: Option<f64>,
    pub windspeed: Option<f64>,
}

impl PredictionInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Season => self.season,
            Feature::Year => self.yr,
            Feature::Month => self.mnth,
            Feature::Hour => self.hr,
            Feature::Holiday => self.holiday,
            Feature::Weekday => self.weekday,
            Feature::WorkingDay => self.workingday,
            Feature::Weather => self.weathersit,
            Feature::Temp => self.temp,
            Feature::FeelsLikeTemp => self.atemp,
            Feature::Humidity => self.hum,
            Feature::Windspeed => self.windspeed,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        let slot = match feature {
            Feature::Season => &mut self.season,
            Feature::Year => &mut self.yr,
            Feature::Month => &mut self.mnth,
            Feature::Hour => &mut self.hr,
            Feature::Holiday => &mut self.holiday,
            Feature::Weekday => &mut self.weekday,
            Feature::WorkingDay => &mut self.workingday,
            Feature::Weather => &mut self.weathersit,
            Feature::Temp => &mut self.temp,
            Feature::FeelsLikeTemp => &mut self.atemp,
            Feature::Humidity => &mut self.hum,
            Feature::Windspeed => &mut self.windspeed,
        };
        *slot = Some(value);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        self.set(feature, value);
        self
    }

    /// Assemble the single-row feature vector for `mode`.
    ///
    /// All absent features are reported together; present values must lie in
    /// their declared domain. Fields the mode does not use are ignored.
    pub fn to_row(&self, mode: PredictionMode) -> Result<Vec<f64>> {
        let features = mode.features();
        let missing: Vec<String> = features
            .iter()
            .filter(|f| self.get(**f).is_none())
            .map(|f| f.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BikeshareError::MissingFeature { mode, missing });
        }

        features
            .iter()
            .map(|f| {
                let value = self.get(*f).ok_or_else(|| BikeshareError::MissingFeature {
                    mode,
                    missing: vec![f.name().to_string()],
                })?;
                f.check(value)
            })
            .collect()
    }

    /// The assembled row keyed by feature name, in column order.
    pub fn to_named_row(&self, mode: PredictionMode) -> Result<IndexMap<String, f64>> {
        let row = self.to_row(mode)?;
        Ok(mode
            .features()
            .iter()
            .map(|f| f.name().to_string())
            .zip(row)
            .collect())
    }
}

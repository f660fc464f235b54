//! Input column naming.

use serde::{Deserialize, Serialize};

/// Names of the input columns the normalizer reads.
///
/// The defaults describe the merged file produced by joining the daily and
/// hourly tables on date, where overlapping columns carry `_x` (daily) and
/// `_y` (hourly) suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Calendar date.
    pub date: String,
    /// Season code.
    pub season: String,
    /// Hour of day (hourly grain only).
    pub hour: String,
    /// Weather code at daily grain.
    pub daily_weather: String,
    /// Rental count at daily grain.
    pub daily_count: String,
    /// Weather code at hourly grain.
    pub hourly_weather: String,
    /// Rental count at hourly grain.
    pub hourly_count: String,
    /// Optional precomputed demand-level label.
    pub level: Option<String>,
}

impl ColumnMapping {
    /// Column names of the merged day/hour file.
    pub fn merged() -> Self {
        Self {
            date: "dteday".to_string(),
            season: "season".to_string(),
            hour: "hr".to_string(),
            daily_weather: "weathersit_x".to_string(),
            daily_count: "cnt_x".to_string(),
            hourly_weather: "weathersit_y".to_string(),
            hourly_count: "cnt_y".to_string(),
            level: Some("Level_deman_x".to_string()),
        }
    }

    /// Column names of separate, unsuffixed day and hour files.
    pub fn split() -> Self {
        Self {
            date: "dteday".to_string(),
            season: "season".to_string(),
            hour: "hr".to_string(),
            daily_weather: "weathersit".to_string(),
            daily_count: "cnt".to_string(),
            hourly_weather: "weathersit".to_string(),
            hourly_count: "cnt".to_string(),
            level: None,
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::merged()
    }
}

//! Bikeshare: rental analytics and rental-count prediction for bike-sharing data.
//!
//! A merged day/hour rental table is normalized into a daily and an hourly
//! row set, filtered by date range, season and weather, and reduced into six
//! chart-ready views. Independently, pre-fitted scaler/regressor pairs turn
//! a handful of user-supplied feature values into a predicted rental count.
//!
//! # Example
//!
//! ```no_run
//! use bikeshare::{Dashboard, DashboardConfig, PredictionInput, PredictionMode};
//!
//! let dashboard = Dashboard::new(DashboardConfig::new("main_data.csv"));
//! let filter = dashboard.default_filter().unwrap();
//! let views = dashboard.views(&filter).unwrap();
//!
//! for row in &views.weekday_average.data {
//!     println!("{:?}: {:.1}", row.weekday, row.mean);
//! }
//!
//! let input: PredictionInput = serde_json::from_str(r#"{"season": 1, "yr": 0}"#).unwrap();
//! match dashboard.predict(PredictionMode::Day, &input) {
//!     Ok(prediction) => println!("{} rentals", prediction.rentals),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod predict;
pub mod schema;

mod dashboard;

pub use crate::dashboard::{Dashboard, DashboardMeta};
pub use aggregate::{ChartKind, DashboardViews, View};
pub use config::DashboardConfig;
pub use error::{BikeshareError, Result};
pub use filter::FilterSpec;
pub use input::{DataSource, DataTable, SourceMetadata};
pub use predict::{ModelBundle, Prediction, PredictionInput, PredictionMode, Predictor};
pub use schema::{BikeTables, DailyRow, HourlyRow, Season, Weather};

//! CLI argument definitions using clap.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use bikeshare::{PredictionInput, PredictionMode};

/// Bikeshare: rental analytics and prediction for bike-sharing data
#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON config file (data source, model directory, column names)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the six dashboard views for a selection
    Views {
        /// Data file path or URL (default: main_data.csv, or BIKESHARE_DATA)
        #[arg(value_name = "SOURCE")]
        source: Option<String>,

        /// First date to include (YYYY-MM-DD, default: earliest in data)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last date to include (YYYY-MM-DD, default: latest in data)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Season codes to include, e.g. --season 1,2 (default: all)
        #[arg(long, value_delimiter = ',')]
        season: Vec<u8>,

        /// Weather codes to include, e.g. --weather 1 (default: all present)
        #[arg(long, value_delimiter = ',')]
        weather: Vec<u8>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict a rental count from feature values
    Predict {
        /// Model to use: day or hour
        #[arg(short, long, default_value = "day")]
        mode: PredictionMode,

        /// Directory holding the four model artifacts (default: ., or BIKESHARE_MODELS)
        #[arg(long, value_name = "DIR")]
        models: Option<PathBuf>,

        /// Read feature values from a JSON file; flags override its values
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        features: FeatureArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check and describe the model artifacts in a directory
    Models {
        /// Model directory (default: ., or BIKESHARE_MODELS)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the views and predictions as a JSON API
    Serve {
        /// Data file path or URL (default: main_data.csv, or BIKESHARE_DATA)
        #[arg(value_name = "SOURCE")]
        source: Option<String>,

        /// Directory holding the four model artifacts
        #[arg(long, value_name = "DIR")]
        models: Option<PathBuf>,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

/// Prediction feature flags.
#[derive(Args, Debug, Default)]
pub struct FeatureArgs {
    /// Season code (1=Spring .. 4=Winter)
    #[arg(long)]
    pub season: Option<f64>,

    /// Year index (0=2011, 1=2012)
    #[arg(long)]
    pub year: Option<f64>,

    /// Month (1-12)
    #[arg(long)]
    pub month: Option<f64>,

    /// Hour of day (0-23, hour model only)
    #[arg(long)]
    pub hour: Option<f64>,

    /// Holiday flag (0 or 1)
    #[arg(long)]
    pub holiday: Option<f64>,

    /// Day of week (0-6)
    #[arg(long)]
    pub weekday: Option<f64>,

    /// Working day flag (0 or 1)
    #[arg(long)]
    pub workingday: Option<f64>,

    /// Weather code (1-4)
    #[arg(long)]
    pub weather: Option<f64>,

    /// Normalized temperature (0-1)
    #[arg(long)]
    pub temp: Option<f64>,

    /// Normalized feels-like temperature (0-1)
    #[arg(long)]
    pub feels_like_temp: Option<f64>,

    /// Normalized humidity (0-1)
    #[arg(long)]
    pub humidity: Option<f64>,

    /// Normalized wind speed (0-1)
    #[arg(long)]
    pub windspeed: Option<f64>,
}

impl FeatureArgs {
    /// Overlay the flags that were given onto `base`.
    pub fn apply_to(&self, base: PredictionInput) -> PredictionInput {
        PredictionInput {
            season: self.season.or(base.season),
            yr: self.year.or(base.yr),
            mnth: self.month.or(base.mnth),
            hr: self.hour.or(base.hr),
            holiday: self.holiday.or(base.holiday),
            weekday: self.weekday.or(base.weekday),
            workingday: self.workingday.or(base.workingday),
            weathersit: self.weather.or(base.weathersit),
            temp: self.temp.or(base.temp),
            atemp: self.feels_like_temp.or(base.atemp),
            hum: self.humidity.or(base.hum),
            windspeed: self.windspeed.or(base.windspeed),
        }
    }
}

//! Predict command - run one prediction against the saved models.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use bikeshare::{Dashboard, PredictionInput, PredictionMode};

use super::resolve_config;
use crate::cli::FeatureArgs;

pub fn run(
    config_file: Option<&Path>,
    mode: PredictionMode,
    models: Option<PathBuf>,
    input_file: Option<PathBuf>,
    features: &FeatureArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(config_file, None, models)?;

    let base = match input_file {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            serde_json::from_str::<PredictionInput>(&contents)?
        }
        None => PredictionInput::default(),
    };
    let input = features.apply_to(base);

    let dashboard = Dashboard::new(config);
    let prediction = dashboard.predict(mode, &input)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    let label = match mode {
        PredictionMode::Day => "daily",
        PredictionMode::Hour => "hourly",
    };
    println!("{}", format!("Predicting {} rentals", label).cyan().bold());
    for (name, value) in &prediction.features {
        println!("  {:<12} {}", name, value);
    }
    println!();
    println!(
        "Predicted {} rentals: {}",
        label,
        prediction.rentals.to_string().green().bold()
    );
    if prediction.raw < 0.0 {
        println!(
            "  {} model output {:.2} was clamped to zero",
            "Note:".yellow(),
            prediction.raw
        );
    }
    Ok(())
}

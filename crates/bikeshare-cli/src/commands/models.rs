//! Models command - check and describe the model artifacts.

use std::path::{Path, PathBuf};

use colored::Colorize;

use bikeshare::ModelBundle;

use super::resolve_config;

pub fn run(
    config_file: Option<&Path>,
    dir: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(config_file, None, dir)?;
    let dir = config.models_dir;
    let statuses = ModelBundle::check(&dir);

    if json_output {
        let loaded = ModelBundle::load(&dir);
        let output = serde_json::json!({
            "dir": dir,
            "artifacts": statuses,
            "loaded": loaded.as_ref().map(|b| b.describe()).ok(),
            "error": loaded.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Model artifacts in".cyan().bold(),
        dir.display().to_string().white()
    );
    for status in &statuses {
        let mark = if status.present {
            "found".green()
        } else {
            "missing".red()
        };
        println!("  {:<20} {}", status.file, mark);
    }
    println!();

    let bundle = ModelBundle::load(&dir)?;
    println!("{}", "Loaded:".yellow().bold());
    for info in bundle.describe() {
        let width = info
            .n_features
            .map(|n| format!("{} features", n))
            .unwrap_or_else(|| "any width".to_string());
        println!(
            "  {:<20} {:<5} {:<24} {}",
            info.file, info.mode, info.kind, width
        );
    }

    // Check column order/width against both modes
    bundle.into_predictor()?;
    println!();
    println!("{}", "Both model pairs are ready.".green());
    Ok(())
}

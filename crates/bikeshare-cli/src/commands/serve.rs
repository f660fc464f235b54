//! Serve command - run the JSON API over one shared dashboard.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use tracing::warn;

use bikeshare::Dashboard;

use super::resolve_config;
use crate::server::{app, state::AppState};

pub fn run(
    config_file: Option<&Path>,
    source: Option<String>,
    models: Option<PathBuf>,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(config_file, source.as_deref(), models)?;
    let dashboard = Dashboard::new(config);

    // Load before the runtime starts; remote sources use a blocking client.
    let tables = dashboard.tables()?;
    let models_ready = match dashboard.load_models() {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "Prediction endpoints unavailable");
            false
        }
    };

    let addr: std::net::SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid address {}:{}: {}", host, port, e))?;

    println!();
    println!(
        "{} {}",
        "Starting dashboard API at".cyan().bold(),
        format!("http://{}", addr).white().bold()
    );
    println!();
    println!("  Data:   {}", dashboard.config().data_source);
    println!(
        "  Rows:   {} daily, {} hourly",
        tables.daily.len(),
        tables.hourly.len()
    );
    for file in &tables.sources {
        println!("  Hash:   {} ({})", file.hash, file.file);
    }
    println!(
        "  Models: {}",
        if models_ready {
            "loaded".green()
        } else {
            "unavailable".yellow()
        }
    );
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let state = AppState::new(Arc::new(dashboard));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, addr))?;

    println!("{}", "Shut down.".yellow());
    Ok(())
}

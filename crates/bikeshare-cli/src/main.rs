//! Bikeshare CLI - rental analytics and prediction.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(verbose).with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Views {
            source,
            start,
            end,
            season,
            weather,
            json,
        } => commands::views::run(
            config,
            source,
            commands::views::Selection {
                start,
                end,
                seasons: season,
                weathers: weather,
            },
            json,
        ),

        Commands::Predict {
            mode,
            models,
            input,
            features,
            json,
        } => commands::predict::run(config, mode, models, input, &features, json),

        Commands::Models { dir, json } => commands::models::run(config, dir, json),

        Commands::Serve {
            source,
            models,
            port,
            host,
        } => commands::serve::run(config, source, models, &host, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

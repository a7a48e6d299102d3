//! hotelsort - Main Entry Point
//!
//! Two-stage offline pipeline: clean a raw hotel-search log, then fit a
//! ranking or classification model on the cleaned data.

use clap::Parser;
use hotelsort::cli::{cmd_preprocess, cmd_train, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotelsort=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess { input, output } => {
            cmd_preprocess(&input, &output)?;
        }
        Commands::Train {
            input,
            output,
            model_type,
        } => {
            cmd_train(&input, &output, model_type)?;
        }
    }

    Ok(())
}

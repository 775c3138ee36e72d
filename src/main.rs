//! Scorewatch - Main Entry Point
//!
//! Drift monitoring and retraining control loop for a wallet fraud-risk
//! scoring model.

use clap::Parser;
use scorewatch::cli::{
    cmd_check_features, cmd_check_quality, cmd_check_scores, cmd_history, cmd_log, cmd_run,
    load_config, Cli, Commands,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorewatch=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::CheckFeatures => cmd_check_features(&config)?,
        Commands::CheckScores => cmd_check_scores(&config)?,
        Commands::CheckQuality => cmd_check_quality(&config)?,
        Commands::Run => cmd_run(&config)?,
        Commands::Log {
            score,
            model_version,
            features,
        } => cmd_log(&config, score, &model_version, &features)?,
        Commands::History { last } => cmd_history(&config, last)?,
    }

    Ok(())
}

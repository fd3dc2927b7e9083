//! API skeleton - Application entry point
//!
//! CLI-based entry point that dispatches to the serve, migrate, schedule and
//! worker commands.

use clap::Parser;

use api_skeleton::{
    cli::{Cli, Commands},
    commands,
    config::Config,
    logging,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Held until exit so buffered file logs are flushed
    let _guard = match logging::init_tracing(&config, cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {}", e);
            std::process::exit(2);
        }
    };

    if config.uses_insecure_secret() {
        tracing::warn!("JWT_SECRET is not set, using the development secret");
    }
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Schedule(args) => commands::schedule::execute(args, config).await,
        Commands::Worker(args) => commands::worker::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

use clap::Parser;
use ragchat::cli::commands::Cli;
use ragchat::cli::commands::Commands;
use ragchat::cli::handlers::handle_config_command;
use ragchat::cli::handlers::handle_init_command;
use ragchat::cli::handlers::handle_serve_command;
use ragchat::config::AppConfig;
use ragchat::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        ragchat::logging::init_logging_with_level("debug")?;
    } else {
        ragchat::logging::init_logging()?;
    }

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Init { force } => {
            handle_init_command(&config, force).await?;
        }
        Commands::Serve { host, port, cors } => {
            handle_serve_command(&config, host, port, cors).await?;
        }
        Commands::Config => {
            handle_config_command(&config).await?;
        }
    }

    Ok(())
}

//! Madan - voice and text chat assistant CLI
//!
#![doc = "Madan - voice and text chat assistant"]
#![doc = "Main entry point for the Madan application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use madan::cli::{Cli, Commands};
use madan::commands;
use madan::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { session } => {
            if let Some(model) = &session.model {
                tracing::debug!("Using model override: {}", model);
            }
            commands::chat::run_chat(config, session.mute).await?;
            Ok(())
        }
        Commands::Ask { text, session } => {
            let text = text.join(" ");
            tracing::debug!("Single turn: {}", text);
            commands::ask::run_ask(config, &text, session.mute).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&config, command)?;
            Ok(())
        }
        Commands::Logs { limit, json } => {
            commands::logs::show_logs(&config, limit, json)?;
            Ok(())
        }
        Commands::Prefs { theme, voice } => {
            commands::prefs::handle_prefs(&config, theme, voice)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "madan=debug" } else { "madan=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

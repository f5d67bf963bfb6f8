//! Spotstats CLI - command-line client for the Spotify Web API.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use spotstats::cli::{commands, AuthCommands, Cli, Commands};
use spotstats::config::settings::env;
use spotstats::config::{load_config, load_config_from};
use spotstats::{AppContext, Result};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(env::LOG_LEVEL)
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    // Run the command
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        return commands::handle_completions(shell);
    }

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let ctx = AppContext::from_config(config, cli.ephemeral).await?;

    match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Import {
                access_token,
                refresh_token,
                expires_in,
                scope,
            } => commands::handle_import(&ctx, access_token, refresh_token, expires_in, scope).await,
            AuthCommands::Status => commands::handle_status(&ctx).await,
            AuthCommands::Logout => commands::handle_logout(&ctx).await,
            AuthCommands::Refresh => commands::handle_refresh(&ctx).await,
        },
        Commands::Me => commands::handle_me(&ctx).await,
        Commands::Get { path } => commands::handle_get(&ctx, &path).await,
        Commands::Completions { shell } => commands::handle_completions(shell),
    }
}

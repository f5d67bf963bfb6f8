//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line client for the Spotify Web API.
///
/// Requests run through an authenticated pipeline that refreshes the stored
/// credential when the API rejects it.
#[derive(Parser, Debug)]
#[command(name = "spotstats")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to an alternate configuration file.
    #[arg(short, long, global = true, env = "SPOTSTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep credentials in memory for this run instead of the OS keyring.
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the stored credential.
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Show the profile of the signed-in user.
    Me,

    /// Send a GET request to an API path and print the JSON response.
    ///
    /// The path is relative to the API base, e.g. `me/top/artists?limit=5`.
    Get {
        /// API path to request.
        path: String,
    },

    /// Generate shell completion scripts.
    ///
    /// Outputs completion script for the specified shell.
    /// Follow shell-specific instructions to install.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: ShellType,
    },
}

/// Supported shell types for completions.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Authentication subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store a credential obtained from an authorization flow elsewhere.
    Import {
        /// Access token issued by the accounts service.
        #[arg(long, env = "SPOTSTATS_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,

        /// Refresh token issued alongside the access token.
        #[arg(long, env = "SPOTSTATS_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,

        /// Seconds until the access token expires.
        #[arg(long, default_value_t = 3600)]
        expires_in: i64,

        /// Space-separated scopes granted to the token.
        #[arg(long)]
        scope: Option<String>,
    },

    /// Show current authentication status.
    Status,

    /// Log out and remove the stored credential.
    Logout,

    /// Exchange the refresh token for a new credential now.
    Refresh,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_import_with_defaults() {
        let cli = Cli::try_parse_from([
            "spotstats",
            "auth",
            "import",
            "--access-token",
            "A1",
            "--refresh-token",
            "R1",
        ])
        .unwrap();

        match cli.command {
            Commands::Auth {
                command:
                    AuthCommands::Import {
                        access_token,
                        refresh_token,
                        expires_in,
                        scope,
                    },
            } => {
                assert_eq!(access_token, "A1");
                assert_eq!(refresh_token, "R1");
                assert_eq!(expires_in, 3600);
                assert!(scope.is_none());
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "spotstats",
            "get",
            "/me/player",
            "--ephemeral",
            "--config",
            "/tmp/spotstats.toml",
            "-v",
        ])
        .unwrap();

        assert!(cli.ephemeral);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/spotstats.toml")));
        assert!(matches!(cli.command, Commands::Get { ref path } if path == "/me/player"));
    }
}

//! CLI module for spotstats.

pub mod args;
pub mod commands;

pub use args::{AuthCommands, Cli, Commands, ShellType};

//! Shell completion generation.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, ShellType};
use crate::error::Result;

/// Handles the `spotstats completions <shell>` command.
pub fn handle_completions(shell: ShellType) -> Result<()> {
    write_completions(shell, &mut std::io::stdout())
}

fn write_completions(shell: ShellType, out: &mut dyn Write) -> Result<()> {
    let shell = match shell {
        ShellType::Bash => Shell::Bash,
        ShellType::Zsh => Shell::Zsh,
        ShellType::Fish => Shell::Fish,
        ShellType::PowerShell => Shell::PowerShell,
    };

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "spotstats", out);
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut out = Vec::new();
        write_completions(ShellType::Bash, &mut out).unwrap();

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("spotstats"));
        assert!(script.contains("import"));
    }
}

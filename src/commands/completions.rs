//! Completions command implementation

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::{Cli, CompletionsArgs};
use crate::error::{Result, unsupported_dialect};

/// Generate completion script for the requested shell on stdout
pub fn run(args: &CompletionsArgs) -> Result<()> {
    let shell = match args.shell.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "elvish" => Shell::Elvish,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        "zsh" => Shell::Zsh,
        other => return Err(unsupported_dialect(other)),
    };

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "modenv", &mut std::io::stdout());

    Ok(())
}

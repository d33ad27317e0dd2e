//! modenv - environment-module manager
//!
//! Resolves named software modules against dependency and conflict rules and
//! the capabilities of the current host, then prints the shell mutations for
//! the calling session to evaluate:
//!
//! ```sh
//! eval "$(modenv load gcc/13.2)"
//! ```

mod cache;
mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod fingerprint;
mod host;
mod repo;
mod resolver;
mod shell;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Load(args) => commands::load::run(args, &cli),
        Commands::Unload(args) => commands::unload::run(args, &cli),
        Commands::Swap(args) => commands::swap::run(args, &cli),
        Commands::Purge => commands::purge::run(&cli),
        Commands::List(args) => commands::list::run(args, &cli),
        Commands::Avail(args) => commands::avail::run(args, &cli),
        Commands::Cache(args) => commands::cache::run(args, &cli),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

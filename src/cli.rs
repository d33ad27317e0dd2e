//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modenv - environment-module manager
///
/// Resolve named software modules against the current host and emit the
/// shell mutations that make them usable in the calling session.
#[derive(Parser, Debug)]
#[command(
    name = "modenv",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Environment-module manager for shared computing environments",
    long_about = "modenv resolves requested software modules against dependency and conflict \
                  rules and the capabilities of the current host, and prints the environment \
                  mutations for the calling shell to source.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  eval \"$(modenv load gcc/13.2)\"\n    \
                  eval \"$(modenv load openmpi --auto-unload)\"\n    \
                  eval \"$(modenv swap gcc/12.1 gcc/13.2)\"\n    \
                  eval \"$(modenv purge)\"\n    \
                  modenv avail\n    \
                  modenv list"
)]
pub struct Cli {
    /// Shell dialect for the emitted script (sh, csh, fish, pwsh)
    #[arg(long, short = 's', global = true, env = "MODENV_SHELL")]
    pub shell: Option<String>,

    /// Module repository path (repeatable; overrides MODENV_PATH and config)
    #[arg(long, short = 'r', global = true, value_name = "PATH")]
    pub repo: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load modules into the session
    Load(LoadArgs),

    /// Unload modules from the session
    Unload(UnloadArgs),

    /// Replace one loaded module with another
    Swap(SwapArgs),

    /// Unload every loaded module
    Purge,

    /// List currently loaded modules
    List(ListArgs),

    /// List modules available on this host
    Avail(AvailArgs),

    /// Inspect or clear the resolution cache
    Cache(CacheArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the load command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Load the highest compatible version:\n    eval \"$(modenv load gcc)\"\n\n\
                  Load an exact version:\n    eval \"$(modenv load gcc/13.2)\"\n\n\
                  Replace conflicting modules automatically:\n    eval \"$(modenv load compiler/2.0 --auto-unload)\"\n\n\
                  Load several modules in one invocation:\n    eval \"$(modenv load gcc openmpi fftw)\"")]
pub struct LoadArgs {
    /// Modules to load, as 'name' or 'name/version'
    #[arg(required = true)]
    pub modules: Vec<String>,

    /// Unload conflicting loaded modules instead of failing
    #[arg(long)]
    pub auto_unload: bool,
}

/// Arguments for the unload command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Unload a module:\n    eval \"$(modenv unload gcc)\"\n\n\
                  Unload together with everything that depends on it:\n    eval \"$(modenv unload libX/3.0 --cascade)\"")]
pub struct UnloadArgs {
    /// Modules to unload, as 'name' or 'name/version'
    #[arg(required = true)]
    pub modules: Vec<String>,

    /// Unload loaded dependents first instead of failing
    #[arg(long)]
    pub cascade: bool,
}

/// Arguments for the swap command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Swap compiler versions:\n    eval \"$(modenv swap gcc/12.1 gcc/13.2)\"")]
pub struct SwapArgs {
    /// Loaded module to remove
    pub from: String,

    /// Module to load in its place
    pub to: String,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show capability tags and effects per module
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the avail command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List every available module:\n    modenv avail\n\n\
                  List versions of one family:\n    modenv avail gcc")]
pub struct AvailArgs {
    /// Restrict the listing to one module family
    pub name: Option<String>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache location and size:\n    modenv cache\n\n\
                  Clear the cache:\n    modenv cache --clear")]
pub struct CacheArgs {
    /// Remove all cache entries
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    modenv completions --shell bash > ~/.bash_completion.d/modenv\n\n\
                  Generate zsh completions:\n    modenv completions --shell zsh > ~/.zfunc/_modenv\n\n\
                  Generate fish completions:\n    modenv completions --shell fish > ~/.config/fish/completions/modenv.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_load() {
        let cli = Cli::try_parse_from(["modenv", "load", "gcc/13.2"]).unwrap();
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.modules, vec!["gcc/13.2"]);
                assert!(!args.auto_unload);
            }
            _ => panic!("Expected Load command"),
        }
    }

    #[test]
    fn test_cli_parsing_load_requires_module() {
        assert!(Cli::try_parse_from(["modenv", "load"]).is_err());
    }

    #[test]
    fn test_cli_parsing_load_with_options() {
        let cli =
            Cli::try_parse_from(["modenv", "load", "gcc", "openmpi", "--auto-unload"]).unwrap();
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.modules, vec!["gcc", "openmpi"]);
                assert!(args.auto_unload);
            }
            _ => panic!("Expected Load command"),
        }
    }

    #[test]
    fn test_cli_parsing_unload_cascade() {
        let cli = Cli::try_parse_from(["modenv", "unload", "libX/3.0", "--cascade"]).unwrap();
        match cli.command {
            Commands::Unload(args) => {
                assert_eq!(args.modules, vec!["libX/3.0"]);
                assert!(args.cascade);
            }
            _ => panic!("Expected Unload command"),
        }
    }

    #[test]
    fn test_cli_parsing_swap() {
        let cli = Cli::try_parse_from(["modenv", "swap", "gcc/12.1", "gcc/13.2"]).unwrap();
        match cli.command {
            Commands::Swap(args) => {
                assert_eq!(args.from, "gcc/12.1");
                assert_eq!(args.to, "gcc/13.2");
            }
            _ => panic!("Expected Swap command"),
        }
    }

    #[test]
    fn test_cli_parsing_purge() {
        let cli = Cli::try_parse_from(["modenv", "purge"]).unwrap();
        assert!(matches!(cli.command, Commands::Purge));
    }

    #[test]
    fn test_cli_parsing_avail() {
        let cli = Cli::try_parse_from(["modenv", "avail", "gcc"]).unwrap();
        match cli.command {
            Commands::Avail(args) => assert_eq!(args.name.as_deref(), Some("gcc")),
            _ => panic!("Expected Avail command"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "modenv", "-v", "-s", "fish", "-r", "/srv/modules", "-r", "/opt/modules", "list",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.shell.as_deref(), Some("fish"));
        assert_eq!(cli.repo.len(), 2);
    }

    #[test]
    fn test_cli_parsing_cache_clear() {
        let cli = Cli::try_parse_from(["modenv", "cache", "--clear"]).unwrap();
        match cli.command {
            Commands::Cache(args) => assert!(args.clear),
            _ => panic!("Expected Cache command"),
        }
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["modenv", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "bash"),
            _ => panic!("Expected Completions command"),
        }
    }
}

//! Shared per-invocation state

use console::Style;

use crate::cache::{Cache, compute_fingerprint};
use crate::cli::Cli;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::host::{self, HostProfile};
use crate::repo::RepositoryIndex;
use crate::shell::{Dialect, EnvSnapshot};

/// Everything a command needs to resolve and emit
///
/// Built once per invocation: configuration, repository index (cached or
/// freshly scanned), host profile, the captured environment, and the output
/// dialect. Commands treat all of it as read-only.
pub struct Session {
    pub config: SiteConfig,
    pub index: RepositoryIndex,
    pub profile: HostProfile,
    pub env: EnvSnapshot,
    pub dialect: Dialect,
    pub verbose: bool,
}

impl Session {
    pub fn prepare(cli: &Cli) -> Result<Self> {
        let config = SiteConfig::load()?;
        let repositories = config.effective_repositories(&cli.repo);

        let dialect: Dialect = cli
            .shell
            .as_deref()
            .or(config.default_dialect.as_deref())
            .unwrap_or("sh")
            .parse()?;

        if repositories.is_empty() {
            let yellow = Style::new().yellow();
            eprintln!(
                "{}",
                yellow.apply_to(
                    "Warning: no module repositories configured (use --repo, MODENV_PATH, or config.yaml)"
                )
            );
        }

        let cache = match &config.cache_dir {
            Some(dir) => Cache::new(dir),
            None => Cache::at_default_location()?,
        };

        let fingerprint = compute_fingerprint(&repositories, &host::quick_identity());

        let (index, profile) = match cache.load(&fingerprint) {
            Some(cached) => {
                if cli.verbose {
                    eprintln!("Using cached index ({} modules)", cached.0.len());
                }
                cached
            }
            None => {
                let (index, warnings) = RepositoryIndex::build(&repositories)?;
                let profile = HostProfile::probe();

                let yellow = Style::new().yellow();
                for warning in &warnings {
                    eprintln!("{}", yellow.apply_to(format!("Warning: {warning}")));
                }

                // A failed store costs the next invocation a rescan, nothing more
                if let Err(e) = cache.store(&fingerprint, &index, &profile) {
                    if cli.verbose {
                        eprintln!("{}", yellow.apply_to(format!("Warning: {e}")));
                    }
                }

                if cli.verbose {
                    eprintln!(
                        "Scanned {} repositories, {} modules",
                        repositories.len(),
                        index.len()
                    );
                }

                (index, profile)
            }
        };

        Ok(Self {
            config,
            index,
            profile,
            env: EnvSnapshot::capture(),
            dialect,
            verbose: cli.verbose,
        })
    }

    /// Cache handle for this invocation's configuration
    pub fn cache(config: &SiteConfig) -> Result<Cache> {
        match &config.cache_dir {
            Some(dir) => Ok(Cache::new(dir)),
            None => Cache::at_default_location(),
        }
    }
}

//! Site/user configuration
//!
//! Supplies default repository paths and policy knobs; read-only input to
//! resolution. Precedence for repository paths, highest first:
//!
//! 1. `--repo` CLI arguments
//! 2. `MODENV_PATH` environment variable (`:`-separated)
//! 3. `repositories` in `~/.config/modenv/config.yaml`
//!
//! A missing configuration file means defaults; a malformed one is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, config_parse_failed, config_read_failed};

/// Configuration directory name under the user's config directory
const CONFIG_DIR: &str = "modenv";

/// Configuration filename
const CONFIG_FILE: &str = "config.yaml";

/// Environment variable supplying repository paths
pub const REPO_PATH_VAR: &str = "MODENV_PATH";

/// Site/user configuration (`config.yaml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Default module repository paths
    #[serde(default)]
    pub repositories: Vec<PathBuf>,

    /// Cache directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Dialect assumed when `--shell` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dialect: Option<String>,

    /// Whether load requests may unload conflicting modules by default
    #[serde(default)]
    pub auto_unload: bool,
}

impl SiteConfig {
    /// Path of the user configuration file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the user configuration, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_read_failed(path.display().to_string(), e.to_string()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| config_parse_failed(path.display().to_string(), e.to_string()))
    }

    /// Repository paths effective for this invocation
    pub fn effective_repositories(&self, cli_paths: &[PathBuf]) -> Vec<PathBuf> {
        if !cli_paths.is_empty() {
            return cli_paths.to_vec();
        }

        if let Ok(env_paths) = std::env::var(REPO_PATH_VAR) {
            let paths: Vec<PathBuf> = env_paths
                .split(':')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect();
            if !paths.is_empty() {
                return paths;
            }
        }

        self.repositories.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_full_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            concat!(
                "repositories:\n  - /srv/modules\n  - /opt/site/modules\n",
                "cache_dir: /tmp/modenv-cache\n",
                "default_dialect: fish\n",
                "auto_unload: true\n",
            ),
        )
        .unwrap();

        let config = SiteConfig::load_from(&path).unwrap();
        assert_eq!(config.repositories.len(), 2);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/modenv-cache")));
        assert_eq!(config.default_dialect.as_deref(), Some("fish"));
        assert!(config.auto_unload);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = SiteConfig::load_from(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(
            result,
            Err(crate::error::ModenvError::ConfigReadFailed { .. })
        ));
    }

    #[test]
    fn test_load_from_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "repositories: [unclosed\n").unwrap();

        let result = SiteConfig::load_from(&path);
        assert!(matches!(
            result,
            Err(crate::error::ModenvError::ConfigParseFailed { .. })
        ));
    }

    #[test]
    fn test_load_from_rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "repositores: []\n").unwrap();

        assert!(SiteConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_cli_paths_win() {
        let config = SiteConfig {
            repositories: vec![PathBuf::from("/srv/modules")],
            ..SiteConfig::default()
        };
        let cli = vec![PathBuf::from("/tmp/repo")];
        assert_eq!(config.effective_repositories(&cli), cli);
    }

    #[test]
    fn test_config_paths_are_fallback() {
        let config = SiteConfig {
            repositories: vec![PathBuf::from("/srv/modules")],
            ..SiteConfig::default()
        };
        // Assumes MODENV_PATH is not set in the test environment
        if std::env::var(REPO_PATH_VAR).is_err() {
            assert_eq!(
                config.effective_repositories(&[]),
                vec![PathBuf::from("/srv/modules")]
            );
        }
    }
}

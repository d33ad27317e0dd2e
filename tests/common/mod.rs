//! Common test utilities for modenv integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A disposable module repository plus an isolated cache and home directory
#[allow(dead_code)]
pub struct TestSite {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub repo: PathBuf,
    pub cache: PathBuf,
}

impl TestSite {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let repo = temp.path().join("repo");
        let cache = temp.path().join("cache");
        std::fs::create_dir_all(&repo).expect("Failed to create repository directory");
        Self { temp, repo, cache }
    }

    /// Write a definition file at `repo/<family>/<version>.yaml`
    pub fn write_module(&self, family: &str, version: &str, content: &str) {
        let dir = self.repo.join(family);
        std::fs::create_dir_all(&dir).expect("Failed to create family directory");
        std::fs::write(dir.join(format!("{version}.yaml")), content)
            .expect("Failed to write module definition");
    }

    /// A modenv invocation isolated from the developer's environment
    ///
    /// HOME points into the temp directory so no user config.yaml leaks in,
    /// and the cache lands next to the repository.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("modenv").expect("Failed to find modenv binary");
        cmd.env("HOME", self.temp.path());
        cmd.env_remove("XDG_CONFIG_HOME");
        cmd.env_remove("XDG_CACHE_HOME");
        cmd.env_remove("MODENV_PATH");
        cmd.env_remove("MODENV_LOADED");
        cmd.env_remove("MODENV_SHELL");
        cmd.env("MODENV_CACHE_DIR", &self.cache);
        cmd.arg("-r").arg(&self.repo);
        cmd
    }
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

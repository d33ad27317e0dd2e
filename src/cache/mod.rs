//! Resolution cache
//!
//! Persists the last-built repository index and host profile so repeated
//! invocations skip the filesystem scan and hardware probes.
//!
//! ## Cache Structure
//!
//! ```text
//! ~/.cache/modenv/
//! └── index-<fingerprint>.json
//! ```
//!
//! The fingerprint covers the sorted repository paths, a per-file
//! modification signature for everything under them, and the host identity.
//! The artifact embeds a format
//! version; an unreadable, mismatched, or stale entry is always a miss,
//! never an error. Writers replace the artifact atomically (write to a temp
//! file in the same directory, then rename), so concurrent short-lived
//! invocations never observe a partial write.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, cache_operation_failed};
use crate::fingerprint::{self, HASH_PREFIX};
use crate::host::HostProfile;
use crate::repo::RepositoryIndex;

/// Bumped whenever the serialized layout changes; old entries become misses
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Default cache directory name under the user's cache directory
const CACHE_DIR: &str = "modenv";

/// Get the cache directory path
///
/// Returns `~/.cache/modenv` on Unix or equivalent on other platforms.
/// Can be overridden with the `MODENV_CACHE_DIR` environment variable.
pub fn cache_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MODENV_CACHE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::cache_dir()
        .ok_or_else(|| cache_operation_failed("Could not determine cache directory"))?;

    Ok(base.join(CACHE_DIR))
}

/// Compute the cache fingerprint for a repository path set on this host
///
/// Every file under every repository contributes its own modification
/// signature, so adding, removing, or rewriting a single definition always
/// changes the fingerprint, even within the same second as the cached build.
pub fn compute_fingerprint(repo_paths: &[PathBuf], host_identity: &str) -> String {
    let mut sorted: Vec<&PathBuf> = repo_paths.iter().collect();
    sorted.sort();

    let mut parts: Vec<String> = Vec::new();
    for path in sorted {
        parts.push(path.display().to_string());
        parts.extend(fingerprint::tree_signatures(path));
    }
    parts.push(host_identity.to_string());

    fingerprint::hash_parts(parts)
}

/// Explicit handle to the on-disk cache
///
/// Constructed from configuration rather than ambient global state so the
/// resolution entry points stay testable against a temp directory.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    format_version: u32,
    fingerprint: String,
    index: RepositoryIndex,
    profile: HostProfile,
}

impl Cache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache at the configured default location
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(cache_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the cached index and profile for a fingerprint
    ///
    /// Any inconsistency is a miss: missing file, unreadable JSON, format
    /// version from another release, or a fingerprint recorded for different
    /// repository state.
    pub fn load(&self, fingerprint: &str) -> Option<(RepositoryIndex, HostProfile)> {
        let content = std::fs::read(self.entry_path(fingerprint)).ok()?;
        let entry: CacheEntry = serde_json::from_slice(&content).ok()?;

        if entry.format_version != CACHE_FORMAT_VERSION || entry.fingerprint != fingerprint {
            return None;
        }

        Some((entry.index, entry.profile))
    }

    /// Store an index and profile under a fingerprint, atomically
    pub fn store(
        &self,
        fingerprint: &str,
        index: &RepositoryIndex,
        profile: &HostProfile,
    ) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| cache_operation_failed(format!("create cache dir: {e}")))?;

        let entry = CacheEntry {
            format_version: CACHE_FORMAT_VERSION,
            fingerprint: fingerprint.to_string(),
            index: index.clone(),
            profile: profile.clone(),
        };
        let content = serde_json::to_vec(&entry)
            .map_err(|e| cache_operation_failed(format!("serialize cache entry: {e}")))?;

        // Write-to-temp-then-rename keeps concurrent readers consistent
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| cache_operation_failed(format!("create temp file: {e}")))?;
        temp.write_all(&content)
            .map_err(|e| cache_operation_failed(format!("write cache entry: {e}")))?;
        temp.persist(self.entry_path(fingerprint))
            .map_err(|e| cache_operation_failed(format!("replace cache entry: {e}")))?;

        Ok(())
    }

    /// Remove every cache entry
    pub fn clear(&self) -> Result<()> {
        if self.dir.is_dir() {
            std::fs::remove_dir_all(&self.dir)
                .map_err(|e| cache_operation_failed(format!("clear cache: {e}")))?;
        }
        Ok(())
    }

    /// Total size of the cache directory in bytes
    pub fn size_bytes(&self) -> u64 {
        walkdir::WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.metadata().ok())
            .filter(|m| m.is_file())
            .map(|m| m.len())
            .sum()
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        let digest = fingerprint.strip_prefix(HASH_PREFIX).unwrap_or(fingerprint);
        let short: String = digest.chars().take(32).collect();
        self.dir.join(format!("index-{short}.json"))
    }
}

//! BLAKE3 fingerprinting utilities
//!
//! Fingerprints tie the cache to the on-disk repository state and to the
//! identity of the probed host, so a stale cache entry is never mistaken for
//! a current one.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::Result;

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Hash a sequence of byte parts with null separators
///
/// Deterministic for a given part sequence; parts are length-delimited by the
/// separator so `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn hash_parts<I, B>(parts: I) -> String
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut hasher = Hasher::new();
    for part in parts {
        hasher.update(part.as_ref());
        hasher.update(b"\0");
    }
    format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex())
}

/// Modification signature of a single file: `<path>\0<mtime-nanos>\0<len>`
///
/// Nanosecond mtime plus length, so two writes within the same second still
/// produce distinct signatures on filesystems with sub-second timestamps,
/// and the length catches same-timestamp rewrites elsewhere.
pub fn file_signature(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path).map_err(|e| crate::error::file_read_failed(
        path.display().to_string(),
        e.to_string(),
    ))?;
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    Ok(format!("{}\0{}\0{}", path.display(), mtime, meta.len()))
}

/// Modification signatures of every file under `dir`, sorted by path
///
/// Any added, removed, renamed, or rewritten file changes the result.
/// Unreadable entries are skipped; a missing directory yields no signatures,
/// so the result still changes when the directory appears later.
pub fn tree_signatures(dir: &Path) -> Vec<String> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();

    files
        .iter()
        .filter_map(|path| file_signature(path).ok())
        .collect()
}

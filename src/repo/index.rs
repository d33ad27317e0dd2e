//! The repository index: catalog of available module definitions

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::scan::{self, ScanWarning};
use super::version;
use crate::domain::{ModuleDefinition, ModuleId};
use crate::error::{Result, indices_not_comparable, scan_failed};
use crate::fingerprint;

/// Catalog of available modules, built by scanning repository directories
///
/// Immutable after build. Carries a content fingerprint over the repository
/// path set and every definition file's modification signature; the cache
/// layer uses it to decide validity, and [`RepositoryIndex::diff`] requires
/// matching path sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIndex {
    /// Sorted repository paths this index was built from
    paths: Vec<PathBuf>,

    /// Definitions keyed by identity string (`name/version`)
    modules: BTreeMap<String, ModuleDefinition>,

    /// Content fingerprint of the build
    fingerprint: String,
}

/// Identity-level differences between two builds of the same repository set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDiff {
    pub added: Vec<ModuleId>,
    pub removed: Vec<ModuleId>,
    pub changed: Vec<ModuleId>,
}

impl IndexDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

impl RepositoryIndex {
    /// Build an index by scanning the given repository paths
    ///
    /// Fails only when definition files were present but none parsed; an
    /// empty repository set builds an empty index. Duplicate identities keep
    /// the most recently scanned definition.
    pub fn build(paths: &[PathBuf]) -> Result<(Self, Vec<ScanWarning>)> {
        let outcome = scan::scan(paths)?;

        if outcome.definitions.is_empty() && outcome.files_seen > 0 {
            return Err(scan_failed(format!(
                "{} definition file(s) seen, all skipped",
                outcome.files_seen
            )));
        }

        let mut sorted_paths: Vec<PathBuf> = paths.to_vec();
        sorted_paths.sort();

        let mut signatures = outcome.file_signatures;
        signatures.sort();
        let fingerprint = fingerprint::hash_parts(
            sorted_paths
                .iter()
                .map(|p| p.display().to_string())
                .chain(signatures),
        );

        let mut modules = BTreeMap::new();
        for def in outcome.definitions {
            // Last build wins on duplicate identity across repository paths
            modules.insert(def.id.to_string(), def);
        }

        Ok((
            Self {
                paths: sorted_paths,
                modules,
                fingerprint,
            },
            outcome.warnings,
        ))
    }

    pub fn get(&self, id: &ModuleId) -> Option<&ModuleDefinition> {
        self.modules.get(&id.to_string())
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains_key(&id.to_string())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// All definitions of a family, ascending by the documented version order
    pub fn versions_of(&self, name: &str) -> Vec<&ModuleDefinition> {
        let mut versions: Vec<&ModuleDefinition> = self
            .modules
            .values()
            .filter(|def| def.id.name == name)
            .collect();
        versions.sort_by(|a, b| version::compare(&a.id.version, &b.id.version));
        versions
    }

    /// Family names present in the index, sorted, with definition counts
    pub fn families(&self) -> Vec<(&str, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for def in self.modules.values() {
            *counts.entry(def.id.name.as_str()).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleDefinition> {
        self.modules.values()
    }

    /// Differences against a later build of the same repository path set
    pub fn diff(&self, newer: &RepositoryIndex) -> Result<IndexDiff> {
        if self.paths != newer.paths {
            return Err(indices_not_comparable());
        }

        let mut diff = IndexDiff::default();

        for (key, def) in &newer.modules {
            match self.modules.get(key) {
                None => diff.added.push(def.id.clone()),
                Some(old) if old.effect_hash() != def.effect_hash() => {
                    diff.changed.push(def.id.clone());
                }
                Some(_) => {}
            }
        }

        for (key, def) in &self.modules {
            if !newer.modules.contains_key(key) {
                diff.removed.push(def.id.clone());
            }
        }

        Ok(diff)
    }
}

//! Environment snapshots
//!
//! The shell environment is shared global mutable state; treating it as an
//! explicit value (a snapshot in, a delta out) keeps the resolver and
//! emitter pure and testable without a real shell.

use std::collections::BTreeMap;

use crate::domain::LoadedSet;
use crate::domain::loaded::LOADED_VAR;

/// Separator for path-like variables (`PATH`, `LD_LIBRARY_PATH`, ...)
const PATH_SEP: char = ':';

/// An owned copy of (the relevant part of) a process environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the calling process environment
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn get(&self, var: &str) -> Option<&str> {
        self.vars.get(var).map(String::as_str)
    }

    pub fn set(&mut self, var: &str, value: impl Into<String>) {
        self.vars.insert(var.to_string(), value.into());
    }

    pub fn unset(&mut self, var: &str) {
        self.vars.remove(var);
    }

    /// Insert `entry` at the front of a path-like variable
    ///
    /// An existing occurrence of the exact entry is removed first, so
    /// repeated load/unload cycles cannot grow the variable without bound.
    pub fn prepend(&mut self, var: &str, entry: &str) {
        let mut entries = self.path_entries(var);
        entries.retain(|e| e != entry);
        entries.insert(0, entry.to_string());
        self.set(var, join_path(&entries));
    }

    /// Insert `entry` at the end of a path-like variable, deduplicated
    pub fn append(&mut self, var: &str, entry: &str) {
        let mut entries = self.path_entries(var);
        entries.retain(|e| e != entry);
        entries.push(entry.to_string());
        self.set(var, join_path(&entries));
    }

    /// Remove the exact `entry` from a path-like variable, wherever it sits
    ///
    /// This is the structural inverse of prepend/append: other modules may
    /// have inserted entries around it since, so the position is irrelevant.
    /// The variable is unset when its last entry goes.
    pub fn remove_entry(&mut self, var: &str, entry: &str) {
        let mut entries = self.path_entries(var);
        entries.retain(|e| e != entry);
        if entries.is_empty() {
            self.unset(var);
        } else {
            self.set(var, join_path(&entries));
        }
    }

    /// The loaded set tracked in the reserved variable
    pub fn loaded_set(&self) -> LoadedSet {
        self.get(LOADED_VAR).map(LoadedSet::parse).unwrap_or_default()
    }

    /// Re-serialize the loaded set into the reserved variable
    pub fn set_loaded(&mut self, loaded: &LoadedSet) {
        if loaded.is_empty() {
            self.unset(LOADED_VAR);
        } else {
            self.set(LOADED_VAR, loaded.serialize_env());
        }
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    fn path_entries(&self, var: &str) -> Vec<String> {
        self.get(var)
            .map(|value| {
                value
                    .split(PATH_SEP)
                    .filter(|e| !e.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl FromIterator<(String, String)> for EnvSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

fn join_path(entries: &[String]) -> String {
    entries.join(&PATH_SEP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_to_unset_variable() {
        let mut env = EnvSnapshot::new();
        env.prepend("PATH", "/opt/gcc/bin");
        assert_eq!(env.get("PATH"), Some("/opt/gcc/bin"));
    }

    #[test]
    fn test_prepend_goes_first() {
        let mut env = EnvSnapshot::new();
        env.set("PATH", "/usr/bin:/bin");
        env.prepend("PATH", "/opt/gcc/bin");
        assert_eq!(env.get("PATH"), Some("/opt/gcc/bin:/usr/bin:/bin"));
    }

    #[test]
    fn test_append_goes_last() {
        let mut env = EnvSnapshot::new();
        env.set("PATH", "/usr/bin");
        env.append("PATH", "/opt/tools/bin");
        assert_eq!(env.get("PATH"), Some("/usr/bin:/opt/tools/bin"));
    }

    #[test]
    fn test_prepend_deduplicates() {
        let mut env = EnvSnapshot::new();
        env.set("PATH", "/usr/bin:/opt/gcc/bin");
        env.prepend("PATH", "/opt/gcc/bin");
        assert_eq!(env.get("PATH"), Some("/opt/gcc/bin:/usr/bin"));
    }

    #[test]
    fn test_remove_entry_middle() {
        let mut env = EnvSnapshot::new();
        env.set("PATH", "/a:/b:/c");
        env.remove_entry("PATH", "/b");
        assert_eq!(env.get("PATH"), Some("/a:/c"));
    }

    #[test]
    fn test_remove_last_entry_unsets() {
        let mut env = EnvSnapshot::new();
        env.set("PATH", "/only");
        env.remove_entry("PATH", "/only");
        assert_eq!(env.get("PATH"), None);
    }

    #[test]
    fn test_remove_entry_absent_is_noop() {
        let mut env = EnvSnapshot::new();
        env.set("PATH", "/a:/b");
        env.remove_entry("PATH", "/zzz");
        assert_eq!(env.get("PATH"), Some("/a:/b"));
    }

    #[test]
    fn test_loaded_set_round_trip() {
        let mut env = EnvSnapshot::new();
        let loaded = LoadedSet::parse("gcc/13.2:libX/3.0");
        env.set_loaded(&loaded);
        assert_eq!(env.loaded_set(), loaded);
    }

    #[test]
    fn test_empty_loaded_set_unsets_variable() {
        let mut env = EnvSnapshot::new();
        env.set(LOADED_VAR, "gcc/13.2");
        env.set_loaded(&LoadedSet::new());
        assert_eq!(env.get(LOADED_VAR), None);
    }
}

//! The ordered set of currently loaded modules
//!
//! The loaded set lives in the calling shell's environment in the reserved
//! variable [`LOADED_VAR`], one `name/version` entry per `:`-separated field.
//! Insertion order is meaningful (later modules shadow earlier ones in
//! search-path variables) and is preserved across mutations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ModuleId;

/// Reserved environment variable that tracks the loaded set
pub const LOADED_VAR: &str = "MODENV_LOADED";

/// Separator between entries in the serialized loaded set
const ENTRY_SEP: char = ':';

/// Ordered, deduplicated sequence of loaded module identities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedSet {
    entries: Vec<ModuleId>,
}

impl LoadedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct the loaded set from the reserved variable's value
    ///
    /// Entries that do not parse as `name/version` are dropped silently: the
    /// variable is under user control and a mangled entry must not make every
    /// subsequent invocation fail.
    pub fn parse(raw: &str) -> Self {
        let mut set = Self::new();
        for entry in raw.split(ENTRY_SEP) {
            if let Ok(id) = entry.trim().parse::<ModuleId>() {
                set.insert(id);
            }
        }
        set
    }

    /// Serialize back into the reserved variable's value
    pub fn serialize_env(&self) -> String {
        self.entries
            .iter()
            .map(ModuleId::to_string)
            .collect::<Vec<_>>()
            .join(&ENTRY_SEP.to_string())
    }

    /// Append an identity, keeping the set deduplicated
    pub fn insert(&mut self, id: ModuleId) {
        if !self.entries.contains(&id) {
            self.entries.push(id);
        }
    }

    /// Remove an identity, preserving the order of the rest
    pub fn remove(&mut self, id: &ModuleId) {
        self.entries.retain(|e| e != id);
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.entries.contains(id)
    }

    /// First loaded version of `name`, if any
    pub fn find_by_name(&self, name: &str) -> Option<&ModuleId> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleId> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for LoadedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize_env())
    }
}

impl FromIterator<ModuleId> for LoadedSet {
    fn from_iter<T: IntoIterator<Item = ModuleId>>(iter: T) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

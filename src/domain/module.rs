//! Module identity and definition types

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModenvError, invalid_module_id};

/// Identity of a module: `(name, version)`, written as `name/version`.
///
/// The name is a single path segment (the module family directory); the
/// version may itself contain `/` separators for nested version layouts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    pub name: String,
    pub version: String,
}

impl ModuleId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for ModuleId {
    type Err = ModenvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(invalid_module_id(s)),
        }
    }
}

/// Operation an environment effect performs on its variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectOp {
    /// Overwrite the variable
    Set,
    /// Insert at the front of a `:`-separated path variable
    Prepend,
    /// Insert at the end of a `:`-separated path variable
    Append,
    /// Remove the variable
    Unset,
}

/// One environment mutation declared by a module definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvEffect {
    /// Variable name (e.g. `PATH`, `LD_LIBRARY_PATH`)
    pub var: String,

    /// What to do with it
    pub op: EffectOp,

    /// Value for `set`/`prepend`/`append`; absent for `unset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl fmt::Display for EnvEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            EffectOp::Set => "set",
            EffectOp::Prepend => "prepend",
            EffectOp::Append => "append",
            EffectOp::Unset => "unset",
        };
        match &self.value {
            Some(value) => write!(f, "{op} {}={value}", self.var),
            None => write!(f, "{op} {}", self.var),
        }
    }
}

/// A module definition as loaded from a repository
///
/// Immutable once built; its lifecycle is bound to one index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// Identity, unique within a repository index
    pub id: ModuleId,

    /// Host capability tags this module requires (e.g. `gpu:nvidia`)
    #[serde(default)]
    pub capabilities: BTreeSet<String>,

    /// Modules that must be loaded alongside this one
    #[serde(default)]
    pub requires: Vec<ModuleId>,

    /// Modules that may not be loaded alongside this one
    #[serde(default)]
    pub conflicts: Vec<ModuleId>,

    /// Predecessor this module upgrades in place, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<ModuleId>,

    /// Ordered environment effects applied on load
    #[serde(default)]
    pub effects: Vec<EnvEffect>,
}

impl ModuleDefinition {
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            capabilities: BTreeSet::new(),
            requires: Vec::new(),
            conflicts: Vec::new(),
            replaces: None,
            effects: Vec::new(),
        }
    }

    /// Content hash over the ordered effect list
    ///
    /// Used by the index diff to classify a definition as "changed" when its
    /// identity survived a rebuild but its environment effects did not.
    pub fn effect_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for effect in &self.effects {
            hasher.update(effect.var.as_bytes());
            hasher.update(b"\0");
            hasher.update(format!("{:?}", effect.op).as_bytes());
            hasher.update(b"\0");
            if let Some(value) = &effect.value {
                hasher.update(value.as_bytes());
            }
            hasher.update(b"\0");
        }
        format!("{}{}", crate::fingerprint::HASH_PREFIX, hasher.finalize().to_hex())
    }

    /// Whether this definition declares a conflict with `other`
    pub fn conflicts_with(&self, other: &ModuleId) -> bool {
        self.conflicts.contains(other)
    }
}

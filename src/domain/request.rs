//! Resolution requests and module specs

use std::fmt;
use std::str::FromStr;

use super::ModuleId;
use crate::error::ModenvError;

/// A user-supplied reference to a module: partial (name only, resolved to the
/// highest compatible version) or fully qualified (`name/version`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    pub version: Option<String>,
}

impl ModuleSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn exact(id: &ModuleId) -> Self {
        Self {
            name: id.name.clone(),
            version: Some(id.version.clone()),
        }
    }

    /// Whether this spec refers to the given identity
    pub fn matches(&self, id: &ModuleId) -> bool {
        self.name == id.name
            && self
                .version
                .as_ref()
                .is_none_or(|version| *version == id.version)
    }
}

impl FromStr for ModuleSpec {
    type Err = ModenvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            None if !s.is_empty() => Ok(Self::named(s)),
            Some((name, version)) if !name.is_empty() && !version.is_empty() => Ok(Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            }),
            _ => Err(crate::error::invalid_module_id(s)),
        }
    }
}

impl fmt::Display for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One requested change to the loaded set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Load a module (and its dependency closure)
    Load {
        spec: ModuleSpec,
        /// Unload conflicting modules instead of failing
        auto_unload: bool,
    },

    /// Unload a module
    Unload {
        spec: ModuleSpec,
        /// Unload loaded dependents first instead of failing
        cascade: bool,
    },

    /// Replace one loaded module with another
    Swap { from: ModuleSpec, to: ModuleSpec },

    /// Unload everything
    Purge,
}

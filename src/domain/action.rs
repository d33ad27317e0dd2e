//! Resolved actions and plans

use std::fmt;

use super::{LoadedSet, ModuleDefinition, ModuleId};

/// A single directed state transition
///
/// Actions carry the full definition so the emitter can expand environment
/// effects without going back to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Load(ModuleDefinition),
    Unload(ModuleDefinition),
}

impl Action {
    pub fn id(&self) -> &ModuleId {
        match self {
            Action::Load(def) | Action::Unload(def) => &def.id,
        }
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Action::Load(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Load(def) => write!(f, "load {}", def.id),
            Action::Unload(def) => write!(f, "unload {}", def.id),
        }
    }
}

/// The resolver's output: an ordered action list and the post-state
///
/// Applying `actions` strictly left-to-right to the pre-state loaded set
/// yields `loaded`. The resolver never mutates state itself; the caller
/// persists the post-state by sourcing the emitted script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub loaded: LoadedSet,
}

impl Plan {
    /// A plan that changes nothing
    pub fn noop(loaded: LoadedSet) -> Self {
        Self {
            actions: Vec::new(),
            loaded,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }
}

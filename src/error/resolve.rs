//! Resolution-graph errors

use super::ModenvError;

/// Creates a module not found error
pub fn module_not_found(name: impl Into<String>) -> ModenvError {
    ModenvError::ModuleNotFound { name: name.into() }
}

/// Creates a host-capability mismatch error
pub fn module_incompatible(name: impl Into<String>, missing: impl Into<String>) -> ModenvError {
    ModenvError::ModuleIncompatible {
        name: name.into(),
        missing: missing.into(),
    }
}

/// Creates an unresolved dependency error
pub fn unresolved_dependency(
    name: impl Into<String>,
    dependency: impl Into<String>,
) -> ModenvError {
    ModenvError::UnresolvedDependency {
        name: name.into(),
        dependency: dependency.into(),
    }
}

/// Creates a conflict detected error
pub fn conflict_detected(name: impl Into<String>, conflicting: impl Into<String>) -> ModenvError {
    ModenvError::ConflictDetected {
        name: name.into(),
        conflicting: conflicting.into(),
    }
}

/// Creates a dependent modules loaded error
pub fn dependents_loaded(name: impl Into<String>, dependents: impl Into<String>) -> ModenvError {
    ModenvError::DependentModulesLoaded {
        name: name.into(),
        dependents: dependents.into(),
    }
}

/// Creates a circular dependency error
pub fn circular_dependency(chain: impl Into<String>) -> ModenvError {
    ModenvError::CircularDependency {
        chain: chain.into(),
    }
}

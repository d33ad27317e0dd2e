//! Repository index errors

use super::ModenvError;

/// Creates a repository scan error
pub fn scan_failed(detail: impl Into<String>) -> ModenvError {
    ModenvError::RepositoryScanError {
        detail: detail.into(),
    }
}

/// Creates an invalid module identity error
pub fn invalid_module_id(spec: impl Into<String>) -> ModenvError {
    ModenvError::InvalidModuleId { spec: spec.into() }
}

/// Creates a not-comparable indices error
pub fn indices_not_comparable() -> ModenvError {
    ModenvError::IndicesNotComparable
}

//! Cache errors

use super::ModenvError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> ModenvError {
    ModenvError::CacheOperationFailed {
        message: message.into(),
    }
}

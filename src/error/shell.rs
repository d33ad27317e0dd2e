//! Shell emitter errors

use super::ModenvError;

/// Creates an unsupported dialect error
pub fn unsupported_dialect(dialect: impl Into<String>) -> ModenvError {
    ModenvError::UnsupportedDialect {
        dialect: dialect.into(),
    }
}

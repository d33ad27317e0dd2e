//! Error types and handling for modenv
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`repo`]: Repository index errors
//! - [`resolve`]: Resolution-graph errors
//! - [`shell`]: Shell emitter errors
//! - [`cache`]: Cache errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors

pub mod cache;
pub mod config;
pub mod fs;
pub mod repo;
pub mod resolve;
pub mod shell;

#[allow(unused_imports)]
pub use cache::operation_failed as cache_operation_failed;
#[allow(unused_imports)]
pub use config::{parse_failed as config_parse_failed, read_failed as config_read_failed};
#[allow(unused_imports)]
pub use fs::{io_error, read_failed as file_read_failed, write_failed as file_write_failed};
#[allow(unused_imports)]
pub use repo::{indices_not_comparable, invalid_module_id, scan_failed};
#[allow(unused_imports)]
pub use resolve::{
    circular_dependency, conflict_detected, dependents_loaded, module_incompatible,
    module_not_found, unresolved_dependency,
};
#[allow(unused_imports)]
pub use shell::unsupported_dialect;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modenv operations
#[derive(Error, Diagnostic, Debug)]
pub enum ModenvError {
    // Resolution errors
    #[error("Module '{name}' not found")]
    #[diagnostic(
        code(modenv::resolve::not_found),
        help("Check the module name with 'modenv avail' and that the repository path is correct")
    )]
    ModuleNotFound { name: String },

    #[error("Module '{name}' is not compatible with this host (requires {missing})")]
    #[diagnostic(
        code(modenv::resolve::incompatible),
        help("Versions of this module exist, but none support the capabilities of this machine")
    )]
    ModuleIncompatible { name: String, missing: String },

    #[error("Module '{name}' requires '{dependency}', which is not in any repository")]
    #[diagnostic(code(modenv::resolve::unresolved_dependency))]
    UnresolvedDependency { name: String, dependency: String },

    #[error("Module '{name}' conflicts with loaded module '{conflicting}'")]
    #[diagnostic(
        code(modenv::resolve::conflict),
        help("Unload the conflicting module first, or pass --auto-unload to replace it")
    )]
    ConflictDetected { name: String, conflicting: String },

    #[error("Cannot unload '{name}': loaded modules depend on it ({dependents})")]
    #[diagnostic(
        code(modenv::resolve::dependents_loaded),
        help("Pass --cascade to unload the dependent modules as well")
    )]
    DependentModulesLoaded { name: String, dependents: String },

    #[error("Circular dependency detected: {chain}")]
    #[diagnostic(
        code(modenv::resolve::circular),
        help("Remove the dependency cycle from the module definitions")
    )]
    CircularDependency { chain: String },

    // Repository errors
    #[error("Repository scan produced no usable module definitions")]
    #[diagnostic(
        code(modenv::repo::scan_failed),
        help("Every definition file failed to parse; check the repository layout")
    )]
    RepositoryScanError { detail: String },

    #[error("Invalid module identity: {spec}")]
    #[diagnostic(
        code(modenv::repo::invalid_id),
        help("Module identities are written as 'name' or 'name/version'")
    )]
    InvalidModuleId { spec: String },

    #[error("Indices were built from different repository path sets")]
    #[diagnostic(code(modenv::repo::not_comparable))]
    IndicesNotComparable,

    // Shell errors
    #[error("Unsupported shell dialect: {dialect}")]
    #[diagnostic(
        code(modenv::shell::unsupported_dialect),
        help("Supported dialects: sh, csh, fish, pwsh")
    )]
    UnsupportedDialect { dialect: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(modenv::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(modenv::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(modenv::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(modenv::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modenv::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(modenv::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl From<std::io::Error> for ModenvError {
    fn from(err: std::io::Error) -> Self {
        ModenvError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ModenvError {
    fn from(err: serde_yaml::Error) -> Self {
        ModenvError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ModenvError {
    fn from(err: serde_json::Error) -> Self {
        ModenvError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ModenvError>;

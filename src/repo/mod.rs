//! Repository index for module definitions
//!
//! This module handles:
//! - Scanning repository directories for definition files
//! - Building the in-memory catalog of available modules
//! - Diffing two builds of the same repository set
//!
//! ## Repository Layout
//!
//! ```text
//! <repo>/
//! ├── gcc/                # one directory per module family
//! │   ├── 12.1.yaml       # one definition file per version
//! │   └── 13.2.yaml
//! └── openmpi/
//!     └── 4.1.5.yaml
//! ```
//!
//! Persistence of a built index is the cache component's concern, not ours.

pub mod index;
pub mod scan;
pub mod version;

pub use index::RepositoryIndex;

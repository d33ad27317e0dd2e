//! Shell mutation emitter
//!
//! Converts a resolved plan into a dialect-correct shell script that the
//! calling shell sources. The environment is handled as a value: a snapshot
//! comes in, the actions are applied to a copy, and only the delta between
//! the two is rendered.

pub mod dialect;
pub mod emit;
pub mod env;

pub use dialect::Dialect;
pub use emit::emit;
pub use env::EnvSnapshot;

//! Core domain types for modenv
//!
//! Contains the data model shared by the index, resolver, and emitter.

pub mod action;
pub mod loaded;
pub mod module;
pub mod request;

pub use action::{Action, Plan};
pub use loaded::LoadedSet;
pub use module::{EffectOp, EnvEffect, ModuleDefinition, ModuleId};
pub use request::{ModuleSpec, Request};

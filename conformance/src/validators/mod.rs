//! Validators for registries and generated artifacts.

pub mod artifacts;
pub mod generation;
pub mod registry;

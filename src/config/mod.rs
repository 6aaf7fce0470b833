//! Configuration system for lumen
//!
//! Process-wide settings are read from the environment exactly once at
//! startup and never mutated afterward. Per-request settings are resolved
//! against those defaults by [`EffectiveConfig::resolve`].

mod defaults;
mod effective;

pub use defaults::{Defaults, ServerConfig, DEFAULT_PORT};
pub use effective::{EffectiveConfig, GenerateRequest};

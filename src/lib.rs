//! Lumen - local text-generation bridge over HTTP
//!
//! Lumen is a thin HTTP layer in front of an on-device text-generation
//! engine. It accepts a prompt plus optional generation parameters and
//! answers with generated text as JSON, and it additionally speaks the
//! Ollama generation API so existing Ollama clients work unmodified.
//!
//! # Architecture
//!
//! Lumen follows the thin-layer design principle:
//! - **engine**: the generation capability behind a single trait seam
//! - **lumen**: availability gate, config resolution, HTTP routing,
//!   and the blocking bridge between handler threads and the engine
//!
//! # Example
//!
//! ```bash
//! # Start the bridge on the default port
//! lumen
//!
//! # Loopback-only, custom port
//! lumen --local-only --port 9000
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod server;

// Re-export key types
pub use config::{Defaults, EffectiveConfig, GenerateRequest, ServerConfig};
pub use engine::{Availability, CommandEngine, Engine, GenerationOutcome};

//! Per-request configuration resolution

use serde::Deserialize;

use super::Defaults;

/// Generation request as it arrives on the wire
///
/// Compatible with Ollama-style clients; unknown fields (`model`,
/// `stream`, ...) are ignored rather than rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// The prompt to generate from (required)
    pub prompt: String,

    /// System instructions override
    #[serde(default)]
    pub system: Option<String>,

    /// Sampling temperature override
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Maximum response tokens override
    #[serde(default)]
    pub max_tokens: Option<usize>,
}

/// Fully resolved generation parameters for one request
///
/// Immutable once computed and never shared across requests. An absent
/// field means "let the engine use its own default", which is distinct
/// from any concrete value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveConfig {
    pub instructions: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<usize>,
}

impl EffectiveConfig {
    /// Merge request fields with process-wide defaults.
    ///
    /// Per field, first non-absent value wins: request body, then
    /// environment default, then absent. Fields resolve independently,
    /// so a request may override one while falling back for another.
    /// Pure and infallible.
    pub fn resolve(request: &GenerateRequest, defaults: &Defaults) -> Self {
        Self {
            instructions: request.system.clone().or_else(|| defaults.system.clone()),
            temperature: request.temperature.or(defaults.temperature),
            max_tokens: request.max_tokens.or(defaults.max_tokens),
        }
    }
}

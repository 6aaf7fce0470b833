//! Text-generation engine seam
//!
//! The engine is a collaborator reached through a single request/response
//! call. Everything lumen needs from it is captured by the [`Engine`]
//! trait: a one-shot availability probe at startup and one asynchronous
//! generation call per request.

mod command;

pub use command::CommandEngine;

use async_trait::async_trait;

use crate::config::EffectiveConfig;

/// Advisory text returned for content-policy rejections.
///
/// Always this exact string, never the engine's internal error text, so
/// clients see a stable, non-leaking message for the filtered case.
pub const FILTERED_ADVISORY: &str = "Your request has been filtered, please try again.";

/// Engine readiness, probed exactly once before the server starts
#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    /// The engine can serve generation calls
    Ready,
    /// This host cannot run the engine at all
    DeviceIneligible,
    /// The engine exists but is not enabled/configured
    FeatureDisabled,
    /// The model is still being fetched; retry later
    ModelDownloading,
    /// Unavailable for some other reason
    OtherUnavailable(String),
}

/// Typed failure from a generation call
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The engine rejected the request on content-policy grounds
    #[error("{}", FILTERED_ADVISORY)]
    Filtered,

    /// Any other engine fault
    #[error("An error occurred while processing your request: {0}")]
    Failed(String),
}

/// Result of one generation attempt, produced once per request
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Generated text, verbatim from the engine
    Success(String),
    /// Content-policy rejection; the text is always [`FILTERED_ADVISORY`]
    Filtered,
    /// Generation failed; carries a human-readable description
    Failure(String),
}

impl GenerationOutcome {
    /// The text that goes into the response body for this outcome.
    pub fn text(&self) -> &str {
        match self {
            GenerationOutcome::Success(text) => text,
            GenerationOutcome::Filtered => FILTERED_ADVISORY,
            GenerationOutcome::Failure(message) => message,
        }
    }
}

impl From<Result<String, GenerateError>> for GenerationOutcome {
    fn from(result: Result<String, GenerateError>) -> Self {
        match result {
            Ok(text) => GenerationOutcome::Success(text),
            Err(GenerateError::Filtered) => GenerationOutcome::Filtered,
            Err(err) => GenerationOutcome::Failure(err.to_string()),
        }
    }
}

/// The generation capability lumen bridges to
#[async_trait]
pub trait Engine: Send + Sync {
    /// Probe whether the engine can serve at all. Called once at startup,
    /// before any socket binds.
    fn availability(&self) -> Availability;

    /// Generate text for a prompt with fully resolved parameters.
    async fn generate(&self, prompt: &str, config: &EffectiveConfig)
        -> Result<String, GenerateError>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted engine for tests

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    type Reply = Box<dyn Fn(&str) -> Result<String, GenerateError> + Send + Sync>;

    pub(crate) struct MockEngine {
        reply: Reply,
        delay: Option<Duration>,
        calls: AtomicUsize,
        last_config: Mutex<Option<EffectiveConfig>>,
    }

    impl MockEngine {
        pub(crate) fn with_reply<F>(reply: F) -> Self
        where
            F: Fn(&str) -> Result<String, GenerateError> + Send + Sync + 'static,
        {
            Self {
                reply: Box::new(reply),
                delay: None,
                calls: AtomicUsize::new(0),
                last_config: Mutex::new(None),
            }
        }

        /// Echoes the prompt back as `echo: <prompt>`.
        pub(crate) fn echo() -> Self {
            Self::with_reply(|prompt| Ok(format!("echo: {prompt}")))
        }

        /// Echoes after a short pause, so concurrent calls overlap.
        pub(crate) fn slow_echo() -> Self {
            let mut engine = Self::echo();
            engine.delay = Some(Duration::from_millis(20));
            engine
        }

        pub(crate) fn filtered() -> Self {
            Self::with_reply(|_| Err(GenerateError::Filtered))
        }

        pub(crate) fn failing(message: &str) -> Self {
            let message = message.to_string();
            Self::with_reply(move |_| Err(GenerateError::Failed(message.clone())))
        }

        pub(crate) fn panicking() -> Self {
            Self::with_reply(|_| panic!("engine blew up"))
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Config seen by the most recent generation call.
        pub(crate) fn last_config(&self) -> Option<EffectiveConfig> {
            self.last_config.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Engine for MockEngine {
        fn availability(&self) -> Availability {
            Availability::Ready
        }

        async fn generate(
            &self,
            prompt: &str,
            config: &EffectiveConfig,
        ) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_config.lock().unwrap() = Some(config.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.reply)(prompt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_text_mapping() {
        assert_eq!(GenerationOutcome::Success("hi".into()).text(), "hi");
        assert_eq!(GenerationOutcome::Filtered.text(), FILTERED_ADVISORY);
        assert_eq!(GenerationOutcome::Failure("boom".into()).text(), "boom");
    }

    #[test]
    fn test_filtered_advisory_is_stable() {
        // The advisory never depends on the rejected prompt.
        let a = GenerationOutcome::from(Err(GenerateError::Filtered));
        let b = GenerationOutcome::from(Err(GenerateError::Filtered));
        assert_eq!(a.text(), b.text());
        assert_eq!(a.text(), FILTERED_ADVISORY);
    }

    #[test]
    fn test_failure_carries_description() {
        let outcome = GenerationOutcome::from(Err(GenerateError::Failed("out of memory".into())));
        match outcome {
            GenerationOutcome::Failure(message) => {
                assert!(message.contains("out of memory"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}

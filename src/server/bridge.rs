//! Blocking bridge between handler threads and the async engine
//!
//! Generation handlers run on blocking-pool threads, but the engine call
//! is asynchronous and lives on the runtime. The bridge connects the two
//! with a oneshot channel: the channel is the one-shot gate and the
//! single-slot result cell in one, the send is the signal, and a dropped
//! sender (task panicked or was torn down) still wakes the receiver, so
//! the handler thread can never be left waiting forever.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::config::EffectiveConfig;
use crate::engine::{Engine, GenerationOutcome};

/// Run one generation call to completion and block until its outcome.
///
/// Must be called off the async runtime (a blocking-pool or plain OS
/// thread). No timeout is applied here; the transport's own limits are
/// the only bound. The launched call always runs to completion, even if
/// the client has already disconnected.
pub fn invoke(
    handle: &Handle,
    engine: Arc<dyn Engine>,
    prompt: String,
    config: EffectiveConfig,
) -> GenerationOutcome {
    let (tx, rx) = oneshot::channel();

    handle.spawn(async move {
        let outcome = GenerationOutcome::from(engine.generate(&prompt, &config).await);
        // The receiver only disappears if the handler thread is gone;
        // nothing useful is left to do with the outcome then.
        let _ = tx.send(outcome);
    });

    rx.blocking_recv().unwrap_or_else(|_| {
        GenerationOutcome::Failure(
            "generation task ended without producing a result".to_string(),
        )
    })
}

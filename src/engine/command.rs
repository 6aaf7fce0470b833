//! Subprocess-backed engine
//!
//! Drives a local model-runner command (llama.cpp style CLI, or anything
//! else that reads a prompt on stdin and writes text on stdout). One
//! process per generation call; resolved parameters are passed as
//! command-line arguments only when present, so the runner's own
//! defaults apply otherwise.
//!
//! Exit status protocol: 0 = success, 3 = content filtered, anything
//! else = failure with stderr as the description.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{Availability, Engine, GenerateError};
use crate::config::EffectiveConfig;

/// Exit code the runner uses to report a content-policy rejection.
const FILTERED_EXIT_CODE: i32 = 3;

/// Engine backed by a local model-runner subprocess
pub struct CommandEngine {
    /// Program plus base arguments, absent when unconfigured
    command: Option<Vec<String>>,
    /// Model file the runner is expected to load
    model: Option<PathBuf>,
}

impl CommandEngine {
    /// Build from an explicit command line (whitespace-split) and an
    /// optional model path.
    pub fn new(command: Option<String>, model: Option<PathBuf>) -> Self {
        let command = command.and_then(|raw| {
            let parts: Vec<String> = raw.split_whitespace().map(String::from).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts)
            }
        });
        Self { command, model }
    }

    fn build_command(&self, parts: &[String], config: &EffectiveConfig) -> Command {
        let mut cmd = Command::new(&parts[0]);
        cmd.args(&parts[1..]);
        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }
        if let Some(instructions) = &config.instructions {
            cmd.arg("--system").arg(instructions);
        }
        if let Some(temperature) = config.temperature {
            cmd.arg("--temperature").arg(temperature.to_string());
        }
        if let Some(max_tokens) = config.max_tokens {
            cmd.arg("--max-tokens").arg(max_tokens.to_string());
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl Engine for CommandEngine {
    fn availability(&self) -> Availability {
        let Some(parts) = &self.command else {
            return Availability::FeatureDisabled;
        };

        // which applies the executable-bit and PATH rules the shell would.
        match which::which(&parts[0]) {
            Ok(_) => {}
            Err(which::Error::CannotFindBinaryPath) => {
                return Availability::DeviceIneligible;
            }
            Err(err) => {
                return Availability::OtherUnavailable(format!(
                    "cannot probe engine command {}: {}",
                    parts[0], err
                ));
            }
        }

        if let Some(model) = &self.model {
            if !model.exists() {
                return Availability::ModelDownloading;
            }
        }

        Availability::Ready
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &EffectiveConfig,
    ) -> Result<String, GenerateError> {
        let parts = self
            .command
            .as_ref()
            .ok_or_else(|| GenerateError::Failed("no engine command configured".to_string()))?;

        let mut child = self
            .build_command(parts, config)
            .spawn()
            .map_err(|err| GenerateError::Failed(format!("failed to launch engine: {err}")))?;

        // Feed stdin from its own task so the prompt write and the
        // output drain below cannot deadlock on full pipe buffers.
        // Closing stdin signals EOF; a runner that exits without
        // reading everything surfaces through its exit status.
        if let Some(mut stdin) = child.stdin.take() {
            let prompt = prompt.as_bytes().to_vec();
            tokio::spawn(async move {
                if let Err(err) = stdin.write_all(&prompt).await {
                    tracing::warn!("failed to send prompt to engine: {err}");
                }
            });
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| GenerateError::Failed(format!("engine did not finish: {err}")))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout)
                .trim_end()
                .to_string());
        }

        if output.status.code() == Some(FILTERED_EXIT_CODE) {
            return Err(GenerateError::Filtered);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(GenerateError::Failed(format!(
                "engine exited with {}",
                output.status
            )))
        } else {
            Err(GenerateError::Failed(stderr))
        }
    }
}

use std::path::Path;

use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use crate::config::AppConfig;

/// Fixed sampling parameters, exported to the inference command via its
/// environment.
const MAX_NEW_TOKENS: u32 = 200;
const TEMPERATURE: &str = "0.3";

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("MODEL_CMD is not set")]
    NotConfigured,
    #[error("model file not found: {0}")]
    ModelFileMissing(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("no model is loaded")]
    Unavailable,
    #[error("inference timed out")]
    Timeout,
    #[error("failed to run inference command: {0}")]
    Spawn(std::io::Error),
    #[error("inference command exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },
    #[error("inference produced empty output")]
    EmptyOutput,
}

/// A successfully loaded model: the external inference command plus the
/// lock that serializes calls to it. The command reads the prompt and
/// sampling parameters from its environment and prints the generated
/// text to stdout.
pub struct ModelHandle {
    infer_cmd: String,
    timeout_ms: u64,
    flight: Mutex<()>,
}

impl ModelHandle {
    pub fn new(infer_cmd: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            infer_cmd: infer_cmd.into(),
            timeout_ms,
            flight: Mutex::new(()),
        }
    }

    /// Load-or-fail happens exactly once at startup; the outcome is
    /// never re-evaluated afterwards.
    pub fn load(cfg: &AppConfig) -> Result<Self, ModelLoadError> {
        if cfg.model_cmd.trim().is_empty() {
            return Err(ModelLoadError::NotConfigured);
        }
        if !cfg.model_path.is_empty() && !Path::new(&cfg.model_path).is_file() {
            return Err(ModelLoadError::ModelFileMissing(cfg.model_path.clone()));
        }
        Ok(Self::new(cfg.model_cmd.clone(), cfg.infer_timeout_ms))
    }

    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let run = async {
            // At most one inference in flight; the model runner is not
            // assumed to tolerate concurrent invocations.
            let _flight = self.flight.lock().await;

            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.infer_cmd);
            cmd.env("PROMPT", prompt)
                .env("MAX_NEW_TOKENS", MAX_NEW_TOKENS.to_string())
                .env("TEMPERATURE", TEMPERATURE)
                .env("DO_SAMPLE", "1");
            cmd.kill_on_drop(true);
            cmd.output().await
        };

        // The timeout covers queueing behind a hung call as well as the
        // call itself, so a stuck inference still resolves by fallback.
        let output = timeout(Duration::from_millis(self.timeout_ms), run)
            .await
            .map_err(|_| InferenceError::Timeout)?
            .map_err(InferenceError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(InferenceError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }

        Ok(stdout)
    }
}

/// Owns the optional model handle. Availability is decided once at
/// startup; per-request inference failures never change it.
pub struct ModelGateway {
    handle: Option<ModelHandle>,
}

impl ModelGateway {
    pub fn new(handle: Option<ModelHandle>) -> Self {
        Self { handle }
    }

    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.handle.is_some()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        match &self.handle {
            Some(handle) => handle.generate(prompt).await,
            None => Err(InferenceError::Unavailable),
        }
    }
}

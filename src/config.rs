use std::env;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub catalog_path: String,
    pub model_cmd: String,
    pub model_path: String,
    pub infer_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8000);

        let catalog_path =
            env::var("CATALOG_PATH").unwrap_or_else(|_| "offline_responses.json".to_string());

        let model_cmd = env::var("MODEL_CMD").unwrap_or_default();
        let model_path = env::var("MODEL_PATH").unwrap_or_default();

        let infer_timeout_ms = env::var("INFER_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(20_000);

        Self {
            port,
            catalog_path,
            model_cmd,
            model_path,
            infer_timeout_ms,
        }
    }
}

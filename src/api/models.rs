use serde::{Deserialize, Serialize};

use crate::resolver::DEFAULT_CONTEXT;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default = "default_context")]
    pub context: String,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub mode: &'static str,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::resolver::{AnswerResult, Question};
use crate::AppState;

use super::models::{AskRequest, ErrorResponse, StatusResponse};

pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AnswerResult>, (StatusCode, Json<ErrorResponse>)> {
    let text = payload.question.trim();
    if text.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "question must not be empty".to_string(),
            }),
        ));
    }

    let question = Question::new(text, payload.context);
    Ok(Json(state.resolver.resolve(&question).await))
}

pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    let model_loaded = state.resolver.model_available();
    Json(StatusResponse {
        status: "SafetyBot API Running",
        mode: if model_loaded {
            "AI Model Active"
        } else {
            "Offline Mode"
        },
        model_loaded,
    })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::server::api::{
    self, ApiError, DifficultyQuery, SimulateResponse, ValidationErrorResponse,
};
use crate::server::AppState;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed. Use POST.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(simulate_html).fallback(method_not_allowed))
        .route("/api/simulate", post(simulate_json).fallback(method_not_allowed))
        .route("/api/difficulty", get(difficulty))
        .route("/api/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn run_simulation(state: &AppState, body: String) -> Result<SimulateResponse, ApiError> {
    let request = api::decode_request(&body)?;
    let runner = state.runner;
    tokio::task::spawn_blocking(move || api::simulate(&request, &runner)).await?
}

async fn simulate_json(State(state): State<Arc<AppState>>, body: String) -> Response {
    match run_simulation(&state, body).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// The page-style endpoint: HTML on success, plain-text reasons on failure.
async fn simulate_html(State(state): State<Arc<AppState>>, body: String) -> Response {
    match run_simulation(&state, body).await {
        Ok(payload) => Html(api::render_results_html(&payload.results)).into_response(),
        Err(ApiError::Validation(violations)) => {
            let reasons = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            plain_text(StatusCode::BAD_REQUEST, reasons)
        }
        Err(err @ ApiError::Parse(_)) => plain_text(StatusCode::BAD_REQUEST, err.to_string()),
        Err(err) => err.into_response(),
    }
}

async fn difficulty(query: Result<Query<DifficultyQuery>, QueryRejection>) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid query: {rejection}"))
        }
    };
    match api::difficulty_for(&query) {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(violations) => ApiError::Validation(violations).into_response(),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(api::health_payload())
}

async fn method_not_allowed() -> Response {
    plain_text(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE.to_string())
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Parse(_) => {
                tracing::warn!(error = %self, "rejected request body");
                error_response(StatusCode::BAD_REQUEST, &self.to_string())
            }
            Self::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse::from_violations(&violations)),
            )
                .into_response(),
            Self::WorkerPool(_) | Self::Task(_) => {
                tracing::error!(error = %self, "simulation failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &self.to_string())
            }
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "status": "error", "message": message })),
    )
        .into_response()
}

/// Plain-text error body, newline-terminated.
fn plain_text(status: StatusCode, mut body: String) -> Response {
    body.push('\n');
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

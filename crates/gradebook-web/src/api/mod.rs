mod auth_handlers;
mod dashboard;
mod records;


use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::dto::HealthResponse;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth_handlers::login))
        .route("/student/{id}/dashboard", get(dashboard::student_dashboard))
        .route("/instructor/{id}/dashboard", get(dashboard::instructor_dashboard))
        .route("/student/{id}/transcript", get(records::generate_transcript))
        .route("/update-grade", post(records::update_grade))
        .route("/health", get(health))
        .fallback(not_found)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                success: true,
                database: "up",
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    success: false,
                    database: "down",
                }),
            )
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Parses a numeric path id, naming the entity in the error.
fn parse_id(raw: &str, entity: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid {entity} id")))
}

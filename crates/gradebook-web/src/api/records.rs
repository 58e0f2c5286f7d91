use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use super::parse_id;
use crate::dto::{MessageResponse, UpdateGradeRequest};
use crate::error::AppError;
use crate::state::AppState;

pub async fn update_grade(
    State(state): State<AppState>,
    payload: Result<Json<UpdateGradeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    state
        .records
        .update_grade(body.student_id, body.course_id, &body.grade)
        .await
        .inspect_err(|e| tracing::warn!("Update grade error: {e}"))?;

    tracing::info!(
        "Grade updated: student {} course {} -> {}",
        body.student_id,
        body.course_id,
        body.grade
    );
    Ok(Json(MessageResponse::ok("Grade updated successfully")))
}

pub async fn generate_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let student_id = parse_id(&id, "student")?;

    state
        .records
        .generate_transcript(student_id)
        .await
        .inspect_err(|e| tracing::warn!("Transcript error: {e}"))?;

    Ok(Json(MessageResponse::ok(
        "Transcript generated (check server logs)",
    )))
}

use axum::extract::{Path, State};
use axum::Json;

use super::parse_id;
use crate::dto::{InstructorDashboardResponse, StudentDashboardResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn student_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentDashboardResponse>, AppError> {
    let student_id = parse_id(&id, "student")?;

    let dashboard = state
        .dashboards
        .student_dashboard(student_id)
        .await
        .map_err(|e| AppError::Internal(format!("Dashboard error: {e}")))?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    Ok(Json(StudentDashboardResponse {
        success: true,
        dashboard,
    }))
}

pub async fn instructor_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstructorDashboardResponse>, AppError> {
    let instructor_id = parse_id(&id, "instructor")?;

    let dashboard = state
        .dashboards
        .instructor_dashboard(instructor_id)
        .await
        .map_err(|e| AppError::Internal(format!("Instructor dashboard error: {e}")))?
        .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;

    Ok(Json(InstructorDashboardResponse {
        success: true,
        dashboard,
    }))
}

use gradebook_core::Identity;
use serde::{Deserialize, Serialize};

use crate::store::{InstructorDashboard, StudentDashboard};

/// Missing fields deserialize as empty strings and fail as bad credentials
/// or an invalid user type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub user_type: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: Identity,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGradeRequest {
    pub student_id: i32,
    pub course_id: i32,
    pub grade: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentDashboardResponse {
    pub success: bool,
    #[serde(flatten)]
    pub dashboard: StudentDashboard,
}

#[derive(Debug, Serialize)]
pub struct InstructorDashboardResponse {
    pub success: bool,
    #[serde(flatten)]
    pub dashboard: InstructorDashboard,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub database: &'static str,
}

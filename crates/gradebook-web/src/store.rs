//! Collaborator contracts behind the dashboard, record and health routes.
//!
//! [`crate::db::PgStore`] implements all of them against PostgreSQL; route
//! tests substitute in-memory fakes.

use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected the statement (constraint, procedure `RAISE`, ...).
    #[error("{0}")]
    Rejected(String),

    /// Connectivity, pool or decoding failure; never shown to callers.
    #[error("database error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StudentProfile {
    pub student_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StudentCourse {
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub grade: Option<String>,
    pub status: Option<String>,
    pub instructor_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub student: StudentProfile,
    pub courses: Vec<StudentCourse>,
    /// Computed by the database; `None` when the student has no graded courses.
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InstructorProfile {
    pub instructor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InstructorCourse {
    pub course_id: i32,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub enrolled_students: i64,
}

/// One row of the `instructor_course_students` view.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RosterEntry {
    pub course_code: String,
    pub student_id: i32,
    pub student_name: String,
    pub grade: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructorDashboard {
    pub instructor: InstructorProfile,
    pub courses: Vec<InstructorCourse>,
    pub students: Vec<RosterEntry>,
}

#[async_trait]
pub trait DashboardProvider: Send + Sync {
    /// Returns `Ok(None)` when no student has `student_id`.
    async fn student_dashboard(&self, student_id: i32) -> Result<Option<StudentDashboard>, StoreError>;

    /// Returns `Ok(None)` when no instructor has `instructor_id`.
    async fn instructor_dashboard(
        &self,
        instructor_id: i32,
    ) -> Result<Option<InstructorDashboard>, StoreError>;
}

/// Administrative commands executed as stored procedures.
#[async_trait]
pub trait RecordCommands: Send + Sync {
    async fn update_grade(&self, student_id: i32, course_id: i32, grade: &str) -> Result<(), StoreError>;

    /// Runs transcript generation; its output goes to the server log.
    async fn generate_transcript(&self, student_id: i32) -> Result<(), StoreError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

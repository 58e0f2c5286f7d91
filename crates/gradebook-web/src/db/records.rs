use async_trait::async_trait;

use super::PgStore;
use crate::store::{RecordCommands, StoreError};

#[async_trait]
impl RecordCommands for PgStore {
    async fn update_grade(&self, student_id: i32, course_id: i32, grade: &str) -> Result<(), StoreError> {
        sqlx::query("CALL update_student_grade($1, $2, $3)")
            .bind(student_id)
            .bind(course_id)
            .bind(grade)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn generate_transcript(&self, student_id: i32) -> Result<(), StoreError> {
        // The procedure reports via RAISE NOTICE; sqlx forwards notices to the
        // `sqlx::postgres::notice` log target.
        sqlx::query("CALL generate_student_transcript($1)")
            .bind(student_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

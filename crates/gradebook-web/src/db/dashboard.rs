use async_trait::async_trait;

use super::PgStore;
use crate::store::{
    DashboardProvider, InstructorCourse, InstructorDashboard, InstructorProfile, RosterEntry,
    StoreError, StudentCourse, StudentDashboard, StudentProfile,
};

const STUDENT_PROFILE_SQL: &str = "
    SELECT s.student_id, s.first_name, s.last_name, s.email,
           s.department_id, d.department_name
    FROM students s
    LEFT JOIN departments d ON s.department_id = d.department_id
    WHERE s.student_id = $1";

const STUDENT_COURSES_SQL: &str = "
    SELECT c.course_code, c.course_name, c.credits, e.grade, e.status,
           i.first_name || ' ' || i.last_name AS instructor_name
    FROM enrollments e
    JOIN courses c ON e.course_id = c.course_id
    LEFT JOIN instructors i ON c.instructor_id = i.instructor_id
    WHERE e.student_id = $1
    ORDER BY c.course_code";

const STUDENT_GPA_SQL: &str = "SELECT calculate_student_gpa($1)::float8 AS gpa";

const INSTRUCTOR_PROFILE_SQL: &str = "
    SELECT i.instructor_id, i.first_name, i.last_name, i.email,
           i.department_id, d.department_name
    FROM instructors i
    LEFT JOIN departments d ON i.department_id = d.department_id
    WHERE i.instructor_id = $1";

const INSTRUCTOR_COURSES_SQL: &str = "
    SELECT c.course_id, c.course_code, c.course_name, c.credits,
           COUNT(e.student_id) AS enrolled_students
    FROM courses c
    LEFT JOIN enrollments e ON c.course_id = e.course_id AND e.status = 'enrolled'
    WHERE c.instructor_id = $1
    GROUP BY c.course_id
    ORDER BY c.course_code";

const INSTRUCTOR_ROSTER_SQL: &str = "
    SELECT course_code, student_id, student_name, grade, status
    FROM instructor_course_students
    WHERE instructor_id = $1
    ORDER BY course_code, student_name";

#[async_trait]
impl DashboardProvider for PgStore {
    async fn student_dashboard(&self, student_id: i32) -> Result<Option<StudentDashboard>, StoreError> {
        let (student, courses, gpa) = tokio::try_join!(
            sqlx::query_as::<_, StudentProfile>(STUDENT_PROFILE_SQL)
                .bind(student_id)
                .fetch_optional(&self.pool),
            sqlx::query_as::<_, StudentCourse>(STUDENT_COURSES_SQL)
                .bind(student_id)
                .fetch_all(&self.pool),
            sqlx::query_scalar::<_, Option<f64>>(STUDENT_GPA_SQL)
                .bind(student_id)
                .fetch_one(&self.pool),
        )?;

        Ok(student.map(|student| StudentDashboard {
            student,
            courses,
            gpa,
        }))
    }

    async fn instructor_dashboard(
        &self,
        instructor_id: i32,
    ) -> Result<Option<InstructorDashboard>, StoreError> {
        let (instructor, courses, students) = tokio::try_join!(
            sqlx::query_as::<_, InstructorProfile>(INSTRUCTOR_PROFILE_SQL)
                .bind(instructor_id)
                .fetch_optional(&self.pool),
            sqlx::query_as::<_, InstructorCourse>(INSTRUCTOR_COURSES_SQL)
                .bind(instructor_id)
                .fetch_all(&self.pool),
            sqlx::query_as::<_, RosterEntry>(INSTRUCTOR_ROSTER_SQL)
                .bind(instructor_id)
                .fetch_all(&self.pool),
        )?;

        Ok(instructor.map(|instructor| InstructorDashboard {
            instructor,
            courses,
            students,
        }))
    }
}

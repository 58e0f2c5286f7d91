use async_trait::async_trait;
use gradebook_core::{Account, AccountKind, AccountStore, CoreError, CoreResult};

use super::PgStore;

const STUDENT_ACCOUNT_SQL: &str = "
    SELECT student_id AS id, email, password_hash,
           CONCAT(first_name, ' ', last_name) AS name
    FROM students
    WHERE email = $1";

const INSTRUCTOR_ACCOUNT_SQL: &str = "
    SELECT instructor_id AS id, email, password_hash,
           CONCAT(first_name, ' ', last_name) AS name
    FROM instructors
    WHERE email = $1";

fn account_query(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Student => STUDENT_ACCOUNT_SQL,
        AccountKind::Instructor => INSTRUCTOR_ACCOUNT_SQL,
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    email: String,
    password_hash: String,
    name: String,
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_account(&self, email: &str, kind: AccountKind) -> CoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(account_query(kind))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::Store(e.to_string()))?;

        Ok(row.map(|row| Account {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            kind,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_has_its_own_partition() {
        assert!(account_query(AccountKind::Student).contains("FROM students"));
        assert!(account_query(AccountKind::Instructor).contains("FROM instructors"));
    }

    #[test]
    fn queries_bind_email_only() {
        for kind in AccountKind::ALL {
            let sql = account_query(kind);
            assert!(sql.contains("WHERE email = $1"));
            assert!(!sql.contains("$2"));
        }
    }
}

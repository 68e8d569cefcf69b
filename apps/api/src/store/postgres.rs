use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::college::{CollegeRecord, CollegeRow};
use crate::models::user::User;
use crate::recommendations::matching::{CollegeFilter, RecommendationQuery};
use crate::store::{CollegeStore, UserStore};

const COLLEGE_COLUMNS: &str = "id, name, location, course, mcet_rank_cutoff, \
     intermediate_marks_cutoff, fees, affiliation";

#[derive(Clone)]
pub struct PgCollegeStore {
    pool: PgPool,
}

impl PgCollegeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Byte-order name tie-break, matching `String::cmp` in the in-memory store.
fn find_colleges_sql() -> String {
    format!(
        "SELECT {COLLEGE_COLUMNS} FROM colleges \
         WHERE course = $1 AND mcet_rank_cutoff >= $2 AND intermediate_marks_cutoff <= $3 \
         ORDER BY mcet_rank_cutoff ASC, name COLLATE \"C\" ASC"
    )
}

fn list_colleges_sql() -> String {
    format!("SELECT {COLLEGE_COLUMNS} FROM colleges ORDER BY name COLLATE \"C\" ASC")
}

fn into_records(rows: Vec<CollegeRow>) -> Result<Vec<CollegeRecord>, AppError> {
    rows.into_iter()
        .map(|row| {
            CollegeRecord::try_from(row)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt college row: {e}")))
        })
        .collect()
}

#[async_trait]
impl CollegeStore for PgCollegeStore {
    async fn find_colleges(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<CollegeRecord>, AppError> {
        let filter = CollegeFilter::from(query);
        // Served by idx_colleges_course_rank_marks.
        let sql = find_colleges_sql();
        let rows = sqlx::query_as::<_, CollegeRow>(&sql)
            .bind(filter.course.as_str())
            .bind(filter.min_rank_cutoff)
            .bind(filter.max_marks_cutoff)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }

    async fn list_colleges(&self) -> Result<Vec<CollegeRecord>, AppError> {
        let sql = list_colleges_sql();
        let rows = sqlx::query_as::<_, CollegeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colleges")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }

    async fn insert_many(&self, colleges: &[CollegeRecord]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for college in colleges {
            sqlx::query(
                r#"
                INSERT INTO colleges
                    (id, name, location, course, mcet_rank_cutoff,
                     intermediate_marks_cutoff, fees, affiliation)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(college.id)
            .bind(&college.name)
            .bind(&college.location)
            .bind(college.course.as_str())
            .bind(college.rank_cutoff)
            .bind(college.marks_cutoff)
            .bind(college.fees)
            .bind(&college.affiliation)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!("Inserted {} colleges", colleges.len());
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1 OR username = $2
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent registration for the same name or email.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::DuplicateUser)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_ordering_uses_byte_collation() {
        assert!(find_colleges_sql().ends_with("ORDER BY mcet_rank_cutoff ASC, name COLLATE \"C\" ASC"));
        assert!(list_colleges_sql().ends_with("ORDER BY name COLLATE \"C\" ASC"));
    }
}

//! Storage seams. `AppState` carries `Arc<dyn CollegeStore>` and
//! `Arc<dyn UserStore>`, picked at startup: Postgres when `DATABASE_URL`
//! is set, in-memory otherwise.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::college::CollegeRecord;
use crate::models::user::User;
use crate::recommendations::matching::RecommendationQuery;

#[async_trait]
pub trait CollegeStore: Send + Sync {
    /// Colleges `query` qualifies for, ascending by rank cutoff then name.
    async fn find_colleges(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<CollegeRecord>, AppError>;

    /// Every college, sorted by name.
    async fn list_colleges(&self) -> Result<Vec<CollegeRecord>, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    async fn insert_many(&self, colleges: &[CollegeRecord]) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::DuplicateUser` if the username or email is taken.
    async fn insert(&self, user: &User) -> Result<(), AppError>;
}

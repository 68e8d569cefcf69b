use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::college::CollegeRecord;
use crate::models::user::User;
use crate::recommendations::matching::{match_colleges, RecommendationQuery};
use crate::store::{CollegeStore, UserStore};

/// Process-local college data. Used when no database is configured and in tests.
#[derive(Default)]
pub struct InMemoryCollegeStore {
    colleges: RwLock<Vec<CollegeRecord>>,
}

impl InMemoryCollegeStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_colleges(colleges: Vec<CollegeRecord>) -> Self {
        Self {
            colleges: RwLock::new(colleges),
        }
    }
}

#[async_trait]
impl CollegeStore for InMemoryCollegeStore {
    async fn find_colleges(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<CollegeRecord>, AppError> {
        let colleges = self.colleges.read().await;
        Ok(match_colleges(query, &colleges))
    }

    async fn list_colleges(&self) -> Result<Vec<CollegeRecord>, AppError> {
        let mut all = self.colleges.read().await.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.colleges.read().await.len() as u64)
    }

    async fn insert_many(&self, colleges: &[CollegeRecord]) -> Result<(), AppError> {
        self.colleges.write().await.extend_from_slice(colleges);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        // Check and push under one write lock so concurrent registrations can't both win.
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(AppError::DuplicateUser);
        }
        users.push(user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::college::Course;
    use chrono::Utc;
    use uuid::Uuid;

    fn college(name: &str, course: Course, rank_cutoff: i64) -> CollegeRecord {
        CollegeRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location: None,
            course,
            rank_cutoff,
            marks_cutoff: 70.0,
            fees: None,
            affiliation: None,
        }
    }

    fn user(username: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let store = InMemoryCollegeStore::with_colleges(vec![
            college("Vasavi", Course::Cse, 4000),
            college("Anurag", Course::Ece, 9000),
        ]);
        let names: Vec<_> = store
            .list_colleges()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Anurag", "Vasavi"]);
    }

    #[tokio::test]
    async fn test_find_matches_query() {
        let store = InMemoryCollegeStore::new();
        store
            .insert_many(&[
                college("B", Course::Cse, 8000),
                college("A", Course::Cse, 3000),
                college("C", Course::Mech, 8000),
            ])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 3);

        let query = RecommendationQuery {
            rank: 2000,
            marks: 80.0,
            course: Course::Cse,
        };
        let found = store.find_colleges(&query).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "A");
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let store = InMemoryUserStore::new();
        store.insert(&user("ravi", "ravi@example.com")).await.unwrap();

        let same_email = store.insert(&user("other", "ravi@example.com")).await;
        assert!(matches!(same_email, Err(AppError::DuplicateUser)));

        let same_name = store.insert(&user("ravi", "new@example.com")).await;
        assert!(matches!(same_name, Err(AppError::DuplicateUser)));

        assert_eq!(store.len().await, 1);
    }
}

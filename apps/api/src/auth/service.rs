use anyhow::Context;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::password::{dummy_hash, hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::UserStore;

pub const MIN_USERNAME_LEN: usize = 3;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Creates a new account. Username and email must both be unused.
pub async fn register_user(
    store: &dyn UserStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    let email = normalize_email(email);

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if !looks_like_email(&email) {
        return Err(AppError::Validation("Email address is invalid".to_string()));
    }

    if store
        .find_by_email_or_username(&email, username)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateUser);
    }

    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task panicked")??;

    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email,
        password_hash,
        created_at: Utc::now(),
    };
    store.insert(&user).await?;

    tracing::info!("Registered user {}", user.id);
    Ok(user)
}

/// Verifies credentials. Unknown email and wrong password are indistinguishable.
pub async fn authenticate(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = store.find_by_email(&email).await?;
    let stored_hash = credential_hash(user.as_ref())?;

    // Unknown emails still pay for a full Argon2 verify.
    let password = password.to_string();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .context("password verification task panicked")?;

    match user {
        Some(user) if verified => Ok(user),
        _ => Err(AppError::InvalidCredentials),
    }
}

/// The hash a login attempt is checked against: the account's own, or the dummy.
fn credential_hash(user: Option<&User>) -> anyhow::Result<String> {
    match user {
        Some(user) => Ok(user.password_hash.clone()),
        None => Ok(dummy_hash()?.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryUserStore;

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let store = InMemoryUserStore::new();
        let user = register_user(&store, " ravi ", " Ravi@Example.COM ", "pw123456")
            .await
            .unwrap();
        assert_eq!(user.username, "ravi");
        assert_eq!(user.email, "ravi@example.com");
        assert_ne!(user.password_hash, "pw123456");
    }

    #[tokio::test]
    async fn test_duplicate_email_or_username_rejected() {
        let store = InMemoryUserStore::new();
        register_user(&store, "ravi", "ravi@example.com", "pw")
            .await
            .unwrap();

        let dup_email = register_user(&store, "kiran", "RAVI@example.com", "pw").await;
        assert!(matches!(dup_email, Err(AppError::DuplicateUser)));

        let dup_name = register_user(&store, "ravi", "other@example.com", "pw").await;
        assert!(matches!(dup_name, Err(AppError::DuplicateUser)));

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let store = InMemoryUserStore::new();
        let short = register_user(&store, "ab", "ab@example.com", "pw").await;
        assert!(matches!(short, Err(AppError::Validation(_))));

        let missing = register_user(&store, "abc", "abc@example.com", "").await;
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let bad_email = register_user(&store, "abc", "not-an-email", "pw").await;
        assert!(matches!(bad_email, Err(AppError::Validation(_))));

        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let store = InMemoryUserStore::new();
        let registered = register_user(&store, "meena", "meena@example.com", "correct-horse")
            .await
            .unwrap();

        let user = authenticate(&store, "MEENA@example.com", "correct-horse")
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);

        let wrong = authenticate(&store, "meena@example.com", "battery").await;
        let unknown = authenticate(&store, "nobody@example.com", "correct-horse").await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_unknown_email_checked_against_real_hash() {
        let hash = credential_hash(None).unwrap();
        assert_eq!(hash, dummy_hash().unwrap());
        assert!(hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_verify() {
        let store = InMemoryUserStore::new();
        register_user(&store, "meena", "meena@example.com", "correct-horse")
            .await
            .unwrap();
        dummy_hash().unwrap();

        let started = std::time::Instant::now();
        let wrong = authenticate(&store, "meena@example.com", "battery").await;
        let wrong_elapsed = started.elapsed();

        let started = std::time::Instant::now();
        let unknown = authenticate(&store, "ghost@example.com", "battery").await;
        let unknown_elapsed = started.elapsed();

        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
        assert!(
            unknown_elapsed * 10 >= wrong_elapsed,
            "unknown={unknown_elapsed:?} wrong={wrong_elapsed:?}"
        );
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("a@b"));
        assert!(!looks_like_email("@b"));
        assert!(!looks_like_email("a@"));
        assert!(!looks_like_email("a@b@c"));
        assert!(!looks_like_email("a b@c"));
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    claims::Role,
    dto::PublicUser,
    jwt::JwtKeys,
    password::{check_strength, hash_password, verify_password},
    repo::UserRepo,
    repo_types::{NewUser, User},
};
use crate::error::{ApiError, AuthError};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A freshly issued token together with the user it identifies.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

/// Looks the user up by (normalized) email and checks the password.
pub async fn validate_credentials<R>(users: &R, email: &str, password: &str) -> Result<User, ApiError>
where
    R: UserRepo + ?Sized,
{
    let email = normalize_email(email);
    let user = match users.find_user_by_email(&email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AuthError::NotFound.into());
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials.into());
    }

    debug!(user_id = %user.id, "credentials accepted");
    Ok(user)
}

pub fn issue_session(keys: &JwtKeys, user: &User) -> Result<Session, ApiError> {
    let token = keys.sign(user.id, &user.email, Some(user.role))?;
    Ok(Session {
        token,
        user: PublicUser::from(user),
    })
}

/// Credential check followed by token issuance.
pub async fn login<R>(users: &R, keys: &JwtKeys, email: &str, password: &str) -> Result<Session, ApiError>
where
    R: UserRepo + ?Sized,
{
    let user = validate_credentials(users, email, password).await?;
    issue_session(keys, &user)
}

pub async fn register<R>(
    users: &R,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<User, ApiError>
where
    R: UserRepo + ?Sized,
{
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    check_strength(password)?;
    if users.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(password)?;
    let created = users
        .create_user(NewUser {
            email: email.clone(),
            password_hash,
            name: name.map(str::trim).unwrap_or_default().to_string(),
            role: Role::User,
        })
        .await?;
    // The lookup above is only a fast path; the insert is what decides.
    created.ok_or_else(|| {
        warn!(email = %email, "email registered concurrently");
        ApiError::Conflict("Email already registered".into())
    })
}

/// The only path that replaces a stored hash. Tokens already handed out stay
/// valid until they expire.
pub async fn change_password<R>(
    users: &R,
    user_id: Uuid,
    current: &str,
    new: &str,
) -> Result<(), ApiError>
where
    R: UserRepo + ?Sized,
{
    let user = users
        .find_user_by_id(user_id)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !verify_password(current, &user.password_hash)? {
        warn!(user_id = %user_id, "password change with wrong current password");
        return Err(AuthError::InvalidCredentials.into());
    }
    check_strength(new)?;

    let hash = hash_password(new)?;
    if !users.update_password_hash(user_id, &hash).await? {
        return Err(AuthError::NotFound.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::memory::MemoryStore;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 60,
        })
    }

    async fn store_with_user(email: &str, password: &str) -> (MemoryStore, User) {
        let store = MemoryStore::default();
        let user = register(&store, email, password, Some("Test User"))
            .await
            .expect("register");
        (store, user)
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("mom@example.com"));
        assert!(!is_valid_email("mom@example"));
        assert!(!is_valid_email("mom example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn correct_credentials_yield_token_for_that_email() {
        let (store, user) = store_with_user("mom@example.com", "correct-password").await;
        let keys = keys();

        let session = login(&store, &keys, "  Mom@Example.com ", "correct-password")
            .await
            .expect("login");
        let claims = keys.verify(&session.token).expect("verify");
        assert_eq!(claims.email, "mom@example.com");
        assert_eq!(claims.sub, user.id);
        assert_eq!(session.user.email, "mom@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let (store, _) = store_with_user("mom@example.com", "correct-password").await;
        let err = login(&store, &keys(), "mom@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let store = MemoryStore::default();
        let err = validate_credentials(&store, "ghost@example.com", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_bad_input() {
        let (store, _) = store_with_user("mom@example.com", "correct-password").await;

        let dup = register(&store, "MOM@example.com", "another-password", None)
            .await
            .unwrap_err();
        assert!(matches!(dup, ApiError::Conflict(_)));

        let short = register(&store, "dad@example.com", "short", None)
            .await
            .unwrap_err();
        assert!(matches!(short, ApiError::Validation(_)));

        let bad_email = register(&store, "not-an-email", "long-enough", None)
            .await
            .unwrap_err();
        assert!(matches!(bad_email, ApiError::Validation(_)));
    }

    /// Lookups never see existing users, as when another request inserts the
    /// same email between the check and the insert.
    struct StaleLookup(MemoryStore);

    #[async_trait::async_trait]
    impl UserRepo for StaleLookup {
        async fn find_user_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }

        async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
            self.0.find_user_by_id(id).await
        }

        async fn create_user(&self, new: NewUser) -> anyhow::Result<Option<User>> {
            self.0.create_user(new).await
        }

        async fn update_password_hash(&self, id: Uuid, hash: &str) -> anyhow::Result<bool> {
            self.0.update_password_hash(id, hash).await
        }
    }

    #[tokio::test]
    async fn register_losing_insert_is_conflict() {
        let store = StaleLookup(MemoryStore::default());
        register(&store, "mom@example.com", "correct-password", None)
            .await
            .expect("first registration");

        let err = register(&store, "mom@example.com", "another-password", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn change_password_replaces_hash() {
        let (store, user) = store_with_user("mom@example.com", "old-password").await;

        let wrong = change_password(&store, user.id, "nope-nope", "new-password")
            .await
            .unwrap_err();
        assert!(matches!(wrong, ApiError::Auth(AuthError::InvalidCredentials)));

        change_password(&store, user.id, "old-password", "new-password")
            .await
            .expect("change");

        assert!(validate_credentials(&store, "mom@example.com", "old-password")
            .await
            .is_err());
        assert!(validate_credentials(&store, "mom@example.com", "new-password")
            .await
            .is_ok());
    }
}

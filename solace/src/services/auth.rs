//! Registration, login, and bearer-token resolution.
//!
//! Passwords are stored as a per-user salted SHA-256 digest in the form
//! `salt$digest`. Tokens are opaque nanoids with a configured lifetime,
//! resolved back to an active user on every request.

use base64::Engine;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

use crate::config::AuthConfig;
use crate::db::repository::{TokenRepository, UserRepository};
use crate::db::Database;
use crate::error::{Result, SolaceError};
use crate::models::{AccessToken, User};

const TOKEN_LENGTH: usize = 32;
const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(db: Database, config: &AuthConfig) -> Self {
        Self {
            db,
            token_ttl: Duration::minutes(config.access_token_ttl_minutes),
        }
    }

    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        if !email.contains('@') {
            return Err(SolaceError::Validation(
                "Invalid email address".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(SolaceError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        let uow = self.db.begin().await?;

        if UserRepository::get_by_email(uow.conn(), email)
            .await?
            .is_some()
        {
            return Err(SolaceError::Validation(
                "Email already registered".to_string(),
            ));
        }

        let user = User::new(
            first_name.to_string(),
            last_name.to_string(),
            email.to_string(),
            hash_password(password),
        );
        UserRepository::create(uow.conn(), &user).await?;
        uow.commit().await?;

        Ok(user)
    }

    /// Verify credentials and issue a fresh access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(AccessToken, User)> {
        let conn = self.db.connect()?;

        // Missing user and wrong password are indistinguishable to the caller.
        let user = UserRepository::get_by_email(&conn, email)
            .await?
            .ok_or_else(|| SolaceError::Unauthorized("Invalid email or password".to_string()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(SolaceError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }
        if !user.active {
            return Err(SolaceError::Unauthorized(
                "Account is deactivated".to_string(),
            ));
        }

        let now = Utc::now();
        let token = AccessToken {
            token: nanoid::nanoid!(TOKEN_LENGTH),
            user_id: user.id.clone(),
            expires_at: now + self.token_ttl,
            created_at: now,
        };
        TokenRepository::create(&conn, &token).await?;

        Ok((token, user))
    }

    /// Revoke a bearer token so it can no longer authenticate requests.
    pub async fn logout(&self, token: &str) -> Result<()> {
        let conn = self.db.connect()?;
        TokenRepository::delete(&conn, token).await
    }

    /// Resolve a bearer token to its active user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let conn = self.db.connect()?;

        let access_token = TokenRepository::get_valid(&conn, token)
            .await?
            .ok_or_else(|| SolaceError::Unauthorized("Invalid or expired token".to_string()))?;

        let user = UserRepository::get_by_id(&conn, &access_token.user_id)
            .await?
            .ok_or_else(|| SolaceError::Unauthorized("Invalid or expired token".to_string()))?;

        if !user.active {
            return Err(SolaceError::Unauthorized(
                "Account is deactivated".to_string(),
            ));
        }

        Ok(user)
    }
}

fn hash_password(password: &str) -> String {
    let salt = nanoid::nanoid!(16);
    format!("{salt}${}", digest(&salt, password))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use libsql::params;

    async fn test_service() -> (AuthService, Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("file:{}", dir.path().join("test.db").display()),
            auth_token: None,
            local_path: None,
        };
        let db = Database::new(&config).await.unwrap();
        let service = AuthService::new(
            db.clone(),
            &AuthConfig {
                access_token_ttl_minutes: 50,
            },
        );
        (service, db, dir)
    }

    #[test]
    fn password_hash_roundtrip() {
        let stored = hash_password("correct horse battery");
        assert!(verify_password("correct horse battery", &stored));
        assert!(!verify_password("wrong password", &stored));
    }

    #[test]
    fn same_password_hashes_differently_per_user() {
        assert_ne!(hash_password("hunter22hunter22"), hash_password("hunter22hunter22"));
    }

    #[tokio::test]
    async fn register_then_login_issues_token() {
        let (service, _db, _dir) = test_service().await;

        service
            .register("Ada", "Lovelace", "ada@example.com", "engine-no-1")
            .await
            .unwrap();

        let (token, user) = service
            .login("ada@example.com", "engine-no-1")
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert!(token.expires_at > Utc::now());

        let resolved = service.authenticate(&token.token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (service, _db, _dir) = test_service().await;

        service
            .register("Ada", "Lovelace", "ada@example.com", "engine-no-1")
            .await
            .unwrap();
        let err = service
            .register("Other", "Person", "ada@example.com", "different-pw")
            .await
            .unwrap_err();
        assert!(matches!(err, SolaceError::Validation(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (service, _db, _dir) = test_service().await;

        service
            .register("Ada", "Lovelace", "ada@example.com", "engine-no-1")
            .await
            .unwrap();
        let err = service
            .login("ada@example.com", "engine-no-2")
            .await
            .unwrap_err();
        assert!(matches!(err, SolaceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (service, _db, _dir) = test_service().await;

        let err = service
            .register("Ada", "Lovelace", "ada@example.com", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, SolaceError::Validation(_)));
    }

    #[tokio::test]
    async fn deactivated_user_cannot_login_or_authenticate() {
        let (service, db, _dir) = test_service().await;

        let user = service
            .register("Ada", "Lovelace", "ada@example.com", "engine-no-1")
            .await
            .unwrap();
        let (token, _) = service
            .login("ada@example.com", "engine-no-1")
            .await
            .unwrap();

        let conn = db.connect().unwrap();
        conn.execute(
            "UPDATE users SET active = 0 WHERE id = ?1",
            params![user.id.clone()],
        )
        .await
        .unwrap();

        assert!(matches!(
            service.login("ada@example.com", "engine-no-1").await,
            Err(SolaceError::Unauthorized(_))
        ));
        assert!(matches!(
            service.authenticate(&token.token).await,
            Err(SolaceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let (service, _db, _dir) = test_service().await;

        service
            .register("Ada", "Lovelace", "ada@example.com", "engine-no-1")
            .await
            .unwrap();
        let (token, _) = service
            .login("ada@example.com", "engine-no-1")
            .await
            .unwrap();

        service.authenticate(&token.token).await.unwrap();
        service.logout(&token.token).await.unwrap();

        let err = service.authenticate(&token.token).await.unwrap_err();
        assert!(matches!(err, SolaceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let (service, _db, _dir) = test_service().await;

        let err = service.authenticate("not-a-token").await.unwrap_err();
        assert!(matches!(err, SolaceError::Unauthorized(_)));
    }
}

use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{AccessToken, User};

pub struct UserRepository;

impl UserRepository {
    pub async fn create(conn: &Connection, user: &User) -> Result<()> {
        conn.execute(
            "INSERT INTO users (id, first_name, last_name, email, password_hash,
                                active, is_admin, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.id.clone(),
                user.first_name.clone(),
                user.last_name.clone(),
                user.email.clone(),
                user.password_hash.clone(),
                user.active as i32,
                user.is_admin as i32,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                "SELECT id, first_name, last_name, email, password_hash,
                        active, is_admin, created_at, updated_at
                 FROM users WHERE id = ?1",
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                "SELECT id, first_name, last_name, email, password_hash,
                        active, is_admin, created_at, updated_at
                 FROM users WHERE email = ?1",
                params![email],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn update_name(
        conn: &Connection,
        id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        conn.execute(
            "UPDATE users SET first_name = ?1, last_name = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                first_name,
                last_name,
                Utc::now().to_rfc3339(),
                id,
            ],
        )
        .await?;

        Ok(())
    }

    fn row_to_user(row: &libsql::Row) -> Result<User> {
        Ok(User {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            password_hash: row.get(4)?,
            active: row.get::<i32>(5)? != 0,
            is_admin: row.get::<i32>(6)? != 0,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(7)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(8)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

pub struct TokenRepository;

impl TokenRepository {
    pub async fn create(conn: &Connection, token: &AccessToken) -> Result<()> {
        conn.execute(
            "INSERT INTO access_tokens (token, user_id, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                token.token.clone(),
                token.user_id.clone(),
                token.expires_at.to_rfc3339(),
                token.created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Resolve a bearer token to its row, ignoring expired tokens.
    pub async fn get_valid(conn: &Connection, token: &str) -> Result<Option<AccessToken>> {
        let mut rows = conn
            .query(
                "SELECT token, user_id, expires_at, created_at
                 FROM access_tokens WHERE token = ?1 AND expires_at > ?2",
                params![token, Utc::now().to_rfc3339()],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(AccessToken {
                token: row.get(0)?,
                user_id: row.get(1)?,
                expires_at: DateTime::parse_from_rfc3339(&row.get::<String>(2)?)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                created_at: DateTime::parse_from_rfc3339(&row.get::<String>(3)?)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            }))
        } else {
            Ok(None)
        }
    }

    /// Revoke one token, e.g. at logout. Deleting an unknown token is a no-op.
    pub async fn delete(conn: &Connection, token: &str) -> Result<()> {
        conn.execute(
            "DELETE FROM access_tokens WHERE token = ?1",
            params![token],
        )
        .await?;

        Ok(())
    }

    /// Remove tokens past their expiry. Returns the number of rows deleted.
    pub async fn delete_expired(conn: &Connection) -> Result<u64> {
        let deleted = conn
            .execute(
                "DELETE FROM access_tokens WHERE expires_at <= ?1",
                params![Utc::now().to_rfc3339()],
            )
            .await?;
        Ok(deleted)
    }
}

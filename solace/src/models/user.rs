use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Salted SHA-256 digest, never serialized out.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(first_name: String, last_name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid::nanoid!(),
            first_name,
            last_name,
            email,
            password_hash,
            active: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An opaque bearer token issued at login, resolved back to a user by the
/// auth middleware until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{Result, SolaceError};
use crate::models::Chat;

pub struct ChatRepository;

impl ChatRepository {
    pub async fn create(conn: &Connection, chat: &Chat) -> Result<()> {
        conn.execute(
            "INSERT INTO chats (id, owner_id, title, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                chat.id.clone(),
                chat.owner_id.clone(),
                chat.title.clone(),
                chat.created_at.to_rfc3339(),
                chat.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Fetch a chat only if it is owned by `owner_id`. A chat that exists but
    /// belongs to someone else is indistinguishable from a missing one.
    pub async fn get_owned(
        conn: &Connection,
        chat_id: &str,
        owner_id: &str,
    ) -> Result<Option<Chat>> {
        let mut rows = conn
            .query(
                "SELECT id, owner_id, title, created_at, updated_at
                 FROM chats WHERE id = ?1 AND owner_id = ?2",
                params![chat_id, owner_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_chat(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve an explicit chat id (ownership enforced) or create a fresh
    /// chat titled with the first 40 characters of the seed text.
    pub async fn resolve_or_create(
        conn: &Connection,
        owner_id: &str,
        chat_id: Option<&str>,
        seed_title: &str,
    ) -> Result<Chat> {
        match chat_id {
            Some(id) => Self::get_owned(conn, id, owner_id)
                .await?
                .ok_or_else(|| SolaceError::NotFound(format!("Chat {id} not found"))),
            None => {
                let chat = Chat::new(owner_id.to_string(), seed_title);
                Self::create(conn, &chat).await?;
                Ok(chat)
            }
        }
    }

    pub async fn list_for_owner(conn: &Connection, owner_id: &str) -> Result<Vec<Chat>> {
        let mut rows = conn
            .query(
                "SELECT id, owner_id, title, created_at, updated_at
                 FROM chats WHERE owner_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
                params![owner_id],
            )
            .await?;

        let mut chats = Vec::new();
        while let Some(row) = rows.next().await? {
            chats.push(Self::row_to_chat(&row)?);
        }
        Ok(chats)
    }

    fn row_to_chat(row: &libsql::Row) -> Result<Chat> {
        Ok(Chat {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(3)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(4)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::UserRepository;
    use crate::db::schema;
    use crate::models::User;

    async fn setup_test_db() -> Connection {
        let conn = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap()
            .connect()
            .unwrap();
        schema::init_schema(&conn).await.unwrap();
        seed_user(&conn, "user-a").await;
        conn
    }

    // chats.owner_id has a FOREIGN KEY to users, so owners referenced by the
    // fixtures must exist as rows.
    async fn seed_user(conn: &Connection, id: &str) {
        let mut user = User::new(
            "Test".to_string(),
            "User".to_string(),
            format!("{id}@example.com"),
            "hash".to_string(),
        );
        user.id = id.to_string();
        UserRepository::create(conn, &user).await.unwrap();
    }

    #[tokio::test]
    async fn create_and_get_owned_roundtrip() {
        let conn = setup_test_db().await;

        let chat = Chat::new("user-a".to_string(), "I had a rough day at work");
        ChatRepository::create(&conn, &chat).await.unwrap();

        let fetched = ChatRepository::get_owned(&conn, &chat.id, "user-a")
            .await
            .unwrap()
            .expect("chat should exist for owner");
        assert_eq!(fetched.title, "I had a rough day at work");
    }

    #[tokio::test]
    async fn get_owned_hides_other_users_chats() {
        let conn = setup_test_db().await;

        let chat = Chat::new("user-a".to_string(), "private");
        ChatRepository::create(&conn, &chat).await.unwrap();

        let fetched = ChatRepository::get_owned(&conn, &chat.id, "user-b")
            .await
            .unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn resolve_with_unknown_id_is_not_found() {
        let conn = setup_test_db().await;

        let err = ChatRepository::resolve_or_create(&conn, "user-a", Some("missing"), "seed")
            .await
            .unwrap_err();
        assert!(matches!(err, SolaceError::NotFound(_)));
    }

    #[tokio::test]
    async fn resolve_without_id_creates_titled_chat() {
        let conn = setup_test_db().await;

        let seed = "x".repeat(60);
        let chat = ChatRepository::resolve_or_create(&conn, "user-a", None, &seed)
            .await
            .unwrap();
        assert_eq!(chat.title.chars().count(), 40);
        assert!(ChatRepository::get_owned(&conn, &chat.id, "user-a")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn list_for_owner_is_most_recent_first() {
        let conn = setup_test_db().await;

        for title in ["A", "B", "C"] {
            let chat = Chat::new("user-a".to_string(), title);
            ChatRepository::create(&conn, &chat).await.unwrap();
        }

        let chats = ChatRepository::list_for_owner(&conn, "user-a").await.unwrap();
        let titles: Vec<&str> = chats.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }
}

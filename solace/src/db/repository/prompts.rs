use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::Prompt;

pub struct PromptRepository;

impl PromptRepository {
    pub async fn create(conn: &Connection, prompt: &Prompt) -> Result<()> {
        conn.execute(
            "INSERT INTO prompts (id, chat_id, prompt, bot_response, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                prompt.id.clone(),
                prompt.chat_id.clone(),
                prompt.prompt.clone(),
                prompt.bot_response.clone(),
                prompt.created_at.to_rfc3339(),
                prompt.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list_for_chat(conn: &Connection, chat_id: &str) -> Result<Vec<Prompt>> {
        let mut rows = conn
            .query(
                "SELECT id, chat_id, prompt, bot_response, created_at, updated_at
                 FROM prompts WHERE chat_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
                params![chat_id],
            )
            .await?;

        let mut prompts = Vec::new();
        while let Some(row) = rows.next().await? {
            prompts.push(Self::row_to_prompt(&row)?);
        }
        Ok(prompts)
    }

    fn row_to_prompt(row: &libsql::Row) -> Result<Prompt> {
        Ok(Prompt {
            id: row.get(0)?,
            chat_id: row.get(1)?,
            prompt: row.get(2)?,
            bot_response: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(4)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(5)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{ChatRepository, UserRepository};
    use crate::db::schema;
    use crate::models::{Chat, User};

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
    async fn list_for_chat_is_most_recent_first() {
        let conn = setup_test_db().await;

        let chat = Chat::new("user-a".to_string(), "seed");
        ChatRepository::create(&conn, &chat).await.unwrap();

        for text in ["first", "second", "third"] {
            let prompt = Prompt::new(chat.id.clone(), text.to_string(), "reply".to_string());
            PromptRepository::create(&conn, &prompt).await.unwrap();
        }

        let prompts = PromptRepository::list_for_chat(&conn, &chat.id).await.unwrap();
        let texts: Vec<&str> = prompts.iter().map(|p| p.prompt.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn prompts_are_scoped_to_their_chat() {
        let conn = setup_test_db().await;

        let chat_a = Chat::new("user-a".to_string(), "a");
        let chat_b = Chat::new("user-a".to_string(), "b");
        ChatRepository::create(&conn, &chat_a).await.unwrap();
        ChatRepository::create(&conn, &chat_b).await.unwrap();

        let prompt = Prompt::new(chat_a.id.clone(), "hello".to_string(), "hi".to_string());
        PromptRepository::create(&conn, &prompt).await.unwrap();

        assert_eq!(
            PromptRepository::list_for_chat(&conn, &chat_a.id).await.unwrap().len(),
            1
        );
        assert!(PromptRepository::list_for_chat(&conn, &chat_b.id)
            .await
            .unwrap()
            .is_empty());
    }
}

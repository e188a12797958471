use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::Sentiment;

pub struct SentimentRepository;

impl SentimentRepository {
    pub async fn create(conn: &Connection, sentiment: &Sentiment) -> Result<()> {
        conn.execute(
            "INSERT INTO sentiments (id, prompt_id, sentiment, score, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sentiment.id.clone(),
                sentiment.prompt_id.clone(),
                sentiment.sentiment.clone(),
                sentiment.score,
                sentiment.created_at.to_rfc3339(),
                sentiment.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Sentiments belonging to `owner_id`, joined transitively through
    /// Prompt -> Chat -> owner, filtered to `[start, end]` inclusive.
    pub async fn list_for_owner_between(
        conn: &Connection,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sentiment>> {
        let mut rows = conn
            .query(
                "SELECT s.id, s.prompt_id, s.sentiment, s.score, s.created_at, s.updated_at
                 FROM sentiments s
                 JOIN prompts p ON p.id = s.prompt_id
                 JOIN chats c ON c.id = p.chat_id
                 WHERE c.owner_id = ?1
                   AND s.created_at >= ?2
                   AND s.created_at <= ?3
                 ORDER BY s.created_at ASC",
                params![owner_id, start.to_rfc3339(), end.to_rfc3339()],
            )
            .await?;

        let mut sentiments = Vec::new();
        while let Some(row) = rows.next().await? {
            sentiments.push(Self::row_to_sentiment(&row)?);
        }
        Ok(sentiments)
    }

    fn row_to_sentiment(row: &libsql::Row) -> Result<Sentiment> {
        Ok(Sentiment {
            id: row.get(0)?,
            prompt_id: row.get(1)?,
            sentiment: row.get(2)?,
            score: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(4)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(5)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

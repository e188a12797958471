use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{Faq, Resource};

pub struct FaqRepository;

impl FaqRepository {
    pub async fn create(conn: &Connection, faq: &Faq) -> Result<()> {
        conn.execute(
            "INSERT INTO faqs (id, question, answer, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                faq.id.clone(),
                faq.question.clone(),
                faq.answer.clone(),
                faq.created_at.to_rfc3339(),
                faq.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list_all(conn: &Connection) -> Result<Vec<Faq>> {
        let mut rows = conn
            .query(
                "SELECT id, question, answer, created_at, updated_at FROM faqs",
                params![],
            )
            .await?;

        let mut faqs = Vec::new();
        while let Some(row) = rows.next().await? {
            faqs.push(Faq {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
                created_at: parse_ts(&row.get::<String>(3)?),
                updated_at: parse_ts(&row.get::<String>(4)?),
            });
        }
        Ok(faqs)
    }
}

pub struct ResourceRepository;

impl ResourceRepository {
    pub async fn create(conn: &Connection, resource: &Resource) -> Result<()> {
        conn.execute(
            "INSERT INTO resources (id, title, description, video_url, thumbnail_url,
                                    created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                resource.id.clone(),
                resource.title.clone(),
                resource.description.clone(),
                resource.video_url.clone(),
                resource.thumbnail_url.clone(),
                resource.created_at.to_rfc3339(),
                resource.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list_all(conn: &Connection) -> Result<Vec<Resource>> {
        let mut rows = conn
            .query(
                "SELECT id, title, description, video_url, thumbnail_url, created_at, updated_at
                 FROM resources
                 ORDER BY created_at DESC, rowid DESC",
                params![],
            )
            .await?;

        let mut resources = Vec::new();
        while let Some(row) = rows.next().await? {
            resources.push(Resource {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                video_url: row.get(3)?,
                thumbnail_url: row.get(4)?,
                created_at: parse_ts(&row.get::<String>(5)?),
                updated_at: parse_ts(&row.get::<String>(6)?),
            });
        }
        Ok(resources)
    }
}

fn parse_ts(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Faq {
    pub fn new(question: String, answer: String) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid::nanoid!(),
            question,
            answer,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A curated video resource shown in the app's library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(
        title: String,
        description: String,
        video_url: String,
        thumbnail_url: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid::nanoid!(),
            title,
            description,
            video_url,
            thumbnail_url,
            created_at: now,
            updated_at: now,
        }
    }
}

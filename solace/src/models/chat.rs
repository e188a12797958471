use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a chat title derived from the first prompt.
pub const CHAT_TITLE_MAX_CHARS: usize = 40;

/// A conversation owned by exactly one user. Created implicitly on the first
/// prompt unless an existing chat id is supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(owner_id: String, seed_title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid::nanoid!(),
            owner_id,
            title: truncate_chars(seed_title, CHAT_TITLE_MAX_CHARS),
            created_at: now,
            updated_at: now,
        }
    }
}

/// One user prompt plus the generated bot reply. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub chat_id: String,
    pub prompt: String,
    pub bot_response: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prompt {
    pub fn new(chat_id: String, prompt: String, bot_response: String) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid::nanoid!(),
            chat_id,
            prompt,
            bot_response,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An emotion annotation derived from a prompt's text. Never created
/// independently of its parent prompt; only scores strictly above the
/// persistence threshold are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub id: String,
    pub prompt_id: String,
    pub sentiment: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sentiment {
    pub fn new(prompt_id: String, sentiment: String, score: f64) -> Self {
        let now = Utc::now();
        Self {
            id: nanoid::nanoid!(),
            prompt_id,
            sentiment,
            score,
            created_at: now,
            updated_at: now,
        }
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

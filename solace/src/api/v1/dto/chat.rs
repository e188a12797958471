//! Chat, prompt, and sentiment DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Chat, Prompt, Sentiment};
use crate::services::PromptSubmission;

/// Request body for `POST /v1/chats`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPromptRequest {
    /// Existing chat to continue. Absent means a new chat is created,
    /// titled from the prompt text.
    pub chat_id: Option<String>,
    /// The user's message.
    pub prompt: String,
}

/// One chat in a listing.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            title: chat.title,
            created_at: chat.created_at,
        }
    }
}

/// One recorded conversation turn.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub id: String,
    pub chat_id: String,
    pub prompt: String,
    pub bot_response: String,
    pub created_at: DateTime<Utc>,
}

impl From<Prompt> for PromptResponse {
    fn from(prompt: Prompt) -> Self {
        Self {
            id: prompt.id,
            chat_id: prompt.chat_id,
            prompt: prompt.prompt,
            bot_response: prompt.bot_response,
            created_at: prompt.created_at,
        }
    }
}

/// One persisted emotion annotation.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
    pub sentiment: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Sentiment> for SentimentResponse {
    fn from(sentiment: Sentiment) -> Self {
        Self {
            sentiment: sentiment.sentiment,
            score: sentiment.score,
            created_at: sentiment.created_at,
        }
    }
}

/// Response body for `POST /v1/chats`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPromptResponse {
    pub chat: ChatResponse,
    pub prompt: PromptResponse,
    pub sentiments: Vec<SentimentResponse>,
}

impl From<PromptSubmission> for SubmitPromptResponse {
    fn from(submission: PromptSubmission) -> Self {
        Self {
            chat: submission.chat.into(),
            prompt: submission.prompt.into(),
            sentiments: submission
                .sentiments
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Query parameters for `GET /v1/sentiments`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SentimentRangeQuery {
    /// Inclusive start of the range (RFC 3339). Defaults to 30 days before
    /// the end of the range.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive end of the range (RFC 3339). Must not be in the future;
    /// defaults to now.
    pub end_date: Option<DateTime<Utc>>,
}

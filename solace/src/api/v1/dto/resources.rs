//! FAQ and video resource DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Faq, Resource};

/// Request body for `POST /v1/faqs` (admin only).
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFaqRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FaqResponse {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl From<Faq> for FaqResponse {
    fn from(faq: Faq) -> Self {
        Self {
            id: faq.id,
            question: faq.question,
            answer: faq.answer,
        }
    }
}

/// Request body for `POST /v1/resources` (admin only). The thumbnail is
/// referenced by URL; uploads are out of scope.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponse {
    fn from(resource: Resource) -> Self {
        Self {
            id: resource.id,
            title: resource.title,
            description: resource.description,
            video_url: resource.video_url,
            thumbnail_url: resource.thumbnail_url,
            created_at: resource.created_at,
        }
    }
}

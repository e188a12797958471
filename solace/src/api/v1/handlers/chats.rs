//! v1 chat, prompt, and sentiment handlers.

use axum::extract::{Path, State};
use axum::Extension;
use axum_extra::extract::Query;

use crate::api::pagination::{paginate, PageParams};
use crate::api::v1::dto::{
    ChatResponse, PromptResponse, SentimentRangeQuery, SentimentResponse, SubmitPromptRequest,
    SubmitPromptResponse,
};
use crate::api::v1::middleware::AuthUser;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `POST /api/v1/chats`
#[utoipa::path(
    post,
    path = "/api/v1/chats",
    tag = "chats",
    operation_id = "chats.submitPrompt",
    request_body = SubmitPromptRequest,
    responses(
        (status = 201, description = "Turn recorded", body = SubmitPromptResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Chat not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_prompt(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(req): axum::Json<SubmitPromptRequest>,
) -> ApiResponse<SubmitPromptResponse> {
    match state
        .conversation
        .submit_prompt(&user.0.id, req.chat_id.as_deref(), &req.prompt)
        .await
    {
        Ok(submission) => ApiResponse::created(SubmitPromptResponse::from(submission)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/chats`
#[utoipa::path(
    get,
    path = "/api/v1/chats",
    tag = "chats",
    operation_id = "chats.list",
    params(PageParams),
    responses(
        (status = 200, description = "Chats, most recent first", body = [ChatResponse]),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_chats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PageParams>,
) -> ApiResponse<Vec<ChatResponse>> {
    match state.conversation.list_chats(&user.0.id).await {
        Ok(chats) => {
            let (page, meta) = paginate(chats, &params);
            ApiResponse::success_with_meta(page.into_iter().map(Into::into).collect(), meta)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/chats/{chatId}/prompts`
#[utoipa::path(
    get,
    path = "/api/v1/chats/{chatId}/prompts",
    tag = "chats",
    operation_id = "chats.listPrompts",
    params(
        ("chatId" = String, Path, description = "Chat ID"),
        PageParams,
    ),
    responses(
        (status = 200, description = "Prompts, most recent first", body = [PromptResponse]),
        (status = 404, description = "Chat not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_prompts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(chat_id): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResponse<Vec<PromptResponse>> {
    match state.conversation.list_prompts(&user.0.id, &chat_id).await {
        Ok(prompts) => {
            let (page, meta) = paginate(prompts, &params);
            ApiResponse::success_with_meta(page.into_iter().map(Into::into).collect(), meta)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/sentiments`
#[utoipa::path(
    get,
    path = "/api/v1/sentiments",
    tag = "sentiments",
    operation_id = "sentiments.list",
    params(SentimentRangeQuery),
    responses(
        (status = 200, description = "Sentiments recorded within the range", body = [SentimentResponse]),
        (status = 400, description = "Invalid date range", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_sentiments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SentimentRangeQuery>,
) -> ApiResponse<Vec<SentimentResponse>> {
    // Omitted bounds fall back to the last 30 days.
    let end = query.end_date.unwrap_or_else(chrono::Utc::now);
    let start = query
        .start_date
        .unwrap_or_else(|| end - chrono::Duration::days(30));

    match state
        .conversation
        .list_sentiments(&user.0.id, start, end)
        .await
    {
        Ok(sentiments) => {
            ApiResponse::success(sentiments.into_iter().map(Into::into).collect())
        }
        Err(e) => e.into(),
    }
}

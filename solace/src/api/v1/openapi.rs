use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::api::pagination;

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Solace API",
        version = "1.0.0",
        description = "Mental health companion backend. REST API for chats, sentiment tracking, and support resources.",
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::users::get_me,
        handlers::users::update_me,
        handlers::chats::submit_prompt,
        handlers::chats::list_chats,
        handlers::chats::list_prompts,
        handlers::chats::list_sentiments,
        handlers::resources::list_faqs,
        handlers::resources::create_faq,
        handlers::resources::list_resources,
        handlers::resources::create_resource,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        pagination::PageParams,
        pagination::PageMeta,
        // Auth
        dto::auth::RegisterRequest,
        dto::auth::LoginRequest,
        dto::auth::LoginResponse,
        dto::auth::UpdateUserRequest,
        dto::auth::UserResponse,
        // Chats
        dto::chat::SubmitPromptRequest,
        dto::chat::SubmitPromptResponse,
        dto::chat::ChatResponse,
        dto::chat::PromptResponse,
        dto::chat::SentimentResponse,
        dto::chat::SentimentRangeQuery,
        // Resources
        dto::resources::CreateFaqRequest,
        dto::resources::FaqResponse,
        dto::resources::CreateResourceRequest,
        dto::resources::ResourceResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::GeneratorStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Registration, login, and logout"),
        (name = "users", description = "The authenticated user's profile"),
        (name = "chats", description = "Conversation turns and transcripts"),
        (name = "sentiments", description = "Per-prompt emotion history"),
        (name = "resources", description = "FAQs and the video resource library"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

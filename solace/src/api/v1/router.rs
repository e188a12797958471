use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let chats = Router::new()
        .route(
            "/",
            get(handlers::chats::list_chats).post(handlers::chats::submit_prompt),
        )
        .route("/{chatId}/prompts", get(handlers::chats::list_prompts));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/faqs", get(handlers::resources::list_faqs))
        .route("/resources", get(handlers::resources::list_resources))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/chats", chats)
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/users/me",
            get(handlers::users::get_me).put(handlers::users::update_me),
        )
        .route("/sentiments", get(handlers::chats::list_sentiments))
        .route("/admin/faqs", post(handlers::resources::create_faq))
        .route(
            "/admin/resources",
            post(handlers::resources::create_resource),
        )
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

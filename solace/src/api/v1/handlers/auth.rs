//! v1 auth handlers.

use axum::extract::State;
use axum::http::HeaderMap;

use crate::api::v1::dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// `POST /api/v1/auth/register`
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    operation_id = "auth.register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<RegisterRequest>,
) -> ApiResponse<UserResponse> {
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Name fields cannot be empty");
    }

    match state
        .auth
        .register(&req.first_name, &req.last_name, &req.email, &req.password)
        .await
    {
        Ok(user) => ApiResponse::created(UserResponse::from(user)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/auth/login`
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    operation_id = "auth.login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ApiError),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<LoginRequest>,
) -> ApiResponse<LoginResponse> {
    match state.auth.login(&req.email, &req.password).await {
        Ok((token, _user)) => ApiResponse::success(LoginResponse::from(token)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/auth/logout`
///
/// Revokes the presented bearer token. The auth middleware has already
/// validated it; the raw header is re-read here to know which row to delete.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    operation_id = "auth.logout",
    responses(
        (status = 200, description = "Token revoked"),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse<()> {
    let token = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match state.auth.logout(token).await {
            Ok(()) => ApiResponse::success(()),
            Err(e) => e.into(),
        },
        None => ApiResponse::error(ErrorCode::Unauthorized, "Missing authorization header"),
    }
}

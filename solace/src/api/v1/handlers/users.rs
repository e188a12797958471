//! v1 user profile handlers.

use axum::extract::State;
use axum::Extension;

use crate::api::v1::dto::{UpdateUserRequest, UserResponse};
use crate::api::v1::middleware::AuthUser;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::db::repository::UserRepository;

/// `GET /api/v1/users/me`
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    operation_id = "users.me",
    responses(
        (status = 200, description = "The authenticated user's profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(Extension(user): Extension<AuthUser>) -> ApiResponse<UserResponse> {
    ApiResponse::success(UserResponse::from(user.0))
}

/// `PUT /api/v1/users/me`
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "users",
    operation_id = "users.updateMe",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(req): axum::Json<UpdateUserRequest>,
) -> ApiResponse<UserResponse> {
    // Absent fields keep their current value.
    let first_name = req.first_name.unwrap_or_else(|| user.0.first_name.clone());
    let last_name = req.last_name.unwrap_or_else(|| user.0.last_name.clone());
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Name fields cannot be empty");
    }

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    if let Err(e) = UserRepository::update_name(&conn, &user.0.id, &first_name, &last_name).await {
        return e.into();
    }

    match UserRepository::get_by_id(&conn, &user.0.id).await {
        Ok(Some(updated)) => ApiResponse::success(UserResponse::from(updated)),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, "User not found"),
        Err(e) => e.into(),
    }
}

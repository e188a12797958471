//! v1 FAQ and video resource handlers.

use axum::extract::State;
use axum::Extension;
use axum_extra::extract::Query;

use crate::api::pagination::{paginate, PageParams};
use crate::api::v1::dto::{
    CreateFaqRequest, CreateResourceRequest, FaqResponse, ResourceResponse,
};
use crate::api::v1::middleware::AuthUser;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::db::repository::{FaqRepository, ResourceRepository};
use crate::models::{Faq, Resource};

/// `GET /api/v1/faqs`
#[utoipa::path(
    get,
    path = "/api/v1/faqs",
    tag = "resources",
    operation_id = "faqs.list",
    responses(
        (status = 200, description = "All FAQs", body = [FaqResponse]),
    )
)]
pub async fn list_faqs(State(state): State<AppState>) -> ApiResponse<Vec<FaqResponse>> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    match FaqRepository::list_all(&conn).await {
        Ok(faqs) => ApiResponse::success(faqs.into_iter().map(Into::into).collect()),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/admin/faqs`
#[utoipa::path(
    post,
    path = "/api/v1/admin/faqs",
    tag = "resources",
    operation_id = "faqs.create",
    request_body = CreateFaqRequest,
    responses(
        (status = 201, description = "FAQ created", body = FaqResponse),
        (status = 403, description = "Admin privileges required", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_faq(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(req): axum::Json<CreateFaqRequest>,
) -> ApiResponse<FaqResponse> {
    if !user.0.is_admin {
        return ApiResponse::error(ErrorCode::Forbidden, "Admin privileges required");
    }
    if req.question.trim().is_empty() || req.answer.trim().is_empty() {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            "Question and answer cannot be empty",
        );
    }

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let faq = Faq::new(req.question, req.answer);
    match FaqRepository::create(&conn, &faq).await {
        Ok(()) => ApiResponse::created(FaqResponse::from(faq)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/resources`
#[utoipa::path(
    get,
    path = "/api/v1/resources",
    tag = "resources",
    operation_id = "resources.list",
    params(PageParams),
    responses(
        (status = 200, description = "Video resources, most recent first", body = [ResourceResponse]),
    )
)]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResponse<Vec<ResourceResponse>> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    match ResourceRepository::list_all(&conn).await {
        Ok(resources) => {
            let (page, meta) = paginate(resources, &params);
            ApiResponse::success_with_meta(page.into_iter().map(Into::into).collect(), meta)
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/admin/resources`
#[utoipa::path(
    post,
    path = "/api/v1/admin/resources",
    tag = "resources",
    operation_id = "resources.create",
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Resource created", body = ResourceResponse),
        (status = 403, description = "Admin privileges required", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_resource(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(req): axum::Json<CreateResourceRequest>,
) -> ApiResponse<ResourceResponse> {
    if !user.0.is_admin {
        return ApiResponse::error(ErrorCode::Forbidden, "Admin privileges required");
    }
    if req.title.trim().is_empty() || req.video_url.trim().is_empty() {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            "Title and video URL cannot be empty",
        );
    }

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let resource = Resource::new(req.title, req.description, req.video_url, req.thumbnail_url);
    match ResourceRepository::create(&conn, &resource).await {
        Ok(()) => ApiResponse::created(ResourceResponse::from(resource)),
        Err(e) => e.into(),
    }
}

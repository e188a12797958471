//! # V1 Bearer Token Authentication Middleware
//!
//! Protects all v1 routes except the explicitly public ones (`/health`,
//! docs, registration, login, and the FAQ and resource lists). The bearer
//! token is
//! resolved to an active user and injected into request extensions so
//! handlers can extract it with `Extension<AuthUser>`.
//!
//! Auth errors are returned as the v1 `ApiResponse` JSON envelope.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;
use crate::models::User;

use super::response::{ApiResponse, ErrorCode};

/// The authenticated caller, available to protected handlers via
/// `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        Some(_) => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Invalid authorization header format. Expected: Bearer <token>",
            )
            .into_response();
        }
        None => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Missing authorization header",
            )
            .into_response();
        }
    };

    match state.auth.authenticate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(AuthUser(user));
            next.run(request).await
        }
        Err(err) => ApiResponse::<()>::from(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, Config, DatabaseConfig, ServerConfig};
    use crate::db::Database;
    use crate::generation::GeneratorProvider;
    use crate::sentiment::SentimentClassifier;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn make_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: ":memory:".to_string(),
                auth_token: None,
                local_path: None,
            },
            auth: AuthConfig {
                access_token_ttl_minutes: 50,
            },
            generator: None,
        }
    }

    async fn build_test_app() -> (Router, AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = make_config();
        config.database.url = format!("file:{}", dir.path().join("test.db").display());

        let db = Database::new(&config.database).await.unwrap();
        let state = AppState::new(
            config,
            db,
            SentimentClassifier::new(),
            GeneratorProvider::new(None),
        );

        async fn protected_handler(Extension(user): Extension<AuthUser>) -> String {
            user.0.email
        }

        async fn health_handler() -> &'static str {
            "healthy"
        }

        let public_routes = Router::new().route("/health", get(health_handler));
        let protected_routes = Router::new()
            .route("/protected", get(protected_handler))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                v1_auth_middleware,
            ));

        let app = Router::new()
            .merge(public_routes)
            .merge(protected_routes)
            .with_state(state.clone());
        (app, state, dir)
    }

    async fn parse_error_body(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_user() {
        let (app, state, _dir) = build_test_app().await;

        state
            .auth
            .register("Ada", "Lovelace", "ada@example.com", "engine-no-1")
            .await
            .unwrap();
        let (token, _) = state
            .auth
            .login("ada@example.com", "engine-no-1")
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", token.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"ada@example.com");
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (app, _state, _dir) = build_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");
        assert_eq!(json["error"]["message"], "Missing authorization header");
    }

    #[tokio::test]
    async fn malformed_header_is_rejected() {
        let (app, _state, _dir) = build_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", "Basic abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let (app, _state, _dir) = build_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", "Bearer not-a-real-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn health_bypasses_auth() {
        let (app, _state, _dir) = build_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

use axum::extract::State;
use serde::Serialize;

use crate::api::v1::response::ApiResponse;
use crate::api::AppState;
use crate::generation::GeneratorBackend;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub generator: GeneratorStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct GeneratorStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = match probe_database(&state).await {
        Ok(()) => DatabaseStatus {
            status: "ok".to_string(),
        },
        Err(_) => DatabaseStatus {
            status: "error".to_string(),
        },
    };

    let generator = if state.generator.is_available() {
        let provider = match state.generator.backend() {
            GeneratorBackend::OpenAI => "openai",
            GeneratorBackend::OpenRouter => "openrouter",
            GeneratorBackend::Ollama => "ollama",
            GeneratorBackend::LmStudio => "lmstudio",
            GeneratorBackend::OpenAICompatible { .. } => "openai-compatible",
            GeneratorBackend::Unavailable { .. } => "unavailable",
        };
        let model = state.config.generator.as_ref().map(|c| c.model.clone());
        GeneratorStatus {
            status: "available".to_string(),
            provider: Some(provider.to_string()),
            model,
        }
    } else {
        GeneratorStatus {
            status: "degraded".to_string(),
            provider: None,
            model: None,
        }
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        generator,
    })
}

async fn probe_database(state: &AppState) -> crate::error::Result<()> {
    let conn = state.db.connect()?;
    conn.query("SELECT 1", ()).await?;
    Ok(())
}

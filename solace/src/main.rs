mod api;
mod config;
mod db;
mod error;
mod generation;
mod models;
mod sentiment;
mod services;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::db::repository::TokenRepository;
use crate::db::Database;
use crate::generation::GeneratorProvider;
use crate::sentiment::SentimentClassifier;

#[derive(Parser)]
#[command(name = "solace")]
#[command(about = "Mental health companion backend")]
struct Args {
    /// Override the listen port from SOLACE_PORT
    #[arg(long)]
    port: Option<u16>,
}

const TOKEN_SWEEP_INTERVAL_SECS: u64 = 600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solace=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Initializing database...");
    let db = Database::new(&config.database).await?;

    let classifier = SentimentClassifier::new();

    if let Some(generator_config) = &config.generator {
        tracing::info!("Initializing generator provider: {}...", generator_config.model);
    }
    let generator = GeneratorProvider::new(config.generator.as_ref());
    if !generator.is_available() {
        tracing::warn!(
            "Generator unavailable - replies will degrade to a fixed notice. Set GENERATOR_MODEL to enable generation."
        );
    }

    let state = AppState::new(config.clone(), db, classifier, generator);

    let cancel_token = CancellationToken::new();

    tracing::info!("Starting expired token sweeper...");
    let sweep_db = state.db.clone();
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Token sweeper shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(TOKEN_SWEEP_INTERVAL_SECS)) => {
                    match sweep_db.connect() {
                        Ok(conn) => match TokenRepository::delete_expired(&conn).await {
                            Ok(0) => {}
                            Ok(count) => tracing::debug!(count, "Swept expired access tokens"),
                            Err(e) => tracing::error!("Token sweep error: {}", e),
                        },
                        Err(e) => tracing::error!("Token sweep connection error: {}", e),
                    }
                }
            }
        }
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Solace starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}

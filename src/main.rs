//! TPAF API - AI governance policy dataset service
//!
//! Ingests the TPAF policy workbook (one sheet per governance dimension) into
//! a normalized policy graph and serves it to the dashboard as JSON.
//!
//! PIPELINE: workbook bytes -> rows (merged cells resolved) -> phase tracking
//! -> policy normalization -> keyword connection graph -> expert references.
//! A failed run never empties the dashboard: the last good snapshot, or a
//! small synthetic dataset, is served instead.

mod config;
mod dataset;
mod error;
mod ingest;
mod models;
mod routes;
mod state;

use crate::config::Settings;
use crate::dataset::DatasetService;
use crate::ingest::experts::ExpertMapper;
use crate::ingest::normalize::NormalizerConfig;
use crate::ingest::patterns::HeaderPatterns;
use crate::ingest::{IngestPipeline, WorkbookFetcher, WorkbookSource};
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting TPAF policy dataset service...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let keywords = settings.source.keyword_table()?;
    info!("🔑 Keyword table: {} patterns", keywords.len());

    let pipeline = IngestPipeline::new(
        HeaderPatterns::default(),
        NormalizerConfig::with_keywords(keywords),
        ExpertMapper::default(),
    );
    let source = WorkbookSource::parse(&settings.source.workbook);
    let fetcher = WorkbookFetcher::new(source, settings.source.fetch_timeout);
    let service = DatasetService::new(fetcher, pipeline);

    // Initial load; degrades to cached/synthetic data instead of failing
    let snapshot = service.reload().await;
    info!(
        "📚 Initial dataset: {} policies ({:?}) from {}",
        snapshot.dataset.policies.len(),
        snapshot.origin,
        settings.source.workbook
    );

    let refresh = settings.source.refresh_interval.map(|every| {
        info!("🔄 Refreshing dataset every {}s", every.as_secs());
        service.spawn_refresh(every)
    });

    let state = Arc::new(AppState::new(service));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET  /health                      - Liveness");
    info!("   GET  /api/dataset                 - Full dataset");
    info!("   GET  /api/dataset/status          - Snapshot metadata");
    info!("   POST /api/dataset/reload          - Re-ingest the workbook");
    info!("   GET  /api/policies                - Filter policies");
    info!("   GET  /api/policies/{{id}}           - One policy");
    info!("   GET  /api/policies/{{id}}/related   - Ranked connections");
    info!("   GET  /api/dimensions | /api/phases | /api/keywords");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = refresh {
        handle.abort();
    }

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tpaf_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}

//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod dataset;
mod policy;

use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Dataset routes
        .route("/api/dataset", get(dataset::get_dataset))
        .route("/api/dataset/status", get(dataset::dataset_status))
        .route("/api/dataset/reload", post(dataset::reload_dataset))
        .route("/api/dimensions", get(dataset::list_dimensions))
        .route("/api/phases", get(dataset::list_phases))
        .route("/api/keywords", get(dataset::list_keywords))

        // Policy routes
        .route("/api/policies", get(policy::list_policies))
        .route("/api/policies/{id}", get(policy::get_policy))
        .route("/api/policies/{id}/related", get(policy::related))

        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    layer
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetService;
    use crate::ingest::fixtures::{xlsx_bytes, SheetFixture};
    use crate::ingest::{IngestPipeline, WorkbookFetcher, WorkbookSource};
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn write_workbook(path: &Path) {
        let bytes = xlsx_bytes(&[
            SheetFixture::new(
                "Legislation and Policy",
                &[
                    ["Design", "Ethics code", "An ethics and transparency code", "", ""],
                    ["", "Audit office", "Transparency audits with oversight", "", ""],
                ],
            ),
            SheetFixture::new(
                "Sustainability and Society",
                &[["Monitoring", "Green compute", "Reduce energy use", "", "Energy"]],
            ),
        ]);
        std::fs::write(path, bytes).unwrap();
    }

    fn app_for(path: &Path) -> (Router, SharedState) {
        let fetcher = WorkbookFetcher::new(
            WorkbookSource::File(path.to_path_buf()),
            Duration::from_secs(5),
        );
        let service = DatasetService::new(fetcher, IngestPipeline::default());
        let state = Arc::new(AppState::new(service));
        (create_router(Arc::clone(&state), &Settings::default()), state)
    }

    async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app_for(&dir.path().join("tpaf.xlsx"));
        let (status, body) = call(&app, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_dataset_before_and_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpaf.xlsx");
        let (app, _) = app_for(&path);

        let (_, body) = call(&app, Method::GET, "/api/dataset").await;
        assert_eq!(body["data"]["snapshot"]["origin"], "fallback");
        assert_eq!(body["data"]["policies"].as_array().unwrap().len(), 3);

        write_workbook(&path);
        let (status, body) = call(&app, Method::POST, "/api/dataset/reload").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["loaded"], true);
        assert_eq!(body["data"]["snapshot"]["origin"], "workbook");
        assert_eq!(body["data"]["snapshot"]["policyCount"], 3);

        let (_, body) = call(&app, Method::GET, "/api/dataset").await;
        let data = &body["data"];
        assert_eq!(data["policies"][0]["title"], "Ethics code");
        assert_eq!(data["policies"][0]["phaseId"], "design");
        assert_eq!(data["dimensions"].as_array().unwrap().len(), 5);
        assert_eq!(data["phases"][0]["policyIds"], serde_json::json!([1, 2]));
        assert_eq!(
            data["keywords"],
            serde_json::json!(["energy", "ethics", "oversight", "transparency"])
        );
    }

    #[tokio::test]
    async fn test_policy_routes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpaf.xlsx");
        write_workbook(&path);
        let (app, state) = app_for(&path);
        state.dataset.reload().await;

        let (status, body) = call(&app, Method::GET, "/api/policies?dimension=legislation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = call(&app, Method::GET, "/api/policies?q=GREEN").await;
        assert_eq!(body["data"][0]["id"], 3);

        let (status, body) = call(&app, Method::GET, "/api/policies/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Audit office");

        let (status, body) = call(&app, Method::GET, "/api/policies/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (_, body) = call(&app, Method::GET, "/api/policies/1/related?minStrength=1").await;
        assert_eq!(body["data"][0]["id"], 2);
        assert_eq!(body["data"][0]["sharedKeywords"], serde_json::json!(["transparency"]));
    }

    #[tokio::test]
    async fn test_invalid_query_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app_for(&dir.path().join("tpaf.xlsx"));

        let (status, body) = call(&app, Method::GET, "/api/policies?dimension=finance").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = call(&app, Method::GET, "/api/policies/1/related?minStrength=9").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_slices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpaf.xlsx");
        write_workbook(&path);
        let (app, state) = app_for(&path);
        state.dataset.reload().await;

        let (_, body) = call(&app, Method::GET, "/api/dimensions").await;
        assert_eq!(body["data"]["dimensions"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"]["counts"][1]["policyCount"], 2);

        let (_, body) = call(&app, Method::GET, "/api/phases").await;
        assert_eq!(body["data"][1]["id"], "monitoring");

        let (_, body) = call(&app, Method::GET, "/api/keywords").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 4);

        let (_, body) = call(&app, Method::GET, "/api/dataset/status").await;
        assert_eq!(body["data"]["loaded"], true);
    }
}

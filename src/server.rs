//! HTTP trigger surface
//!
//! Thin front end over the pipeline: a liveness probe, one endpoint that
//! runs an ingest end-to-end and reports the aggregation, and a read-only
//! stats endpoint. Every core error surfaces as a failure response carrying
//! the error's message — nothing is swallowed.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::aggregate::AgeDistribution;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::stream;

/// App state shared across handlers
pub struct AppState {
    /// Loaded configuration (source, batch size)
    pub config: AppConfig,
    /// Shared persistence handle
    pub store: Arc<Store>,
}

/// Request body for the ingest endpoint; every field falls back to config
#[derive(Debug, Default, Deserialize)]
pub struct IngestRequest {
    /// Source file override
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Batch size override
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Result of one triggered run
#[derive(Debug, Serialize)]
pub struct IngestSummary {
    /// Rows processed by this run
    pub processed_rows: u64,
    /// Header list captured from the source
    pub headers: Vec<String>,
    /// Total rows now persisted in the table
    pub persisted_rows: u64,
    /// Read-side age distribution after the run
    pub age_distribution: AgeDistribution,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ingest", post(ingest))
        .route("/stats", get(stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: AppConfig, store: Arc<Store>, port: u16) -> Result<()> {
    let state = Arc::new(AppState { config, store });
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Liveness probe, no side effects
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Run one ingest end-to-end, then the aggregation reader
async fn ingest(
    State(state): State<Arc<AppState>>,
    body: Option<Json<IngestRequest>>,
) -> impl IntoResponse {
    let req = body.map(|Json(r)| r).unwrap_or_default();

    let source = match req.source.as_deref() {
        Some(p) => p.to_path_buf(),
        None => match state.config.require_source() {
            Ok(p) => p.to_path_buf(),
            Err(e) => return failure(&e),
        },
    };
    let batch_size = req.batch_size.unwrap_or(state.config.batch_size);
    if batch_size == 0 {
        return failure(&Error::config("batch_size must be a positive integer"));
    }

    let result = stream::ingest_file(&source, state.store.as_ref(), batch_size, |rows| {
        tracing::info!(rows, "ingest progress");
    });

    let report = match result {
        Ok(report) => report,
        Err(e) => return failure(&e),
    };

    let summary = match summarize(&state.store, report) {
        Ok(summary) => summary,
        Err(e) => return failure(&e),
    };

    (StatusCode::OK, Json(ApiResponse::success(summary))).into_response()
}

/// Read-side aggregation alone
async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.age_counts() {
        Ok(counts) => (
            StatusCode::OK,
            Json(ApiResponse::success(AgeDistribution::from_counts(counts))),
        )
            .into_response(),
        Err(e) => failure(&e),
    }
}

fn summarize(store: &Store, report: stream::IngestReport) -> Result<IngestSummary> {
    let persisted_rows = store.count()?;
    let age_distribution = AgeDistribution::from_counts(store.age_counts()?);
    Ok(IngestSummary {
        processed_rows: report.rows_processed,
        headers: report.headers,
        persisted_rows,
        age_distribution,
    })
}

fn failure(error: &Error) -> axum::response::Response {
    let status = match error {
        Error::Config { .. } | Error::MissingConfigField { .. } => StatusCode::BAD_REQUEST,
        Error::SourceNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(%error, "request failed");
    (status, Json(ApiResponse::<()>::error(error.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::io::Write;
    use tower::ServiceExt;

    fn test_state(config: AppConfig) -> Arc<AppState> {
        Arc::new(AppState {
            config,
            store: Arc::new(Store::in_memory().unwrap()),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(AppConfig::default()));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ingest_without_source_is_config_error() {
        let app = build_router(test_state(AppConfig::default()));
        let response = app
            .oneshot(Request::post("/ingest").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing required config field: source");
    }

    #[tokio::test]
    async fn test_ingest_missing_file_is_not_found() {
        let app = build_router(test_state(AppConfig::default()));
        let request = Request::post("/ingest")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"source": "/nope/people.csv"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_ingest_end_to_end() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name.firstName,name.lastName,age,hobby").unwrap();
        writeln!(file, "Ann,Lee,34,chess").unwrap();
        writeln!(file, "Sam,Oh,25,").unwrap();
        file.flush().unwrap();

        let state = test_state(AppConfig::default());
        let app = build_router(state.clone());
        let request = Request::post("/ingest")
            .header("content-type", "application/json")
            .body(Body::from(format!(
                r#"{{"source": "{}", "batch_size": 1}}"#,
                file.path().display()
            )))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["processed_rows"], 2);
        assert_eq!(body["data"]["persisted_rows"], 2);
        assert_eq!(body["data"]["headers"][3], "hobby");
        assert_eq!(
            body["data"]["age_distribution"]["age_20_to_40"]["count"],
            2
        );
        assert_eq!(state.store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stats_on_empty_table() {
        let app = build_router(test_state(AppConfig::default()));
        let response = app
            .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["total"], 0);
        assert_eq!(body["data"]["under_20"]["percent"], 0);
    }
}

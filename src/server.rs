//! JSON-over-HTTP adapter around the pipeline and the stores.
//!
//! Routes:
//! - `POST /api/scrape` fetches and summarises a URL
//! - `POST /api/save-summary` writes a finished record to both stores
//! - `GET /api/test-db` probes both stores
//! - `GET /health`

use crate::config::Config;
use crate::db::{HealthReport, Persistence};
use crate::pipeline::{PageSummary, Pipeline};
use crate::scraper::ScraperError;
use crate::summary::SummaryRecord;
use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub persistence: Arc<Persistence>,
}

/// Handler failure, rendered as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadGateway(String),
    Internal(String),
}

impl From<ScraperError> for ApiError {
    fn from(e: ScraperError) -> Self {
        match e {
            ScraperError::InvalidUrl { .. } => ApiError::BadRequest(e.to_string()),
            _ => ApiError::BadGateway(format!("Failed to scrape URL: {e}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::BadGateway(m) => (StatusCode::BAD_GATEWAY, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveRequest {
    pub title: String,
    pub url: String,
    pub summary: String,
    #[serde(alias = "urdu_summary")]
    pub translated_summary: String,
    pub full_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    pub summary_saved: bool,
    pub content_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/scrape", post(scrape))
        .route("/api/save-summary", post(save_summary))
        .route("/api/test-db", get(test_db))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<PageSummary>, ApiError> {
    let url = request
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("URL is required".to_string()))?;

    let page = state.pipeline.run(&url).await.map_err(|e| {
        error!(%url, "scrape failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(page))
}

async fn save_summary(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<(StatusCode, Json<SaveResponse>), ApiError> {
    let record = SummaryRecord::new(
        request.title,
        request.url,
        request.summary,
        request.translated_summary,
        request.full_text,
    );

    let missing = record.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let persistence = state.persistence.clone();
    let report = tokio::task::spawn_blocking(move || persistence.save(&record))
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save data: {e}")))?;

    let errors = report.errors();
    let status = if report.any_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((
        status,
        Json(SaveResponse {
            success: report.any_ok(),
            summary_saved: report.summary_store.ok,
            content_saved: report.content_store.ok,
            error: (!errors.is_empty()).then(|| errors.join("; ")),
        }),
    ))
}

async fn test_db(State(state): State<AppState>) -> Result<Json<HealthReport>, ApiError> {
    let persistence = state.persistence.clone();
    let report = tokio::task::spawn_blocking(move || persistence.check())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(report))
}

/// Serve the API until Ctrl-C
pub async fn serve(config: &Config, persistence: Persistence) -> anyhow::Result<()> {
    let state = AppState {
        pipeline: Pipeline::from_config(config)?,
        persistence: Arc::new(persistence),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn state(dir: &tempfile::TempDir) -> AppState {
        AppState {
            pipeline: Pipeline::from_config(&Config::default()).unwrap(),
            persistence: Arc::new(Persistence::open(&StorageConfig {
                path: dir.path().to_path_buf(),
            })),
        }
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn scrape_requires_a_url() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(&dir));

        let (status, body) = call(app.clone(), "POST", "/api/scrape", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");

        let (status, body) =
            call(app, "POST", "/api/scrape", Some(json!({ "url": "not a url" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid URL"));
    }

    #[tokio::test]
    async fn scrape_summarises_a_live_page() {
        let page = Router::new().route(
            "/post",
            get(|| async {
                axum::response::Html(
                    "<html><head><title>Live</title></head><body><article>\
                     <p>The weather was quite pleasant in the small town today.</p>\
                     <p>Birds sang loudly every morning near the open window.</p>\
                     <p>Children walked slowly to school along the river path.</p>\
                     </article></body></html>",
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, page).await.unwrap() });

        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(
            router(state(&dir)),
            "POST",
            "/api/scrape",
            Some(json!({ "url": format!("http://{addr}/post") })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Live");
        assert_eq!(
            body["summary"],
            "The weather was quite pleasant in the small town today."
        );
        assert!(body["full_text"].as_str().unwrap().ends_with("river path."));
    }

    #[tokio::test]
    async fn fetch_failures_are_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        // Nothing listens on port 9 locally
        let (status, body) = call(
            router(state(&dir)),
            "POST",
            "/api/scrape",
            Some(json!({ "url": "http://127.0.0.1:9/" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().starts_with("Failed to scrape URL"));
    }

    #[tokio::test]
    async fn save_validates_and_reports_each_store() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(&dir));

        let (status, body) = call(
            app.clone(),
            "POST",
            "/api/save-summary",
            Some(json!({ "title": "T", "url": "https://a.example" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: summary, full_text");

        let (status, body) = call(
            app.clone(),
            "POST",
            "/api/save-summary",
            Some(json!({
                "title": "T",
                "url": "https://a.example",
                "summary": "Short.",
                "urdu_summary": "مختصر",
                "full_text": "Short. Text."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: SaveResponse = serde_json::from_value(body).unwrap();
        assert!(response.success && response.summary_saved && response.content_saved);
        assert!(response.error.is_none());

        let (status, body) = call(app, "GET", "/api/test-db", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary_store"], true);
        assert_eq!(body["content_store"], true);
    }

    #[tokio::test]
    async fn health_is_plain_ok() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(state(&dir))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

//! HTTP surface for medbrief.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Liveness check returning `{ "message": ... }`.
//! - `POST /upload_pdf` – Accept a multipart `file` field holding a PDF report, extract its text,
//!   and return `{ "summary": ... }`. Client mistakes yield 4xx `{ "error": ... }`; pipeline
//!   failures yield 500 with `summary` carrying an `[ERROR]`-prefixed message and `error_kind`
//!   naming the failure.
//! - `GET /metrics` – Report processing counters.
//!
//! The CLI shares the same report pipeline, so behavior is identical across both entry points.

use crate::config::Config;
use crate::metrics::MetricsSnapshot;
use crate::report::{ReportApi, ReportError};
use crate::summarization::summary_or_marker;
use crate::upload::{self, UploadError};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Transport-level settings applied to the router.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Optional CORS origin allowlist; any origin is accepted when absent.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl HttpSettings {
    /// Derive router settings from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            cors_allowed_origins: config.cors_allowed_origins.clone(),
        }
    }
}

/// Build the HTTP router exposing the report API surface.
pub fn create_router<S>(service: Arc<S>, settings: &HttpSettings) -> Router
where
    S: ReportApi + 'static,
{
    Router::new()
        .route("/", get(health))
        .route("/upload_pdf", post(upload_pdf::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(cors_layer(settings.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let origin = match allowed_origins {
        Some(origins) => AllowOrigin::list(origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })),
        None => AllowOrigin::from(Any),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Response body for `GET /`.
#[derive(Serialize)]
struct HealthResponse {
    message: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Medical report summarizer is running",
    })
}

/// Success response for `POST /upload_pdf`.
#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

/// Summarize an uploaded PDF report.
///
/// A request that is not multipart at all is treated the same as a form without a `file`
/// field.
async fn upload_pdf<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: ReportApi,
{
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Upload was not a multipart form");
        UploadError::MissingFile
    })?;
    let upload = upload::parse_multipart(multipart).await?;
    let outcome = service.summarize_upload(upload).await?;
    Ok(Json(SummaryResponse {
        summary: outcome.summary,
    }))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: ReportApi,
{
    Json(service.metrics_snapshot())
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct FailedSummaryResponse {
    summary: String,
    error_kind: &'static str,
}

enum AppError {
    Upload(UploadError),
    Report(ReportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Upload(error) => {
                tracing::info!(error = %error, "Rejected upload");
                let body = Json(ErrorResponse {
                    error: error.to_string(),
                });
                (error.status_code(), body).into_response()
            }
            Self::Report(error) => {
                let body = Json(FailedSummaryResponse {
                    error_kind: error.kind(),
                    summary: summary_or_marker(Err(error)),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(inner: UploadError) -> Self {
        Self::Upload(inner)
    }
}

impl From<ReportError> for AppError {
    fn from(inner: ReportError) -> Self {
        Self::Report(inner)
    }
}

//! HTTP server for the Distill API.
//!
//! Exposes `POST /api/upload` (document to text) and `POST /api/summarize`
//! (text to summary), plus health and OpenAPI endpoints. Every failure,
//! including a panic inside a handler, is answered with a JSON
//! `{ "error": ... }` body.

use crate::config::Config;
use crate::extract::{self, ExtractError, MediaType};
use crate::model::{
    ErrorBody, HealthResponse, SummaryRequest, SummaryResponse, UploadResponse, ValidationError,
};
use crate::summarize::{GenerationError, Generator, Summarizer};
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, instrument, warn};
use utoipa::OpenApi;
use uuid::Uuid;

/// Message for failures nobody anticipated
pub const GENERIC_ERROR: &str = "Something went wrong!";

/// OpenAPI documentation for the Distill API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Distill API",
        version = "0.1.0",
        description = "Extract text from documents and summarize it with Gemini \
                       in a chosen style and length.",
        license(name = "MIT"),
        contact(name = "Distill Contributors")
    ),
    servers(
        (url = "http://127.0.0.1:3000", description = "Local development server")
    ),
    paths(upload, summarize, health_check),
    components(schemas(
        crate::model::SummaryRequest,
        crate::model::SummaryResponse,
        crate::model::UploadResponse,
        crate::model::ErrorBody,
        crate::model::HealthResponse,
        crate::model::SummaryStyle,
        crate::model::SummaryLength,
        UploadForm,
    )),
    tags(
        (name = "Documents", description = "Text extraction from uploaded files"),
        (name = "Summaries", description = "Style- and length-controlled summaries"),
        (name = "Health", description = "Server health and status")
    )
)]
pub struct ApiDoc;

/// Multipart form accepted by `/api/upload`
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// `text/plain`, `application/pdf` or a DOCX document
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Shared application state. Read-only after start-up.
pub struct AppState {
    pub config: Config,
    pub summarizer: Summarizer,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn Generator>) -> Self {
        Self {
            config,
            summarizer: Summarizer::new(generator),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/api/upload", post(upload))
        .route("/api/summarize", post(summarize))
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_json))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OpenAPI JSON specification endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found"))).into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("Method not allowed")),
    )
        .into_response()
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server health status", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let api_key_configured = state.config.has_api_key();

    Json(HealthResponse {
        status: if api_key_configured { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.summarizer.generator_name().to_string(),
        api_key_configured,
    })
}

/// Extract plain text from an uploaded document
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Documents",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extracted text", body = UploadResponse),
        (status = 400, description = "Missing or unsupported file", body = ErrorBody),
        (status = 500, description = "The document could not be parsed", body = ErrorBody)
    )
)]
#[instrument(skip(multipart), fields(request_id = %Uuid::new_v4()))]
async fn upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected non-multipart upload: {}", e);
        AppError::InvalidRequest("No file uploaded".to_string())
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        AppError::InvalidRequest("Invalid upload".to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let declared = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();

        let Some(kind) = MediaType::from_mime(&declared) else {
            return Err(ExtractError::UnsupportedMediaType(declared).into());
        };

        let bytes = field.bytes().await.map_err(|e| {
            warn!("Failed to read upload body: {}", e);
            AppError::InvalidRequest("Invalid upload".to_string())
        })?;

        info!(
            "Extracting {} ({}, {} bytes)",
            file_name,
            kind.mime(),
            bytes.len()
        );

        let extracted = tokio::task::spawn_blocking(move || extract::extract_as(&bytes, kind))
            .await
            .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))??;

        info!("Extracted {} chars from {}", extracted.char_count(), file_name);
        return Ok(Json(UploadResponse {
            text: extracted.text,
        }));
    }

    Err(AppError::InvalidRequest("No file uploaded".to_string()))
}

/// Summarize text in the requested style and length
#[utoipa::path(
    post,
    path = "/api/summarize",
    tag = "Summaries",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Generated summary", body = SummaryResponse),
        (status = 400, description = "Missing text or unknown style/length", body = ErrorBody),
        (status = 500, description = "The model call failed", body = ErrorBody)
    )
)]
#[instrument(skip(state, payload), fields(request_id = %Uuid::new_v4()))]
async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    let Json(request) = payload?;
    let params = request.validate()?;

    let summary = state.summarizer.summarize(&params).await?;

    Ok(Json(SummaryResponse { summary }))
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Client-side problem; the message is returned verbatim
    InvalidRequest(String),
    Extraction(ExtractError),
    Generation(GenerationError),
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::InvalidRequest(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        debug!("Rejected request body: {}", e.body_text());
        AppError::InvalidRequest("Invalid request body".to_string())
    }
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        AppError::Extraction(e)
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidRequest(msg) => {
                debug!("Invalid request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Extraction(e) if !e.is_extraction_failure() => {
                debug!("Rejected upload: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "Unsupported file type".to_string(),
                )
            }
            AppError::Extraction(e) => {
                error!("File processing error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process file".to_string(),
                )
            }
            AppError::Generation(e) => {
                error!("Summarization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate summary".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string())
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Last-resort handler for panics inside request handling
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(GENERIC_ERROR)),
    )
        .into_response()
}

/// Start the HTTP server and run until Ctrl+C
pub async fn start_server(state: Arc<AppState>) -> Result<(), std::io::Error> {
    let addr = state.config.server_addr();
    let router = create_router(state);

    info!("Starting Distill server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

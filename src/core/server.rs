//! Word Service
//!
//! HTTP surface of the generation pipeline.
//!
//! ## Endpoints
//! - `POST /get-words` - generate a batch of nouns for `{ "level": ... }`
//! - `POST /reset-used-words` - forget every word issued so far
//! - `GET /health` - health check

use crate::core::words::{GenerationResult, Level, Outcome, WordGenerator, WordsError};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const INSUFFICIENT_WARNING: &str = "Too few valid words were generated. Please request again.";
pub const RESET_MESSAGE: &str = "Used word list has been cleared.";
pub const GENERATION_FAILED: &str = "Failed to generate words";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetWordsRequest {
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl IntoResponse for GenerationResult {
    fn into_response(self) -> Response {
        match self.outcome {
            Outcome::Sufficient => (
                StatusCode::OK,
                Json(WordsResponse {
                    warning: None,
                    words: self.words,
                }),
            )
                .into_response(),
            Outcome::Insufficient => (
                StatusCode::ACCEPTED,
                Json(WordsResponse {
                    warning: Some(INSUFFICIENT_WARNING.to_string()),
                    words: self.words,
                }),
            )
                .into_response(),
        }
    }
}

impl IntoResponse for WordsError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WordsError::MissingLevel => (StatusCode::BAD_REQUEST, self.to_string()),
            WordsError::Provider(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Routes with CORS and request tracing, bound to `generator`.
pub fn router(generator: Arc<WordGenerator>) -> Router {
    Router::new()
        .route("/get-words", post(get_words))
        .route("/reset-used-words", post(reset_used_words))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(generator)
}

// ============================================================================
// Word Service
// ============================================================================

/// Serves the word API until stopped.
pub struct WordService {
    host: String,
    port: u16,
    generator: Arc<WordGenerator>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl WordService {
    /// Port 0 picks a free port; see the address returned by [`Self::start`].
    pub fn new(host: impl Into<String>, port: u16, generator: Arc<WordGenerator>) -> Self {
        Self {
            host: host.into(),
            port,
            generator,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Bind and start serving in the background. Returns the bound address.
    pub async fn start(&mut self) -> std::io::Result<SocketAddr> {
        if self.is_running() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                "Word service already running",
            ));
        }

        let listener = tokio::net::TcpListener::bind((self.host.as_str(), self.port)).await?;
        let addr = listener.local_addr()?;
        let app = router(self.generator.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                    log::info!("Word service shutting down");
                })
                .await;
            if let Err(e) = result {
                log::error!("Word service terminated: {}", e);
            }
        });

        log::info!("Word service listening on http://{}", addr);
        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(task);
        Ok(addr)
    }

    /// Stop accepting requests and wait for in-flight ones to finish.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
            log::info!("Word service stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// Generate a batch for the requested level
async fn get_words(
    State(generator): State<Arc<WordGenerator>>,
    body: Result<Json<GetWordsRequest>, JsonRejection>,
) -> Result<GenerationResult, WordsError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::debug!("Rejected get-words body: {}", rejection);
            GetWordsRequest::default()
        }
    };
    let level = Level::parse(request.level.as_deref())?;
    generator.generate(&level).await
}

/// Clear the used words
async fn reset_used_words(State(generator): State<Arc<WordGenerator>>) -> Json<MessageResponse> {
    generator.reset();
    Json(MessageResponse {
        message: RESET_MESSAGE.to_string(),
    })
}

/// Health check endpoint
async fn health_check(State(generator): State<Arc<WordGenerator>>) -> impl IntoResponse {
    let provider = generator.provider();
    Json(serde_json::json!({
        "status": "ok",
        "provider": provider.id(),
        "model": provider.model(),
        "configured": provider.health_check().await,
    }))
}

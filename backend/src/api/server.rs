//! HTTP Server for the Bookshelf API.
//!
//! # API Endpoints
//!
//! | Method | Path                | Description                       |
//! |--------|---------------------|-----------------------------------|
//! | GET    | `/health`           | Health check                      |
//! | GET    | `/api/books`        | List all books                    |
//! | POST   | `/api/books`        | Create a book                     |
//! | GET    | `/api/books/{id}`   | Get one book                      |
//! | PUT    | `/api/books/{id}`   | Replace a book's fields           |
//! | DELETE | `/api/books/{id}`   | Delete a book                     |
//! | POST   | `/api/books/import` | Upload a CSV file of books        |
//! | GET    | `/api/logs`         | SSE stream for import logs        |

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{any::Any, convert::Infallible, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::logs::LogBroadcaster;
use super::types::ImportResponse;
use super::upload::read_csv_upload;
use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult, ServerResult};
use crate::import::import_bytes;
use crate::models::{Book, CandidateBook};
use crate::store::BookStore;
use crate::validation::{check, current_year};

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BookStore>,
    /// Import progress, streamed on `/api/logs`
    pub logs: Arc<LogBroadcaster>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: BookStore, max_upload_bytes: usize) -> Self {
        Self {
            store: Arc::new(store),
            logs: Arc::new(LogBroadcaster::new()),
            max_upload_bytes,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let store = if config.seed_sample_data {
            BookStore::with_sample_data()
        } else {
            BookStore::new()
        };
        Self::new(store, config.max_upload_bytes)
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/import", post(import_books))
        .route(
            "/api/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let state = AppState::from_config(&config);
    let seeded = state.store.len();
    let app = router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, seeded, "bookshelf server listening");
    tracing::info!("   GET/POST        /api/books");
    tracing::info!("   GET/PUT/DELETE  /api/books/{{id}}");
    tracing::info!("   POST            /api/books/import (CSV, max {} bytes)", config.max_upload_bytes);
    tracing::info!("   GET             /api/logs (SSE)");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "bookshelf",
        "version": env!("CARGO_PKG_VERSION"),
        "books": state.store.len(),
        "endpoints": {
            "books": "GET|POST /api/books",
            "book": "GET|PUT|DELETE /api/books/{id}",
            "import": "POST /api/books/import",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.store.list())
}

async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Book>> {
    let book = state.store.get(&id)?;
    Ok(Json(book))
}

/// Request bodies must be JSON objects; arrays and scalars are a 400.
fn candidate_from_body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<CandidateBook> {
    let Json(value) = payload?;
    CandidateBook::from_json(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let candidate = candidate_from_body(payload)?;
    let fields = check(&candidate, current_year()).map_err(ApiError::Validation)?;

    let book = state.store.insert(fields);
    tracing::info!(id = %book.id, title = %book.title, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

/// Fields are validated before the id is looked up, so an invalid body
/// for a missing id reports the validation errors.
async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let candidate = candidate_from_body(payload)?;
    let fields = check(&candidate, current_year()).map_err(ApiError::Validation)?;

    let book = state.store.update(&id, fields)?;
    tracing::info!(id = %book.id, "book updated");

    Ok(Json(book))
}

async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let book = state.store.delete(&id)?;
    tracing::info!(id = %book.id, "book deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Upload CSV endpoint
async fn import_books(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportResponse>> {
    let upload = match read_csv_upload(&mut multipart, state.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => {
            state.logs.error(format!("Upload rejected: {}", e));
            return Err(e.into());
        }
    };

    state.logs.info(format!(
        "New upload: {} ({} bytes)",
        upload.file_name.as_deref().unwrap_or("unknown"),
        upload.bytes.len()
    ));

    let summary = import_bytes(&state.store, &upload.bytes, current_year(), &state.logs);

    Ok(Json(ImportResponse::from(summary)))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.logs.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // Lagged receivers just skip what they missed
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Panics inside a handler become a generic 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(detail).into_response()
}

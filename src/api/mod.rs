//! HTTP API over the book store
//!
//! A thin axum layer: the scrape trigger runs the [`Scraper`], every other
//! route reads from or deletes in the shared [`BookStore`].

mod books;
mod scrape;

use crate::catalog::{ScrapeLimits, Scraper};
use crate::storage::BookStore;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BookStore>,
    pub scraper: Arc<Scraper>,
    pub limits: ScrapeLimits,
    /// Held for the duration of a scrape; a second trigger is refused
    scrape_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<BookStore>, scraper: Arc<Scraper>, limits: ScrapeLimits) -> Self {
        Self {
            store,
            scraper,
            limits,
            scrape_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::UNPROCESSABLE_ENTITY,
            "conflict" => StatusCode::CONFLICT,
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    backend: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/init", post(scrape::init))
        .route("/books", get(books::list_books))
        .route("/books/search", get(books::search_books))
        .route(
            "/books/{id}",
            get(books::get_book).delete(books::delete_book),
        )
        .layer(build_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        backend: state.store.backend_name(),
    })
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::book::Book;
use crate::storage::BookFilter;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CategoryQuery {
    pub category: Option<String>,
}

pub(super) async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<Book>> {
    let books = match query.category.as_deref() {
        Some(category) => state.store.books_by_category(category),
        None => state.store.scan_books(),
    };
    Json(books)
}

pub(super) async fn search_books(
    State(state): State<AppState>,
    Query(filter): Query<BookFilter>,
) -> Result<Json<Vec<Book>>, ApiError> {
    filter
        .validate()
        .map_err(|e| ApiError::new("validation_error", e.to_string()))?;

    Ok(Json(state.store.search(&filter)))
}

pub(super) async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    state
        .store
        .get_book(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("book {} not found", id)))
}

pub(super) async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_book(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("book {} not found", id)))
    }
}

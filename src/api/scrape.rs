use axum::{extract::State, Json};
use serde::Serialize;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct InitResponse {
    status: &'static str,
    message: String,
    categories: usize,
}

/// Runs one full scrape and reports how many books were stored
pub(super) async fn init(State(state): State<AppState>) -> Result<Json<InitResponse>, ApiError> {
    let Ok(_guard) = state.scrape_lock.try_lock() else {
        return Err(ApiError::new("conflict", "a scrape is already running"));
    };

    let report = state.scraper.run(&state.limits).await;
    if !report.listing.is_found() {
        tracing::error!(listing = %report.listing, "scrape found nothing to crawl");
        return Err(ApiError::new(
            "upstream_unavailable",
            report.listing.to_string(),
        ));
    }

    let stored = report.stored_books();
    tracing::info!(
        stored,
        categories = report.categories.len(),
        "scrape triggered over HTTP finished"
    );

    Ok(Json(InitResponse {
        status: "success",
        message: format!("{} books scraped and stored", stored),
        categories: report.categories.len(),
    }))
}

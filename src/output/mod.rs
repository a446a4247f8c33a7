//! Output module for scrape observability
//!
//! This module handles everything a scrape reports while it runs:
//! - The [`ScrapeObserver`] trait injected into each pipeline component
//! - [`TracingObserver`], which turns events into `tracing` log lines
//! - [`ScrapeStats`], which counts events for the end-of-run summary

mod stats;
mod traits;

pub use stats::{print_statistics, ScrapeStats, StatsSnapshot};
pub use traits::{ObserverSet, ScrapeObserver};

use crate::book::{Book, ParsedBook};
use crate::catalog::{Category, CategoryListing, CategoryReport, FetchFailure, ItemError};
use url::Url;

/// Logs scrape events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScrapeObserver for TracingObserver {
    fn categories_listed(&self, listing: &CategoryListing) {
        match listing {
            CategoryListing::Found(categories) => {
                for category in categories {
                    tracing::debug!("Category found: {} ({})", category.name, category.url);
                }
                tracing::info!("Total categories found: {}", categories.len());
            }
            CategoryListing::Empty => {
                tracing::warn!("Category sidebar is present but lists no categories");
            }
            CategoryListing::StructureMismatch => {
                tracing::error!("Category sidebar not found, the site layout may have changed");
            }
            CategoryListing::Unavailable(failure) => {
                tracing::error!("Could not fetch the catalog root page: {}", failure);
            }
        }
    }

    fn category_started(&self, category: &Category) {
        tracing::info!("Scraping category: {}", category.name);
    }

    fn fetch_attempt_failed(&self, url: &Url, attempt: u32, max_attempts: u32, error: &str) {
        tracing::warn!(
            "Attempt {}/{} for {} failed: {}",
            attempt,
            max_attempts,
            url,
            error
        );
    }

    fn fetch_gave_up(&self, failure: &FetchFailure) {
        tracing::error!("{}", failure);
    }

    fn page_scanned(&self, category: &Category, page: u32, url: &Url, listings: usize) {
        tracing::info!(
            "Found {} listings on page {} of {} ({})",
            listings,
            page,
            category.name,
            url
        );
    }

    fn item_skipped(&self, category: &Category, error: &ItemError) {
        tracing::warn!("Skipping listing in {}: {}", category.name, error);
    }

    fn item_over_price(&self, book: &ParsedBook, ceiling: f64) {
        tracing::debug!(
            "Rejected {} at £{:.2} (ceiling £{:.2})",
            book.title,
            book.price,
            ceiling
        );
    }

    fn book_saved(&self, book: &Book) {
        tracing::info!("Book saved: {} - £{:.2}", book.title, book.price);
    }

    fn book_not_saved(&self, book: &Book) {
        tracing::error!("Book not saved: {}", book.title);
    }

    fn category_finished(&self, report: &CategoryReport) {
        tracing::info!(
            "Total books in category {}: {} ({})",
            report.category.name,
            report.books.len(),
            report.stop
        );
    }
}

//! Observer trait for scrape events
//!
//! Each pipeline component receives an observer at construction and reports
//! what it does through it, instead of relying on process-wide logging setup.

use crate::book::{Book, ParsedBook};
use crate::catalog::{Category, CategoryListing, CategoryReport, FetchFailure, ItemError};
use std::sync::Arc;
use url::Url;

/// Receives scrape events
///
/// Every method defaults to a no-op so implementations only override what
/// they care about.
pub trait ScrapeObserver: Send + Sync {
    /// The root page was inspected for categories
    fn categories_listed(&self, _listing: &CategoryListing) {}

    /// A category crawl is about to start
    fn category_started(&self, _category: &Category) {}

    /// One fetch attempt failed; `attempt` is 1-based
    fn fetch_attempt_failed(&self, _url: &Url, _attempt: u32, _max_attempts: u32, _error: &str) {}

    /// Every attempt for a URL failed
    fn fetch_gave_up(&self, _failure: &FetchFailure) {}

    /// A listing page was fetched and `listings` fragments were found on it
    fn page_scanned(&self, _category: &Category, _page: u32, _url: &Url, _listings: usize) {}

    /// A listing fragment could not be parsed
    fn item_skipped(&self, _category: &Category, _error: &ItemError) {}

    /// A parsed book is priced above the ceiling
    fn item_over_price(&self, _book: &ParsedBook, _ceiling: f64) {}

    /// A book was written to the store
    fn book_saved(&self, _book: &Book) {}

    /// The store rejected a book
    fn book_not_saved(&self, _book: &Book) {}

    /// A category crawl finished
    fn category_finished(&self, _report: &CategoryReport) {}
}

/// Forwards every event to several observers in order
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn ScrapeObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn ScrapeObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ScrapeObserver for ObserverSet {
    fn categories_listed(&self, listing: &CategoryListing) {
        self.observers.iter().for_each(|o| o.categories_listed(listing));
    }

    fn category_started(&self, category: &Category) {
        self.observers.iter().for_each(|o| o.category_started(category));
    }

    fn fetch_attempt_failed(&self, url: &Url, attempt: u32, max_attempts: u32, error: &str) {
        self.observers
            .iter()
            .for_each(|o| o.fetch_attempt_failed(url, attempt, max_attempts, error));
    }

    fn fetch_gave_up(&self, failure: &FetchFailure) {
        self.observers.iter().for_each(|o| o.fetch_gave_up(failure));
    }

    fn page_scanned(&self, category: &Category, page: u32, url: &Url, listings: usize) {
        self.observers
            .iter()
            .for_each(|o| o.page_scanned(category, page, url, listings));
    }

    fn item_skipped(&self, category: &Category, error: &ItemError) {
        self.observers.iter().for_each(|o| o.item_skipped(category, error));
    }

    fn item_over_price(&self, book: &ParsedBook, ceiling: f64) {
        self.observers.iter().for_each(|o| o.item_over_price(book, ceiling));
    }

    fn book_saved(&self, book: &Book) {
        self.observers.iter().for_each(|o| o.book_saved(book));
    }

    fn book_not_saved(&self, book: &Book) {
        self.observers.iter().for_each(|o| o.book_not_saved(book));
    }

    fn category_finished(&self, report: &CategoryReport) {
        self.observers.iter().for_each(|o| o.category_finished(report));
    }
}

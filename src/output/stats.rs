//! Scrape statistics collection and display

use crate::book::{Book, ParsedBook};
use crate::catalog::{Category, CategoryListing, CategoryReport, FetchFailure, ItemError};
use crate::output::ScrapeObserver;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Counting observer
#[derive(Debug, Default)]
pub struct ScrapeStats {
    categories_found: AtomicUsize,
    categories_crawled: AtomicUsize,
    pages_scanned: AtomicUsize,
    listings_seen: AtomicUsize,
    items_skipped: AtomicUsize,
    items_over_price: AtomicUsize,
    books_saved: AtomicUsize,
    books_not_saved: AtomicUsize,
    fetch_retries: AtomicUsize,
    fetch_failures: AtomicUsize,
}

/// Point-in-time copy of [`ScrapeStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub categories_found: usize,
    pub categories_crawled: usize,
    pub pages_scanned: usize,
    pub listings_seen: usize,
    pub items_skipped: usize,
    pub items_over_price: usize,
    pub books_saved: usize,
    pub books_not_saved: usize,
    pub fetch_retries: usize,
    pub fetch_failures: usize,
}

impl ScrapeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            categories_found: self.categories_found.load(Ordering::Relaxed),
            categories_crawled: self.categories_crawled.load(Ordering::Relaxed),
            pages_scanned: self.pages_scanned.load(Ordering::Relaxed),
            listings_seen: self.listings_seen.load(Ordering::Relaxed),
            items_skipped: self.items_skipped.load(Ordering::Relaxed),
            items_over_price: self.items_over_price.load(Ordering::Relaxed),
            books_saved: self.books_saved.load(Ordering::Relaxed),
            books_not_saved: self.books_not_saved.load(Ordering::Relaxed),
            fetch_retries: self.fetch_retries.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicUsize, by: usize) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl ScrapeObserver for ScrapeStats {
    fn categories_listed(&self, listing: &CategoryListing) {
        bump(&self.categories_found, listing.categories().len());
    }

    fn fetch_attempt_failed(&self, _url: &Url, attempt: u32, max_attempts: u32, _error: &str) {
        if attempt < max_attempts {
            bump(&self.fetch_retries, 1);
        }
    }

    fn fetch_gave_up(&self, _failure: &FetchFailure) {
        bump(&self.fetch_failures, 1);
    }

    fn page_scanned(&self, _category: &Category, _page: u32, _url: &Url, listings: usize) {
        bump(&self.pages_scanned, 1);
        bump(&self.listings_seen, listings);
    }

    fn item_skipped(&self, _category: &Category, _error: &ItemError) {
        bump(&self.items_skipped, 1);
    }

    fn item_over_price(&self, _book: &ParsedBook, _ceiling: f64) {
        bump(&self.items_over_price, 1);
    }

    fn book_saved(&self, _book: &Book) {
        bump(&self.books_saved, 1);
    }

    fn book_not_saved(&self, _book: &Book) {
        bump(&self.books_not_saved, 1);
    }

    fn category_finished(&self, _report: &CategoryReport) {
        bump(&self.categories_crawled, 1);
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &StatsSnapshot) {
    println!("=== Scrape Statistics ===\n");

    println!("Categories:");
    println!("  Found: {}", stats.categories_found);
    println!("  Crawled: {}", stats.categories_crawled);
    println!();

    println!("Pages:");
    println!("  Scanned: {}", stats.pages_scanned);
    println!("  Fetch retries: {}", stats.fetch_retries);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!();

    println!("Listings:");
    println!("  Seen: {}", stats.listings_seen);
    println!("  Unparseable: {}", stats.items_skipped);
    println!("  Over price: {}", stats.items_over_price);
    println!("  Saved: {}", stats.books_saved);
    if stats.books_not_saved > 0 {
        println!("  Not saved (store error): {}", stats.books_not_saved);
    }
}

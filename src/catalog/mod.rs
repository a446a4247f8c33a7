//! Catalog scraping pipeline
//!
//! This module contains the scrape path from the catalog root down to the
//! individual listings:
//! - [`PageFetcher`] requests pages with a fixed retry policy
//! - [`enumerate_categories`] reads the category sidebar
//! - [`parse_item`] turns one listing fragment into a book
//! - [`CategoryCrawler`] walks the pagination of one category
//! - [`Scraper`] runs every category in sequence

mod categories;
mod crawler;
mod fetcher;
mod item;
mod links;
mod orchestrator;
mod selectors;

pub use categories::{enumerate_categories, parse_categories, Category, CategoryListing};
pub use crawler::{
    parse_listing_page, CategoryCrawler, CategoryReport, CrawlLimits, CrawlStop, ListingPage,
};
pub use fetcher::{build_http_client, FetchFailure, FetchedPage, PageFetcher, RetryPolicy};
pub use item::{parse_item, parse_price, ItemError};
pub use links::{normalize_base, page_url, site_url};
pub use orchestrator::{ScrapeLimits, ScrapeReport, Scraper};

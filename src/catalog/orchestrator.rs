//! Scrape orchestrator
//!
//! Enumerates categories, skips the umbrella entry the sidebar lists first,
//! and crawls the rest one after another with a pause in between.

use crate::book::Book;
use crate::catalog::categories::{enumerate_categories, Category, CategoryListing};
use crate::catalog::crawler::{CategoryCrawler, CategoryReport, CrawlLimits};
use crate::catalog::fetcher::{build_http_client, PageFetcher, RetryPolicy};
use crate::catalog::links::normalize_base;
use crate::config::{Config, ScrapeConfig};
use crate::output::ScrapeObserver;
use crate::storage::BookStore;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Limits applied to a whole scrape run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrapeLimits {
    pub max_books_per_category: usize,
    pub max_price: f64,
    /// Pause between two categories
    pub category_pause: Duration,
}

impl Default for ScrapeLimits {
    fn default() -> Self {
        Self::from_config(&ScrapeConfig::default())
    }
}

impl ScrapeLimits {
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            max_books_per_category: config.max_books_per_category,
            max_price: config.max_price,
            category_pause: Duration::from_millis(config.category_pause_ms),
        }
    }

    fn crawl_limits(&self) -> CrawlLimits {
        CrawlLimits {
            max_books: self.max_books_per_category,
            max_price: self.max_price,
        }
    }
}

/// Everything one scrape run produced
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Outcome of the category enumeration
    pub listing: CategoryListing,
    /// The umbrella entry that was not crawled
    pub skipped_category: Option<Category>,
    /// One report per crawled category, in sidebar order
    pub categories: Vec<CategoryReport>,
}

impl ScrapeReport {
    /// Accepted books in category order then page order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.categories.iter().flat_map(|report| report.books.iter())
    }

    pub fn total_books(&self) -> usize {
        self.categories.iter().map(|report| report.books.len()).sum()
    }

    pub fn store_failures(&self) -> usize {
        self.categories.iter().map(|report| report.store_failures).sum()
    }

    /// Accepted books the store actually took
    pub fn stored_books(&self) -> usize {
        self.total_books().saturating_sub(self.store_failures())
    }

    pub fn into_books(self) -> Vec<Book> {
        self.categories
            .into_iter()
            .flat_map(|report| report.books)
            .collect()
    }
}

/// Runs full scrapes against one catalog
pub struct Scraper {
    base: Url,
    fetcher: Arc<PageFetcher>,
    crawler: CategoryCrawler,
    observer: Arc<dyn ScrapeObserver>,
}

impl Scraper {
    pub fn new(
        base: Url,
        fetcher: PageFetcher,
        store: Arc<BookStore>,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Self {
        let base = normalize_base(&base);
        let fetcher = Arc::new(fetcher);
        let crawler = CategoryCrawler::new(
            Arc::clone(&fetcher),
            store,
            base.clone(),
            Arc::clone(&observer),
        );

        Self {
            base,
            fetcher,
            crawler,
            observer,
        }
    }

    /// Builds a scraper with the HTTP client and retry policy from config
    pub fn from_config(
        config: &Config,
        store: Arc<BookStore>,
        observer: Arc<dyn ScrapeObserver>,
    ) -> crate::Result<Self> {
        let base = Url::parse(&config.catalog.base_url)?;
        let client = build_http_client(&config.user_agent, &config.fetch)?;
        let fetcher = PageFetcher::new(
            client,
            RetryPolicy::from_config(&config.fetch),
            Arc::clone(&observer),
        );

        Ok(Self::new(base, fetcher, store, observer))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Reads the category sidebar without crawling anything
    pub async fn list_categories(&self) -> CategoryListing {
        let listing = enumerate_categories(&self.fetcher, &self.base).await;
        self.observer.categories_listed(&listing);
        listing
    }

    /// Runs one full scrape
    ///
    /// Categories are crawled sequentially. A category that fails midway
    /// keeps the books it accepted and the run moves on to the next one.
    pub async fn run(&self, limits: &ScrapeLimits) -> ScrapeReport {
        let listing = self.list_categories().await;

        let mut targets: Vec<Category> = listing.categories().to_vec();
        // The first sidebar entry is the umbrella over every other category
        let skipped_category = if targets.is_empty() {
            None
        } else {
            Some(targets.remove(0))
        };

        let crawl_limits = limits.crawl_limits();
        let mut categories = Vec::with_capacity(targets.len());
        for (index, category) in targets.iter().enumerate() {
            if index > 0 && !limits.category_pause.is_zero() {
                tokio::time::sleep(limits.category_pause).await;
            }
            categories.push(self.crawler.crawl(category, &crawl_limits).await);
        }

        ScrapeReport {
            listing,
            skipped_category,
            categories,
        }
    }
}

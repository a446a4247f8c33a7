//! Category crawler
//!
//! Walks the pagination of one category, parsing every listing, keeping the
//! ones within the price ceiling and writing each of them to the store as
//! soon as it is accepted.

use crate::book::{Book, ParsedBook};
use crate::catalog::categories::Category;
use crate::catalog::fetcher::{FetchFailure, PageFetcher};
use crate::catalog::item::{parse_item, ItemError};
use crate::catalog::links::page_url;
use crate::catalog::selectors;
use crate::output::ScrapeObserver;
use crate::storage::BookStore;
use chrono::Utc;
use scraper::Html;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Per-category limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlLimits {
    /// Maximum number of accepted books
    pub max_books: usize,
    /// Inclusive price ceiling
    pub max_price: f64,
}

/// Why a category crawl ended
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlStop {
    /// The per-category cap was reached
    CapReached,
    /// The last page had no next-page marker
    LastPage,
    /// A page had a product grid without listings
    Empty,
    /// A page had neither product grid nor listings
    StructureMismatch,
    /// A page could not be fetched
    FetchFailed(FetchFailure),
    /// The category URL has no `index.html` to substitute for page 2
    PaginationUnsupported,
}

impl fmt::Display for CrawlStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapReached => write!(f, "cap reached"),
            Self::LastPage => write!(f, "no more pages"),
            Self::Empty => write!(f, "page has no listings"),
            Self::StructureMismatch => write!(f, "page has no product grid"),
            Self::FetchFailed(failure) => write!(f, "{}", failure),
            Self::PaginationUnsupported => write!(f, "category URL cannot be paginated"),
        }
    }
}

/// Result of crawling one category
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category: Category,
    /// Accepted books in crawl order
    pub books: Vec<Book>,
    /// Pages fetched successfully
    pub pages: u32,
    /// Listings that could not be parsed
    pub skipped: usize,
    /// Listings priced above the ceiling
    pub over_price: usize,
    /// Accepted books the store did not take
    pub store_failures: usize,
    pub stop: CrawlStop,
}

/// The parsed content of one listing page
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// One entry per listing fragment, in page order
    pub items: Vec<Result<ParsedBook, ItemError>>,
    /// Whether the product grid container exists
    pub grid_present: bool,
    /// Whether the next-page marker exists
    pub has_next: bool,
}

/// Extracts every listing of a page along with the pagination marker
pub fn parse_listing_page(document: &Html, category: &str, base: &Url) -> ListingPage {
    let items = document
        .select(&selectors::LISTING)
        .map(|listing| parse_item(listing, category, base))
        .collect();

    ListingPage {
        items,
        grid_present: document.select(&selectors::PRODUCT_GRID).next().is_some(),
        has_next: document.select(&selectors::NEXT_PAGE).next().is_some(),
    }
}

/// Crawls one category at a time
pub struct CategoryCrawler {
    fetcher: Arc<PageFetcher>,
    store: Arc<BookStore>,
    base: Url,
    observer: Arc<dyn ScrapeObserver>,
}

impl CategoryCrawler {
    pub fn new(
        fetcher: Arc<PageFetcher>,
        store: Arc<BookStore>,
        base: Url,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Self {
        Self {
            fetcher,
            store,
            base,
            observer,
        }
    }

    /// Crawls a category until the cap, the last page, or a failure
    ///
    /// Never fails: every way a crawl can end is recorded in
    /// [`CategoryReport::stop`] and the books accepted so far are kept.
    pub async fn crawl(&self, category: &Category, limits: &CrawlLimits) -> CategoryReport {
        self.observer.category_started(category);

        let mut report = CategoryReport {
            category: category.clone(),
            books: Vec::new(),
            pages: 0,
            skipped: 0,
            over_price: 0,
            store_failures: 0,
            stop: CrawlStop::CapReached,
        };

        let mut page = 1;
        report.stop = loop {
            if report.books.len() >= limits.max_books {
                break CrawlStop::CapReached;
            }

            let Some(url) = page_url(&category.url, page) else {
                break CrawlStop::PaginationUnsupported;
            };

            let fetched = match self.fetcher.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(failure) => break CrawlStop::FetchFailed(failure),
            };

            let listing = parse_listing_page(&fetched.document(), &category.name, &self.base);
            report.pages = page;
            self.observer
                .page_scanned(category, page, &url, listing.items.len());

            if listing.items.is_empty() {
                break if listing.grid_present {
                    CrawlStop::Empty
                } else {
                    CrawlStop::StructureMismatch
                };
            }

            if self.accept_items(category, listing.items, limits, &mut report) {
                break CrawlStop::CapReached;
            }

            if !listing.has_next {
                break CrawlStop::LastPage;
            }

            page += 1;
        };

        self.observer.category_finished(&report);
        report
    }

    /// Filters and persists the listings of one page
    ///
    /// Returns true once the cap is reached; the remaining listings of the
    /// page are left untouched.
    fn accept_items(
        &self,
        category: &Category,
        items: Vec<Result<ParsedBook, ItemError>>,
        limits: &CrawlLimits,
        report: &mut CategoryReport,
    ) -> bool {
        for item in items {
            if report.books.len() >= limits.max_books {
                return true;
            }

            match item {
                Err(e) => {
                    report.skipped += 1;
                    self.observer.item_skipped(category, &e);
                }
                Ok(parsed) if !parsed.within_price(limits.max_price) => {
                    report.over_price += 1;
                    self.observer.item_over_price(&parsed, limits.max_price);
                }
                Ok(parsed) => {
                    let book = parsed.into_book(Utc::now());
                    if self.store.set_book(&book) {
                        self.observer.book_saved(&book);
                    } else {
                        report.store_failures += 1;
                        self.observer.book_not_saved(&book);
                    }
                    report.books.push(book);
                }
            }
        }

        report.books.len() >= limits.max_books
    }
}

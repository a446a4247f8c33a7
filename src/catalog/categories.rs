//! Category enumeration from the catalog sidebar

use crate::catalog::fetcher::{FetchFailure, PageFetcher};
use crate::catalog::links::site_url;
use crate::catalog::selectors;
use scraper::Html;
use std::fmt;
use url::Url;

/// A navigable catalog category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: Url,
}

/// Outcome of reading the category sidebar
///
/// An empty sidebar and a missing sidebar are kept apart: the first is a
/// legitimately empty catalog, the second usually means the site layout
/// changed.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryListing {
    /// Categories in sidebar order
    Found(Vec<Category>),
    /// The sidebar exists but holds no usable link
    Empty,
    /// No sidebar on the root page
    StructureMismatch,
    /// The root page could not be fetched
    Unavailable(FetchFailure),
}

impl CategoryListing {
    /// The categories found, empty for every other outcome
    pub fn categories(&self) -> &[Category] {
        match self {
            Self::Found(categories) => categories,
            _ => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for CategoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(categories) => write!(f, "found {} categories", categories.len()),
            Self::Empty => write!(f, "category sidebar is empty"),
            Self::StructureMismatch => write!(f, "category sidebar not found"),
            Self::Unavailable(failure) => write!(f, "root page unavailable: {}", failure),
        }
    }
}

/// Extracts every category link from the sidebar of a parsed root page
///
/// # Arguments
///
/// * `document` - The parsed root page
/// * `base` - Catalog root used to resolve the relative links
pub fn parse_categories(document: &Html, base: &Url) -> CategoryListing {
    let Some(sidebar) = document.select(&selectors::SIDEBAR).next() else {
        return CategoryListing::StructureMismatch;
    };

    let mut categories = Vec::new();
    for link in sidebar.select(&selectors::SIDEBAR_LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let name = link.text().collect::<String>().trim().to_string();
        match site_url(base, href) {
            Ok(url) => categories.push(Category { name, url }),
            Err(e) => tracing::warn!("Skipping category {} with bad link {:?}: {}", name, href, e),
        }
    }

    if categories.is_empty() {
        CategoryListing::Empty
    } else {
        CategoryListing::Found(categories)
    }
}

/// Fetches the catalog root page and reads its category sidebar
pub async fn enumerate_categories(fetcher: &PageFetcher, base: &Url) -> CategoryListing {
    match fetcher.fetch(base).await {
        Ok(page) => parse_categories(&page.document(), base),
        Err(failure) => CategoryListing::Unavailable(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://books.toscrape.com").unwrap()
    }

    const ROOT_PAGE: &str = r#"
        <html><body>
        <div class="side_categories">
            <ul class="nav nav-list">
                <li>
                    <a href="catalogue/category/books_1/index.html">
                        Books
                    </a>
                    <ul>
                        <li><a href="catalogue/category/books/travel_2/index.html">
                            Travel
                        </a></li>
                        <li><a href="catalogue/category/books/mystery_3/index.html">
                            Mystery
                        </a></li>
                    </ul>
                </li>
            </ul>
        </div>
        <a href="elsewhere.html">Not a category</a>
        </body></html>
    "#;

    #[test]
    fn test_parse_categories_in_order() {
        let document = Html::parse_document(ROOT_PAGE);
        let listing = parse_categories(&document, &base());

        let names: Vec<&str> = listing.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Travel", "Mystery"]);
        assert_eq!(
            listing.categories()[2].url.as_str(),
            "https://books.toscrape.com/catalogue/category/books/mystery_3/index.html"
        );
    }

    #[test]
    fn test_parent_segments_are_stripped() {
        let html = r#"<div class="side_categories">
            <a href="../books/poetry_23/index.html">Poetry</a>
        </div>"#;
        let listing = parse_categories(&Html::parse_document(html), &base());
        assert_eq!(
            listing.categories()[0].url.as_str(),
            "https://books.toscrape.com/books/poetry_23/index.html"
        );
    }

    #[test]
    fn test_links_without_href_are_ignored() {
        let html = r#"<div class="side_categories">
            <a name="anchor">Anchor</a>
            <a href="books/poetry_23/index.html">Poetry</a>
        </div>"#;
        let listing = parse_categories(&Html::parse_document(html), &base());
        assert_eq!(listing.categories().len(), 1);
    }

    #[test]
    fn test_missing_sidebar_is_structure_mismatch() {
        let html = r#"<html><body><a href="books/index.html">Books</a></body></html>"#;
        let listing = parse_categories(&Html::parse_document(html), &base());
        assert_eq!(listing, CategoryListing::StructureMismatch);
        assert!(listing.categories().is_empty());
    }

    #[test]
    fn test_empty_sidebar() {
        let html = r#"<div class="side_categories"><ul></ul></div>"#;
        let listing = parse_categories(&Html::parse_document(html), &base());
        assert_eq!(listing, CategoryListing::Empty);
        assert!(!listing.is_found());
    }

    #[test]
    fn test_display() {
        assert_eq!(CategoryListing::Empty.to_string(), "category sidebar is empty");
        assert_eq!(
            CategoryListing::Found(vec![]).to_string(),
            "found 0 categories"
        );
    }
}

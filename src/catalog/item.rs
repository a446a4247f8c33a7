//! Listing fragment parser
//!
//! Turns one `article.product_pod` into a [`ParsedBook`]. The category is
//! handed in by the caller; the fragment itself is never read for it.

use crate::book::ParsedBook;
use crate::catalog::links::site_url;
use crate::catalog::selectors;
use scraper::ElementRef;
use thiserror::Error;
use url::Url;

/// Why a single listing was skipped
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ItemError {
    #[error("listing has no title")]
    MissingTitle,

    #[error("listing '{title}' has no price")]
    MissingPrice { title: String },

    #[error("listing '{title}' has an unreadable price {raw:?}")]
    InvalidPrice { title: String, raw: String },

    #[error("listing '{title}' has an unresolvable image path {src:?}")]
    InvalidImage { title: String, src: String },
}

/// Parses a price such as `£51.77`
///
/// Everything before the first ASCII digit or `.` is the currency prefix and
/// is stripped. This covers both `£` and the `Â£` form produced when the
/// page is decoded as Latin-1. A sign in the prefix is rejected, and the
/// amount itself must be plain digits with at most one `.`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let start = trimmed.find(|c: char| c.is_ascii_digit() || c == '.')?;
    let (prefix, amount) = trimmed.split_at(start);
    if prefix.contains(['-', '+']) {
        return None;
    }

    let plain = amount.chars().all(|c| c.is_ascii_digit() || c == '.')
        && amount.matches('.').count() <= 1
        && amount.contains(|c: char| c.is_ascii_digit());
    if !plain {
        return None;
    }

    let price: f64 = amount.parse().ok()?;
    price.is_finite().then_some(price)
}

/// Parses one listing fragment
///
/// # Arguments
///
/// * `listing` - The `article.product_pod` element
/// * `category` - Category label of the page being crawled
/// * `base` - Catalog root, used to resolve the image path
///
/// # Returns
///
/// * `Ok(ParsedBook)` - Title, price, image URL and the given category
/// * `Err(ItemError)` - The fragment lacks a required part
pub fn parse_item(
    listing: ElementRef<'_>,
    category: &str,
    base: &Url,
) -> Result<ParsedBook, ItemError> {
    let title = listing
        .select(&selectors::TITLE_LINK)
        .next()
        .and_then(|link| link.value().attr("title"))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ItemError::MissingTitle)?
        .to_string();

    let raw_price: String = listing
        .select(&selectors::PRICE)
        .next()
        .map(|element| element.text().collect())
        .ok_or_else(|| ItemError::MissingPrice {
            title: title.clone(),
        })?;

    let price = parse_price(&raw_price).ok_or_else(|| ItemError::InvalidPrice {
        title: title.clone(),
        raw: raw_price.trim().to_string(),
    })?;

    let image_url = match listing
        .select(&selectors::IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
    {
        Some(src) => site_url(base, src)
            .map(|url| url.to_string())
            .map_err(|_| ItemError::InvalidImage {
                title: title.clone(),
                src: src.to_string(),
            })?,
        None => String::new(),
    };

    Ok(ParsedBook {
        title,
        price,
        category: category.to_string(),
        image_url,
    })
}

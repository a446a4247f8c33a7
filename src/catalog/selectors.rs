//! CSS selectors for the catalog markup
//!
//! These encode the structural conventions of the catalog site. Update this
//! file when the site changes its HTML.

use scraper::Selector;
use std::sync::LazyLock;

fn parse(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {:?}: {:?}", css, e))
}

/// Sidebar container listing every category
pub static SIDEBAR: LazyLock<Selector> = LazyLock::new(|| parse("div.side_categories"));

/// Category links inside the sidebar
pub static SIDEBAR_LINK: LazyLock<Selector> = LazyLock::new(|| parse("a"));

/// Product grid of a listing page
pub static PRODUCT_GRID: LazyLock<Selector> = LazyLock::new(|| parse("ol.row"));

/// One listing fragment
pub static LISTING: LazyLock<Selector> = LazyLock::new(|| parse("article.product_pod"));

/// Title link of a listing; the full title is in its `title` attribute
pub static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| parse("h3 > a"));

/// Price element of a listing
pub static PRICE: LazyLock<Selector> = LazyLock::new(|| parse("p.price_color"));

/// Cover image of a listing
pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| parse("img"));

/// Present only when a further page exists
pub static NEXT_PAGE: LazyLock<Selector> = LazyLock::new(|| parse("li.next"));

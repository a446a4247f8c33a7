//! URL conventions of the catalog site
//!
//! Relative paths on the site climb with `../` from wherever the page lives.
//! Every such path is anchored at the catalog root, so the climbing segments
//! are dropped and the rest is joined to the root.

use url::Url;

/// Returns `base` with a trailing slash so it joins as a directory
pub fn normalize_base(base: &Url) -> Url {
    if base.path().ends_with('/') {
        return base.clone();
    }

    let mut normalized = base.clone();
    let path = format!("{}/", base.path());
    normalized.set_path(&path);
    normalized
}

/// Resolves a site-relative href against the catalog root
///
/// Every literal `../` is removed before joining.
///
/// # Example
///
/// ```
/// use shelf_scraper::catalog::site_url;
/// use url::Url;
///
/// let base = Url::parse("https://books.toscrape.com").unwrap();
/// let url = site_url(&base, "../../media/cache/2c/da/cover.jpg").unwrap();
/// assert_eq!(url.as_str(), "https://books.toscrape.com/media/cache/2c/da/cover.jpg");
/// ```
pub fn site_url(base: &Url, href: &str) -> Result<Url, url::ParseError> {
    let cleaned = href.trim().replace("../", "");
    normalize_base(base).join(cleaned.trim_start_matches('/'))
}

/// Returns the URL of page `page` of a category
///
/// Page 1 is the category URL itself. Later pages replace a trailing
/// `index.html` with `page-<n>.html`; a URL without that segment cannot be
/// paginated and yields `None`.
pub fn page_url(category_url: &Url, page: u32) -> Option<Url> {
    if page <= 1 {
        return Some(category_url.clone());
    }

    let prefix = category_url.path().strip_suffix("index.html")?;
    let mut url = category_url.clone();
    let path = format!("{}page-{}.html", prefix, page);
    url.set_path(&path);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://books.toscrape.com").unwrap()
    }

    #[test]
    fn test_normalize_base_adds_slash() {
        let url = Url::parse("http://127.0.0.1:8080/shop").unwrap();
        assert_eq!(normalize_base(&url).as_str(), "http://127.0.0.1:8080/shop/");

        let root = base();
        assert_eq!(normalize_base(&root).as_str(), "https://books.toscrape.com/");
    }

    #[test]
    fn test_site_url_strips_parent_segments() {
        let url = site_url(&base(), "../books/travel_2/index.html").unwrap();
        assert_eq!(
            url.as_str(),
            "https://books.toscrape.com/books/travel_2/index.html"
        );
    }

    #[test]
    fn test_site_url_plain_relative_path() {
        let url = site_url(&base(), "catalogue/category/books_1/index.html").unwrap();
        assert_eq!(
            url.as_str(),
            "https://books.toscrape.com/catalogue/category/books_1/index.html"
        );
    }

    #[test]
    fn test_site_url_keeps_base_path() {
        let base = Url::parse("http://127.0.0.1:9000/mirror").unwrap();
        let url = site_url(&base, "/media/cover.jpg").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mirror/media/cover.jpg");
    }

    #[test]
    fn test_page_url_first_page_is_category_url() {
        let url = Url::parse("https://books.toscrape.com/catalogue/category/books/mystery_3/index.html")
            .unwrap();
        assert_eq!(page_url(&url, 1), Some(url.clone()));
    }

    #[test]
    fn test_page_url_substitutes_filename() {
        let url = Url::parse("https://books.toscrape.com/catalogue/category/books/mystery_3/index.html")
            .unwrap();
        assert_eq!(
            page_url(&url, 2).unwrap().as_str(),
            "https://books.toscrape.com/catalogue/category/books/mystery_3/page-2.html"
        );
        assert_eq!(
            page_url(&url, 12).unwrap().as_str(),
            "https://books.toscrape.com/catalogue/category/books/mystery_3/page-12.html"
        );
    }

    #[test]
    fn test_page_url_without_index_segment() {
        let url = Url::parse("https://books.toscrape.com/catalogue/category/books/mystery_3/").unwrap();
        assert_eq!(page_url(&url, 2), None);
    }
}

use serde::Deserialize;

/// Main configuration structure for Shelf-Scraper
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub scrape: ScrapeConfig,
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
}

/// Catalog site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Root URL of the catalog; its sidebar lists every category
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://books.toscrape.com".to_string(),
        }
    }
}

/// Scrape limits and pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Maximum number of accepted books per category
    #[serde(rename = "max-books-per-category")]
    pub max_books_per_category: usize,

    /// Price ceiling (inclusive)
    #[serde(rename = "max-price")]
    pub max_price: f64,

    /// Pause between two categories (milliseconds)
    #[serde(rename = "category-pause-ms")]
    pub category_pause_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_books_per_category: 20,
            max_price: 20.0,
            category_pause_ms: 1000,
        }
    }
}

/// Page fetch behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total number of attempts per page
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between two attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 2000,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ShelfScraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Which key-value backend holds the books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
    Redis,
}

/// Key-value store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Namespace prefix of every book key
    #[serde(rename = "key-prefix")]
    pub key_prefix: String,

    /// Path to the SQLite database file (sqlite backend)
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Redis host (redis backend, overridden by `REDIS_HOST`)
    #[serde(rename = "redis-host")]
    pub redis_host: String,

    /// Redis port (redis backend, overridden by `REDIS_PORT`)
    #[serde(rename = "redis-port")]
    pub redis_port: u16,

    /// Connect timeout for network backends (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            key_prefix: "book:".to_string(),
            database_path: "./books.db".to_string(),
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            connect_timeout_secs: 3,
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API listens on
    #[serde(rename = "bind-addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

use crate::config::types::{
    CatalogConfig, Config, FetchConfig, ScrapeConfig, ServerConfig, StoreBackend, StoreConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_catalog_config(&config.catalog)?;
    validate_scrape_config(&config.scrape)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_store_config(&config.store)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates the catalog root URL
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates scrape limits
fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.max_books_per_category < 1 {
        return Err(ConfigError::Validation(format!(
            "max-books-per-category must be >= 1, got {}",
            config.max_books_per_category
        )));
    }

    if !config.max_price.is_finite() || config.max_price < 0.0 {
        return Err(ConfigError::Validation(format!(
            "max-price must be a non-negative number, got {}",
            config.max_price
        )));
    }

    Ok(())
}

/// Validates fetch retry settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates key-value store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.key_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "key-prefix cannot be empty".to_string(),
        ));
    }

    // Every character SCAN MATCH treats as a pattern metacharacter
    if config.key_prefix.contains(['*', '?', '[', ']', '\\']) {
        return Err(ConfigError::Validation(format!(
            "key-prefix '{}' must not contain glob characters",
            config.key_prefix
        )));
    }

    match config.backend {
        StoreBackend::Sqlite if config.database_path.is_empty() => Err(
            ConfigError::Validation("database-path cannot be empty".to_string()),
        ),
        StoreBackend::Redis if config.redis_host.is_empty() => Err(ConfigError::Validation(
            "redis-host cannot be empty".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Validates the API listen address
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_addr.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind-addr '{}': {}", config.bind_addr, e))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.catalog.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.catalog.base_url = "ftp://books.example.com".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_books_per_category() {
        let mut config = Config::default();
        config.scrape.max_books_per_category = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_negative_or_nan_price() {
        let mut config = Config::default();
        config.scrape.max_price = -1.0;
        assert!(validate(&config).is_err());

        config.scrape.max_price = f64::NAN;
        assert!(validate(&config).is_err());

        config.scrape.max_price = 0.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_retries() {
        let mut config = Config::default();
        config.fetch.max_retries = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_characters() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "Shelf Scraper".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "Shelf-Scraper".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_key_prefix_rules() {
        let mut config = Config::default();
        config.store.key_prefix = String::new();
        assert!(validate(&config).is_err());

        config.store.key_prefix = "book*".to_string();
        assert!(validate(&config).is_err());

        for prefix in ["book]", "book\\:", "b[o]ok:", "book?"] {
            config.store.key_prefix = prefix.to_string();
            assert!(
                matches!(validate(&config), Err(ConfigError::Validation(_))),
                "{:?} should be rejected",
                prefix
            );
        }

        config.store.key_prefix = "shelf:book:".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_backend_specific_fields() {
        let mut config = Config::default();
        config.store.database_path = String::new();
        assert!(validate(&config).is_err());

        // Path is irrelevant for the memory backend
        config.store.backend = StoreBackend::Memory;
        assert!(validate(&config).is_ok());

        config.store.backend = StoreBackend::Redis;
        config.store.redis_host = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bind_addr() {
        let mut config = Config::default();
        config.server.bind_addr = "localhost".to_string();
        assert!(validate(&config).is_err());
    }
}

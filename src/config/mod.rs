//! Configuration module for Shelf-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the environment overrides for deployment-specific settings.
//!
//! # Example
//!
//! ```no_run
//! use shelf_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shelf.toml")).unwrap();
//! println!("Price ceiling: {}", config.scrape.max_price);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogConfig, Config, FetchConfig, ScrapeConfig, ServerConfig, StoreBackend, StoreConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, apply_overrides_from, load_config, load_or_default, ENV_BIND_ADDR,
    ENV_DATABASE_PATH, ENV_REDIS_HOST, ENV_REDIS_PORT,
};
pub use validation::validate;

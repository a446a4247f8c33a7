use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variables that override file settings
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";
pub const ENV_DATABASE_PATH: &str = "SHELF_DATABASE_PATH";
pub const ENV_BIND_ADDR: &str = "SHELF_BIND_ADDR";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied after parsing and before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use shelf_scraper::config::load_config;
///
/// let config = load_config(Path::new("shelf.toml")).unwrap();
/// println!("Max price: {}", config.scrape.max_price);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration file if one is given, otherwise the defaults
///
/// Environment overrides apply in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = Config::default();
            apply_env_overrides(&mut config)?;
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Applies overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

/// Applies overrides looked up through `lookup`
///
/// Split out from [`apply_env_overrides`] so tests do not have to touch the
/// process environment.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_REDIS_HOST) {
        config.store.redis_host = host;
    }

    if let Some(port) = lookup(ENV_REDIS_PORT) {
        config.store.redis_port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_REDIS_PORT,
            message: format!("'{}' is not a valid port", port),
        })?;
    }

    if let Some(path) = lookup(ENV_DATABASE_PATH) {
        config.store.database_path = path;
    }

    if let Some(addr) = lookup(ENV_BIND_ADDR) {
        config.server.bind_addr = addr;
    }

    Ok(())
}

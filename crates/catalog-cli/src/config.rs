//! Configuration loaded from environment variables.

use std::env;

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:catalogo_veiculos.db?mode=rwc";

/// Catalog CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database URL.
    pub database_url: String,
    /// Connection pool size.
    pub pool_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CATALOG_DATABASE_URL` | SQLite database URL | `sqlite:catalogo_veiculos.db?mode=rwc` |
    /// | `CATALOG_POOL_SIZE` | Connection pool size | `1` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("CATALOG_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let pool_size = parse_pool_size(env::var("CATALOG_POOL_SIZE").ok().as_deref())?;

        Ok(Self {
            database_url,
            pool_size,
        })
    }
}

fn parse_pool_size(value: Option<&str>) -> Result<u32, ConfigError> {
    match value {
        None => Ok(catalog_db::Database::DEFAULT_POOL_SIZE),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidPoolSize(raw.to_string())),
        },
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CATALOG_POOL_SIZE must be a positive integer, got '{0}'")]
    InvalidPoolSize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_defaults_to_one() {
        assert_eq!(parse_pool_size(None).unwrap(), 1);
    }

    #[test]
    fn test_pool_size_parses() {
        assert_eq!(parse_pool_size(Some("4")).unwrap(), 4);
        assert_eq!(parse_pool_size(Some(" 2 ")).unwrap(), 2);
    }

    #[test]
    fn test_pool_size_rejects_garbage() {
        assert!(matches!(parse_pool_size(Some("0")), Err(ConfigError::InvalidPoolSize(_))));
        assert!(matches!(parse_pool_size(Some("-1")), Err(ConfigError::InvalidPoolSize(_))));
        assert!(matches!(parse_pool_size(Some("many")), Err(ConfigError::InvalidPoolSize(_))));
    }
}

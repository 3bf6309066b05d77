use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use quill_observability::LogFormat;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; in-memory stores when absent.
    pub database_url: Option<String>,
    pub log_format: LogFormat,
    pub seed_data: bool,
    pub default_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: None,
            log_format: LogFormat::default(),
            seed_data: true,
            default_page_size: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // .env is optional (development)
        let _ = dotenv();
        let defaults = Self::default();

        Ok(Self {
            bind_addr: match env::var("BIND_ADDR") {
                Ok(raw) => raw.parse().context("BIND_ADDR must be a socket address")?,
                Err(_) => defaults.bind_addr,
            },
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            log_format: match env::var("LOG_FORMAT") {
                Ok(raw) => raw
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("LOG_FORMAT must be `json` or `pretty`")?,
                Err(_) => defaults.log_format,
            },
            seed_data: match env::var("SEED_DATA") {
                Ok(raw) => parse_bool(&raw).context("SEED_DATA must be a boolean")?,
                Err(_) => defaults.seed_data,
            },
            default_page_size: match env::var("DEFAULT_PAGE_SIZE") {
                Ok(raw) => raw
                    .parse()
                    .context("DEFAULT_PAGE_SIZE must be a positive integer")?,
                Err(_) => defaults.default_page_size,
            },
        })
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised boolean `{other}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_flags_accept_common_spellings() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool(" 1 ").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn defaults_use_in_memory_stores_with_seed() {
        let config = Config::default();
        assert!(config.database_url.is_none());
        assert!(config.seed_data);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.bind_addr.port(), 8080);
    }
}

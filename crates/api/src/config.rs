//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Which content backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Fixed placeholder content; no external calls.
    Mock,
    /// LLM-backed generation (see `llm-content` for its variables).
    Llm,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Content backend selection.
    pub generator: GeneratorKind,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GIDEON_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:gideon.db?mode=rwc` |
    /// | `GENERATOR` | Content backend: `mock` or `llm` | `mock` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("GIDEON_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:gideon.db?mode=rwc".to_string());

        let generator = match env::var("GENERATOR").as_deref() {
            Err(_) | Ok("mock") => GeneratorKind::Mock,
            Ok("llm") => GeneratorKind::Llm,
            Ok(other) => return Err(ConfigError::InvalidGenerator(other.to_string())),
        };

        Ok(Self {
            addr,
            database_url,
            generator,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid GIDEON_ADDR format")]
    InvalidAddr,

    #[error("Invalid GENERATOR value: {0} (expected 'mock' or 'llm')")]
    InvalidGenerator(String),
}

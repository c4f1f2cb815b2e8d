//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::ingest::patterns::KeywordTable;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 3000,
        }
    }
}

/// Where the workbook comes from and how often it is re-read
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// File path or http(s) URL
    pub workbook: String,
    pub fetch_timeout: Duration,
    /// `None` disables the background refresh
    pub refresh_interval: Option<Duration>,
    /// JSON file replacing the built-in keyword table
    pub keyword_patterns: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            workbook: "data/tpaf.xlsx".to_string(),
            fetch_timeout: Duration::from_secs(30),
            refresh_interval: Some(Duration::from_secs(300)),
            keyword_patterns: None,
        }
    }
}

impl SourceConfig {
    /// Keyword table from the configured patterns file, or the built-in one
    pub fn keyword_table(&self) -> Result<KeywordTable, ConfigError> {
        let Some(path) = &self.keyword_patterns else {
            return Ok(KeywordTable::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        KeywordTable::from_json(&json)
            .map_err(|e| ConfigError::InvalidValue(format!("{}: {}", path.display(), e)))
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub cors: CorsConfig,
}

impl Settings {
    /// Load settings from `.env` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let defaults = SourceConfig::default();
        let refresh_secs = parse_secs(&lookup, "TPAF_REFRESH_SECS")?;
        let source = SourceConfig {
            workbook: lookup("TPAF_WORKBOOK")
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .unwrap_or(defaults.workbook),
            fetch_timeout: match parse_secs(&lookup, "TPAF_FETCH_TIMEOUT_SECS")? {
                Some(0) => {
                    return Err(ConfigError::InvalidValue(
                        "TPAF_FETCH_TIMEOUT_SECS must be greater than 0".to_string(),
                    ))
                }
                Some(secs) => Duration::from_secs(secs),
                None => defaults.fetch_timeout,
            },
            refresh_interval: match refresh_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.refresh_interval,
            },
            keyword_patterns: lookup("TPAF_KEYWORD_PATTERNS")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        Ok(Self {
            server,
            source,
            cors,
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(format!("{} must be a whole number of seconds, got '{}'", key, raw))
            })
        })
        .transpose()
}

//! API Configuration Module
//!
//! Server, conditional-resource and CORS settings. Configuration is loaded
//! from environment variables with development defaults.

use std::net::SocketAddr;
use std::time::Duration;

use etagd_core::{DEFAULT_REFRESH_WINDOW, DEFAULT_VALIDATOR_HEX_LEN, MAX_VALIDATOR_HEX_LEN};

use crate::error::{ApiError, ApiResult};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4000;

/// Largest response body buffered for validator generation (1MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Server
    // ========================================================================
    /// Host to bind.
    pub bind_host: String,

    /// Port to bind.
    pub port: u16,

    /// Environment label (development, staging, production).
    pub environment: String,

    pub log_format: LogFormat,

    // ========================================================================
    // Conditional resource
    // ========================================================================
    /// Freshness window of the resource's time-derived default.
    pub refresh_window: Duration,

    /// Hex characters kept in generated validators.
    pub validator_hex_len: usize,

    /// Largest response body buffered for hashing.
    pub max_body_bytes: usize,

    // ========================================================================
    // CORS
    // ========================================================================
    /// Allowed CORS origins. Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            log_format: LogFormat::Json,

            refresh_window: DEFAULT_REFRESH_WINDOW,
            validator_hex_len: DEFAULT_VALIDATOR_HEX_LEN,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,

            cors_origins: Vec::new(),
            cors_max_age_secs: 86400,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `ETAGD_BIND`: Host to bind (default: 0.0.0.0)
    /// - `PORT` or `ETAGD_PORT`: Port to bind (default: 4000)
    /// - `ETAGD_ENVIRONMENT`: Environment label (default: development)
    /// - `ETAGD_LOG_FORMAT`: "json" or "pretty" (default: json)
    /// - `ETAGD_REFRESH_SECS`: Freshness window in seconds (default: 120)
    /// - `ETAGD_VALIDATOR_HEX_LEN`: Validator length, 8..=64 (default: 8)
    /// - `ETAGD_MAX_BODY_BYTES`: Hashing buffer limit (default: 1048576)
    /// - `ETAGD_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `ETAGD_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    ///
    /// Unparseable values fall back to their defaults. The bind host is
    /// validated by [`ApiConfig::bind_addr`].
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_host = std::env::var("ETAGD_BIND").unwrap_or(defaults.bind_host);

        let port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("ETAGD_PORT").ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let environment = std::env::var("ETAGD_ENVIRONMENT").unwrap_or(defaults.environment);

        let log_format = match std::env::var("ETAGD_LOG_FORMAT")
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Ok("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        let refresh_window = std::env::var("ETAGD_REFRESH_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.refresh_window);

        let validator_hex_len = std::env::var("ETAGD_VALIDATOR_HEX_LEN")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .map(|len| len.clamp(DEFAULT_VALIDATOR_HEX_LEN, MAX_VALIDATOR_HEX_LEN))
            .unwrap_or(defaults.validator_hex_len);

        let max_body_bytes = std::env::var("ETAGD_MAX_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_body_bytes);

        let cors_origins = std::env::var("ETAGD_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("ETAGD_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        Self {
            bind_host,
            port,
            environment,
            log_format,
            refresh_window,
            validator_hex_len,
            max_body_bytes,
            cors_origins,
            cors_max_age_secs,
        }
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        matches!(self.environment.to_lowercase().as_str(), "production" | "prod")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

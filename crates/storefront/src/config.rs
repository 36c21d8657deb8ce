//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VITRINE_API_BASE_URL` - Absolute base URL of the products API
//!
//! ## Optional
//! - `VITRINE_API_TRANSPORT` - Write payload encoding, `json` or `multipart` (default: json)
//! - `VITRINE_BASE_PATH` - Path the router is mounted under (default: /)

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::router::normalize_base;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid base URL {0}: {1}")]
    InvalidUrl(String, String),
}

/// How product writes are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Transport {
    /// `application/json` bodies. Images are sent as references.
    #[default]
    Json,
    /// `multipart/form-data` bodies with binary image upload.
    Multipart,
}

impl Transport {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Multipart => "multipart",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "multipart" | "form-data" => Ok(Self::Multipart),
            other => Err(format!("invalid transport: {other} (expected json or multipart)")),
        }
    }
}

/// Products API client configuration. Immutable once a client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL that `/products` is appended to.
    pub base_url: Url,
    pub transport: Transport,
}

impl ApiConfig {
    #[must_use]
    pub const fn new(base_url: Url, transport: Transport) -> Self {
        Self {
            base_url,
            transport,
        }
    }

    /// Parse `base_url` and build a configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` is not an absolute
    /// URL that can carry a path.
    pub fn parse(base_url: &str, transport: Transport) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(
                base_url.to_string(),
                "URL cannot carry a path".to_string(),
            ));
        }
        Ok(Self::new(url, transport))
    }

    /// Load the products API configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `VITRINE_API_BASE_URL` is missing or invalid,
    /// or `VITRINE_API_TRANSPORT` names an unknown transport.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("VITRINE_API_BASE_URL")?;
        let transport = get_env_or_default("VITRINE_API_TRANSPORT", Transport::Json.as_str())
            .parse::<Transport>()
            .map_err(|e| ConfigError::InvalidEnvVar("VITRINE_API_TRANSPORT".to_string(), e))?;
        Self::parse(&base_url, transport)
    }
}

/// Route table configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Normalized base path: leading and trailing `/`, e.g. `/` or `/shop/`.
    pub base_path: String,
}

impl RouterConfig {
    /// Build from a base path, normalized the same way the route table does
    /// (`shop`, `/shop` and `/shop/` are equivalent).
    #[must_use]
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: format!("{}/", normalize_base(base_path)),
        }
    }

    /// Load from `VITRINE_BASE_PATH` (default `/`). Needs no API settings.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::new(&get_env_or_default("VITRINE_BASE_PATH", "/"))
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new("/")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_parse() {
        assert_eq!("json".parse::<Transport>().unwrap(), Transport::Json);
        assert_eq!("Multipart".parse::<Transport>().unwrap(), Transport::Multipart);
        assert_eq!(" form-data ".parse::<Transport>().unwrap(), Transport::Multipart);
        assert!("xml".parse::<Transport>().is_err());
    }

    #[test]
    fn test_transport_default_is_json() {
        assert_eq!(Transport::default(), Transport::Json);
        assert_eq!(Transport::default().to_string(), "json");
    }

    #[test]
    fn test_api_config_parse_valid() {
        let config = ApiConfig::parse("http://localhost:8080/api/", Transport::Multipart).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/");
        assert_eq!(config.transport, Transport::Multipart);
    }

    #[test]
    fn test_api_config_rejects_relative_url() {
        let result = ApiConfig::parse("/api", Transport::Json);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_, _))));
    }

    #[test]
    fn test_api_config_rejects_cannot_be_a_base() {
        let result = ApiConfig::parse("mailto:shop@example.com", Transport::Json);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_, _))));
    }

    #[test]
    fn test_router_config_normalizes_base_path() {
        assert_eq!(RouterConfig::new("shop").base_path, "/shop/");
        assert_eq!(RouterConfig::new("/shop").base_path, "/shop/");
        assert_eq!(RouterConfig::new(" /shop/ ").base_path, "/shop/");
        assert_eq!(RouterConfig::new("/a/b/").base_path, "/a/b/");
        assert_eq!(RouterConfig::new("").base_path, "/");
        assert_eq!(RouterConfig::default().base_path, "/");
    }

    #[test]
    fn test_router_config_matches_route_table_base() {
        for base in ["shop", "/shop", "/shop/", "/", ""] {
            let config = RouterConfig::new(base);
            let table = crate::router::RouteTable::from_config(&config).unwrap();
            assert_eq!(table.base_path(), config.base_path, "{base:?}");
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("VITRINE_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: VITRINE_API_BASE_URL"
        );
    }
}

//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

/// Logical name of the backing cache shared by every namespace.
pub const DEFAULT_CACHE_NAME: &str = "memcache";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries in the backing cache, 0 = unbounded
    pub max_entries: usize,
    /// Background expiry purge interval in seconds
    pub cleanup_interval: u64,
    /// Name of the backing cache instance
    pub cache_name: String,
    /// Namespace pinned on the service, None = use the request namespace
    pub namespace: Option<String>,
    /// Upper bound on conditional-replace attempts per increment
    pub increment_max_retries: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_ENTRIES` - Maximum cache entries, 0 = unbounded (default: 0)
    /// - `CLEANUP_INTERVAL` - Expiry purge frequency in seconds (default: 1)
    /// - `CACHE_NAME` - Backing cache name (default: "memcache")
    /// - `CACHE_NAMESPACE` - Service namespace (default: unset)
    /// - `INCREMENT_MAX_RETRIES` - Increment retry bound (default: 128)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            cache_name: env::var("CACHE_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.cache_name),
            namespace: env::var("CACHE_NAMESPACE").ok().filter(|v| !v.is_empty()),
            increment_max_retries: parse_var("INCREMENT_MAX_RETRIES")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.increment_max_retries),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            max_entries: 0,
            cleanup_interval: 1,
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            namespace: None,
            increment_max_retries: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_entries, 0);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.cache_name, "memcache");
        assert!(config.namespace.is_none());
        assert_eq!(config.increment_max_retries, 128);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("MAX_ENTRIES");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("CACHE_NAME");
        env::remove_var("CACHE_NAMESPACE");
        env::remove_var("INCREMENT_MAX_RETRIES");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_entries, 0);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.cache_name, DEFAULT_CACHE_NAME);
        assert!(config.namespace.is_none());
        assert_eq!(config.increment_max_retries, 128);
    }
}

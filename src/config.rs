//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for cached read routes
    pub default_ttl: u64,
    /// Interval in seconds between background expiry sweeps
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// When false, read routes are served without the cache layer
    pub cache_enabled: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Cached response TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_ENABLED` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_enabled: env_or("CACHE_ENABLED", defaults.cache_enabled),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            sweep_interval: 600,
            server_port: 3000,
            cache_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.sweep_interval, 600);
        assert_eq!(config.server_port, 3000);
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_config_durations() {
        let config = Config::default();
        assert_eq!(config.ttl(), Duration::from_secs(5 * 60));
        assert_eq!(config.sweep_period(), Duration::from_secs(10 * 60));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("DEFAULT_TTL");
        env::remove_var("SWEEP_INTERVAL");
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_ENABLED");

        let config = Config::from_env();
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.sweep_interval, 600);
        assert_eq!(config.server_port, 3000);
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("RESPONSE_CACHE_TEST_FLAG", " false ");
        assert!(!env_or("RESPONSE_CACHE_TEST_FLAG", true));

        env::set_var("RESPONSE_CACHE_TEST_FLAG", "not-a-bool");
        assert!(env_or("RESPONSE_CACHE_TEST_FLAG", true));

        env::remove_var("RESPONSE_CACHE_TEST_FLAG");
    }
}

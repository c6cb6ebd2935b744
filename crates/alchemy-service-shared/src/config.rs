//! Environment-driven configuration for the traversal service.
//!
//! # Environment Variables
//!
//! - `ALCHEMY_CATALOG_PATH`: Recipe catalog JSON file (default: `elements.json`)
//! - `SERVICE_PORT`, then `PORT`: HTTP port (default: 8080)
//! - `TRAVERSAL_MAX_CONCURRENCY`: Branch tasks allowed at once (default: 5)
//! - `TRAVERSAL_TIMEOUT_MS`: Per-request traversal deadline (default: 10000)

use std::path::PathBuf;
use std::time::Duration;

use alchemy_lib::{EngineConfig, DEFAULT_MAX_CONCURRENCY};

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "elements.json";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for the traversal service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub catalog_path: PathBuf,
    pub port: u16,
    pub max_concurrency: usize,
    pub traversal_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            port: DEFAULT_PORT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            traversal_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let catalog_path = lookup("ALCHEMY_CATALOG_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);

        let port = lookup("SERVICE_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let max_concurrency = lookup("TRAVERSAL_MAX_CONCURRENCY")
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.max_concurrency);

        let traversal_timeout = lookup("TRAVERSAL_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .filter(|&ms: &u64| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.traversal_timeout);

        Self {
            catalog_path,
            port,
            max_concurrency,
            traversal_timeout,
        }
    }

    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_concurrency: self.max_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.catalog_path, PathBuf::from("elements.json"));
    }

    #[test]
    fn test_service_port_wins_over_port() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("SERVICE_PORT", "9000"),
            ("PORT", "7000"),
        ]));
        assert_eq!(config.port, 9000);

        let config = ServiceConfig::from_lookup(lookup_from(&[("PORT", "7000")]));
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("SERVICE_PORT", "not-a-port"),
            ("TRAVERSAL_MAX_CONCURRENCY", "0"),
            ("TRAVERSAL_TIMEOUT_MS", "-5"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.traversal_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("ALCHEMY_CATALOG_PATH", "/data/elements.json"),
            ("TRAVERSAL_MAX_CONCURRENCY", "12"),
            ("TRAVERSAL_TIMEOUT_MS", "250"),
        ]));
        assert_eq!(config.catalog_path, PathBuf::from("/data/elements.json"));
        assert_eq!(config.engine_config().max_concurrency, 12);
        assert_eq!(config.traversal_timeout, Duration::from_millis(250));
    }
}

//! Client configuration.
//!
//! Defaults can be overridden through environment variables:
//!
//! | Variable | Default |
//! |---|---|
//! | `CITYBIKE_API_URL` | `http://localhost:8080/api` |
//! | `CITYBIKE_TIMEOUT_SECS` | 30 |
//! | `CITYBIKE_MAX_CONCURRENT` | 5 |
//! | `CITYBIKE_STATION_TTL_SECS` | 86400 |
//! | `CITYBIKE_PAGE_SIZE` | 30 |
//! | `CITYBIKE_SUMMARY_TIMEOUT_SECS` | unset (no limit) |

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::api::ApiConfig;
use crate::stations::DirectoryConfig;
use crate::view::DEFAULT_PAGE_SIZE;

pub const ENV_API_URL: &str = "CITYBIKE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CITYBIKE_TIMEOUT_SECS";
pub const ENV_MAX_CONCURRENT: &str = "CITYBIKE_MAX_CONCURRENT";
pub const ENV_STATION_TTL_SECS: &str = "CITYBIKE_STATION_TTL_SECS";
pub const ENV_PAGE_SIZE: &str = "CITYBIKE_PAGE_SIZE";
pub const ENV_SUMMARY_TIMEOUT_SECS: &str = "CITYBIKE_SUMMARY_TIMEOUT_SECS";

/// Everything needed to wire up the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub directory: DirectoryConfig,
    /// Journeys per page
    pub page_size: usize,
    /// Upper bound on waiting for a station's statistics
    pub summary_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            directory: DirectoryConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            summary_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`. Values that fail to parse are
    /// logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.api.base_url = url;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS) {
            config.api.timeout_secs = secs;
        }
        if let Some(n) = parse_var::<usize>(&lookup, ENV_MAX_CONCURRENT).filter(|&n| {
            positive(ENV_MAX_CONCURRENT, n)
        }) {
            config.api.max_concurrent = n;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_STATION_TTL_SECS) {
            config.directory.ttl = Duration::from_secs(secs);
        }
        if let Some(n) = parse_var::<usize>(&lookup, ENV_PAGE_SIZE).filter(|&n| {
            positive(ENV_PAGE_SIZE, n)
        }) {
            config.page_size = n;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_SUMMARY_TIMEOUT_SECS) {
            config.summary_timeout = Some(Duration::from_secs(secs));
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_summary_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.summary_timeout = timeout;
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

fn positive(name: &str, n: usize) -> bool {
    if n == 0 {
        warn!(variable = name, "ignoring zero setting");
    }
    n > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.max_concurrent, 5);
        assert_eq!(config.directory.ttl, Duration::from_secs(86_400));
        assert_eq!(config.page_size, 30);
        assert_eq!(config.summary_timeout, None);
    }

    #[test]
    fn overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://bikes.example/api"),
            (ENV_TIMEOUT_SECS, "10"),
            (ENV_MAX_CONCURRENT, "2"),
            (ENV_STATION_TTL_SECS, "60"),
            (ENV_PAGE_SIZE, " 50 "),
            (ENV_SUMMARY_TIMEOUT_SECS, "3"),
        ]));

        assert_eq!(config.api.base_url, "http://bikes.example/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.max_concurrent, 2);
        assert_eq!(config.directory.ttl, Duration::from_secs(60));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.summary_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "  "),
            (ENV_TIMEOUT_SECS, "soon"),
            (ENV_MAX_CONCURRENT, "0"),
            (ENV_PAGE_SIZE, "-5"),
            (ENV_SUMMARY_TIMEOUT_SECS, "1.5"),
        ]));

        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.max_concurrent, 5);
        assert_eq!(config.page_size, 30);
        assert_eq!(config.summary_timeout, None);
    }

    #[test]
    fn builders() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:1/api")
            .with_page_size(10)
            .with_summary_timeout(Some(Duration::from_secs(1)));
        assert_eq!(config.api.base_url, "http://127.0.0.1:1/api");
        assert_eq!(config.page_size, 10);
        assert!(config.summary_timeout.is_some());
    }
}

//! Runtime configuration
//!
//! Values come from `REMEDY_*` environment variables; CLI flags override them.

use crate::batch::BatchLimits;
use crate::error::{Error, Result};
use crate::fetch::DEFAULT_BATCH_SIZE;
use crate::submit::DEFAULT_THROTTLE;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Backend used when `REMEDY_API_URL` is unset
pub const DEFAULT_API_URL: &str = "https://console.redhat.com/api/remediations/v1";

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; request paths are appended to it
    pub base_url: Url,
    /// Bearer token, if the backend requires one
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Settings for a backend at `base_url` with no token
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// Full runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend connection
    pub api: ApiConfig,
    /// Packing limits
    pub limits: BatchLimits,
    /// Delay before every batch request
    pub throttle: Duration,
    /// Page size used when aggregating collections
    pub page_size: u64,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Recognized variables:
    /// - `REMEDY_API_URL`, `REMEDY_TOKEN`, `REMEDY_TIMEOUT_SECS`
    /// - `REMEDY_THROTTLE_MS`, `REMEDY_PAGE_SIZE`
    /// - `REMEDY_MAX_ISSUES_PER_BATCH`, `REMEDY_MAX_SYSTEMS_PER_ISSUE`,
    ///   `REMEDY_MAX_TOTAL_SYSTEMS_PER_BATCH`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("REMEDY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = lookup("REMEDY_TOKEN").filter(|t| !t.trim().is_empty());
        let timeout = parse_var::<u64>(&lookup, "REMEDY_TIMEOUT_SECS")?
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        let defaults = BatchLimits::default();
        let limits = BatchLimits {
            max_issues_per_batch: parse_var(&lookup, "REMEDY_MAX_ISSUES_PER_BATCH")?
                .unwrap_or(defaults.max_issues_per_batch),
            max_systems_per_issue: parse_var(&lookup, "REMEDY_MAX_SYSTEMS_PER_ISSUE")?
                .unwrap_or(defaults.max_systems_per_issue),
            max_total_systems_per_batch: parse_var(&lookup, "REMEDY_MAX_TOTAL_SYSTEMS_PER_BATCH")?
                .unwrap_or(defaults.max_total_systems_per_batch),
        };

        let throttle = parse_var::<u64>(&lookup, "REMEDY_THROTTLE_MS")?
            .map_or(DEFAULT_THROTTLE, Duration::from_millis);

        let page_size =
            parse_var::<u64>(&lookup, "REMEDY_PAGE_SIZE")?.unwrap_or(DEFAULT_BATCH_SIZE);
        if page_size == 0 {
            return Err(Error::Config("REMEDY_PAGE_SIZE must be positive".to_string()));
        }

        Ok(Self {
            api: ApiConfig {
                base_url: parse_base_url(&base_url)?,
                token,
                timeout,
            },
            limits,
            throttle,
            page_size,
        })
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| Error::Config(format!("{key} has invalid value: {raw}")))
        })
        .transpose()
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // Url::join replaces the last segment unless the base ends with a slash
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| Error::Config(format!("invalid API URL {raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.api.base_url.as_str(), format!("{DEFAULT_API_URL}/"));
        assert!(config.api.token.is_none());
        assert_eq!(config.limits, BatchLimits::default());
        assert_eq!(config.throttle, Duration::from_millis(250));
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("REMEDY_API_URL", "http://localhost:8080/api/"),
            ("REMEDY_TOKEN", "secret"),
            ("REMEDY_THROTTLE_MS", "0"),
            ("REMEDY_PAGE_SIZE", "100"),
            ("REMEDY_MAX_TOTAL_SYSTEMS_PER_BATCH", "200"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url.as_str(), "http://localhost:8080/api/");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.throttle, Duration::ZERO);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.limits.max_total_systems_per_batch, 200);
        assert_eq!(config.limits.max_issues_per_batch, 50);
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("REMEDY_TOKEN", "  ")])).unwrap();
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("REMEDY_PAGE_SIZE", "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("REMEDY_PAGE_SIZE", "0")])).is_err());
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(ApiConfig::new("not a url").is_err());
    }
}

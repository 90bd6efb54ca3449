//! # Consumer configuration.
//!
//! Provides [`Config`], the immutable settings the consumer is started with.
//!
//! Config is loaded once (the binary fills it from environment variables /
//! CLI flags), validated with [`Config::validate`] and then handed to
//! [`Consumer::builder`](crate::Consumer::builder).
//!
//! ## Managed hosts
//! Hosts ending in [`MANAGED_HOST_SUFFIX`] (Azure Cache for Redis) always
//! require a credential; validation rejects them otherwise so the process can
//! exit before a connection is attempted.
//!
//! ## Sentinel values
//! - `password = Some("")` is treated as no credential.
//! - `collector_url = None` disables tracing entirely.

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::RetryPolicy;

/// Host suffix of managed Redis deployments that enforce authentication.
pub const MANAGED_HOST_SUFFIX: &str = ".redis.cache.windows.net";

/// Settings for one consumer process.
///
/// ## Field semantics
/// - `host`, `port`, `channel`: where to subscribe
/// - `password`: optional credential (`AUTH`)
/// - `collector_url`: Zipkin collector endpoint; `None` = tracing disabled
/// - `connect_timeout`: bound on connect + ping + subscribe
/// - `poll_timeout`: how long one poll waits for the next event
/// - `report_timeout`: bound on one span report
/// - `retry`: failure budget and backoff
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Redis host name or address.
    pub host: String,
    /// Redis port.
    pub port: u16,
    /// Channel to subscribe to.
    pub channel: String,
    /// Credential for `AUTH`.
    pub password: Option<String>,
    /// Zipkin collector URL.
    pub collector_url: Option<String>,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Per-poll timeout while listening.
    pub poll_timeout: Duration,
    /// Collector call timeout.
    pub report_timeout: Duration,
    /// Reconnect policy.
    pub retry: RetryPolicy,
    /// Capacity of the lifecycle event bus.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `localhost:6379`, channel `log_channel`, no credential, no collector
    /// - `connect_timeout = 10s`, `poll_timeout = 1s`, `report_timeout = 5s`
    /// - `retry = RetryPolicy::default()` (5 retries, 5s doubling to 60s)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            channel: "log_channel".to_string(),
            password: None,
            collector_url: None,
            connect_timeout: Duration::from_secs(10),
            poll_timeout: Duration::from_secs(1),
            report_timeout: Duration::from_secs(5),
            retry: RetryPolicy::default(),
            bus_capacity: 1024,
        }
    }
}

impl Config {
    /// Returns the credential, treating an empty string as absent.
    #[inline]
    pub fn credential(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Returns the collector URL, treating an empty string as absent.
    #[inline]
    pub fn collector(&self) -> Option<&str> {
        self.collector_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Whether the host is a managed deployment that requires a credential.
    #[inline]
    pub fn is_managed_host(&self) -> bool {
        self.host.to_ascii_lowercase().ends_with(MANAGED_HOST_SUFFIX)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// `host:port`, for logs.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Checks the invariants that must hold before any connection attempt.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_managed_host() && self.credential().is_none() {
            return Err(ConfigError::MissingCredential {
                host: self.host.clone(),
            });
        }
        if self.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort { port: self.port });
        }
        if let Some(url) = self.collector() {
            reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidCollectorUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managed_host_without_credential_is_rejected() {
        let cfg = Config {
            host: "x.redis.cache.windows.net".into(),
            password: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingCredential {
                host: "x.redis.cache.windows.net".into()
            })
        );
    }

    #[test]
    fn managed_host_suffix_match_ignores_case() {
        let cfg = Config {
            host: "Prod.Redis.Cache.Windows.Net".into(),
            ..Config::default()
        };
        assert!(cfg.is_managed_host());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn managed_host_with_credential_is_accepted() {
        let cfg = Config {
            host: "x.redis.cache.windows.net".into(),
            password: Some("secret".into()),
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn self_hosted_needs_no_credential() {
        let cfg = Config {
            host: "redis-queue".into(),
            password: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(cfg.credential(), None);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn empty_channel_and_zero_port_are_rejected() {
        let cfg = Config {
            channel: "  ".into(),
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyChannel));

        let cfg = Config {
            port: 0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPort { port: 0 }));
    }

    #[test]
    fn collector_url_must_parse_when_present() {
        let cfg = Config {
            collector_url: Some("not a url".into()),
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidCollectorUrl { .. })
        ));

        let cfg = Config {
            collector_url: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(cfg.collector(), None);
        assert_eq!(cfg.validate(), Ok(()));
    }
}

//! HTTP client tuning parsed from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpEnvConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
    pub pool_max_idle_per_host: usize,
    /// Upper bound on a live chart fetch before the fallback is shown
    pub live_fetch_timeout_secs: u64,
}

impl Default for HttpEnvConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 3,
            pool_max_idle_per_host: 5,
            live_fetch_timeout_secs: 8,
        }
    }
}

impl HttpEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            timeout_secs: Self::parse_u64("HTTP_TIMEOUT_SECS", defaults.timeout_secs)?,
            connect_timeout_secs: Self::parse_u64(
                "HTTP_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            max_retries: env::var("HTTP_MAX_RETRIES")
                .unwrap_or_else(|_| defaults.max_retries.to_string())
                .parse::<u32>()
                .context("Failed to parse HTTP_MAX_RETRIES")?,
            pool_max_idle_per_host: defaults.pool_max_idle_per_host,
            live_fetch_timeout_secs: Self::parse_u64(
                "LIVE_FETCH_TIMEOUT_SECS",
                defaults.live_fetch_timeout_secs,
            )?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn live_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.live_fetch_timeout_secs)
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }
}

//! Configuration module for edgecap.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Endpoints, HTTP, Storage and chart generation.

mod endpoint_config;
mod http_config;
mod storage_config;

pub use endpoint_config::EndpointEnvConfig;
pub use http_config::HttpEnvConfig;
pub use storage_config::StorageEnvConfig;

use crate::domain::series::FlatPathPolicy;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: EndpointEnvConfig,
    pub http: HttpEnvConfig,
    pub storage: StorageEnvConfig,
    /// How rescaling treats a raw path ending on the baseline
    pub flat_path_policy: FlatPathPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        let policy_str = env::var("FLAT_PATH_POLICY").unwrap_or_else(|_| "fail".to_string());
        let flat_path_policy = FlatPathPolicy::from_str(&policy_str)?;

        Ok(Self {
            endpoints: EndpointEnvConfig::from_env(),
            http: HttpEnvConfig::from_env().context("Failed to load HTTP config")?,
            storage: StorageEnvConfig::from_env().context("Failed to load storage config")?,
            flat_path_policy,
        })
    }
}

//! Spreadsheet endpoint configuration parsing from environment variables.
//!
//! Each endpoint is optional: an unset or empty variable disables the
//! integration, and callers fall back to synthetic data (reads) or report
//! the missing endpoint (form submissions).

use std::env;

#[derive(Debug, Clone, Default)]
pub struct EndpointEnvConfig {
    /// Apps Script web app receiving form posts
    pub form_url: Option<String>,
    /// Published latest-month returns per share class
    pub fund_returns_url: Option<String>,
    /// Sheet-backed performance rows for the live charts
    pub performance_url: Option<String>,
}

impl EndpointEnvConfig {
    pub fn from_env() -> Self {
        Self {
            form_url: Self::optional("FORM_SCRIPT_URL"),
            fund_returns_url: Self::optional("FUND_RETURNS_SCRIPT_URL"),
            performance_url: Self::optional("PERFORMANCE_SCRIPT_URL"),
        }
    }

    fn optional(key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

//! Configuration options for the fleet client

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default API root, including the `/api` base path
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Configuration options for the fleet client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API root every request path is appended to
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Duration,

    /// How long a submit hook keeps its `success` flag raised
    pub submit_reset_delay: Duration,

    /// Whether the built-in demo identities may log in offline
    pub demo_accounts: bool,

    /// Where `FileStorage` keeps the persisted session, if file-backed
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            submit_reset_delay: Duration::from_millis(3000),
            demo_accounts: cfg!(feature = "demo-accounts"),
            storage_path: None,
        }
    }
}

impl ClientOptions {
    /// Build options from `FLEET_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(url) = std::env::var("FLEET_API_URL") {
            options = options.with_base_url(&url);
        }
        if let Ok(secs) = std::env::var("FLEET_API_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| {
                    Error::general(format!("FLEET_API_TIMEOUT_SECS is not a number: {}", secs))
                })?;
            options = options.with_request_timeout(Duration::from_secs(secs));
        }
        if let Ok(path) = std::env::var("FLEET_STORAGE_PATH") {
            options = options.with_storage_path(path);
        }
        if let Ok(flag) = std::env::var("FLEET_DEMO_ACCOUNTS") {
            options = options.with_demo_accounts(matches!(flag.as_str(), "1" | "true" | "yes"));
        }

        Ok(options)
    }

    /// Set the API root
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the submit success reset delay
    pub fn with_submit_reset_delay(mut self, value: Duration) -> Self {
        self.submit_reset_delay = value;
        self
    }

    /// Enable or disable the demo identities
    pub fn with_demo_accounts(mut self, value: bool) -> Self {
        self.demo_accounts = value;
        self
    }

    /// Set the session file location
    pub fn with_storage_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url, "http://localhost:5000/api");
        assert_eq!(options.request_timeout, Duration::from_secs(10));
        assert_eq!(options.submit_reset_delay, Duration::from_millis(3000));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let options = ClientOptions::default().with_base_url("http://fleet.test/api/");
        assert_eq!(options.base_url, "http://fleet.test/api");
    }
}

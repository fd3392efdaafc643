//! Configuration management for the GitHub client

use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;

use super::error::{ClientError, Result};
use crate::config::ActivityConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("gh-activity/", env!("CARGO_PKG_VERSION"));

/// Main configuration for the GitHub client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GitHub API base URL, e.g. `https://api.github.com`
    pub base_url: CompactString,
    /// Value of the `User-Agent` header, which GitHub requires
    pub user_agent: CompactString,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Optional per-request deadline for the HTTP client
    ///
    /// Unset by default: callers bound requests through cancellation.
    pub timeout: Option<Duration>,
    /// Wait assumed after a request whose response could not be read
    pub fallback_poll_interval: Duration,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Write every response body to `log_directory`
    pub log_responses: bool,
    /// Directory for storing response dumps
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            fallback_poll_interval: Duration::from_secs(1),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("gh-activity-logs")),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<CompactString>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config_validation(
                "base_url",
                "Base URL cannot be empty",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config_validation(
                "base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(ClientError::config_validation(
                "base_url",
                "Base URL is not a valid URL format",
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ClientError::config_validation(
                "user_agent",
                "User agent cannot be empty",
            ));
        }

        if self.request.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::config_validation(
                "timeout",
                "Timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

impl From<ActivityConfig> for ClientConfig {
    fn from(config: ActivityConfig) -> Self {
        Self::new(config.base_url)
            .with_user_agent(config.user_agent)
            .with_request(RequestConfig {
                timeout: config.request_timeout_secs.map(Duration::from_secs),
                ..RequestConfig::default()
            })
    }
}

impl ClientConfig {
    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<CompactString>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<CompactString>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Enable response dumps
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_field(config: &ClientConfig) -> Option<CompactString> {
        match config.validate() {
            Err(ClientError::ConfigValidation { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::new("http://127.0.0.1:8080").validate().is_ok());
    }

    #[test]
    fn no_request_deadline_unless_configured() {
        let config = ClientConfig::default();
        assert_eq!(config.request.timeout, None);

        let config = ClientConfig::from(ActivityConfig::default());
        assert_eq!(config.request.timeout, None);

        let config = ClientConfig::default().with_request(RequestConfig {
            timeout: Some(Duration::from_secs(10)),
            ..RequestConfig::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert_eq!(validation_field(&ClientConfig::new("")).as_deref(), Some("base_url"));
        assert_eq!(
            validation_field(&ClientConfig::new("ftp://example.com")).as_deref(),
            Some("base_url")
        );
        assert_eq!(
            validation_field(&ClientConfig::new("https://")).as_deref(),
            Some("base_url")
        );
    }

    #[test]
    fn rejects_empty_user_agent_and_zero_timeout() {
        let config = ClientConfig::default().with_user_agent("  ");
        assert_eq!(validation_field(&config).as_deref(), Some("user_agent"));

        let config = ClientConfig::default().with_request(RequestConfig {
            timeout: Some(Duration::ZERO),
            ..RequestConfig::default()
        });
        assert_eq!(validation_field(&config).as_deref(), Some("timeout"));
    }

    #[test]
    fn built_from_activity_config() {
        let config = ClientConfig::from(ActivityConfig {
            base_url: "https://github.example.com/api/v3".into(),
            user_agent: "tester".into(),
            request_timeout_secs: Some(5),
            log_level: None,
        });

        assert_eq!(config.base_url, "https://github.example.com/api/v3");
        assert_eq!(config.user_agent, "tester");
        assert_eq!(config.request.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.request.fallback_poll_interval, Duration::from_secs(1));
        assert!(!config.debug.log_responses);
    }
}

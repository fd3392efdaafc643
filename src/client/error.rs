//! Error types for the GitHub client

use compact_str::CompactString;
use thiserror::Error;

use super::headers::{HeaderParseError, RateLimitHeaders};

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Malformed header {header}={value:?}: {reason}")]
    HeaderDecode {
        header: CompactString,
        value: CompactString,
        reason: HeaderParseError,
    },

    #[error("JSON parse error from {endpoint}: {message}")]
    JsonParse {
        endpoint: CompactString,
        message: CompactString,
        #[source]
        source: serde_json::Error,
    },

    #[error("GitHub user {user:?} not found")]
    UserNotFound { user: CompactString },

    #[error("Not found: {resource}")]
    NotFound { resource: CompactString },

    #[error("Rate limit exceeded (HTTP {status}), window resets at {}", .headers.x_ratelimit_reset)]
    RateLimit {
        status: u16,
        headers: Box<RateLimitHeaders>,
    },

    #[error("HTTP {status}: {message}")]
    GithubApi { status: u16, message: CompactString },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: CompactString },

    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidation {
        field: CompactString,
        message: CompactString,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() { ClientError::Timeout } else { ClientError::Http(e) }
    }
}

impl ClientError {
    pub fn header_decode(
        header: impl Into<CompactString>,
        value: impl Into<CompactString>,
        reason: HeaderParseError,
    ) -> Self {
        Self::HeaderDecode {
            header: header.into(),
            value: value.into(),
            reason,
        }
    }

    pub fn json_parse(
        endpoint: impl Into<CompactString>,
        message: impl Into<CompactString>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    pub fn not_found(resource: impl Into<CompactString>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    pub fn user_not_found(user: impl Into<CompactString>) -> Self {
        Self::UserNotFound { user: user.into() }
    }

    pub fn rate_limit(status: u16, headers: RateLimitHeaders) -> Self {
        Self::RateLimit { status, headers: Box::new(headers) }
    }

    pub fn github_api(status: u16, message: impl Into<CompactString>) -> Self {
        Self::GithubApi { status, message: message.into() }
    }

    pub fn invalid_url(url: impl Into<CompactString>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn config_validation(
        field: impl Into<CompactString>,
        message: impl Into<CompactString>,
    ) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_user_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound { .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Rate-limit state reported alongside a throttled response
    pub fn rate_limit_headers(&self) -> Option<&RateLimitHeaders> {
        match self {
            Self::RateLimit { headers, .. } => Some(headers),
            _ => None,
        }
    }
}

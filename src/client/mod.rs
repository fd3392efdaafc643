//! GitHub client modules
//!
//! A paced HTTP client for the GitHub REST API, split into header decoding,
//! pacing, configuration and the request layer itself.

pub mod api;
pub mod config;
pub mod error;
pub mod headers;
pub mod pacer;

// Re-export main types for convenience
pub use api::GithubApi;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use headers::RateLimitHeaders;
pub use pacer::PollPacer;

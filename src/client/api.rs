//! Rate-limited HTTP client for the GitHub API

use chrono::Local;
use compact_str::{CompactString, format_compact};
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, USER_AGENT},
};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
    headers::RateLimitHeaders,
    pacer::PollPacer,
};
use crate::domain::Event;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// HTTP client for the GitHub API that paces itself by the server's hints
///
/// Pacing state lives in the client, so every request method takes
/// `&mut self`. Share one instance across tasks only behind a mutex, and use
/// one instance per rate-limit budget.
#[derive(Debug)]
pub struct GithubApi {
    client: Client,
    config: ClientConfig,
    pacer: PollPacer,
}

/// GitHub API error response body
#[derive(Debug, Deserialize)]
struct GithubApiError {
    message: CompactString,
}

impl GithubApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Http)?;

        Ok(Self::with_http_client(client, config))
    }

    /// Wrap an already configured HTTP client
    pub fn with_http_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config, pacer: PollPacer::new() }
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn pacer(&self) -> &PollPacer {
        &self.pacer
    }

    /// Time left before the next request may be sent
    pub fn time_until_next_allowed(&self) -> std::time::Duration {
        self.pacer.time_until_next_allowed()
    }

    /// Get the public events of a user, most recent first
    #[instrument(skip(self, cancel), fields(user = %user))]
    pub async fn get_user_events(
        &mut self,
        cancel: &CancellationToken,
        user: &str,
    ) -> Result<Vec<Event>> {
        let url = self.build_user_events_url(user)?;

        match self.get_json::<Vec<Event>>(cancel, url.as_str()).await {
            Ok(events) => {
                debug!(event_count = events.len(), "Successfully fetched events");
                Ok(events)
            },
            Err(ClientError::NotFound { .. }) => Err(ClientError::user_not_found(user)),
            Err(e) => Err(e),
        }
    }

    /// Paced GET followed by a full body read and JSON decode
    pub async fn get_json<T>(&mut self, cancel: &CancellationToken, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let (response, _headers) = self.get(cancel, url).await?;
        self.handle_response(cancel, response).await
    }

    /// Paced GET returning the unread response and its rate-limit headers
    ///
    /// Waits out the interval learned from the previous response first. The
    /// wait, the request and any error-body read all abort with
    /// [`ClientError::Cancelled`] once `cancel` fires.
    #[instrument(skip(self, cancel))]
    pub async fn get(
        &mut self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<(Response, RateLimitHeaders)> {
        self.wait_poll_interval(cancel).await?;

        self.pacer.record_request_sent(Instant::now());
        // Holds if the response never arrives or its headers are unreadable
        self.pacer
            .update_interval(self.config.request.fallback_poll_interval);

        let request = self.github_request(url);
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            response = request.send() => response?,
        };

        let headers = RateLimitHeaders::decode(response.headers())?;
        self.update_poll_interval(&headers);

        self.classify_response(cancel, response, headers).await
    }

    async fn wait_poll_interval(&self, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let wait = self.pacer.time_until_next_allowed();
        if wait.is_zero() {
            return Ok(());
        }

        debug!(wait = ?wait, "Waiting for poll interval");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Poll wait cancelled");
                Err(ClientError::Cancelled)
            },
            _ = sleep(wait) => Ok(()),
        }
    }

    fn update_poll_interval(&mut self, headers: &RateLimitHeaders) {
        let interval = if headers.is_exhausted() {
            let until_reset = headers.time_until_reset();
            debug!(
                reset_at = %headers.x_ratelimit_reset,
                wait = ?until_reset,
                "Rate limit window exhausted, pausing until reset"
            );
            until_reset
        } else {
            headers.x_poll_interval
        };

        self.pacer.update_interval(interval);
    }

    async fn classify_response(
        &self,
        cancel: &CancellationToken,
        response: Response,
        headers: RateLimitHeaders,
    ) -> Result<(Response, RateLimitHeaders)> {
        let status = response.status();
        if status.is_success() {
            return Ok((response, headers));
        }

        let url_path = response.url().path().to_string();
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::not_found(url_path)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(status = status.as_u16(), reset_at = %headers.x_ratelimit_reset, "Rate limited");
                Err(ClientError::rate_limit(status.as_u16(), headers))
            },
            StatusCode::FORBIDDEN if headers.x_ratelimit_limit > 0 && headers.is_exhausted() => {
                warn!(status = status.as_u16(), reset_at = %headers.x_ratelimit_reset, "Rate limited");
                Err(ClientError::rate_limit(status.as_u16(), headers))
            },
            _ => {
                let body = Self::read_body(cancel, response).await?;
                Err(Self::error_from_body(status.as_u16(), &body))
            },
        }
    }

    fn error_from_body(status: u16, body: &str) -> ClientError {
        match serde_json::from_str::<GithubApiError>(body) {
            Ok(api_error) => ClientError::github_api(status, api_error.message),
            Err(_) => ClientError::github_api(status, body),
        }
    }

    async fn read_body(cancel: &CancellationToken, response: Response) -> Result<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            body = response.text() => Ok(body?),
        }
    }

    /// Read a successful response and deserialize its JSON body
    async fn handle_response<T>(&self, cancel: &CancellationToken, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url_path = response.url().path().to_string();
        let body = Self::read_body(cancel, response).await?;

        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(endpoint = %url_path, error = %e, "Response body did not match expected shape");
            ClientError::json_parse(url_path, "Failed to parse response", e)
        })
    }

    fn github_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, self.config.user_agent.as_str())
    }

    /// Build `<base_url>/users/{user}/events`
    fn build_user_events_url(&self, user: &str) -> Result<Url> {
        if user.is_empty() {
            return Err(ClientError::invalid_url(format_compact!(
                "{}/users//events",
                self.config.base_url
            )));
        }

        let mut url = Url::parse(&self.config.base_url)
            .map_err(|_| ClientError::invalid_url(self.config.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::invalid_url(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(["users", user, "events"]);

        Ok(url)
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        let Some(log_dir) = &self.config.debug.log_directory else {
            return;
        };

        if !log_dir.exists()
            && let Err(e) = std::fs::create_dir_all(log_dir)
        {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let filename = format!(
            "{}_{}.json",
            Local::now().format("%Y-%m-%d_%H-%M-%S"),
            path.replace('/', "_")
        );
        let log_path = log_dir.join(filename);

        if let Err(e) = std::fs::write(&log_path, body) {
            warn!("Failed to write response log to {:?}: {}", log_path, e);
        } else {
            debug!("Response logged to {:?}", log_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> GithubApi {
        GithubApi::new(ClientConfig::new(base_url)).unwrap()
    }

    #[test]
    fn user_events_url_from_root_base() {
        let url = api("https://api.github.com")
            .build_user_events_url("octocat")
            .unwrap();

        assert_eq!(url.as_str(), "https://api.github.com/users/octocat/events");
    }

    #[test]
    fn user_events_url_keeps_base_path() {
        let url = api("https://github.example.com/api/v3/")
            .build_user_events_url("octocat")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://github.example.com/api/v3/users/octocat/events"
        );
    }

    #[test]
    fn user_events_url_escapes_user_segment() {
        let url = api("https://api.github.com")
            .build_user_events_url("a/b c")
            .unwrap();

        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb%20c/events");
    }

    #[test]
    fn empty_user_is_rejected() {
        let err = api("https://api.github.com")
            .build_user_events_url("")
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn error_message_taken_from_github_body() {
        let err = GithubApi::error_from_body(
            422,
            r#"{"message":"Validation Failed","documentation_url":"https://docs.github.com"}"#,
        );
        assert!(matches!(err, ClientError::GithubApi { status: 422, ref message } if message == "Validation Failed"));

        let err = GithubApi::error_from_body(502, "Bad gateway");
        assert!(matches!(err, ClientError::GithubApi { status: 502, ref message } if message == "Bad gateway"));
    }

    #[tokio::test]
    async fn cancelled_token_fails_before_sending() {
        let mut client = api("http://127.0.0.1:9");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client.get(&cancel, "http://127.0.0.1:9/").await.unwrap_err();

        assert!(err.is_cancelled());
        assert!(client.pacer().last_request_sent_at().is_none());
    }
}

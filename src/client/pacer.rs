//! Client-side pacing between polls

use std::time::Duration;

use tokio::time::Instant;

/// Poll state of a single client: when the last request went out and how long
/// the server asked us to wait after it.
#[derive(Debug, Default, Clone)]
pub struct PollPacer {
    last_request_sent_at: Option<Instant>,
    next_allowed_interval: Duration,
}

impl PollPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before the next request may be sent
    ///
    /// Zero when no wait is required, including before the first request.
    pub fn time_until_next_allowed(&self) -> Duration {
        self.time_until_next_allowed_at(Instant::now())
    }

    pub fn time_until_next_allowed_at(&self, now: Instant) -> Duration {
        self.last_request_sent_at.map_or(Duration::ZERO, |sent_at| {
            (sent_at + self.next_allowed_interval).saturating_duration_since(now)
        })
    }

    pub fn record_request_sent(&mut self, at: Instant) {
        self.last_request_sent_at = Some(at);
    }

    pub fn update_interval(&mut self, interval: Duration) {
        self.next_allowed_interval = interval;
    }

    pub fn next_allowed_interval(&self) -> Duration {
        self.next_allowed_interval
    }

    pub fn last_request_sent_at(&self) -> Option<Instant> {
        self.last_request_sent_at
    }
}

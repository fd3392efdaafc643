//! Summary of a user's recent activity

use compact_str::CompactString;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::trace;

use crate::domain::{Event, ISSUES_EVENT, PUSH_EVENT, WATCH_EVENT};

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("invalid {kind} payload in event {id}: {source}")]
    InvalidPayload {
        id: CompactString,
        kind: CompactString,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsDigest {
    /// Commits pushed per repository, in order of first appearance
    pub commits_pushed: Vec<(CompactString, u64)>,
    /// Repository of the most recently opened issue
    pub last_issue_opened_repo: Option<CompactString>,
    /// Most recently starred repository
    pub last_star: Option<CompactString>,
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    size: u64,
}

#[derive(Debug, Deserialize)]
struct IssuesPayload {
    action: CompactString,
}

impl EventsDigest {
    /// Build a digest from events ordered most recent first
    ///
    /// Only payloads of recognised event types are decoded; a malformed one
    /// fails the whole digest.
    pub fn from_events(events: &[Event]) -> Result<Self, DigestError> {
        let mut digest = Self::default();

        for event in events {
            match event.kind.as_str() {
                PUSH_EVENT => {
                    let payload: PushPayload = decode_payload(event)?;
                    digest.add_commits(&event.repo.name, payload.size);
                },
                ISSUES_EVENT if digest.last_issue_opened_repo.is_none() => {
                    let payload: IssuesPayload = decode_payload(event)?;
                    if payload.action == "opened" {
                        digest.last_issue_opened_repo = Some(event.repo.name.clone());
                    }
                },
                WATCH_EVENT if digest.last_star.is_none() => {
                    digest.last_star = Some(event.repo.name.clone());
                },
                other => trace!(kind = other, id = %event.id, "Skipping event"),
            }
        }

        Ok(digest)
    }

    pub fn is_empty(&self) -> bool {
        self.commits_pushed.is_empty()
            && self.last_issue_opened_repo.is_none()
            && self.last_star.is_none()
    }

    fn add_commits(&mut self, repo: &CompactString, count: u64) {
        match self.commits_pushed.iter_mut().find(|(name, _)| name == repo) {
            Some((_, total)) => *total += count,
            None => self.commits_pushed.push((repo.clone(), count)),
        }
    }
}

fn decode_payload<T: DeserializeOwned>(event: &Event) -> Result<T, DigestError> {
    event.payload().map_err(|source| DigestError::InvalidPayload {
        id: event.id.clone(),
        kind: event.kind.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event(id: &str, kind: &str, repo: &str, payload: serde_json::Value) -> Event {
        let raw = json!({
            "id": id,
            "type": kind,
            "actor": { "id": 1, "login": "octocat" },
            "repo": { "id": 2, "name": repo },
            "payload": payload,
            "public": true,
            "created_at": "2024-10-01T12:00:00Z",
        });
        serde_json::from_str(&raw.to_string()).unwrap()
    }

    #[test]
    fn empty_feed_gives_empty_digest() {
        let digest = EventsDigest::from_events(&[]).unwrap();

        assert!(digest.is_empty());
    }

    #[test]
    fn push_sizes_accumulate_per_repo_in_first_seen_order() {
        let events = [
            event("1", PUSH_EVENT, "octo/b", json!({ "size": 2 })),
            event("2", PUSH_EVENT, "octo/a", json!({ "size": 1 })),
            event("3", PUSH_EVENT, "octo/b", json!({ "size": 5 })),
        ];

        let digest = EventsDigest::from_events(&events).unwrap();

        assert_eq!(
            digest.commits_pushed,
            vec![
                (CompactString::from("octo/b"), 7),
                (CompactString::from("octo/a"), 1)
            ]
        );
    }

    #[test]
    fn most_recent_opened_issue_and_star_win() {
        let events = [
            event("1", ISSUES_EVENT, "octo/closed", json!({ "action": "closed" })),
            event("2", ISSUES_EVENT, "octo/first", json!({ "action": "opened" })),
            event("3", ISSUES_EVENT, "octo/second", json!({ "action": "opened" })),
            event("4", WATCH_EVENT, "octo/star-1", json!({ "action": "started" })),
            event("5", WATCH_EVENT, "octo/star-2", json!({ "action": "started" })),
            event("6", "ForkEvent", "octo/fork", json!({})),
        ];

        let digest = EventsDigest::from_events(&events).unwrap();

        assert_eq!(digest.last_issue_opened_repo.as_deref(), Some("octo/first"));
        assert_eq!(digest.last_star.as_deref(), Some("octo/star-1"));
        assert!(digest.commits_pushed.is_empty());
    }

    #[test]
    fn malformed_push_payload_fails() {
        let events = [event("9", PUSH_EVENT, "octo/a", json!({ "size": "three" }))];

        let err = EventsDigest::from_events(&events).unwrap_err();

        assert!(matches!(err, DigestError::InvalidPayload { ref id, .. } if id == "9"));
    }

    #[test]
    fn issue_payload_without_action_fails() {
        let events = [event("7", ISSUES_EVENT, "octo/a", json!({ "issue": {} }))];

        assert!(EventsDigest::from_events(&events).is_err());
    }

    #[test]
    fn unknown_payloads_are_never_decoded() {
        let events = [event("1", "GollumEvent", "octo/wiki", json!("not an object"))];

        let digest = EventsDigest::from_events(&events).unwrap();

        assert!(digest.is_empty());
    }
}

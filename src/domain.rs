use compact_str::CompactString;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::value::RawValue;

/// Event type tags interpreted by the digest
pub const PUSH_EVENT: &str = "PushEvent";
pub const ISSUES_EVENT: &str = "IssuesEvent";
pub const WATCH_EVENT: &str = "WatchEvent";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub login: CompactString,
    #[serde(default)]
    pub display_login: CompactString,
    #[serde(default)]
    pub gravatar_id: CompactString,
    #[serde(default)]
    pub url: CompactString,
    #[serde(default)]
    pub avatar_url: CompactString,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: CompactString,
    #[serde(default)]
    pub url: CompactString,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: u64,
    pub login: CompactString,
    #[serde(default)]
    pub gravatar_id: CompactString,
    #[serde(default)]
    pub url: CompactString,
    #[serde(default)]
    pub avatar_url: CompactString,
}

/// One entry of a user's public activity feed
///
/// The payload shape depends on `kind`; it is kept as the raw JSON text sent
/// by GitHub and only decoded on demand through [`Event::payload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: CompactString,
    #[serde(rename = "type")]
    pub kind: CompactString,
    pub actor: Actor,
    pub repo: Repo,
    pub payload: Box<RawValue>,
    pub public: bool,
    pub created_at: CompactString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<Organisation>,
}

impl Event {
    /// Decode the payload into the shape expected for this event's type
    pub fn payload<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(self.payload.get())
    }

    pub fn raw_payload(&self) -> &str {
        self.payload.get()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.actor == other.actor
            && self.repo == other.repo
            && self.raw_payload() == other.raw_payload()
            && self.public == other.public
            && self.created_at == other.created_at
            && self.org == other.org
    }
}

impl Eq for Event {}

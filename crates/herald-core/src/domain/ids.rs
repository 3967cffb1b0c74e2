//! Domain identifiers.
//!
//! - `Arn`: コントロールプレーン側の所有者 ID（task ARN）。文字列のまま扱う。
//! - `EventId`: エンベロープごとに振る ULID ベースの ID。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Owning entity identifier (task ARN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arn(String);

impl Arn {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Arn {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Arn {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of one sendable event (envelope). Displays as `event-<ulid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Ulid);

impl EventId {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// 現在時刻ベースで新しい ID を生成
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_display_has_prefix() {
        let ulid = Ulid::new();
        let id = EventId::from_ulid(ulid);
        assert_eq!(id.as_ulid(), ulid);
        assert_eq!(id.to_string(), format!("event-{ulid}"));
    }

    #[test]
    fn generated_event_ids_are_unique() {
        let a = EventId::generate();
        let b = EventId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn event_id_serializes_as_bare_ulid() {
        let ulid = Ulid::new();
        let json = serde_json::to_string(&EventId::from_ulid(ulid)).unwrap();
        assert_eq!(json, format!("\"{ulid}\""));
    }

    #[test]
    fn arn_serializes_as_plain_string() {
        let arn = Arn::from("arn:aws:ecs:us-west-2:123:task/abc");
        let json = serde_json::to_string(&arn).unwrap();
        assert_eq!(json, "\"arn:aws:ecs:us-west-2:123:task/abc\"");
        let back: Arn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, arn);
    }
}

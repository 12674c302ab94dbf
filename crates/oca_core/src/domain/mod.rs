use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Alert priority as reported by the alerting service.
///
/// Anything outside `P1..P5` is preserved verbatim in `Other` and ignored by severity views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
    P5,
    Other(String),
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "P1" => Priority::P1,
            "P2" => Priority::P2,
            "P3" => Priority::P3,
            "P4" => Priority::P4,
            "P5" => Priority::P5,
            _ => Priority::Other(raw),
        }
    }
}

impl From<&str> for Priority {
    fn from(raw: &str) -> Self {
        Priority::from(raw.to_string())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::P1 => f.write_str("P1"),
            Priority::P2 => f.write_str("P2"),
            Priority::P3 => f.write_str("P3"),
            Priority::P4 => f.write_str("P4"),
            Priority::P5 => f.write_str("P5"),
            Priority::Other(raw) => f.write_str(raw),
        }
    }
}

pub const RESPONDER_KIND_TEAM: &str = "team";

/// Reference to a team, user, escalation or schedule assigned to an alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponderRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ResponderRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            name: None,
        }
    }

    pub fn is_team(&self) -> bool {
        self.kind == RESPONDER_KIND_TEAM
    }
}

/// Alert as listed by the alerting service.
///
/// Notes:
/// - `created_at` drives every period key; `updated_at` is only read by the impact view.
/// - `extra_properties` is carried through untouched; the aggregator does not consult it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,
    pub tiny_id: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub acknowledged: bool,
    pub owner: Option<String>,
    pub owner_team_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub priority: Priority,
    #[serde(default)]
    pub responders: Vec<ResponderRef>,
    #[serde(default)]
    pub extra_properties: BTreeMap<String, String>,
}

impl AlertRecord {
    pub fn new(
        id: impl Into<String>,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
        priority: impl Into<Priority>,
    ) -> Self {
        Self {
            id: id.into(),
            tiny_id: None,
            message: None,
            status: None,
            acknowledged: false,
            owner: None,
            owner_team_id: None,
            tags: Vec::new(),
            created_at,
            updated_at,
            priority: priority.into(),
            responders: Vec::new(),
            extra_properties: BTreeMap::new(),
        }
    }

    pub fn with_responder(mut self, kind: &str, id: &str) -> Self {
        self.responders.push(ResponderRef::new(kind, id));
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub tiny_id: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    pub priority: Priority,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub owner_team: Option<String>,
    #[serde(default)]
    pub responders: Vec<ResponderRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub owner_team: Option<TeamRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OnCallParticipantRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

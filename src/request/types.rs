//! Core types for help requests.
//!
//! A [`HelpRequest`] is the entity tracked by the store and the lifecycle.
//! The store exclusively owns all instances; callers always receive clones.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a help request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Uuid);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display only first 8 characters for readability in logs
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl RequestId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        RequestId(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        RequestId(uuid)
    }
}

impl std::ops::Deref for RequestId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Identifier of the user who owns a request.
///
/// A foreign reference to the auth provider's user record; the request
/// system never resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

/// Kind of help being requested. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpType {
    Emergency,
    Medical,
    Community,
}

impl HelpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HelpType::Emergency => "emergency",
            HelpType::Medical => "medical",
            HelpType::Community => "community",
        }
    }
}

impl std::fmt::Display for HelpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HelpType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "emergency" => Ok(HelpType::Emergency),
            "medical" => Ok(HelpType::Medical),
            "community" => Ok(HelpType::Community),
            _ => Err(format!("Invalid help type: {}", s)),
        }
    }
}

/// Lifecycle status of a help request.
///
/// `Pending` is the initial status; `Completed` and `Cancelled` are
/// terminal. See [`RequestStatus::can_transition_to`] for the legality
/// rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Check whether this status is terminal (no further changes allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "completed" => Ok(RequestStatus::Completed),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

/// Where help should be sent.
///
/// Either GPS coordinates from the geolocation provider or a free-text
/// address the user typed in; never both. The store accepts whatever shape
/// it is handed without validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates { latitude: f64, longitude: f64 },
    Address(String),
}

/// A help request tracked by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequest {
    /// Unique id, assigned at creation.
    pub id: RequestId,

    /// The user who submitted the request.
    pub user_id: UserId,

    /// Kind of help requested. Immutable after creation.
    pub kind: HelpType,

    /// Current lifecycle status.
    pub status: RequestStatus,

    /// Free-text description of the situation, if the user gave one.
    pub description: Option<String>,

    /// Shared location, if any.
    pub location: Option<Location>,

    /// When the request was created.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every status change.
    pub updated_at: DateTime<Utc>,

    /// Open-ended auxiliary fields specific to the request kind
    /// (e.g., the medical card's issue type).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub help_details: HashMap<String, serde_json::Value>,
}

/// Input for creating a new help request.
///
/// Everything the caller supplies; id, status, and timestamps are assigned
/// by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHelpRequest {
    pub user_id: UserId,
    pub kind: HelpType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub help_details: HashMap<String, serde_json::Value>,
}

impl NewHelpRequest {
    /// Minimal input: just the owner and the kind of help.
    pub fn new(user_id: impl Into<UserId>, kind: HelpType) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            description: None,
            location: None,
            help_details: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.help_details.insert(key.into(), value);
        self
    }
}

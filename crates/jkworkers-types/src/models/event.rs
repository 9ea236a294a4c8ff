//! Container lifecycle notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a container as reported by the event source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LifecycleStatus {
    Start,
    Die,
    Stop,
    Kill,
    /// Anything else (create, pause, exec_start, ...)
    Other(String),
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Die => "die",
            Self::Stop => "stop",
            Self::Kill => "kill",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for LifecycleStatus {
    fn from(s: &str) -> Self {
        match s {
            "start" => Self::Start,
            "die" => Self::Die,
            "stop" => Self::Stop,
            "kill" => Self::Kill,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Raw status string
    pub status: String,
    /// Id of the container the event is about
    pub container_id: String,
    /// When the event happened, if the source reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl LifecycleEvent {
    pub fn new(status: impl Into<String>, container_id: impl Into<String>) -> Self {
        Self { status: status.into(), container_id: container_id.into(), time: None }
    }

    pub fn kind(&self) -> LifecycleStatus {
        LifecycleStatus::from(self.status.as_str())
    }

    /// First 12 characters of the container id, as `docker ps` prints it.
    pub fn short_id(&self) -> &str {
        self.container_id.get(..12).unwrap_or(&self.container_id)
    }
}

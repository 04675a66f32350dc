//! Lifecycle state attached to an entity by the ingestion workflow.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Processing stage of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LifecycleStatus {
    /// Submitted, not yet processed.
    New,
    /// Files are being fetched.
    Ingesting,
    /// Stored and addressable.
    Ingested,
    /// Ingest aborted.
    IngestFailed,
    /// Any other stage.
    Other,
}

impl LifecycleStatus {
    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ingesting => "INGESTING",
            Self::Ingested => "INGESTED",
            Self::IngestFailed => "INGEST_FAILED",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NEW" => Ok(Self::New),
            "INGESTING" => Ok(Self::Ingesting),
            "INGESTED" => Ok(Self::Ingested),
            "INGEST_FAILED" => Ok(Self::IngestFailed),
            "OTHER" => Ok(Self::Other),
            other => Err(format!("unknown lifecycle status '{other}'")),
        }
    }
}

impl TryFrom<String> for LifecycleStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LifecycleStatus> for String {
    fn from(status: LifecycleStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A `(details, status)` pair recording where an entity is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    #[serde(rename = "@status")]
    status: LifecycleStatus,
    #[serde(rename = "$text", default)]
    details: String,
}

impl LifecycleState {
    /// Create a lifecycle state.
    pub fn new(status: LifecycleStatus, details: impl Into<String>) -> Self {
        Self {
            status,
            details: details.into(),
        }
    }

    /// The state stamped on a successful ingest at `at`.
    pub fn ingested_at(at: DateTime<Utc>) -> Self {
        Self::new(
            LifecycleStatus::Ingested,
            format!("ingested at {}", at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        )
    }

    /// Status value.
    pub fn status(&self) -> LifecycleStatus {
        self.status
    }

    /// Free-form note, typically carrying a timestamp.
    pub fn details(&self) -> &str {
        &self.details
    }
}

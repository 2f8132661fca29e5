use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of a backfill run or one of its partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackfillState {
    Paused,
    Running,
    Complete,
    Cancelled,
}

impl BackfillState {
    /// Get the wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paused => "PAUSED",
            Self::Running => "RUNNING",
            Self::Complete => "COMPLETE",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}

impl fmt::Display for BackfillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque key bytes, carried as a string on the wire.
///
/// Range bounds come from form text or from partition cursors that the
/// backend already renders as text, so the UTF-8 form is the canonical one.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteString(Vec<u8>);

impl ByteString {
    /// Lossy UTF-8 view, for display.
    pub fn to_utf8_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for ByteString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

impl<'de> Deserialize<'de> for ByteString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Request sent to the creation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBackfillRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backfill_name: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkey_range_start: Option<ByteString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkey_range_end: Option<ByteString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_sleep_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_schedule: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameter_map: BTreeMap<String, ByteString>,
}

/// Response from the creation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBackfillResponse {
    pub backfill_run_id: i64,
}

/// Read-only status snapshot of one backfill run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillStatus {
    pub id: i64,
    pub service_name: String,
    pub variant: String,
    #[serde(default)]
    pub name: String,
    pub state: BackfillState,
    pub dry_run: bool,
    pub num_threads: i32,
    pub scan_size: i64,
    pub batch_size: i64,
    pub extra_sleep_ms: i64,
    #[serde(default)]
    pub backoff_schedule: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by_user: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub partitions: Vec<Partition>,
    #[serde(default)]
    pub event_logs: Vec<EventLog>,
    #[serde(default)]
    pub next_offset: Option<String>,
}

/// Progress of one partition of a backfill run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    pub state: BackfillState,
    #[serde(default)]
    pub pkey_cursor: Option<String>,
    #[serde(default)]
    pub pkey_start: Option<String>,
    #[serde(default)]
    pub pkey_end: Option<String>,
    #[serde(default)]
    pub backfilled_matching_record_count: i64,
    #[serde(default)]
    pub computed_matching_record_count: i64,
    #[serde(default)]
    pub matching_records_per_minute: Option<i64>,
    #[serde(default)]
    pub precomputing_done: bool,
}

/// One entry of a backfill's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub partition_name: Option<String>,
    pub message: String,
    #[serde(default)]
    pub extra_data: Option<String>,
}

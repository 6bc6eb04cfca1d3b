//! Snapshots: the unit of fetch, persist and verify.
//!
//! A snapshot is persisted as two opaque strings: the JSON-encoded record
//! list and an ISO-8601 capture timestamp. The encode/decode helpers here
//! are the only place that knows that format.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::{TypesError, UserRecord};

/// An ordered list of user records plus the moment it was captured.
///
/// Order is exactly the order the source produced; nothing re-sorts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<UserRecord>,
    timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// Capture a snapshot of `records` stamped with the current time.
    pub fn capture(records: Vec<UserRecord>) -> Self {
        Self::with_timestamp(records, Utc::now())
    }

    /// Build a snapshot with an explicit capture time.
    ///
    /// The stamp is truncated to milliseconds, the precision it is stored at.
    pub fn with_timestamp(records: Vec<UserRecord>, timestamp: DateTime<Utc>) -> Self {
        Self {
            records,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Records in source order.
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    /// Consume the snapshot, keeping only the records.
    pub fn into_records(self) -> Vec<UserRecord> {
        self.records
    }

    /// When this snapshot was captured.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by id.
    pub fn find(&self, id: u64) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Encode the record list as JSON for the records key.
    pub fn encode_records(&self) -> Result<String, TypesError> {
        serde_json::to_string(&self.records).map_err(TypesError::Serialization)
    }

    /// Encode the capture time for the timestamp key (RFC 3339, UTC, millis).
    pub fn encode_timestamp(&self) -> String {
        format_timestamp(self.timestamp)
    }

    /// Rebuild a snapshot from its two persisted parts.
    pub fn decode(records_json: &str, timestamp: &str) -> Result<Self, TypesError> {
        let records: Vec<UserRecord> =
            serde_json::from_str(records_json).map_err(TypesError::Deserialization)?;
        let timestamp = parse_timestamp(timestamp)?;
        Ok(Self { records, timestamp })
    }
}

/// Format a timestamp the way it is persisted.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TypesError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| TypesError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

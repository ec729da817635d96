//! Firestore Timestamp type
//!
//! Server timestamps are exchanged as RFC 3339 strings in REST payloads.

use crate::error::FirestoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Firestore timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since Unix epoch
    pub seconds: i64,

    /// Nanoseconds component (0-999,999,999)
    pub nanoseconds: i32,
}

impl Timestamp {
    /// Create a new timestamp
    pub fn new(seconds: i64, nanoseconds: i32) -> Result<Self, FirestoreError> {
        if !(0..1_000_000_000).contains(&nanoseconds) {
            return Err(FirestoreError::InvalidArgument(format!(
                "nanoseconds must be in range [0, 999999999], got {}",
                nanoseconds
            )));
        }

        Ok(Self {
            seconds,
            nanoseconds,
        })
    }

    /// Get current timestamp
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Convert from DateTime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos() as i32,
        }
    }

    /// Convert to DateTime
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds as u32)
    }

    /// Parse an RFC 3339 string such as `2024-05-01T10:00:00.123456Z`
    pub fn parse_rfc3339(value: &str) -> Result<Self, FirestoreError> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| FirestoreError::InvalidData(format!("invalid timestamp {:?}: {}", value, e)))
    }

    /// Format as RFC 3339 in UTC with nanosecond precision
    pub fn to_rfc3339(&self) -> Result<String, FirestoreError> {
        let Some(dt) = self.to_datetime() else {
            return Err(FirestoreError::InvalidData(format!(
                "timestamp out of range: {}s",
                self.seconds
            )));
        };
        Ok(dt.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    /// Smallest timestamp strictly after this one
    pub fn next_after(&self) -> Self {
        if self.nanoseconds == 999_999_999 {
            Self {
                seconds: self.seconds + 1,
                nanoseconds: 0,
            }
        } else {
            Self {
                seconds: self.seconds,
                nanoseconds: self.nanoseconds + 1,
            }
        }
    }
}

//! Stored Entry Module
//!
//! Defines the structure for individual engine entries with lifespan support.

use chrono::{DateTime, Utc};

use crate::cache::{CacheValue, Lifespan};

// == Stored Entry ==
/// Represents a single engine entry with value and metadata.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored value
    pub value: CacheValue,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiration deadline, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates a new entry whose deadline is `lifespan` after `now`.
    pub fn new(value: CacheValue, lifespan: Lifespan, now: DateTime<Utc>) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: lifespan.deadline_from(now),
        }
    }

    /// Creates a new entry that keeps an existing deadline.
    pub fn with_deadline(
        value: CacheValue,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the
    /// deadline, so a zero or negative lifespan is expired on arrival.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.value.size_in_bytes() as u64
    }
}

//! Identifiable Value Module
//!
//! Snapshots handed out by `get_identifiable` and consumed by
//! `put_if_untouched`.

use crate::cache::{CacheValue, Expiration};

// == Identifiable Value ==
/// Immutable snapshot of a value as it was read.
///
/// Carries no key and no version: a CAS succeeds whenever the current value
/// equals the snapshot, so two writes that leave an equal value behind are
/// indistinguishable.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifiableValue {
    snapshot: Option<CacheValue>,
}

impl IdentifiableValue {
    /// Captures `snapshot`; None records that the key was absent.
    pub fn new(snapshot: Option<CacheValue>) -> Self {
        Self { snapshot }
    }

    pub fn value(&self) -> Option<&CacheValue> {
        self.snapshot.as_ref()
    }

    pub fn is_absent(&self) -> bool {
        self.snapshot.is_none()
    }
}

// == CAS Values ==
/// One entry of a batch compare-and-swap.
#[derive(Debug, Clone, PartialEq)]
pub struct CasValues {
    pub old: IdentifiableValue,
    pub new: CacheValue,
    /// Overrides the batch-wide expiration for this entry
    pub expiration: Option<Expiration>,
}

impl CasValues {
    pub fn new(old: IdentifiableValue, new: impl Into<CacheValue>) -> Self {
        Self {
            old,
            new: new.into(),
            expiration: None,
        }
    }

    pub fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

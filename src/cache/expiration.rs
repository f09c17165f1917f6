//! Expiration Module
//!
//! Converts caller-facing expirations into lifespans relative to the moment
//! of the call. Absolute instants never reach the engine.

use chrono::{DateTime, Duration, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

// == Expiration ==
/// When an entry should stop being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Expiration {
    #[default]
    Never,
    At(DateTime<Utc>),
}

impl Expiration {
    /// Expires `delta` after now.
    ///
    /// A deadline past the end of representable time never expires; one
    /// before its start is already expired.
    pub fn by_delta(delta: Duration) -> Self {
        match Utc::now().checked_add_signed(delta) {
            Some(instant) => Expiration::At(instant),
            None => Self::out_of_range(delta < TimeDelta::zero()),
        }
    }

    pub fn by_delta_seconds(seconds: i64) -> Self {
        TimeDelta::try_seconds(seconds)
            .map_or_else(|| Self::out_of_range(seconds < 0), Self::by_delta)
    }

    pub fn by_delta_millis(millis: i64) -> Self {
        TimeDelta::try_milliseconds(millis)
            .map_or_else(|| Self::out_of_range(millis < 0), Self::by_delta)
    }

    fn out_of_range(in_past: bool) -> Self {
        if in_past {
            Expiration::At(DateTime::<Utc>::MIN_UTC)
        } else {
            Expiration::Never
        }
    }

    pub fn on_date(instant: DateTime<Utc>) -> Self {
        Expiration::At(instant)
    }

    // == To Lifespan ==
    /// Lifespan relative to the current time.
    pub fn to_lifespan(&self) -> Lifespan {
        self.to_lifespan_at(Utc::now())
    }

    /// Lifespan relative to `now`.
    ///
    /// A past instant yields a negative lifespan; it is passed through so the
    /// engine treats the entry as already stale.
    pub fn to_lifespan_at(&self, now: DateTime<Utc>) -> Lifespan {
        match self {
            Expiration::Never => Lifespan::Unbounded,
            Expiration::At(instant) => Lifespan::Millis((*instant - now).num_milliseconds()),
        }
    }
}

impl From<Option<Expiration>> for Expiration {
    fn from(expiration: Option<Expiration>) -> Self {
        expiration.unwrap_or_default()
    }
}

// == Lifespan ==
/// Remaining time an entry may live, as handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifespan {
    Unbounded,
    /// May be zero or negative, meaning already expired
    Millis(i64),
}

impl Lifespan {
    /// Milliseconds, with -1 standing for unbounded.
    pub fn as_millis(&self) -> i64 {
        match self {
            Lifespan::Unbounded => -1,
            Lifespan::Millis(ms) => *ms,
        }
    }

    /// Absolute deadline when measured from `now`, None when unbounded.
    ///
    /// Saturates: a deadline beyond the representable range is unbounded,
    /// one before it is the earliest instant.
    pub fn deadline_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Lifespan::Unbounded => None,
            Lifespan::Millis(ms) => match TimeDelta::try_milliseconds(*ms)
                .and_then(|delta| now.checked_add_signed(delta))
            {
                Some(deadline) => Some(deadline),
                None if *ms < 0 => Some(DateTime::<Utc>::MIN_UTC),
                None => None,
            },
        }
    }
}

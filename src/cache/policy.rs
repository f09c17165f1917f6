//! Set Policy Module

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Set Policy ==
/// Whether a put is unconditional or conditioned on prior presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetPolicy {
    #[default]
    SetAlways,
    AddOnlyIfNotPresent,
    ReplaceOnlyIfPresent,
}

impl SetPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetPolicy::SetAlways => "SET_ALWAYS",
            SetPolicy::AddOnlyIfNotPresent => "ADD_ONLY_IF_NOT_PRESENT",
            SetPolicy::ReplaceOnlyIfPresent => "REPLACE_ONLY_IF_PRESENT",
        }
    }
}

impl fmt::Display for SetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SET_ALWAYS" => Ok(SetPolicy::SetAlways),
            "ADD_ONLY_IF_NOT_PRESENT" => Ok(SetPolicy::AddOnlyIfNotPresent),
            "REPLACE_ONLY_IF_PRESENT" => Ok(SetPolicy::ReplaceOnlyIfPresent),
            other => Err(CacheError::UnsupportedPolicy(other.to_string())),
        }
    }
}

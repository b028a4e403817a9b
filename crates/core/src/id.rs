//! Identifier of a stored item.
//!
//! The backend owns identity. Depending on its storage it hands out integer
//! row ids or opaque strings, so `ItemId` keeps whichever form it received and
//! serializes it back unchanged.

use core::str::FromStr;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Everything but RFC 3986 unreserved characters gets escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Numeric(i64),
    Text(String),
}

impl ItemId {
    /// Path segment used in `/delete_item/{id}` style endpoints.
    pub fn as_path_segment(&self) -> String {
        match self {
            ItemId::Numeric(n) => n.to_string(),
            ItemId::Text(s) => utf8_percent_encode(s, SEGMENT).to_string(),
        }
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ItemId::Numeric(n) => core::fmt::Display::fmt(n, f),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    /// Integers become `Numeric`, anything else non-blank becomes `Text`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::invalid_id("ItemId: empty"));
        }
        Ok(match s.parse::<i64>() {
            Ok(n) => ItemId::Numeric(n),
            Err(_) => ItemId::Text(s.to_string()),
        })
    }
}

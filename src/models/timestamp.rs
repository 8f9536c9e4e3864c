//! Lenient timestamp input for record fields.
//!
//! Output keeps chrono's ISO form; input also takes the minute-only
//! `datetime-local` shape (`2024-06-01T09:30`) and the storage form.

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

use crate::db::parse_timestamp_text;

pub fn deserialize_flexible_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp_text(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}")))
}

/// Like [`deserialize_flexible_timestamp`]; `null` or a blank string is `None`.
pub fn deserialize_flexible_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_timestamp_text(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}"))),
        _ => Ok(None),
    }
}

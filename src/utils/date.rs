// Strict UTC timestamp handling
// The only accepted wire shape is YYYY-MM-DDTHH:MM:SSZ

use chrono::{DateTime, NaiveDateTime, Utc};

/// chrono format string for the strict wire shape
pub const STRICT_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Length of a strict timestamp, e.g. `2022-12-31T14:59:00Z`
const STRICT_UTC_LEN: usize = 20;

/// Parse a strict ISO-8601 UTC timestamp.
///
/// Returns `None` for anything that is not exactly `YYYY-MM-DDTHH:MM:SSZ`
/// (no fractional seconds, no offsets, zero-padded fields) or that does not
/// name a real calendar instant.
pub fn parse_strict_utc(value: &str) -> Option<DateTime<Utc>> {
    if !has_strict_shape(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, STRICT_UTC_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Render a timestamp in the strict wire shape
pub fn format_strict_utc(value: &DateTime<Utc>) -> String {
    value.format(STRICT_UTC_FORMAT).to_string()
}

/// Convert stored epoch seconds back into a UTC timestamp
pub fn from_epoch_secs(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

// chrono accepts unpadded numeric fields, so the layout is checked byte by byte first
fn has_strict_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != STRICT_UTC_LEN {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        13 | 16 => *b == b':',
        19 => *b == b'Z',
        _ => b.is_ascii_digit(),
    })
}

/// serde adapter for required strict timestamps
pub mod strict_utc {
    use super::{format_strict_utc, parse_strict_utc};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_strict_utc(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_strict_utc(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid strict UTC timestamp '{}'", raw)))
    }
}

/// serde adapter for nullable strict timestamps
pub mod strict_utc_option {
    use super::{format_strict_utc, parse_strict_utc};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&format_strict_utc(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_strict_utc(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid strict UTC timestamp '{}'", raw))),
            None => Ok(None),
        }
    }
}

//! JIRA timestamp encoding and decoding.
//!
//! JIRA emits timestamps as `2021-01-05T10:15:30.000+0200`: RFC 3339 except
//! that the UTC offset carries no colon. Decoding accepts both spellings,
//! encoding always produces the colon-less form the server sends.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// `strftime` pattern for the wire format (`%z` renders `+hhmm`).
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Literal some JIRA fields use in place of an absent date.
const NONE_LITERAL: &str = "none";

/// Errors produced while decoding a JIRA timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// The value is not a recognizable timestamp.
    #[error("invalid JIRA timestamp: '{0}'")]
    Format(String),
}

/// Decode a JIRA timestamp.
///
/// Returns `Ok(None)` for a missing value, an empty string, or the literal
/// `"none"` (any case).
///
/// # Errors
///
/// Returns [`TimestampError::Format`] if the value cannot be parsed.
pub fn decode(raw: Option<&str>) -> Result<Option<DateTime<FixedOffset>>, TimestampError> {
    let raw = match raw.map(str::trim) {
        None => return Ok(None),
        Some(value) if value.is_empty() || value.eq_ignore_ascii_case(NONE_LITERAL) => {
            return Ok(None)
        }
        Some(value) => value,
    };

    let normalized = insert_offset_colon(raw);
    DateTime::parse_from_rfc3339(&normalized)
        .map(Some)
        .map_err(|_| TimestampError::Format(raw.to_string()))
}

/// Encode a timestamp in the JIRA wire format.
///
/// Returns an empty string for `None`.
pub fn encode(value: Option<&DateTime<FixedOffset>>) -> String {
    value
        .map(|ts| ts.format(WIRE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Rewrite a trailing `±hhmm` offset as `±hh:mm`.
fn insert_offset_colon(raw: &str) -> Cow<'_, str> {
    let bytes = raw.as_bytes();
    if bytes.len() < 5 {
        return Cow::Borrowed(raw);
    }

    let sign_at = bytes.len() - 5;
    let has_sign = matches!(bytes[sign_at], b'+' | b'-');
    if has_sign && bytes[sign_at + 1..].iter().all(u8::is_ascii_digit) {
        let (head, minutes) = raw.split_at(sign_at + 3);
        Cow::Owned(format!("{}:{}", head, minutes))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Serde adapter for `DateTime<FixedOffset>` fields in JIRA payloads.
///
/// ```
/// use chrono::{DateTime, FixedOffset};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Comment {
///     #[serde(with = "jira_rest::api::timestamp::jira")]
///     created: DateTime<FixedOffset>,
/// }
/// ```
pub mod jira {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize a timestamp in the colon-less wire format.
    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::encode(Some(value)))
    }

    /// Deserialize a required timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::decode(Some(&raw))
            .map_err(de::Error::custom)?
            .ok_or_else(|| de::Error::custom("expected a timestamp, found an empty value"))
    }

    /// Serde adapter for optional timestamps.
    ///
    /// Absent fields, `null`, `""` and `"none"` all become `None`. Pair with
    /// `#[serde(default)]` so missing fields are accepted.
    pub mod option {
        use chrono::{DateTime, FixedOffset};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            value: &Option<DateTime<FixedOffset>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(ts) => serializer.serialize_str(&super::super::encode(Some(ts))),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            super::super::decode(raw.as_deref()).map_err(de::Error::custom)
        }
    }
}

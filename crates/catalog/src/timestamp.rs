//! Entry timestamps: epoch milliseconds in memory, RFC 3339 text on disk.
//!
//! Reading also accepts a bare millisecond number.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};

pub fn serialize<S: Serializer>(ms: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = i64::try_from(*ms).map_err(serde::ser::Error::custom)?;
    let at = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| serde::ser::Error::custom(format!("timestamp {ms} out of range")))?;
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Millis(u64),
        Text(String),
    }

    match Stored::deserialize(deserializer)? {
        Stored::Millis(ms) => Ok(ms),
        Stored::Text(text) => {
            let at = DateTime::parse_from_rfc3339(text.trim()).map_err(de::Error::custom)?;
            u64::try_from(at.timestamp_millis())
                .map_err(|_| de::Error::custom(format!("timestamp {text:?} is before 1970")))
        }
    }
}

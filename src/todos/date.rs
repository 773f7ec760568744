//! Coercion of date-like input into a calendar day.
//!
//! Accepted forms: `YYYY-MM-DD`, an RFC 3339 date-time (its UTC day is kept),
//! a naive `YYYY-MM-DDTHH:MM:SS` date-time read as UTC, or milliseconds since
//! the Unix epoch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

pub fn parse_date_like(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();

    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc).date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.date());
    }

    Err(format!(
        "Invalid date '{}'. Expected YYYY-MM-DD, an RFC 3339 date-time or epoch milliseconds",
        value
    ))
}

pub fn date_from_millis(millis: i64) -> Result<NaiveDate, String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|d| d.date_naive())
        .ok_or_else(|| format!("Timestamp {} is out of range", millis))
}

/// A calendar day deserialized from any accepted date-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercedDate(pub NaiveDate);

impl<'de> Deserialize<'de> for CoercedDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CoercedDateVisitor)
    }
}

struct CoercedDateVisitor;

impl<'de> Visitor<'de> for CoercedDateVisitor {
    type Value = CoercedDate;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a date string or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_date_like(v).map(CoercedDate).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        date_from_millis(v).map(CoercedDate).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let millis = i64::try_from(v).map_err(|_| E::custom(format!("Timestamp {} is out of range", v)))?;
        self.visit_i64(millis)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom("Timestamp must be a finite number"));
        }
        self.visit_i64(v.trunc() as i64)
    }
}

/// `null` and a missing key both mean "no date".
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CoercedDate>::deserialize(deserializer)?.map(|d| d.0))
}

/// Tri-state form for updates; pair with `#[serde(default)]` so a missing key stays `None`.
pub fn deserialize_patch<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional(deserializer).map(Some)
}

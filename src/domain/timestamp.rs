// Local date-time parsing for measurement timestamps and service dates
use chrono::{NaiveDate, NaiveDateTime};

const WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.f";
const WITHOUT_SECONDS: &str = "%Y-%m-%dT%H:%M";
const SPACED: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical output format for drafts and request bodies.
pub const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse an ISO local date-time. The services drop the seconds when they are zero,
/// and form inputs never carry them, so both shapes are accepted.
pub fn parse_local(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, WITH_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(value, WITHOUT_SECONDS))
        .ok()
}

pub fn format_local(value: &NaiveDateTime) -> String {
    value.format(LOCAL_FORMAT).to_string()
}

/// Parse a calendar date. The energy service reports `dateMiseEnService` as
/// `yyyy-MM-dd HH:mm:ss`; the time part is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, SPACED).ok().map(|dt| dt.date()))
        .or_else(|| parse_local(value).map(|dt| dt.date()))
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Serde adapter for optional `dateMiseEnService` fields.
pub mod optional_date {
    use super::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&format_date(v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse_date(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date `{}`", s))),
        }
    }
}

/// Serde adapter for optional `dateMesure` fields.
pub mod optional_local {
    use super::{format_local, parse_local};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&format_local(v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse_local(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid local date-time `{}`", s))),
        }
    }
}

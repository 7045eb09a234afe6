//! Calendar date parsing and formatting.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a delivery date: an RFC 3339 timestamp or a bare `YYYY-MM-DD`
/// (midnight UTC of that day).
#[must_use]
pub fn parse_delivery_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// Serde `deserialize_with` for fields parsed by [`parse_delivery_date`].
///
/// # Errors
///
/// Fails when the string is neither RFC 3339 nor `YYYY-MM-DD`.
pub fn deserialize_delivery_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_delivery_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid delivery date: {raw:?}"))
    })
}

/// Render a date as `M/D/YYYY` with no zero padding.
///
/// The output does not depend on the host locale. For timestamps the UTC
/// calendar day is used.
///
/// ```
/// use chrono::NaiveDate;
/// use coffey_core::format_truncated_date;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// assert_eq!(format_truncated_date(&date), "1/5/2024");
/// ```
#[must_use]
pub fn format_truncated_date<D: Datelike>(date: &D) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}
